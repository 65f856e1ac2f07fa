//! URL schemes understood by URL-like literals.
//!
//! `http://localhost` is a host literal only because `http` is listed here; an unknown scheme
//! followed by `://` is reported as an unsupported protocol.
//!
//! ## Examples
//! ```rust
//! use inox_core::lang::schemes;
//!
//! assert!(schemes::is_supported_scheme("wss"));
//! assert_eq!(schemes::default_port("https"), Some(443));
//! assert_eq!(schemes::default_port("ldb"), None);
//! ```

/// Metadata for a URL scheme.
#[derive(Debug, Clone, Copy)]
pub struct SchemeInfo {
    pub name: &'static str,
    /// Port implied when a host literal has no explicit port.
    pub default_port: Option<u16>,
    /// Whether hosts of this scheme are network hosts (as opposed to database or storage names).
    pub is_network: bool,
}

/// Registry of supported schemes.
pub const SCHEMES: &[SchemeInfo] = &[
    scheme("http", Some(80), true),
    scheme("https", Some(443), true),
    scheme("ws", Some(80), true),
    scheme("wss", Some(443), true),
    scheme("ldb", None, false),
    scheme("odb", None, false),
    scheme("file", None, false),
    scheme("mem", None, false),
    scheme("s3", None, false),
];

/// Placeholder scheme prepended to schemeless hosts before URL validation.
pub const NO_SCHEME_SCHEME_NAME: &str = "noscheme";

/// Lookup by name (case-sensitive).
pub fn info_for(name: &str) -> Option<&'static SchemeInfo> {
    SCHEMES.iter().find(|s| s.name == name)
}

/// Report whether `name` is a supported scheme.
pub fn is_supported_scheme(name: &str) -> bool {
    info_for(name).is_some()
}

/// Default port of a scheme, if it has one.
pub fn default_port(name: &str) -> Option<u16> {
    info_for(name).and_then(|s| s.default_port)
}

const fn scheme(name: &'static str, default_port: Option<u16>, is_network: bool) -> SchemeInfo {
    SchemeInfo {
        name,
        default_port,
        is_network,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_names_fit_the_scanner_limit() {
        for s in SCHEMES {
            assert!(s.name.len() <= crate::MAX_SCHEME_NAME_LEN, "{}", s.name);
        }
    }

    #[test]
    fn test_network_schemes_have_default_ports() {
        for s in SCHEMES.iter().filter(|s| s.is_network) {
            assert!(s.default_port.is_some(), "{}", s.name);
        }
        assert!(!is_supported_scheme("ftp"));
    }
}
