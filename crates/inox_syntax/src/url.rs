//! Validation of host, host pattern and URL pattern literals.
//!
//! The scanner first classifies a URL-like token with the loose regexes below, then runs the
//! matching `check_*` function, whose error ends up on the literal node.
//!
//! ## Notes
//! - Host patterns use `*` for one label and `**` for any number of labels. URL patterns may end
//!   with `/...` to match everything under a prefix.
//! - Schemeless hosts (`://example.com`) are validated with the `noscheme` placeholder scheme.
//!
//! ## Examples
//! ```rust
//! use inox_syntax::url::{check_host, check_host_pattern};
//!
//! assert!(check_host("https://example.com:8080").is_ok());
//! assert!(check_host("https://user@example.com").is_err());
//! assert!(check_host_pattern("https://**.example.com").is_ok());
//! ```

use std::sync::LazyLock;

use inox_core::lang::schemes::{self, NO_SCHEME_SCHEME_NAME};
use regex::Regex;
use thiserror::Error;
use url::Url;

use crate::diagnostics::ParsingError;
use crate::diagnostics::messages::*;

const URL_CREDENTIALS_PATTERN: &str = "([-a-zA-Z0-9@:%._+~#=]*@)?";

/// A URL whose host may be a `$variable` or a `{interpolation}` and whose path/query may contain
/// interpolations.
pub static LOOSE_URL_EXPR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^([$][a-zA-Z0-9_-]+|([a-z][a-z0-9+]*:/{{2}}{URL_CREDENTIALS_PATTERN}([-0-9A-Za-z_]+|[-a-zA-Z0-9.]{{1,64}}\.[a-zA-Z0-9]{{1,6}}\b|\{{[$]{{0,1}}[-0-9A-Za-z_]+\}}))(:[0-9]+)?)([{{?#/][-a-zA-Z0-9@:%_+.~#?&/=${{}}]*)$"
    ))
});

/// Host pattern: hostname labels may be `*` or `**`.
pub static LOOSE_HOST_PATTERN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^([a-z][a-z0-9+]*)?://{URL_CREDENTIALS_PATTERN}([-0-9A-Za-z_]+|[*]+|[-a-zA-Z0-9.*]{{1,64}}\.[a-zA-Z0-9*]{{1,6}})(:[0-9]+)?$"
    ))
});

/// Host: scheme (optional), hostname and port.
pub static LOOSE_HOST_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile(&format!(
        r"^([a-z][a-z0-9+]*)?://{URL_CREDENTIALS_PATTERN}([-0-9A-Za-z_]+|[-a-zA-Z0-9.]{{1,64}}\.[a-zA-Z0-9]{{1,6}})(:[0-9]+)?$"
    ))
});

/// URL with a path, query or fragment. `*` is allowed so that URL patterns also match.
pub static LOOSE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^([a-z][a-z0-9+]*)://([-0-9A-Za-z_]+|[-a-zA-Z0-9@:%._+~#=]{1,64}\.[a-zA-Z0-9]{1,6})\b(:[0-9]+)?([?#/][-a-zA-Z0-9@:%_*+.~#?&/=]*)$",
    )
});

/// Email address, as accepted by unquoted string literals.
pub static STRICT_EMAIL_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,24}$"));

/// ## Panics
/// - If one of the patterns above is not a valid regex (a programming error).
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("URL regexes are valid")
}

/// The explicit port of a host or URL is not usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid port `{port}`: it should be an integer between 1 and 65535")]
pub struct InvalidPortError {
    pub port: String,
}

/// Determine the port a host of `scheme` connects to.
///
/// ## Parameters
/// - `scheme`: scheme name without `://`.
/// - `port`: the text after `:` in the authority, empty if there is no explicit port.
///
/// ## Returns
/// - The explicit port, else the scheme's default port, else `None` for schemes without one.
///
/// ## Errors
/// - [`InvalidPortError`] if the explicit port is not a base-10 integer in `1..=65535`.
pub fn check_get_effective_port(scheme: &str, port: &str) -> Result<Option<u16>, InvalidPortError> {
    if port.is_empty() {
        return Ok(schemes::default_port(scheme));
    }
    match port.parse::<u16>() {
        Ok(n) if n != 0 && port.bytes().all(|b| b.is_ascii_digit()) => Ok(Some(n)),
        _ => Err(InvalidPortError { port: port.to_string() }),
    }
}

/// Validate a host literal such as `https://example.com` or `://localhost:8080`.
///
/// ## Errors
/// - Credentials, a path, a query or a fragment are present.
/// - The hostname contains `..`, or a `:` is not followed by a port number.
/// - The explicit port is invalid.
pub fn check_host(u: &str) -> Result<(), ParsingError> {
    let has_scheme = !u.starts_with(':');
    let Some((scheme, host_part)) = u.split_once("://") else {
        return Err(ParsingError::unspecified(INVALID_HOST_LIT));
    };
    let scheme = if has_scheme { scheme } else { NO_SCHEME_SCHEME_NAME };
    let authority = Authority::split(host_part);

    if authority.userinfo.is_some() {
        return Err(ParsingError::unspecified(CREDENTIALS_NOT_ALLOWED_IN_HOST_LITERALS));
    }

    if u.ends_with(':') {
        return Err(ParsingError::unspecified(INVALID_HOST_LIT_MISSING_NUMBER_AFTER_COLON));
    }

    let tested = format!("{scheme}://{host_part}");
    if Url::parse(&tested).is_err() || authority.rest.is_some() || authority.hostname.is_empty() {
        return Err(ParsingError::unspecified(INVALID_HOST_LIT));
    }

    if authority.hostname.contains("..") {
        return Err(ParsingError::unspecified(INVALID_HOST_LIT));
    }

    if has_scheme {
        check_get_effective_port(scheme, authority.port)
            .map_err(|err| ParsingError::unspecified(format!("{INVALID_HOST_LIT}: {err}")))?;
    }

    Ok(())
}

/// Validate a host pattern literal such as `https://*.example.com` or `://**.com`.
///
/// ## Errors
/// - A lone `*` (`**` is suggested), more than one `**`, a run of three stars, or a hostname made
///   only of stars.
/// - The pattern is not a valid host once stars are replaced, or it has credentials.
pub fn check_host_pattern(u: &str) -> Result<(), ParsingError> {
    let has_scheme = !u.starts_with(':');
    let after_scheme = u.split_once("://").map_or(u, |(_, rest)| rest);
    let hostname_pattern = after_scheme.split(':').next().unwrap_or_default();
    let labels: Vec<&str> = hostname_pattern.split('.').collect();

    if labels.len() == 1 {
        if labels[0] != "**" {
            if labels[0] == "*" {
                return Err(ParsingError::unspecified(INVALID_HOST_PATT_SUGGEST_DOUBLE_STAR));
            }
            if Url::parse(u).is_err() {
                return Err(ParsingError::unspecified(INVALID_HOST_PATT));
            }
        }
    } else if u.matches("**").count() > 1 {
        return Err(ParsingError::unspecified(INVALID_HOST_PATT_AT_MOST_ONE_DOUBLE_STAR));
    } else if u.contains("***") {
        return Err(ParsingError::unspecified(INVALID_HOST_PATT_ONLY_SINGLE_OR_DOUBLE_STAR));
    } else if labels.iter().all(|l| *l == "*" || *l == "**") {
        return Err(ParsingError::unspecified(INVALID_HOST_PATT));
    }

    let tested = if has_scheme {
        u.to_string()
    } else {
        format!("{NO_SCHEME_SCHEME_NAME}{u}")
    };
    let replaced = tested.replace('*', "com");
    if Url::parse(&replaced).is_err() {
        return Err(ParsingError::unspecified(INVALID_HOST_PATT));
    }

    let (scheme, host_part) = replaced.split_once("://").unwrap_or((NO_SCHEME_SCHEME_NAME, ""));
    let authority = Authority::split(host_part);
    if has_scheme {
        check_get_effective_port(scheme, authority.port)
            .map_err(|err| ParsingError::unspecified(format!("{INVALID_HOST_PATT}: {err}")))?;
        if authority.userinfo.is_some() {
            return Err(ParsingError::unspecified(CREDENTIALS_NOT_ALLOWED_IN_HOST_PATTERN_LITERALS));
        }
    }

    if authority.hostname.contains("..") {
        return Err(ParsingError::unspecified(INVALID_HOST_PATT));
    }
    Ok(())
}

/// Validate a URL pattern literal such as `https://example.com/*` or `https://example.com/...`.
///
/// ## Errors
/// - `...` appears anywhere but as the single trailing `/...`.
/// - The pattern is not a valid URL once stars are replaced, or its port is invalid.
pub fn check_url_pattern(u: &str) -> Result<(), ParsingError> {
    let is_prefix_pattern = u.ends_with("/...");

    if u.contains("...") && (!is_prefix_pattern || u.matches("...").count() != 1) {
        let after_last_slash = u.rfind('/').map_or(u, |i| &u[i + 1..]);
        if after_last_slash.chars().filter(|c| *c == '.').count() > 3 {
            return Err(ParsingError::unspecified(URL_PATTERNS_CANNOT_END_WITH_SLASH_MORE_THAN_4_DOTS));
        }
        return Err(ParsingError::unspecified(URL_PATTERN_SUBSEQUENT_DOT_EXPLANATION));
    }

    let replaced = u.replace('*', "com");
    if Url::parse(&replaced).is_err() {
        return Err(ParsingError::unspecified(INVALID_URL_PATT));
    }

    let Some((scheme, rest)) = replaced.split_once("://") else {
        return Err(ParsingError::unspecified(INVALID_URL_PATT));
    };
    let authority = Authority::split(rest);
    check_get_effective_port(scheme, authority.port)
        .map_err(|err| ParsingError::unspecified(format!("{INVALID_URL_PATT}: {err}")))?;

    if authority.hostname.contains("..") {
        return Err(ParsingError::unspecified(INVALID_URL_PATT));
    }
    Ok(())
}

/// Validate a URL literal (the scanner has already matched [`LOOSE_URL_REGEX`]).
///
/// ## Returns
/// - `Ok(true)` if the URL has a path, `Ok(false)` if it does not (it is not a URL literal).
///
/// ## Errors
/// - [`INVALID_URL`] if the URL cannot be parsed or its hostname contains `..`, or a message
///   about the invalid port.
pub(crate) fn check_url(u: &str) -> Result<bool, ParsingError> {
    let parsed = Url::parse(u).map_err(|_| ParsingError::unspecified(INVALID_URL))?;
    let (scheme, rest) = u.split_once("://").unwrap_or((parsed.scheme(), ""));
    let authority = Authority::split(rest);

    if authority.hostname.contains("..") {
        return Err(ParsingError::unspecified(INVALID_URL));
    }
    check_get_effective_port(scheme, authority.port)
        .map_err(|err| ParsingError::unspecified(format!("{INVALID_URL}: {err}")))?;

    Ok(authority.rest.is_some_and(|r| r.starts_with('/')))
}

/// Report whether an unquoted string is an email address literal.
pub fn is_email_address(s: &str) -> bool {
    STRICT_EMAIL_ADDRESS_REGEX.is_match(s)
}

/// Report whether `name` is a scheme usable in URL-like literals.
pub fn is_supported_scheme_name(name: &str) -> bool {
    schemes::is_supported_scheme(name)
}

// --- helpers -----------------------------------------------------------------

/// Components of the text following `scheme://`.
///
/// `url::Url` normalizes hosts and drops default ports, so the raw pieces are split here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Authority<'a> {
    userinfo: Option<&'a str>,
    hostname: &'a str,
    port: &'a str,
    /// Path, query and fragment, starting with `/`, `?` or `#`.
    rest: Option<&'a str>,
}

impl<'a> Authority<'a> {
    fn split(after_scheme: &'a str) -> Self {
        let (authority, rest) = match after_scheme.find(['/', '?', '#']) {
            Some(i) => (&after_scheme[..i], Some(&after_scheme[i..])),
            None => (after_scheme, None),
        };
        let (userinfo, host_port) = match authority.rfind('@') {
            Some(i) => (Some(&authority[..i]), &authority[i + 1..]),
            None => (None, authority),
        };
        let (hostname, port) = host_port.split_once(':').unwrap_or((host_port, ""));
        Authority {
            userinfo,
            hostname,
            port,
            rest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(r: Result<(), ParsingError>) -> String {
        r.err().map(|e| e.message).unwrap_or_default()
    }

    #[test]
    fn test_loose_regexes() {
        assert!(LOOSE_HOST_REGEX.is_match("https://example.com"));
        assert!(LOOSE_HOST_REGEX.is_match("://localhost:8080"));
        assert!(!LOOSE_HOST_REGEX.is_match("https://example.com/"));
        assert!(LOOSE_URL_REGEX.is_match("https://example.com/a?b=1"));
        assert!(LOOSE_URL_EXPR_REGEX.is_match("https://{host}/a"));
        assert!(LOOSE_URL_EXPR_REGEX.is_match("$api/users/{id}"));
        assert!(LOOSE_HOST_PATTERN_REGEX.is_match("https://*.example.com"));
        assert!(!LOOSE_HOST_REGEX.is_match("https://*.example.com"));
    }

    #[test]
    fn test_effective_port() {
        assert_eq!(check_get_effective_port("https", ""), Ok(Some(443)));
        assert_eq!(check_get_effective_port("ws", ""), Ok(Some(80)));
        assert_eq!(check_get_effective_port("ldb", ""), Ok(None));
        assert_eq!(check_get_effective_port("http", "8080"), Ok(Some(8080)));
        assert!(check_get_effective_port("http", "0").is_err());
        assert!(check_get_effective_port("http", "65536").is_err());
        assert!(check_get_effective_port("http", "+80").is_err());
    }

    #[test]
    fn test_check_host() {
        assert!(check_host("https://example.com").is_ok());
        assert!(check_host("://example.com").is_ok());
        assert!(check_host("https://localhost:8080").is_ok());
        assert_eq!(message(check_host("https://user@example.com")), CREDENTIALS_NOT_ALLOWED_IN_HOST_LITERALS);
        assert_eq!(message(check_host("https://example..com")), INVALID_HOST_LIT);
        assert_eq!(message(check_host("https://example.com/a")), INVALID_HOST_LIT);
        assert_eq!(message(check_host("https://example.com:")), INVALID_HOST_LIT_MISSING_NUMBER_AFTER_COLON);
        assert!(message(check_host("https://example.com:0")).starts_with(INVALID_HOST_LIT));
    }

    #[test]
    fn test_check_host_pattern() {
        assert!(check_host_pattern("https://*.example.com").is_ok());
        assert!(check_host_pattern("https://**.example.com").is_ok());
        assert!(check_host_pattern("https://**").is_ok());
        assert_eq!(message(check_host_pattern("https://*")), INVALID_HOST_PATT_SUGGEST_DOUBLE_STAR);
        assert_eq!(
            message(check_host_pattern("https://**.**.com")),
            INVALID_HOST_PATT_AT_MOST_ONE_DOUBLE_STAR
        );
        assert_eq!(
            message(check_host_pattern("https://***.com")),
            INVALID_HOST_PATT_ONLY_SINGLE_OR_DOUBLE_STAR
        );
        assert_eq!(message(check_host_pattern("https://*.*")), INVALID_HOST_PATT);
        assert_eq!(message(check_host_pattern("https://a..*")), INVALID_HOST_PATT);
    }

    #[test]
    fn test_check_url_pattern() {
        assert!(check_url_pattern("https://example.com/...").is_ok());
        assert!(check_url_pattern("https://example.com/*").is_ok());
        assert_eq!(
            message(check_url_pattern("https://example.com/.../a")),
            URL_PATTERN_SUBSEQUENT_DOT_EXPLANATION
        );
        assert_eq!(
            message(check_url_pattern("https://example.com/....")),
            URL_PATTERNS_CANNOT_END_WITH_SLASH_MORE_THAN_4_DOTS
        );
        assert!(message(check_url_pattern("https://example.com:99999/a")).starts_with(INVALID_URL_PATT));
    }

    #[test]
    fn test_is_email_address() {
        assert!(is_email_address("foo@example.com"));
        assert!(is_email_address("first.last+tag@Mail.Example.ORG"));
        assert!(!is_email_address("foo@example"));
        assert!(!is_email_address("@example.com"));
    }

    #[test]
    fn test_check_url() {
        assert_eq!(check_url("https://example.com/a"), Ok(true));
        assert_eq!(check_url("https://example.com?a=1"), Ok(false));
        assert!(check_url("https://a..b.com/").is_err());
    }
}
