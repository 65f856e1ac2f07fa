//! Shareable metadata for `inox_core::lang` registries.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.

/// Language version (major, minor) in which a vocabulary item was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Since(pub u8, pub u8);

/// Stability level of a vocabulary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    /// Accepted by the parser but may change shape.
    Experimental,
}
