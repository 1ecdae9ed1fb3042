//! Session-related types.

/// Session keys.
pub mod keys {
    /// Key for pending flash messages.
    pub const FLASH: &str = "flash";
}
