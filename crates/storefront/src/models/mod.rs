//! Domain models for the storefront.

pub mod flash;
pub mod session;
pub mod user;

pub use flash::{FlashLevel, FlashMessage};
pub use user::{AuthToken, NewUser, User};
