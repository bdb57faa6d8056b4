//! Credential and token lifecycle: password hashing, signed session tokens,
//! password-reset tokens and the session cookie that carries the token.

pub mod cookie;
pub mod error;
pub mod password;
pub mod reset;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use reset::{hash_reset_token, ResetToken};
pub use token::{Claims, TokenService};
