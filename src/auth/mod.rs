//! Password hashing and one-time account tokens.

pub mod password;
pub mod token;

pub use password::PasswordHasher;
pub use token::{Claims, TokenIssuer, TokenPurpose};
