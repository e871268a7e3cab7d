//! `shopfront-auth` — identity and bearer-token verification.
//!
//! This crate is intentionally decoupled from HTTP and storage: the API layer
//! extracts the token and decides what a rejection looks like on the wire.

pub mod claims;
pub mod jwt;
pub mod roles;
pub mod user;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator, TokenError, encode_hs256};
pub use roles::Role;
pub use user::User;
