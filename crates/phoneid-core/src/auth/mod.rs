//! Authentication boundary
//!
//! The OAuth handshake and token issuance belong to the identity provider.
//! This module only consumes its result: a validated [`AccessToken`] whose
//! claims are handed to tools through an explicit [`InvocationContext`].

pub mod context;
pub mod google;
pub mod token;
pub mod verifier;

pub use context::InvocationContext;
pub use google::GoogleTokenVerifier;
pub use token::{AccessToken, Claims};
pub use verifier::{AuthError, StaticTokenVerifier, TokenVerifier};
