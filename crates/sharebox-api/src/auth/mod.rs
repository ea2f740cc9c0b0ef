//! Authentication: bearer JWT validation and the authenticated-user extractor.
//!
//! Identity is issued by an external provider; this module only verifies the
//! provider-signed token and exposes the stable user id to handlers.

pub mod middleware;
pub mod models;

pub use middleware::{auth_middleware, AuthState};
pub use models::{JwtClaims, UserContext};
