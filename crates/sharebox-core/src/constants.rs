//! Shared constants.

/// Media type recorded when the uploader does not supply one.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Length of generated share tokens (alphanumeric characters).
///
/// 32 characters over [A-Za-z0-9] is ~190 bits of entropy, which makes
/// enumeration of the public `/share/{token}` namespace infeasible.
pub const SHARE_TOKEN_LENGTH: usize = 32;

/// Bounded retries when a freshly generated share token collides with an
/// existing one. Collisions are astronomically unlikely but handled, not
/// assumed impossible.
pub const SHARE_TOKEN_MAX_ATTEMPTS: u32 = 5;
