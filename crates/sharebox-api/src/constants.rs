//! API-level constants.

/// Prefix for authenticated API routes.
pub const API_PREFIX: &str = "/api/v0";

/// Extra request-body headroom on top of the configured file size limit, to
/// account for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
