//! Mint provider-style bearer tokens for tests.

#![allow(dead_code)]

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use sharebox_api::auth::JwtClaims;
use uuid::Uuid;

/// Test signing secret (must match setup_test_app's config).
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// Test user: a stable identity plus a signed access token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Create a test user with a valid one-hour token.
pub fn test_user() -> TestUser {
    let user_id = Uuid::new_v4();
    TestUser {
        user_id,
        token: token_for(user_id),
    }
}

/// Sign a token for the given user id the way the identity provider would.
pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        sub: user_id,
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}
