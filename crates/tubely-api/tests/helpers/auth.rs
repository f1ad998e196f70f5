use std::time::Duration;
use uuid::Uuid;

/// JWT secret shared by the test config and the tokens minted here.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: Uuid) -> String {
    let token = tubely_api::auth::make_jwt(user_id, TEST_JWT_SECRET, Duration::from_secs(3600))
        .expect("Failed to sign test token");
    format!("Bearer {}", token)
}
