use records::error::RecordsError;
use records::{ApplicationRuntime, ApplicationRuntimeBuilder};
use records_api::models::auth::RegisterRequest;
use records_api::models::user::User;
use std::sync::Arc;

/// Creates a test runtime with a database in memory
pub fn create_test_runtime() -> Result<Arc<ApplicationRuntime>, RecordsError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let runtime = ApplicationRuntimeBuilder::new().use_in_memory_db().build()?;
    Ok(Arc::new(runtime))
}

/// Registers a user and returns it together with its bearer token
pub fn register(
    runtime: &ApplicationRuntime,
    email: &str,
) -> Result<(User, String), RecordsError> {
    let response = runtime.auth_service().register(&RegisterRequest {
        email: email.to_string(),
        password: "secret1".to_string(),
        name: email.split('@').next().unwrap_or(email).to_string(),
    })?;
    let token = response
        .token
        .ok_or_else(|| RecordsError::Unauthorized("no token".to_string()))?;
    Ok((response.user, token))
}
