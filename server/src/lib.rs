//! HTTP front of the Records application.
//!
//! Every route lives under `/api`. Authenticated routes expect
//! `Authorization: Bearer <token>` and only ever see the records of that user.
use crate::error::ApiFailure;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use records::error::RecordsError;
use records::service::auth_service::AuthService;
use records::service::record_service::RecordService;
use records::ApplicationRuntime;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub mod error;
pub mod extract;
pub mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub records: Arc<RecordService>,
}

impl From<&ApplicationRuntime> for AppState {
    fn from(runtime: &ApplicationRuntime) -> Self {
        AppState {
            auth: runtime.auth_service(),
            records: runtime.record_service(),
        }
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route(
            "/profile",
            get(handlers::auth::profile).put(handlers::auth::update_profile),
        );

    let records = Router::new()
        .route(
            "/",
            get(handlers::records::list).post(handlers::records::create),
        )
        .route("/stats", get(handlers::records::stats))
        .route(
            "/{id}",
            get(handlers::records::get)
                .put(handlers::records::update)
                .delete(handlers::records::delete),
        );

    Router::new()
        .nest("/api/auth", auth)
        .nest("/api/records", records)
        .layer(cors)
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` completes
///
/// # Errors
/// Fails if accepting connections fails.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Runs blocking service calls off the async executor. Password hashing and
/// SQLite access would otherwise stall the other requests.
pub(crate) async fn blocking<T, F>(task: F) -> Result<T, ApiFailure>
where
    F: FnOnce() -> Result<T, RecordsError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}
