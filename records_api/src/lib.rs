//!
//! `records_api` is the client side of the Records service: the typed REST client,
//! the persisted bearer token, and the two state holders built on top of it,
//! [`auth_session::AuthSession`] and [`records_store::RecordsStore`].
//!
//! The state holders only talk to the server through the [`AuthClient`] and
//! [`RecordsClient`] traits, which [`RecordsApi`] implements.
use std::{fmt, io, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use log::debug;
use models::{
    auth::{
        AuthResponse, LoginRequest, MessageResponse, ProfileResponse, RegisterRequest,
        UpdateProfileRequest,
    },
    record::{NewRecord, Record, RecordQuery, RecordStats, RecordUpdate, RecordsPage},
};
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Client, Method, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use token_store::TokenStore;
use url::{ParseError, Url};

pub mod auth_session;
pub mod builder;
pub mod config;
pub mod models;
pub mod records_store;
pub mod token_store;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Base URL used when nothing else has been configured
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Used when a failed response carries no message of its own
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed";

/// The error body every non-2xx response of the server carries
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Fault { code: StatusCode, message: String },
    #[error("Request could not be sent: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Could not serialize/deserialize: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] ParseError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Unable to read the configuration file {path:?}")]
    ConfigFile { path: PathBuf, source: io::Error },
    #[error("Unable to parse contents of {path:?}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Unable to render the configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ApiError {
    /// The plain message to show a user. For failed responses this is the server's message.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg) | ApiError::NotFound(msg) => msg.clone(),
            ApiError::Fault { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Like [`ApiError::message`], but replaces a blank message with `default`
    #[must_use]
    pub fn message_or(&self, default: &str) -> String {
        let message = self.message();
        if message.trim().is_empty() {
            default.to_string()
        } else {
            message
        }
    }

    /// HTTP status of a failed response, if the error came from one
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Fault { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Authentication calls of the REST interface, `/auth/*`
#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse>;
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse>;
    async fn logout(&self) -> Result<MessageResponse>;
    async fn get_profile(&self) -> Result<ProfileResponse>;
    async fn update_profile(&self, name: &str) -> Result<ProfileResponse>;
}

/// Record calls of the REST interface, `/records/*`
#[async_trait]
pub trait RecordsClient: Send + Sync {
    async fn get_records(&self, query: &RecordQuery) -> Result<RecordsPage>;
    async fn get_record(&self, id: &str) -> Result<Record>;
    async fn create_record(&self, record: &NewRecord) -> Result<Record>;
    async fn update_record(&self, id: &str, update: &RecordUpdate) -> Result<Record>;
    async fn delete_record(&self, id: &str) -> Result<MessageResponse>;
    async fn get_stats(&self) -> Result<RecordStats>;
}

#[derive(Clone)]
pub struct RecordsApi {
    base: Url,
    token_store: Arc<dyn TokenStore>,
    pub client: Client,
}

impl fmt::Debug for RecordsApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordsApi")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl RecordsApi {
    #[allow(clippy::missing_errors_doc)]
    pub fn new<H>(base_url: H, token_store: Arc<dyn TokenStore>) -> Result<RecordsApi>
    where
        H: Into<String>,
    {
        Ok(RecordsApi {
            base: Self::parse_base(&base_url.into())?,
            token_store,
            client: Client::new(),
        })
    }

    /// The base url must end with a slash, otherwise `Url::join` drops its last segment
    pub(crate) fn parse_base(base_url: &str) -> Result<Url> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url_for(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base.join(endpoint.trim_start_matches('/'))?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token_store.load() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn request<D>(&self, method: Method, endpoint: &str, body: Option<Vec<u8>>) -> Result<D>
    where
        D: DeserializeOwned,
    {
        let url = self.url_for(endpoint)?;

        let mut request = self
            .client
            .request(method, url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        request = self.authorize(request);

        if let Some(body) = body {
            request = request.body(body);
        }
        debug!("request '{:?}'", request);

        let response = request.send().await?;

        let status = response.status();
        let body = &response.text().await?;
        debug!("status {:?} body '{:?}'", status, body);

        if status.is_success() {
            let data = if body.is_empty() { "null" } else { body };
            return Ok(serde_json::from_str::<D>(data)?);
        }

        let message = Self::error_message(body);
        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized(message)),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(message)),
            code => Err(ApiError::Fault { code, message }),
        }
    }

    /// Extracts `message` from an error body, falling back to a generic text
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
    }

    async fn get<D>(&self, endpoint: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        self.request::<D>(Method::GET, endpoint, None).await
    }

    async fn delete<D>(&self, endpoint: &str) -> Result<D>
    where
        D: DeserializeOwned,
    {
        self.request::<D>(Method::DELETE, endpoint, None).await
    }

    async fn post<D, S>(&self, endpoint: &str, body: Option<&S>) -> Result<D>
    where
        D: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let data = body.map(serde_json::to_vec).transpose()?;
        self.request::<D>(Method::POST, endpoint, data).await
    }

    async fn put<D, S>(&self, endpoint: &str, body: &S) -> Result<D>
    where
        D: DeserializeOwned,
        S: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(body)?;
        debug!("Json request: {}", String::from_utf8_lossy(&data));
        self.request::<D>(Method::PUT, endpoint, Some(data)).await
    }
}

#[async_trait]
impl AuthClient for RecordsApi {
    async fn register(&self, email: &str, password: &str, name: &str) -> Result<AuthResponse> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.post("/auth/register", Some(&body)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.post("/auth/login", Some(&body)).await
    }

    async fn logout(&self) -> Result<MessageResponse> {
        self.post::<MessageResponse, ()>("/auth/logout", None).await
    }

    async fn get_profile(&self) -> Result<ProfileResponse> {
        self.get("/auth/profile").await
    }

    async fn update_profile(&self, name: &str) -> Result<ProfileResponse> {
        let body = UpdateProfileRequest {
            name: name.to_string(),
        };
        self.put("/auth/profile", &body).await
    }
}

#[async_trait]
impl RecordsClient for RecordsApi {
    async fn get_records(&self, query: &RecordQuery) -> Result<RecordsPage> {
        self.get(&format!("/records?{}", query.to_query_string()))
            .await
    }

    async fn get_record(&self, id: &str) -> Result<Record> {
        self.get(&format!("/records/{}", urlencoding::encode(id)))
            .await
    }

    async fn create_record(&self, record: &NewRecord) -> Result<Record> {
        self.post("/records", Some(record)).await
    }

    async fn update_record(&self, id: &str, update: &RecordUpdate) -> Result<Record> {
        self.put(&format!("/records/{}", urlencoding::encode(id)), update)
            .await
    }

    async fn delete_record(&self, id: &str) -> Result<MessageResponse> {
        self.delete(&format!("/records/{}", urlencoding::encode(id)))
            .await
    }

    async fn get_stats(&self) -> Result<RecordStats> {
        self.get("/records/stats").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;
    use mockito::{Matcher, Server};

    const PROFILE_BODY: &str = r#"{
        "user": {
            "id": "0b6f6c1e-9a43-4b0c-9f4e-3f1f2d9d8c11",
            "email": "foo@bar.com",
            "name": "Foo",
            "role": "user"
        }
    }"#;

    fn client(url: &str, token: Option<&str>) -> Result<RecordsApi> {
        let store: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
            None => Arc::new(MemoryTokenStore::new()),
        };
        RecordsApi::new(format!("{url}/api"), store)
    }

    #[tokio::test]
    async fn fetch_profile_sends_bearer_token() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let m = server
            .mock("GET", "/api/auth/profile")
            .match_header("authorization", "Bearer abc123")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(PROFILE_BODY)
            .create_async()
            .await;

        let client = client(&url, Some("abc123"))?;
        let profile = client.get_profile().await?;

        assert_eq!(profile.user.email, "foo@bar.com");
        m.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn no_authorization_header_without_token() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let m = server
            .mock("POST", "/api/auth/login")
            .match_header("authorization", Matcher::Missing)
            .match_body(Matcher::Json(serde_json::json!({
                "email": "foo@bar.com",
                "password": "secret1"
            })))
            .with_status(200)
            .with_body(r#"{"user": {"id": "1", "email": "foo@bar.com", "name": "Foo", "role": "user"}, "token": "t0k3n"}"#)
            .create_async()
            .await;

        let client = client(&url, None)?;
        let response = client.login("foo@bar.com", "secret1").await?;

        assert_eq!(response.token.as_deref(), Some("t0k3n"));
        m.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn failed_response_carries_server_message() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let _m = server
            .mock("POST", "/api/auth/register")
            .with_status(409)
            .with_body(r#"{"message": "Email already registered"}"#)
            .create_async()
            .await;

        let client = client(&url, None)?;
        match client.register("foo@bar.com", "secret1", "Foo").await {
            Err(ApiError::Fault { code, message }) => {
                assert_eq!(code, StatusCode::CONFLICT);
                assert_eq!(message, "Email already registered");
            }
            other => panic!("Expected a fault, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn non_json_error_body_uses_generic_message() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let _m = server
            .mock("GET", "/api/records/stats")
            .with_status(500)
            .with_body("<html>Internal Server Error</html>")
            .create_async()
            .await;

        let client = client(&url, Some("abc"))?;
        let err = client.get_stats().await.unwrap_err();
        assert_eq!(err.message(), DEFAULT_ERROR_MESSAGE);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_is_reported_as_such() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let _m = server
            .mock("GET", "/api/auth/profile")
            .with_status(401)
            .with_body(r#"{"message": "Invalid or expired token"}"#)
            .create_async()
            .await;

        let client = client(&url, Some("stale"))?;
        match client.get_profile().await {
            Err(ApiError::Unauthorized(msg)) => assert_eq!(msg, "Invalid or expired token"),
            other => panic!("Expected unauthorized, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn get_records_passes_query_parameters() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let m = server
            .mock("GET", "/api/records")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("limit".into(), "5".into()),
                Matcher::UrlEncoded("search".into(), "first".into()),
                Matcher::UrlEncoded("status".into(), "ACTIVE".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"records": [], "pagination": {"page": 2, "limit": 5, "total": 6, "totalPages": 2}}"#,
            )
            .create_async()
            .await;

        let client = client(&url, Some("abc"))?;
        let query = RecordQuery::default()
            .page(2)
            .limit(5)
            .search("first")
            .status(models::record::RecordStatus::Active);
        let page = client.get_records(&query).await?;

        assert!(page.records.is_empty());
        assert_eq!(page.pagination.total_pages, 2);
        m.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn delete_record_returns_message() -> Result<()> {
        let mut server = Server::new_async().await;
        let url = server.url();
        let _m = server
            .mock("DELETE", "/api/records/abc")
            .with_status(200)
            .with_body(r#"{"message": "Record deleted"}"#)
            .create_async()
            .await;

        let client = client(&url, Some("abc"))?;
        let response = client.delete_record("abc").await?;
        assert_eq!(response.message, "Record deleted");
        Ok(())
    }

    #[test]
    fn base_url_keeps_its_path() -> Result<()> {
        let api = RecordsApi::new("http://localhost:3001/api", Arc::new(MemoryTokenStore::new()))?;
        assert_eq!(
            api.url_for("/records/stats")?.as_str(),
            "http://localhost:3001/api/records/stats"
        );
        Ok(())
    }
}
