//! Canned responses of the Records server, served by mockito.
use records_api::token_store::TokenStore;
use records_api::RecordsApi;
use std::sync::Arc;

pub const TOKEN: &str = "6f1d2a";

pub const USER_JSON: &str = r#"{
    "id": "7d1c0a52-3f7e-4a8b-b1a4-0c9f0d6f2e11",
    "email": "ada@example.com",
    "name": "Ada",
    "role": "user"
}"#;

pub fn record_json(id: &str, title: &str, status: &str) -> String {
    format!(
        r#"{{
            "id": "{id}",
            "title": "{title}",
            "description": "",
            "status": "{status}",
            "priority": "MEDIUM",
            "user_id": "7d1c0a52-3f7e-4a8b-b1a4-0c9f0d6f2e11",
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "users": {{ "name": "Ada", "email": "ada@example.com" }}
        }}"#
    )
}

pub fn api_for(server: &mockito::ServerGuard, store: Arc<dyn TokenStore>) -> RecordsApi {
    RecordsApi::builder()
        .base_url(format!("{}/api", server.url()))
        .token_store(store)
        .build()
        .expect("Unable to create client")
}
