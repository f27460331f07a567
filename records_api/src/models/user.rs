use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The role given to users created through registration
pub const DEFAULT_ROLE: &str = "user";

/// Represents an account as returned by `/auth/*`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        User {
            id: String::new(),
            email: String::new(),
            name: String::new(),
            role: default_role(),
            created_at: None,
            updated_at: None,
        }
    }
}

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// The owner summary the server joins into every record
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

impl From<&User> for Owner {
    fn from(user: &User) -> Self {
        Owner {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
