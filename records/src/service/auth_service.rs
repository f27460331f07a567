//! Registration, sign in and bearer token sessions.
//!
//! Tokens are opaque: 32 random bytes rendered as hex and stored in the `sessions`
//! table together with their expiry. Resolving a token to a user is a single lookup,
//! and signing out simply deletes the row.
use crate::error::RecordsError;
use crate::password::{hash_password, verify_password};
use crate::repository::session_repository::SessionRepository;
use crate::repository::user_repository::UserRepository;
use crate::types::{SessionEntry, UserAccount};
use crate::validation::{check_password, normalize_email, required};
use chrono::{Duration, Utc};
use log::{debug, info};
use rand::RngCore;
use records_api::models::auth::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest};
use records_api::models::user::{User, DEFAULT_ROLE};
use std::sync::Arc;

const TOKEN_BYTES: usize = 32;
pub const INVALID_TOKEN: &str = "Invalid or expired token";

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        token_ttl_hours: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            token_ttl: Duration::hours(i64::from(token_ttl_hours)),
        }
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// `BadInput` for an invalid email, short password or blank name, and
    /// `EmailTaken` if the email is already registered.
    pub fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, RecordsError> {
        let email = normalize_email(&request.email)?;
        check_password(&request.password)?;
        let name = required("Name", &request.name)?;

        if self.users.find_by_email(&email)?.is_some() {
            return Err(RecordsError::EmailTaken(email));
        }

        let now = Utc::now();
        let account = UserAccount {
            user: User {
                id: uuid::Uuid::new_v4().to_string(),
                email,
                name,
                role: DEFAULT_ROLE.to_string(),
                created_at: Some(now),
                updated_at: Some(now),
            },
            password_hash: Some(hash_password(&request.password)?),
        };
        self.users.insert_user(&account)?;
        info!("Registered user {}", account.user.email);

        let token = self.open_session(&account.user.id)?;
        Ok(AuthResponse {
            user: account.user,
            token: Some(token),
        })
    }

    /// # Errors
    /// `InvalidCredentials` when the email is unknown, the password does not match,
    /// or the account has no password at all.
    pub fn login(&self, request: &LoginRequest) -> Result<AuthResponse, RecordsError> {
        let email = normalize_email(&request.email)?;
        if request.password.is_empty() {
            return Err(RecordsError::BadInput("Password is required".to_string()));
        }

        let account = self
            .users
            .find_by_email(&email)?
            .ok_or(RecordsError::InvalidCredentials)?;
        let verified = account
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(&request.password, hash));
        if !verified {
            debug!("Rejected sign in for {email}");
            return Err(RecordsError::InvalidCredentials);
        }

        let token = self.open_session(&account.user.id)?;
        Ok(AuthResponse {
            user: account.user,
            token: Some(token),
        })
    }

    /// Ends the session. An unknown token is not an error, the caller was
    /// already authenticated when it got here.
    pub fn logout(&self, token: &str) -> Result<(), RecordsError> {
        if !self.sessions.delete_session(token)? {
            debug!("Logout of a session that was already gone");
        }
        Ok(())
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    /// `Unauthorized` for unknown or expired tokens, and for tokens whose user is gone.
    pub fn authenticate(&self, token: &str) -> Result<User, RecordsError> {
        let unauthorized = || RecordsError::Unauthorized(INVALID_TOKEN.to_string());

        let session = self.sessions.find_session(token)?.ok_or_else(unauthorized)?;
        if session.is_expired(Utc::now()) {
            self.sessions.delete_session(token)?;
            return Err(unauthorized());
        }
        self.users
            .find_by_id(&session.user_id)?
            .map(|account| account.user)
            .ok_or_else(unauthorized)
    }

    pub fn profile(&self, user_id: &str) -> Result<User, RecordsError> {
        self.users
            .find_by_id(user_id)?
            .map(|account| account.user)
            .ok_or_else(|| RecordsError::NotFound("User".to_string()))
    }

    pub fn update_profile(
        &self,
        user_id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<User, RecordsError> {
        let name = required("Name", &request.name)?;
        self.users
            .update_name(user_id, &name, Utc::now())?
            .ok_or_else(|| RecordsError::NotFound("User".to_string()))
    }

    /// Drops every expired session, returning how many were removed
    pub fn purge_expired(&self) -> Result<usize, RecordsError> {
        self.sessions.purge_expired(Utc::now())
    }

    fn open_session(&self, user_id: &str) -> Result<String, RecordsError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let now = Utc::now();
        let session = SessionEntry {
            token: hex::encode(bytes),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.token_ttl,
        };
        self.sessions.insert_session(&session)?;
        Ok(session.token)
    }
}
