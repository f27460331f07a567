//! The authentication context: who is signed in, with which token, and whether a
//! call is in flight.
//!
//! Every operation resolves to a plain message on failure, ready to be shown to a
//! user. The token is persisted through a [`TokenStore`] so that the next process
//! can [`AuthSession::restore`] it.
use std::sync::Arc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::models::user::User;
use crate::token_store::TokenStore;
use crate::AuthClient;

pub const SIGN_IN_FAILED: &str = "Failed to sign in";
pub const SIGN_UP_FAILED: &str = "Failed to create account";
pub const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
pub const TOKEN_NOT_RECEIVED: &str = "Token not received";
pub const NOT_AUTHENTICATED: &str = "User is not authenticated";

/// An authentication failure, as a message for the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AuthError(pub String);

/// The access token of the signed in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
}

pub struct AuthSession<C: AuthClient> {
    client: C,
    token_store: Arc<dyn TokenStore>,
    user: Option<User>,
    session: Option<Session>,
    loading: bool,
}

impl<C: AuthClient> AuthSession<C> {
    /// Creates a session in the loading state. Call [`AuthSession::restore`] to
    /// pick up a previously stored token.
    pub fn new(client: C, token_store: Arc<dyn TokenStore>) -> Self {
        AuthSession {
            client,
            token_store,
            user: None,
            session: None,
            loading: true,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.session.is_some()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validates a stored token by fetching the profile. A token the server rejects
    /// is removed from the store.
    pub async fn restore(&mut self) {
        if let Some(token) = self.token_store.load() {
            match self.client.get_profile().await {
                Ok(profile) => {
                    debug!("Restored session for {}", profile.user.email);
                    self.user = Some(profile.user);
                    self.session = Some(Session {
                        access_token: token,
                    });
                }
                Err(e) => {
                    info!("Stored token rejected, removing it: {e}");
                    if let Err(e) = self.token_store.clear() {
                        warn!("Unable to remove the stored token: {e}");
                    }
                }
            }
        }
        self.loading = false;
    }

    /// Signs in and stores the token
    ///
    /// # Errors
    /// The server's message, [`TOKEN_NOT_RECEIVED`] if the response has no token, or
    /// [`SIGN_IN_FAILED`] when there is nothing better to say.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.loading = true;
        let result = match self.client.login(email, password).await {
            Ok(response) => match response.token {
                Some(token) => self.establish(response.user, token),
                None => Err(AuthError(TOKEN_NOT_RECEIVED.to_string())),
            },
            Err(e) => Err(AuthError(e.message_or(SIGN_IN_FAILED))),
        };
        self.loading = false;
        result
    }

    /// Creates an account. The user is signed in only if the server hands out a token.
    ///
    /// # Errors
    /// The server's message, or [`SIGN_UP_FAILED`].
    pub async fn sign_up(&mut self, email: &str, password: &str, name: &str) -> Result<(), AuthError> {
        self.loading = true;
        let result = match self.client.register(email, password, name).await {
            Ok(response) => match response.token {
                Some(token) => self.establish(response.user, token),
                None => Ok(()),
            },
            Err(e) => Err(AuthError(e.message_or(SIGN_UP_FAILED))),
        };
        self.loading = false;
        result
    }

    /// Signs out locally, whatever the server says about it
    pub async fn sign_out(&mut self) {
        self.loading = true;
        if let Err(e) = self.client.logout().await {
            debug!("Logout request failed, signing out locally anyway: {e}");
        }
        if let Err(e) = self.token_store.clear() {
            warn!("Unable to remove the stored token: {e}");
        }
        self.user = None;
        self.session = None;
        self.loading = false;
    }

    /// Changes the display name of the signed in user
    ///
    /// # Errors
    /// [`NOT_AUTHENTICATED`] without a user, otherwise the server's message or
    /// [`UPDATE_PROFILE_FAILED`].
    pub async fn update_profile(&mut self, name: &str) -> Result<(), AuthError> {
        self.loading = true;
        let result = if self.user.is_none() {
            Err(AuthError(NOT_AUTHENTICATED.to_string()))
        } else {
            match self.client.update_profile(name).await {
                Ok(_) => {
                    if let Some(user) = self.user.as_mut() {
                        user.name = name.to_string();
                    }
                    Ok(())
                }
                Err(e) => Err(AuthError(e.message_or(UPDATE_PROFILE_FAILED))),
            }
        };
        self.loading = false;
        result
    }

    fn establish(&mut self, user: User, token: String) -> Result<(), AuthError> {
        self.token_store
            .save(&token)
            .map_err(|e| AuthError(format!("Unable to store the token: {e}")))?;
        info!("Signed in as {}", user.email);
        self.user = Some(user);
        self.session = Some(Session {
            access_token: token,
        });
        Ok(())
    }
}
