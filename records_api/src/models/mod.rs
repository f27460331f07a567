pub mod auth;
pub mod record;
pub mod user;
