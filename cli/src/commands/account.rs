use records_api::auth_session::{AuthError, AuthSession};
use records_api::RecordsApi;

use crate::cli::{Login, Profile, Register};

pub async fn register(session: &mut AuthSession<RecordsApi>, args: Register) -> Result<(), AuthError> {
    session.sign_up(&args.email, &args.password, &args.name).await?;
    if session.is_authenticated() {
        println!("Account {} created, you are signed in", args.email);
    } else {
        println!("Account {} created, use 'records login' to sign in", args.email);
    }
    Ok(())
}

pub async fn login(session: &mut AuthSession<RecordsApi>, args: Login) -> Result<(), AuthError> {
    session.sign_in(&args.email, &args.password).await?;
    if let Some(user) = session.user() {
        println!("Signed in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

pub async fn logout(session: &mut AuthSession<RecordsApi>) {
    session.sign_out().await;
    println!("Signed out");
}

pub async fn profile(session: &mut AuthSession<RecordsApi>, args: Profile) -> Result<(), AuthError> {
    session.restore().await;
    if !session.is_authenticated() {
        return Err(AuthError("Not signed in, use 'records login'".to_string()));
    }
    if let Some(name) = args.name {
        session.update_profile(&name).await?;
    }
    if let Some(user) = session.user() {
        println!("Id:    {}", user.id);
        println!("Name:  {}", user.name);
        println!("Email: {}", user.email);
        println!("Role:  {}", user.role);
    }
    Ok(())
}
