use crate::config::Config;
use crate::domain::Role;
use crate::models::user::NewUser;
use crate::services::AuthError;
use crate::state::SharedState;

pub async fn cmd_add_user(
    config: &Config,
    email: String,
    name: String,
    password: String,
    admin: bool,
) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    let user = match state
        .account_service
        .register(NewUser {
            email,
            name,
            password,
        })
        .await
    {
        Ok(user) => user,
        Err(e @ (AuthError::EmailTaken | AuthError::Validation(_))) => {
            println!("Could not create user: {e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if admin {
        state.store.set_user_role(user.id.value(), Role::Admin).await?;
    }

    let role = if admin { Role::Admin } else { Role::User };
    println!(
        "✓ Created user {} <{}> (ID: {}, role: {})",
        user.name,
        user.email,
        user.id,
        role.as_str()
    );
    Ok(())
}
