//! Offline password reset, for a lost admin password.

use anyhow::bail;
use tracing::info;

use crate::config::Config;
use crate::constants::actions;
use crate::db::Store;
use crate::models::{NewActivity, UserPatch};
use crate::services::ActivityLogger;
use crate::services::password::{self, PasswordService};

pub async fn cmd_reset_password(
    config: &Config,
    username: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    if let Some(msg) = password::check_length(new_password) {
        bail!(msg);
    }

    let store = Store::from_config(&config.general).await?;

    let Some(user) = store.get_user_by_username(username).await? else {
        bail!("User '{username}' not found");
    };

    let passwords = PasswordService::new(&config.security)?;
    let hash = passwords.hash(new_password).await?;

    if !store
        .update_user(user.id, UserPatch::password_hash(hash))
        .await?
    {
        bail!("User '{username}' not found");
    }

    ActivityLogger::new(store)
        .record(
            NewActivity::new(None, actions::RESET_PASSWORD)
                .entity(actions::ENTITY_USER, user.id)
                .details(format!("Reset password for user {} (command line)", user.username)),
        )
        .await;

    info!(user_id = user.id, "Password reset from command line for: {}", user.username);
    println!("✓ Password updated for {}", user.username);

    Ok(())
}
