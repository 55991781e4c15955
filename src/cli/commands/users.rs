//! List users command handler

use crate::config::Config;
use crate::constants::limits::CLI_USER_LIST_LIMIT;
use crate::db::Store;

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(&config.general).await?;
    let users = store.list_users(Some(CLI_USER_LIST_LIMIT)).await?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!("Users (most recent {})", users.len());
    println!("{:-<78}", "");
    println!(
        "{:>5}  {:<20} {:<30} {:<8} {}",
        "ID", "USERNAME", "EMAIL", "ROLE", "ACTIVE"
    );

    for user in users {
        println!(
            "{:>5}  {:<20} {:<30} {:<8} {}",
            user.id,
            user.username,
            user.email,
            user.role,
            if user.is_active { "yes" } else { "no" }
        );
    }

    Ok(())
}
