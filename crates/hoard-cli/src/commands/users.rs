//! `hoard users`

use clap::Args;
use hoard_store::StoreConfig;

#[derive(Debug, Args)]
pub struct UsersArgs {
    /// Show a single account by email address
    #[arg(long)]
    pub email: Option<String>,
}

/// Print id, email and creation time; password hashes are never shown
pub fn execute(args: UsersArgs, config: &StoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = super::open_store(config)?;
    let users = match args.email {
        Some(email) => vec![store.get_user_by_email(&email)?],
        None => store.list_users()?,
    };
    store.close();

    if users.is_empty() {
        println!("No users");
        return Ok(());
    }
    for user in users {
        println!("{}\t{}\t{}", user.id, user.email, user.created_at.to_rfc3339());
    }
    Ok(())
}
