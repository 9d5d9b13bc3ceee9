//! Table bootstrap command

use anyhow::{Context, Result};
use clap::Parser;

use memberdesk_server::db::{create_pool, migrations};
use memberdesk_server::StoreConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Create (true) or drop (false) the unique email index; without the flag
    /// the index is created only if MEMBERDESK_UNIQUE_EMAIL is set
    #[arg(long)]
    pub unique_email: Option<bool>,
}

/// Create the members table and apply the email index setting, then exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let mut config = StoreConfig::from_env().context("Invalid store configuration")?;
    if let Some(unique_email) = args.unique_email {
        config.unique_email = unique_email;
    }

    let pool = create_pool(&config)
        .await
        .context("Failed to create database pool")?;

    migrations::run(&pool, &config)
        .await
        .context("Migration failed")?;

    if args.unique_email == Some(false) {
        migrations::drop_email_unique_index(&pool)
            .await
            .context("Failed to drop unique email index")?;
    }

    pool.close().await;

    let email_index = match args.unique_email {
        Some(false) => "dropped",
        _ if config.unique_email => "present",
        _ => "unchanged",
    };
    println!("members table ready (unique email index: {email_index})");
    Ok(())
}
