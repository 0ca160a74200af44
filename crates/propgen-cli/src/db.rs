//! Database maintenance commands.

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = propgen_core::load_app_config()?;
    let pool_config = propgen_db::PoolConfig::from_app_config(&config);
    let pool = propgen_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

/// # Errors
///
/// Returns an error if configuration is incomplete, the database is
/// unreachable, or a migration fails.
pub(crate) async fn run_db_command(command: DbCommands) -> anyhow::Result<()> {
    let pool = connect().await?;
    match command {
        DbCommands::Ping => {
            propgen_db::ping(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = propgen_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    pool.close().await;
    Ok(())
}
