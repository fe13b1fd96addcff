//! Bootstrap the administrator account.
//!
//! Administrator rights belong to user id 1, so run this against a fresh
//! database before anyone registers.
//!
//! ```text
//! create-admin <password> [--name admin]
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userhub_api::auth::password::validate_password_strength;
use userhub_api::config::DatabaseConfig;
use userhub_api::directory::UserDirectory;
use userhub_core::roles::{is_admin, ADMIN_USER_ID};

const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Parser)]
#[command(name = "create-admin", about = "Create the administrator account")]
struct Args {
    /// Password for the administrator.
    password: String,

    /// Login name for the administrator.
    #[arg(long, default_value = "admin")]
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userhub_api=info,create_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(msg) = validate_password_strength(&args.password, MIN_PASSWORD_LEN) {
        bail!(msg);
    }

    let database = DatabaseConfig::from_env();
    let pool = userhub_db::create_pool(&database.url, &database.pool_settings())
        .await
        .context("failed to connect to database")?;
    userhub_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let mut tx = pool.begin().await?;
    let id = UserDirectory::register(&mut tx, &args.name, &args.password)
        .await
        .map_err(|e| anyhow::anyhow!("failed to create administrator: {e}"))?;
    tx.commit().await?;

    if is_admin(id) {
        tracing::info!(user_id = id, name = %args.name, "Administrator created");
    } else {
        tracing::warn!(
            user_id = id,
            expected = ADMIN_USER_ID,
            name = %args.name,
            "User created, but it is not the administrator; the database already had users"
        );
    }

    pool.close().await;
    Ok(())
}
