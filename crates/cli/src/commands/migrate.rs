//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! vitrina migrate
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! ```text
//! crates/storefront/migrations/
//! ├── 20250101000000_create_users.sql
//! └── 20250101000001_create_auth_tokens.sql
//! ```

use vitrina_storefront::db;

use super::{CommandError, database_url};

/// Run the user store migrations.
pub async fn run() -> Result<(), CommandError> {
    let database_url = database_url()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
