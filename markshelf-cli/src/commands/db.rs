//! Database maintenance commands

use anyhow::{bail, Context, Result};

use markshelf_core::db::schema;
use markshelf_core::PipelineClient;

/// Create the `bookmarks` table if it does not exist
pub async fn run_init_db() -> Result<()> {
    let config = super::load_config()?;
    let client = PipelineClient::from_config(&config.database);

    schema::ensure_schema(&client, config.multi_user)
        .await
        .context("Failed to create bookmarks table")?;

    println!(
        "bookmarks table ready ({})",
        if config.multi_user {
            "multi-user"
        } else {
            "single-user"
        }
    );
    Ok(())
}

/// Round-trip `SELECT 1` against the configured database
pub async fn run_ping() -> Result<()> {
    let config = super::load_config()?;
    let client = PipelineClient::from_config(&config.database);

    let reachable = schema::ping(&client)
        .await
        .with_context(|| format!("Database at {} did not answer", client.endpoint()))?;
    if !reachable {
        bail!("Database at {} returned no result for SELECT 1", client.endpoint());
    }

    println!("ok: {}", client.endpoint());
    Ok(())
}
