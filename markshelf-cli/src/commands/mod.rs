//! Subcommand implementations

pub mod db;
pub mod serve;

pub use db::{run_init_db, run_ping};
pub use serve::{run_serve, ServeArgs};

use anyhow::{Context, Result};
use markshelf_core::config::{self, ShelfConfig};

/// Load `.env` files, then read and validate the environment.
pub fn load_config() -> Result<ShelfConfig> {
    config::load_dotenv();
    ShelfConfig::from_env().context("Invalid configuration")
}
