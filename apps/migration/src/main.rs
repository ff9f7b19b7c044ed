//! Migration CLI tool (`up`, `down`, `status`, `fresh`, ...).
//!
//! Reads `DATABASE_URL`, optionally from `.env`.

use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(migration::Migrator).await;
}
