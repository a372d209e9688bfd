use clap::Parser;
use saucier::config::{AppConfig, setup_logging};
use sea_orm_migration::MigratorTrait;
use tracing::error;

#[tokio::main(flavor = "multi_thread", worker_threads = 32)]
async fn main() {
    let cli = saucier::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let config = AppConfig::from_env();

    let database_path = cli
        .database_path
        .unwrap_or_else(|| "saucier.sqlite".to_string());
    let db = match saucier::db::connect_db(&database_path).await {
        Ok(db) => db,
        Err(err) => {
            error!("Database connection error: {}", err);
            return;
        }
    };

    if let Err(err) = saucier::db::migrations::Migrator::up(&db, None).await {
        error!("Database migration error: {}", err);
        return;
    }

    if let Err(err) = saucier::web::setup_server(&cli.listen_address, cli.port, &config, db).await {
        error!("Application error: {}", err);
    }
}
