//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "SAUCIER_DEBUG")]
    /// Enable debug logging. Env: SAUCIER_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "SAUCIER_PORT")]
    /// http listener, defaults to `9000`.
    /// Env: SAUCIER_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "SAUCIER_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: SAUCIER_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, short, env = "SAUCIER_DATABASE_PATH")]
    /// Path to the database file, eg `/data/saucier.sqlite`.
    /// Env: SAUCIER_DATABASE_PATH
    pub database_path: Option<String>,
}
