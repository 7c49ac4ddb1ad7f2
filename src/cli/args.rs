//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::config::{
    DEFAULT_SEED_BARBER_EMAIL, DEFAULT_SEED_BARBER_NAME, DEFAULT_SEED_BARBER_PASSWORD,
    DEFAULT_SERVER_HOST,
};

/// BarberBook - Booking backend for a single barber shop
#[derive(Parser, Debug)]
#[command(name = "barberbook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Create or refresh the barber account
    Seed(SeedArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "4000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Barber login email
    #[arg(long, default_value = DEFAULT_SEED_BARBER_EMAIL, env = "SEED_BARBER_EMAIL")]
    pub email: String,

    /// Barber password
    #[arg(long, default_value = DEFAULT_SEED_BARBER_PASSWORD, env = "SEED_BARBER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Display name
    #[arg(long, default_value = DEFAULT_SEED_BARBER_NAME, env = "SEED_BARBER_NAME")]
    pub name: String,
}
