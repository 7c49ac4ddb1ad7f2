//! Seed command - Creates or refreshes the barber account.

use std::sync::Arc;

use crate::cli::args::SeedArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence};
use crate::services::{AuthService, Authenticator};

/// Execute the seed command
pub async fn execute(args: SeedArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let auth = Authenticator::new(Arc::new(Persistence::new(db.get_connection())), config);

    let barber = auth
        .provision_barber(args.email, args.password, args.name)
        .await?;

    tracing::info!(user_id = %barber.id, email = %barber.email, "Barber account ready");
    println!("Seed OK -> {} (ROLE: {})", barber.email, barber.role);

    Ok(())
}
