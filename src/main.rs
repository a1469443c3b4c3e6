use std::time::Duration;

use dotenvy::dotenv;
use sales_dashboard::server::{self, AppState};
use sales_dashboard::{Auth, DatabaseStore, HanaConnector, MemoryStore, Settings};
use sea_orm::{ConnectOptions, Database};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env();

    let auth = match &settings.database_url {
        Some(url) => {
            let mut opt = ConnectOptions::new(url.clone());
            opt.max_connections(10)
                .min_connections(1)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10));

            let db = Database::connect(opt).await?;
            info!("connected to credential database");

            #[cfg(feature = "migration")]
            {
                use sales_dashboard::migration::{Migrator, MigratorTrait};
                Migrator::up(&db, None).await?;
            }

            Auth::new(DatabaseStore::new(db))
        }
        None => {
            info!("DATABASE_URL not set, keeping users and sessions in memory");
            Auth::new(MemoryStore::new())
        }
    };

    let state = AppState::new(auth, HanaConnector::new(), settings.current_user);
    server::serve(&settings.listen_addr, state).await?;

    Ok(())
}
