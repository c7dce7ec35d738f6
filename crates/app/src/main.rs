use std::{net::SocketAddr, sync::Arc, time::Duration};

use migration::{Migrator, MigratorTrait};
use settings::Database;
use tokio::time::MissedTickBehavior;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dompet={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let Some(server) = settings.server else {
        tracing::warn!("no server settings found, nothing to run");
        return Ok(());
    };

    tracing::info!("Found server settings...");
    let db = parse_database(&server.database).await?;
    let engine = Arc::new(
        engine::Engine::builder()
            .database(db)
            .sync_batch_size(settings.sync.batch_size)
            .build()
            .await?,
    );

    let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
    let addr: SocketAddr = format!("{}:{}", bind, server.port).parse()?;
    tasks.spawn(server::run(engine.clone(), addr));

    if settings.sync.interval_secs > 0 {
        tasks.spawn(sync_balances(engine, settings.sync));
    } else {
        tracing::info!("periodic wallet balance sync disabled");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

/// Reconciles every wallet on a fixed interval, each run bounded by the
/// configured timeout. A run that times out is dropped, which rolls back the
/// wallet it was working on.
async fn sync_balances(engine: Arc<engine::Engine>, sync: settings::Sync) {
    let deadline = Duration::from_secs(sync.timeout_secs.max(1));
    let mut interval = tokio::time::interval(Duration::from_secs(sync.interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match tokio::time::timeout(deadline, engine.sync_all_wallet_balances()).await {
            Ok(Ok(report)) if report.failed > 0 => {
                tracing::warn!(
                    failed = report.failed,
                    wallets = ?report.failed_wallet_ids(),
                    "some wallets could not be reconciled"
                );
            }
            Ok(Ok(_)) => {}
            Ok(Err(err)) => tracing::error!("wallet balance sync failed: {err}"),
            Err(_) => tracing::warn!(
                "wallet balance sync did not finish within {}s",
                deadline.as_secs()
            ),
        }
    }
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
