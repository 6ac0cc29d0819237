#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Run migrations at most once across the test process; remember the outcome
// so later tests can skip quickly when no database is reachable.
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

pub async fn get_db() -> anyhow::Result<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        anyhow::bail!("SKIP_DB_TESTS set");
    }
    let ok = MIGRATED
        .get_or_init(|| async {
            let db = match models::db::connect().await {
                Ok(db) => db,
                Err(_) => return false,
            };
            migration::Migrator::up(&db, None).await.is_ok()
        })
        .await;
    if !*ok {
        anyhow::bail!("database unavailable for integration tests");
    }
    models::db::connect().await
}
