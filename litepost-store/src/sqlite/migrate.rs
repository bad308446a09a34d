use sqlx::SqlitePool;

use crate::store::StoreError;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    let migrator = sqlx::migrate!("sqlite/migrations");
    let result: Result<(), sqlx::migrate::MigrateError> = migrator.run(pool).await;
    result.map_err(|e| StoreError::Migration(e.to_string()))?;
    Ok(())
}
