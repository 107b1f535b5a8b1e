use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use entrega_utils::error::{EntregaErrorExt, EntregaErrorType, EntregaResult};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

/// Runs all pending migrations against the given database.
pub fn run(db_url: &str) -> EntregaResult<()> {
  let mut conn = PgConnection::establish(db_url)
    .with_entrega_type(EntregaErrorType::CouldntConnectDatabase)?;
  let applied = conn
    .run_pending_migrations(MIGRATIONS)
    .map_err(|e| EntregaErrorType::Unknown(e.to_string()))?;
  if !applied.is_empty() {
    tracing::info!("applied {} database migrations", applied.len());
  }
  Ok(())
}
