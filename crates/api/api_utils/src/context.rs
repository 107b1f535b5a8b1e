use entrega_db_schema::utils::{ActualDbPool, DbPool};

/// Shared state handed to every request handler as actix app data.
#[derive(Clone)]
pub struct EntregaContext {
  pool: ActualDbPool,
}

impl EntregaContext {
  pub fn create(pool: ActualDbPool) -> EntregaContext {
    EntregaContext { pool }
  }

  pub fn pool(&self) -> DbPool<'_> {
    DbPool::Pool(&self.pool)
  }

  pub fn inner_pool(&self) -> &ActualDbPool {
    &self.pool
  }
}
