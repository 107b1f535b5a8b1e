use deadpool::Runtime;
use diesel::result::Error as DieselError;
use diesel_async::{
  pooled_connection::{
    deadpool::{Object as PooledConnection, Pool},
    AsyncDieselConnectionManager,
  },
  scoped_futures::ScopedBoxFuture,
  AsyncConnection, AsyncPgConnection,
};
use entrega_utils::{
  error::{EntregaErrorExt, EntregaErrorType, EntregaResult},
  settings::Settings,
};
use std::ops::{Deref, DerefMut};

pub type ActualDbPool = Pool<AsyncPgConnection>;

/// References a pool or a connection. Functions take `&mut DbPool<'_>` so a
/// transaction-held connection can be passed down via `&mut conn.into()`.
pub enum DbPool<'a> {
  Pool(&'a ActualDbPool),
  Conn(&'a mut AsyncPgConnection),
}

pub enum DbConn<'a> {
  Pool(PooledConnection<AsyncPgConnection>),
  Conn(&'a mut AsyncPgConnection),
}

pub async fn get_conn<'a, 'b: 'a>(pool: &'a mut DbPool<'b>) -> Result<DbConn<'a>, DieselError> {
  Ok(match pool {
    DbPool::Pool(pool) => DbConn::Pool(
      pool
        .get()
        .await
        .map_err(|e| DieselError::QueryBuilderError(e.into()))?,
    ),
    DbPool::Conn(conn) => DbConn::Conn(conn),
  })
}

impl Deref for DbConn<'_> {
  type Target = AsyncPgConnection;

  fn deref(&self) -> &Self::Target {
    match self {
      DbConn::Pool(conn) => conn.deref(),
      DbConn::Conn(conn) => conn.deref(),
    }
  }
}

impl DerefMut for DbConn<'_> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    match self {
      DbConn::Pool(conn) => conn.deref_mut(),
      DbConn::Conn(conn) => conn.deref_mut(),
    }
  }
}
// `DbConn` gets its `AsyncConnection`/`SimpleAsyncConnection` impls from
// diesel-async's blanket impls for `C: DerefMut + Send` whose target is an
// `AsyncConnection` (see `Deref`/`DerefMut` above), so no manual impl is needed.

impl<'a> From<&'a mut AsyncPgConnection> for DbPool<'a> {
  fn from(value: &'a mut AsyncPgConnection) -> Self {
    DbPool::Conn(value)
  }
}

impl<'a, 'b: 'a> From<&'a mut DbConn<'b>> for DbPool<'a> {
  fn from(value: &'a mut DbConn<'b>) -> Self {
    DbPool::Conn(value.deref_mut())
  }
}

impl<'a> From<&'a ActualDbPool> for DbPool<'a> {
  fn from(value: &'a ActualDbPool) -> Self {
    DbPool::Pool(value)
  }
}

/// Runs the callback inside a database transaction: it commits on `Ok` and
/// rolls back on `Err`, so a status write and its ledger side effect either
/// both land or neither does.
#[allow(async_fn_in_trait)]
pub trait RunTransaction {
  async fn run_transaction<'a, R, F>(&mut self, callback: F) -> EntregaResult<R>
  where
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, EntregaResult<R>>
      + Send
      + 'a,
    R: Send + 'a;
}

impl RunTransaction for AsyncPgConnection {
  async fn run_transaction<'a, R, F>(&mut self, callback: F) -> EntregaResult<R>
  where
    F: for<'r> FnOnce(&'r mut AsyncPgConnection) -> ScopedBoxFuture<'a, 'r, EntregaResult<R>>
      + Send
      + 'a,
    R: Send + 'a,
  {
    self.transaction(callback).await
  }
}

pub fn build_db_pool(settings: &Settings) -> EntregaResult<ActualDbPool> {
  let db_url = settings.get_database_url();
  let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(db_url);
  Pool::builder(manager)
    .max_size(settings.database.pool_size)
    .runtime(Runtime::Tokio1)
    .build()
    .with_entrega_type(EntregaErrorType::CouldntConnectDatabase)
}
