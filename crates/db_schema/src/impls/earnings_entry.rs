use crate::{
  newtypes::{Coin, CourierId, EarningsEntryId, OrderId},
  source::earnings_entry::{EarningsEntry, EarningsEntryInsertForm},
  utils::{get_conn, DbPool},
};
use chrono::{DateTime, Utc};
use diesel::{
  result::{DatabaseErrorKind, Error as DieselError},
  ExpressionMethods, OptionalExtension, QueryDsl,
};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use entrega_db_schema_file::{enums::PaymentStatus, schema::earnings_entry};
use entrega_utils::error::{EntregaErrorExt, EntregaErrorType, EntregaResult};

impl EarningsEntry {
  /// Appends one ledger entry for a delivered order. Runs on the caller's
  /// transaction connection so the entry commits together with the status
  /// write that earned it. The unique index on `order_id` makes a second
  /// insert for the same order fail as `DuplicateEarning`.
  pub async fn record_on(
    conn: &mut AsyncPgConnection,
    form: &EarningsEntryInsertForm,
  ) -> EntregaResult<Self> {
    let inserted = diesel::insert_into(earnings_entry::table)
      .values(form)
      .get_result::<Self>(conn)
      .await;
    match inserted {
      Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
        Err(EntregaErrorType::DuplicateEarning.into())
      }
      inserted => inserted.with_entrega_type(EntregaErrorType::CouldntCreateEarningsEntry),
    }
  }

  pub async fn read(pool: &mut DbPool<'_>, entry_id: EarningsEntryId) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    earnings_entry::table
      .find(entry_id)
      .first::<Self>(conn)
      .await
      .map_err(Into::into)
  }

  pub async fn get_by_order(
    pool: &mut DbPool<'_>,
    order_id: OrderId,
  ) -> EntregaResult<Option<Self>> {
    let conn = &mut get_conn(pool).await?;
    earnings_entry::table
      .filter(earnings_entry::order_id.eq(order_id))
      .first::<Self>(conn)
      .await
      .optional()
      .map_err(Into::into)
  }

  /// Flips the given entries from `Pending` to `Paid`. Only invoked while
  /// resolving an approved withdrawal, on that resolution's transaction
  /// connection. If any entry is not currently pending the update count
  /// falls short, the call fails with `AlreadySettled` and the surrounding
  /// transaction rolls back, so a payout can never settle the same earning
  /// twice.
  pub async fn settle_on(
    conn: &mut AsyncPgConnection,
    entry_ids: Vec<EarningsEntryId>,
  ) -> EntregaResult<()> {
    let expected = entry_ids.len();
    let updated = diesel::update(
      earnings_entry::table
        .filter(earnings_entry::id.eq_any(entry_ids))
        .filter(earnings_entry::payment_status.eq(PaymentStatus::Pending)),
    )
    .set(earnings_entry::payment_status.eq(PaymentStatus::Paid))
    .execute(conn)
    .await
    .with_entrega_type(EntregaErrorType::DatabaseError)?;

    if updated != expected {
      return Err(EntregaErrorType::AlreadySettled.into());
    }
    Ok(())
  }

  /// A courier's pending entries, oldest first, optionally narrowed to
  /// entries created in `[from, to)`.
  pub async fn pending_for_courier(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> EntregaResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    let mut query = earnings_entry::table
      .filter(earnings_entry::courier_id.eq(courier_id))
      .filter(earnings_entry::payment_status.eq(PaymentStatus::Pending))
      .into_boxed();

    if let Some(from) = from {
      query = query.filter(earnings_entry::created_at.ge(from));
    }
    if let Some(to) = to {
      query = query.filter(earnings_entry::created_at.lt(to));
    }

    query
      .order(earnings_entry::created_at.asc())
      .then_order_by(earnings_entry::id.asc())
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)
  }

  /// All of a courier's pending entries, locked on the caller's transaction
  /// connection so a settlement selection cannot race a concurrent
  /// settlement over the same entries.
  pub async fn pending_for_courier_locked(
    conn: &mut AsyncPgConnection,
    courier_id: CourierId,
  ) -> EntregaResult<Vec<Self>> {
    earnings_entry::table
      .filter(earnings_entry::courier_id.eq(courier_id))
      .filter(earnings_entry::payment_status.eq(PaymentStatus::Pending))
      .order(earnings_entry::created_at.asc())
      .then_order_by(earnings_entry::id.asc())
      .for_update()
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)
  }

  /// Sum of a courier's pending entries, evaluated on the caller's
  /// transaction connection. This is the authoritative available balance;
  /// it is never cached or stored.
  pub async fn pending_total_on(
    conn: &mut AsyncPgConnection,
    courier_id: CourierId,
  ) -> EntregaResult<Coin> {
    let pending = earnings_entry::table
      .filter(earnings_entry::courier_id.eq(courier_id))
      .filter(earnings_entry::payment_status.eq(PaymentStatus::Pending))
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)?;
    Ok(Self::ledger_total(&pending))
  }

  /// A courier's entries with `created_at` in `[from, to)`, regardless of
  /// payment status; historical reporting includes paid earnings.
  pub async fn for_courier_in_window(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
  ) -> EntregaResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    earnings_entry::table
      .filter(earnings_entry::courier_id.eq(courier_id))
      .filter(earnings_entry::created_at.ge(from))
      .filter(earnings_entry::created_at.lt(to))
      .order(earnings_entry::created_at.asc())
      .then_order_by(earnings_entry::id.asc())
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)
  }

  /// Folds entry totals without going through intermediate floats.
  pub fn ledger_total(entries: &[Self]) -> Coin {
    entries.iter().map(Self::total).sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn test_entry(id: i32, base: i64, tip: i64, bonus: i64, deduction: i64) -> EarningsEntry {
    EarningsEntry {
      id: EarningsEntryId(id),
      order_id: OrderId(id),
      courier_id: CourierId(7),
      base_amount: Coin(base),
      tip: Coin(tip),
      bonus: Coin(bonus),
      deduction: Coin(deduction),
      distance_km: None,
      duration_minutes: None,
      payment_status: PaymentStatus::Pending,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn entry_total_combines_all_components() {
    let entry = test_entry(1, 3000, 500, 200, 700);
    assert_eq!(entry.total(), Coin(3000));
  }

  #[test]
  fn ledger_total_sums_entry_totals() {
    let entries = vec![
      test_entry(1, 3000, 0, 0, 0),
      test_entry(2, 1250, 250, 0, 0),
      test_entry(3, 800, 0, 100, 150),
    ];
    assert_eq!(EarningsEntry::ledger_total(&entries), Coin(5250));
    assert_eq!(EarningsEntry::ledger_total(&[]), Coin(0));
  }
}
