use crate::{
  newtypes::{Coin, CourierId, EarningsEntryId, WithdrawRequestId},
  source::{
    bank_account::BankAccount,
    earnings_entry::EarningsEntry,
    withdraw_request::{WithdrawRequest, WithdrawRequestInsertForm, WithdrawRequestUpdateForm},
  },
  traits::Crud,
  utils::{get_conn, DbPool, RunTransaction},
};
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncPgConnection, RunQueryDsl};
use entrega_db_schema_file::{
  enums::{WithdrawDecision, WithdrawStatus},
  schema::withdraw_request,
};
use entrega_utils::error::{EntregaErrorExt, EntregaErrorType, EntregaResult};
use std::collections::HashSet;

impl Crud for WithdrawRequest {
  type InsertForm = WithdrawRequestInsertForm;
  type UpdateForm = WithdrawRequestUpdateForm;
  type IdType = WithdrawRequestId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(withdraw_request::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntCreateWithdrawRequest)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    withdraw_request::table
      .find(id)
      .first::<Self>(conn)
      .await
      .map_err(Into::into)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(withdraw_request::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntUpdateWithdrawRequest)
  }
}

/// Rejects an amount the courier's pending earnings cannot cover once the
/// already-committed requests are subtracted. Pure so the two-simultaneous-
/// requests arithmetic is testable on its own; callers evaluate the totals
/// under the courier's serialization lock.
fn check_available(
  amount: Coin,
  pending_total: Coin,
  outstanding_total: Coin,
) -> Result<(), EntregaErrorType> {
  if amount <= Coin(0) {
    return Err(EntregaErrorType::AmountMustBePositive);
  }
  if amount + outstanding_total > pending_total {
    return Err(EntregaErrorType::InsufficientBalance);
  }
  Ok(())
}

/// Oldest-pending-first settlement selection: the shortest prefix of the
/// courier's pending entries whose totals sum to exactly `amount`. Returns
/// `None` when no prefix matches, in which case nothing may settle.
fn select_oldest_pending(entries: &[EarningsEntry], amount: Coin) -> Option<Vec<EarningsEntryId>> {
  let mut acc = Coin(0);
  let mut ids = Vec::new();
  for entry in entries {
    if acc == amount {
      break;
    }
    acc += entry.total();
    if acc > amount {
      return None;
    }
    ids.push(entry.id);
  }
  (acc == amount).then_some(ids)
}

/// Validates an approver-supplied selection: every id must name a distinct
/// pending entry of this courier, and the totals must sum to exactly
/// `amount`.
fn validate_selection(
  pending: &[EarningsEntry],
  selection: &[EarningsEntryId],
  amount: Coin,
) -> Option<Vec<EarningsEntryId>> {
  let mut seen = HashSet::new();
  let mut acc = Coin(0);
  for id in selection {
    if !seen.insert(*id) {
      return None;
    }
    let entry = pending.iter().find(|e| e.id == *id)?;
    acc += entry.total();
  }
  (acc == amount).then(|| selection.to_vec())
}

impl WithdrawRequest {
  /// Submits a withdrawal for a courier, bounded by their live available
  /// balance.
  ///
  /// The courier's bank account row is locked first: it is both the payout
  /// destination being snapshotted and the per-courier serialization point,
  /// so two submissions racing for the same slice of pending earnings
  /// validate one after the other and the loser sees the winner's request
  /// as outstanding. Nothing is persisted when validation fails.
  pub async fn submit(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
    amount: Coin,
    idempotency_key: Option<String>,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    conn
      .run_transaction(|conn| {
        async move {
          let bank = BankAccount::lock_for_courier(conn, courier_id)
            .await?
            .ok_or(EntregaErrorType::MissingPayoutDestination)?;

          // A resubmitted request replays the original instead of
          // committing the same earnings twice.
          if let Some(key) = &idempotency_key {
            if let Some(existing) = Self::get_by_idempotency_key_on(conn, courier_id, key).await? {
              return Ok(existing);
            }
          }

          let pending_total = EarningsEntry::pending_total_on(conn, courier_id).await?;
          let outstanding_total = Self::outstanding_total_on(conn, courier_id).await?;
          check_available(amount, pending_total, outstanding_total)?;

          let form = WithdrawRequestInsertForm {
            idempotency_key: idempotency_key.clone(),
            ..WithdrawRequestInsertForm::new(
              courier_id,
              amount,
              bank.bank_name,
              bank.account_number,
              bank.account_holder,
            )
          };
          let created = diesel::insert_into(withdraw_request::table)
            .values(&form)
            .get_result::<Self>(conn)
            .await
            .with_entrega_type(EntregaErrorType::CouldntCreateWithdrawRequest)?;

          tracing::info!(
            request_id = %created.id,
            courier_id = %courier_id,
            amount = %amount,
            "withdrawal requested"
          );
          Ok(created)
        }
        .scope_boxed()
      })
      .await
  }

  /// Resolves a pending request.
  ///
  /// Approval settles the matched pending entries in the same transaction
  /// as the status write; the settled set is the approver's explicit
  /// selection if one was given, otherwise the oldest-pending-first prefix.
  /// Either way the settled totals must equal the requested amount exactly.
  /// Rejection touches no ledger rows, so the earnings immediately count
  /// toward the available balance again.
  pub async fn resolve(
    pool: &mut DbPool<'_>,
    request_id: WithdrawRequestId,
    decision: WithdrawDecision,
    selection: Option<Vec<EarningsEntryId>>,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    conn
      .run_transaction(|conn| {
        async move {
          let request = withdraw_request::table
            .find(request_id)
            .for_update()
            .first::<Self>(conn)
            .await?;

          if request.status != WithdrawStatus::Pending {
            return Err(EntregaErrorType::AlreadyResolved.into());
          }

          let status = match decision {
            WithdrawDecision::Rejected => WithdrawStatus::Rejected,
            WithdrawDecision::Approved => {
              let pending =
                EarningsEntry::pending_for_courier_locked(conn, request.courier_id).await?;
              let entry_ids = match &selection {
                Some(ids) => validate_selection(&pending, ids, request.amount),
                None => select_oldest_pending(&pending, request.amount),
              }
              .ok_or(EntregaErrorType::SettlementSelectionMismatch)?;
              EarningsEntry::settle_on(conn, entry_ids).await?;
              WithdrawStatus::Approved
            }
          };

          let form = WithdrawRequestUpdateForm {
            status: Some(status),
            resolved_at: Some(Some(Utc::now())),
          };
          let resolved = diesel::update(withdraw_request::table.find(request_id))
            .set(&form)
            .get_result::<Self>(conn)
            .await
            .with_entrega_type(EntregaErrorType::CouldntUpdateWithdrawRequest)?;

          tracing::info!(
            request_id = %resolved.id,
            status = %resolved.status,
            "withdrawal resolved"
          );
          Ok(resolved)
        }
        .scope_boxed()
      })
      .await
  }

  /// Sum of the courier's unresolved requests. Approved requests settle
  /// their earnings in the approving transaction, so only `Pending` ones
  /// still hold a claim on the pending balance.
  pub async fn outstanding_total_on(
    conn: &mut AsyncPgConnection,
    courier_id: CourierId,
  ) -> EntregaResult<Coin> {
    let outstanding = withdraw_request::table
      .filter(withdraw_request::courier_id.eq(courier_id))
      .filter(withdraw_request::status.eq(WithdrawStatus::Pending))
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)?;
    Ok(outstanding.iter().map(|r| r.amount).sum())
  }

  async fn get_by_idempotency_key_on(
    conn: &mut AsyncPgConnection,
    courier_id: CourierId,
    key: &str,
  ) -> EntregaResult<Option<Self>> {
    withdraw_request::table
      .filter(withdraw_request::courier_id.eq(courier_id))
      .filter(withdraw_request::idempotency_key.eq(key))
      .first::<Self>(conn)
      .await
      .optional()
      .map_err(Into::into)
  }

  /// All requests of a courier, newest first.
  pub async fn list_for_courier(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
  ) -> EntregaResult<Vec<Self>> {
    let conn = &mut get_conn(pool).await?;
    withdraw_request::table
      .filter(withdraw_request::courier_id.eq(courier_id))
      .order(withdraw_request::created_at.desc())
      .load::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::DatabaseError)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::newtypes::OrderId;
  use entrega_db_schema_file::enums::PaymentStatus;
  use pretty_assertions::assert_eq;

  fn pending_entry(id: i32, total: i64) -> EarningsEntry {
    EarningsEntry {
      id: EarningsEntryId(id),
      order_id: OrderId(id),
      courier_id: CourierId(7),
      base_amount: Coin(total),
      tip: Coin(0),
      bonus: Coin(0),
      deduction: Coin(0),
      distance_km: None,
      duration_minutes: None,
      payment_status: PaymentStatus::Pending,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn withdrawal_cannot_exceed_available_balance() {
    // Balance 50.00: 60.00 is rejected, 50.00 passes.
    assert_eq!(
      check_available(Coin(6000), Coin(5000), Coin(0)),
      Err(EntregaErrorType::InsufficientBalance)
    );
    assert_eq!(check_available(Coin(5000), Coin(5000), Coin(0)), Ok(()));
  }

  #[test]
  fn outstanding_requests_reduce_what_can_be_committed() {
    // A second request arriving while a 50.00 request is pending must not
    // pass validation against the same pending earnings.
    assert_eq!(
      check_available(Coin(1000), Coin(5000), Coin(5000)),
      Err(EntregaErrorType::InsufficientBalance)
    );
    // After a rejection the outstanding claim is gone and the full balance
    // is requestable again.
    assert_eq!(check_available(Coin(5000), Coin(5000), Coin(0)), Ok(()));
  }

  #[test]
  fn non_positive_amounts_are_rejected() {
    assert_eq!(
      check_available(Coin(0), Coin(5000), Coin(0)),
      Err(EntregaErrorType::AmountMustBePositive)
    );
    assert_eq!(
      check_available(Coin(-100), Coin(5000), Coin(0)),
      Err(EntregaErrorType::AmountMustBePositive)
    );
  }

  #[test]
  fn oldest_prefix_matching_the_amount_settles() {
    let entries = vec![
      pending_entry(1, 3000),
      pending_entry(2, 1500),
      pending_entry(3, 500),
    ];
    assert_eq!(
      select_oldest_pending(&entries, Coin(3000)),
      Some(vec![EarningsEntryId(1)])
    );
    assert_eq!(
      select_oldest_pending(&entries, Coin(4500)),
      Some(vec![EarningsEntryId(1), EarningsEntryId(2)])
    );
    assert_eq!(
      select_oldest_pending(&entries, Coin(5000)),
      Some(vec![
        EarningsEntryId(1),
        EarningsEntryId(2),
        EarningsEntryId(3)
      ])
    );
  }

  #[test]
  fn a_prefix_that_cannot_match_exactly_settles_nothing() {
    let entries = vec![pending_entry(1, 3000), pending_entry(2, 1500)];
    // Overshoots within the first entry.
    assert_eq!(select_oldest_pending(&entries, Coin(2000)), None);
    // Exhausts the ledger before reaching the amount.
    assert_eq!(select_oldest_pending(&entries, Coin(9000)), None);
  }

  #[test]
  fn explicit_selection_must_total_the_requested_amount() {
    let pending = vec![
      pending_entry(1, 3000),
      pending_entry(2, 1500),
      pending_entry(3, 500),
    ];
    let picked = vec![EarningsEntryId(2), EarningsEntryId(3)];
    assert_eq!(
      validate_selection(&pending, &picked, Coin(2000)),
      Some(picked.clone())
    );
    assert_eq!(validate_selection(&pending, &picked, Coin(2500)), None);
    // Unknown and duplicated ids are rejected outright.
    assert_eq!(
      validate_selection(&pending, &[EarningsEntryId(9)], Coin(0)),
      None
    );
    assert_eq!(
      validate_selection(
        &pending,
        &[EarningsEntryId(2), EarningsEntryId(2)],
        Coin(3000)
      ),
      None
    );
  }
}
