use crate::newtypes::{Coin, CourierId, WithdrawRequestId};
use chrono::{DateTime, Utc};
use entrega_db_schema_file::enums::WithdrawStatus;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use entrega_db_schema_file::schema::withdraw_request;

#[skip_serializing_none]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[cfg_attr(
  feature = "full",
  derive(diesel::Queryable, diesel::Selectable, diesel::Identifiable)
)]
#[cfg_attr(feature = "full", diesel(table_name = withdraw_request))]
#[cfg_attr(feature = "full", diesel(primary_key(id)))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[serde(rename_all = "camelCase")]
/// A courier's request to pay out part of their pending earnings.
///
/// The `bank_*` columns are a snapshot of the payout destination taken at
/// request time, so later edits to the registered bank account never change
/// an in-flight request.
pub struct WithdrawRequest {
  pub id: WithdrawRequestId,
  pub courier_id: CourierId,
  pub amount: Coin,
  pub status: WithdrawStatus,
  pub bank_name: String,
  pub bank_account_number: String,
  pub bank_account_holder: String,
  pub idempotency_key: Option<String>,
  pub created_at: DateTime<Utc>,
  pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, derive_new::new)]
#[cfg_attr(
  feature = "full",
  derive(diesel::Insertable, diesel::AsChangeset, Serialize, Deserialize)
)]
#[cfg_attr(feature = "full", diesel(table_name = withdraw_request))]
pub struct WithdrawRequestInsertForm {
  pub courier_id: CourierId,
  pub amount: Coin,
  pub bank_name: String,
  pub bank_account_number: String,
  pub bank_account_holder: String,
  #[new(default)]
  pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "full", derive(Serialize, Deserialize, diesel::AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = withdraw_request))]
pub struct WithdrawRequestUpdateForm {
  pub status: Option<WithdrawStatus>,
  pub resolved_at: Option<Option<DateTime<Utc>>>,
}
