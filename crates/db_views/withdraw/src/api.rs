use chrono::{DateTime, Utc};
use entrega_db_schema::newtypes::{Coin, CourierId, EarningsEntryId, WithdrawRequestId};
use entrega_db_schema_file::enums::{WithdrawDecision, WithdrawStatus};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Request body for submitting a withdrawal.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SubmitWithdrawRequest {
  pub amount: Coin,
  /// Makes resubmissions of the same request safe; a repeated key returns
  /// the original request instead of creating a second one.
  pub idempotency_key: Option<String>,
}

/// Request body for resolving a pending withdrawal (approver-only; the role
/// check belongs to the auth collaborator).
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResolveWithdrawRequest {
  pub decision: WithdrawDecision,
  /// Explicit settlement selection. When absent, the oldest pending
  /// earnings settle first.
  pub entry_ids: Option<Vec<EarningsEntryId>>,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequestResponse {
  pub id: WithdrawRequestId,
  pub courier_id: CourierId,
  pub amount: Coin,
  pub status: WithdrawStatus,
  pub bank_name: String,
  pub bank_account_number: String,
  pub bank_account_holder: String,
  pub created_at: DateTime<Utc>,
  pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListWithdrawRequestsResponse {
  pub requests: Vec<WithdrawRequestResponse>,
}
