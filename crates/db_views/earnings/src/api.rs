use chrono::{DateTime, Utc};
use entrega_db_schema::newtypes::{Coin, CourierId};
use serde::{Deserialize, Serialize};
use strum::EnumString;

/// The reporting window a balance query aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EarningsWindow {
  Today,
  Week,
  Month,
  Custom {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  },
}

/// The `window` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, EnumString, Default)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum WindowKind {
  #[default]
  Today,
  Week,
  Month,
  Custom,
}

/// Query parameters for the courier balance endpoint. `start`/`end` are only
/// consulted for `window=custom`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCourierBalanceQuery {
  pub window: Option<WindowKind>,
  pub start: Option<DateTime<Utc>>,
  pub end: Option<DateTime<Utc>>,
}

/// Aggregates over a courier's earnings entries inside a window, regardless
/// of payment status; the available balance is reported separately and only
/// counts pending entries.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
  pub total_earned: Coin,
  pub delivery_count: i64,
  pub base_total: Coin,
  pub tip_total: Coin,
  pub bonus_total: Coin,
  pub deduction_total: Coin,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CourierBalanceResponse {
  pub courier_id: CourierId,
  /// Sum of the courier's pending earnings at query time.
  pub available_balance: Coin,
  pub summary: EarningsSummary,
}
