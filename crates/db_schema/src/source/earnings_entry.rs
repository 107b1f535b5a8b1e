use crate::newtypes::{Coin, CourierId, EarningsEntryId, OrderId};
use chrono::{DateTime, Utc};
use entrega_db_schema_file::enums::PaymentStatus;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use entrega_db_schema_file::schema::earnings_entry;

/// Courier-reported trip metrics, recorded on the earnings entry for
/// reporting. Never part of balance math.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryMetrics {
  pub distance_km: Option<f64>,
  pub duration_minutes: Option<i32>,
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[cfg_attr(
  feature = "full",
  derive(diesel::Queryable, diesel::Selectable, diesel::Identifiable)
)]
#[cfg_attr(feature = "full", diesel(table_name = earnings_entry))]
#[cfg_attr(feature = "full", diesel(primary_key(id)))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[serde(rename_all = "camelCase")]
/// One immutable monetary record per successfully delivered order. Created
/// exactly once, in the same transaction as the `Delivered` status write;
/// only `payment_status` ever changes afterwards, and only through
/// settlement.
pub struct EarningsEntry {
  pub id: EarningsEntryId,
  /// Unique; at most one entry ever exists per order.
  pub order_id: OrderId,
  pub courier_id: CourierId,
  pub base_amount: Coin,
  pub tip: Coin,
  pub bonus: Coin,
  pub deduction: Coin,
  pub distance_km: Option<f64>,
  pub duration_minutes: Option<i32>,
  pub payment_status: PaymentStatus,
  pub created_at: DateTime<Utc>,
}

impl EarningsEntry {
  /// The payable amount of this entry.
  pub fn total(&self) -> Coin {
    self.base_amount + self.tip + self.bonus - self.deduction
  }
}

#[derive(Debug, Clone, derive_new::new, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(diesel::Insertable))]
#[cfg_attr(feature = "full", diesel(table_name = earnings_entry))]
pub struct EarningsEntryInsertForm {
  pub order_id: OrderId,
  pub courier_id: CourierId,
  pub base_amount: Coin,
  #[new(default)]
  pub tip: Option<Coin>,
  #[new(default)]
  pub bonus: Option<Coin>,
  #[new(default)]
  pub deduction: Option<Coin>,
  #[new(default)]
  pub distance_km: Option<f64>,
  #[new(default)]
  pub duration_minutes: Option<i32>,
}
