use chrono::{DateTime, Utc};
use entrega_db_schema::{
  newtypes::{CourierId, OrderId},
  source::order::Order,
};
use entrega_db_schema_file::enums::{ActorRole, DeliveryStatus};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Request body for updating a delivery order's status.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOrderRequest {
  /// The acting party, as established by the auth collaborator.
  pub actor_id: i32,
  pub actor_role: ActorRole,
  /// The status to move into.
  pub status: DeliveryStatus,
  /// Required when cancelling.
  pub reason: Option<String>,
  /// Courier-reported trip distance, recorded on the earnings entry.
  pub distance_km: Option<f64>,
  /// Courier-reported trip duration, recorded on the earnings entry.
  pub duration_minutes: Option<i32>,
}

/// Request body for assigning a courier to an order that is ready for pickup.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssignCourierRequest {
  /// The restaurant actor performing the assignment.
  pub actor_id: i32,
  pub courier_id: CourierId,
}

#[skip_serializing_none]
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusResponse {
  pub order_id: OrderId,
  pub status: DeliveryStatus,
  pub courier_id: Option<CourierId>,
  pub cancellation_reason: Option<String>,
  pub updated_at: DateTime<Utc>,
}

impl OrderStatusResponse {
  pub fn from_order(order: &Order) -> Self {
    OrderStatusResponse {
      order_id: order.id,
      status: order.status,
      courier_id: order.courier_id,
      cancellation_reason: order.cancellation_reason.clone(),
      updated_at: order.updated_at,
    }
  }
}
