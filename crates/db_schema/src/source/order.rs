use crate::newtypes::{Coin, CourierId, CustomerId, OrderId, RestaurantId};
use chrono::{DateTime, Utc};
use entrega_db_schema_file::enums::{ActorRole, DeliveryStatus};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
#[cfg(feature = "full")]
use entrega_db_schema_file::schema::delivery_order;

/// The party requesting a status change, as established by the out-of-scope
/// auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
  Courier(CourierId),
  Restaurant(RestaurantId),
}

impl Actor {
  pub fn from_role(role: ActorRole, id: i32) -> Actor {
    match role {
      ActorRole::Courier => Actor::Courier(CourierId(id)),
      ActorRole::Restaurant => Actor::Restaurant(RestaurantId(id)),
    }
  }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[cfg_attr(
  feature = "full",
  derive(diesel::Queryable, diesel::Selectable, diesel::Identifiable)
)]
#[cfg_attr(feature = "full", diesel(table_name = delivery_order))]
#[cfg_attr(feature = "full", diesel(primary_key(id)))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[serde(rename_all = "camelCase")]
/// A delivery order. Owned by the order-management subsystem; its `status`
/// column is written exclusively through `Order::transition` and
/// `Order::assign_courier`.
pub struct Order {
  pub id: OrderId,
  pub restaurant_id: RestaurantId,
  pub customer_id: CustomerId,
  /// Unset until a restaurant assigns a courier.
  pub courier_id: Option<CourierId>,
  pub status: DeliveryStatus,
  /// Order total in centavos.
  pub total: Coin,
  pub cancellation_reason: Option<String>,
  pub assigned_at: Option<DateTime<Utc>>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, derive_new::new, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(diesel::Insertable, diesel::AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = delivery_order))]
pub struct OrderInsertForm {
  pub restaurant_id: RestaurantId,
  pub customer_id: CustomerId,
  pub total: Coin,
  #[new(default)]
  pub status: Option<DeliveryStatus>,
  #[new(default)]
  pub courier_id: Option<CourierId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(diesel::AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = delivery_order))]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdateForm {
  pub status: Option<DeliveryStatus>,
  pub courier_id: Option<Option<CourierId>>,
  pub cancellation_reason: Option<Option<String>>,
  pub assigned_at: Option<Option<DateTime<Utc>>>,
  pub updated_at: Option<DateTime<Utc>>,
}
