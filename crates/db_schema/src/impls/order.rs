use crate::{
  newtypes::{CourierId, OrderId},
  source::{
    earnings_entry::{DeliveryMetrics, EarningsEntry, EarningsEntryInsertForm},
    order::{Actor, Order, OrderInsertForm, OrderUpdateForm},
  },
  traits::Crud,
  utils::{get_conn, DbPool, RunTransaction},
};
use chrono::Utc;
use diesel::QueryDsl;
use diesel_async::{scoped_futures::ScopedFutureExt, AsyncPgConnection, RunQueryDsl};
use entrega_db_schema_file::{enums::DeliveryStatus, schema::delivery_order};
use entrega_utils::error::{EntregaError, EntregaErrorExt, EntregaErrorType, EntregaResult};

impl Crud for Order {
  type InsertForm = OrderInsertForm;
  type UpdateForm = OrderUpdateForm;
  type IdType = OrderId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(delivery_order::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntCreateOrder)
  }

  async fn read(pool: &mut DbPool<'_>, order_id: OrderId) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    delivery_order::table
      .find(order_id)
      .first::<Self>(conn)
      .await
      .map_err(Into::into)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    order_id: OrderId,
    form: &Self::UpdateForm,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(delivery_order::table.find(order_id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntUpdateOrder)
  }
}

/// How a requested transition is applied once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionKind {
  /// The order is already in the requested status: a replayed submission,
  /// acknowledged without writing anything.
  Noop,
  Forward,
  Cancel,
}

/// Decides whether `actor` may move `order` into `target`, and how.
///
/// The adjacency rules, in order:
/// - `target == current` is a replay and succeeds as a no-op for any party
///   attached to the order.
/// - `Canceled` is reachable from every non-terminal status, by the assigned
///   courier or the owning restaurant.
/// - the immediate forward successor is reachable by the assigned courier.
/// - a target the order already passed (or any move out of a terminal
///   status toward one) means the caller acted on an outdated view:
///   `StaleOrderState`.
/// - everything else, including skipping ahead and entering
///   `AssignedToCourier` without the assignment operation, is
///   `InvalidTransition`.
fn classify_transition(
  order: &Order,
  actor: Actor,
  target: DeliveryStatus,
) -> Result<TransitionKind, EntregaErrorType> {
  let current = order.status;

  if target == current {
    duplicate_authorized(order, actor)?;
    return Ok(TransitionKind::Noop);
  }

  if target == DeliveryStatus::Canceled {
    if current.is_terminal() {
      return Err(EntregaErrorType::InvalidTransition);
    }
    authorize_cancel(order, actor)?;
    return Ok(TransitionKind::Cancel);
  }

  if matches!(
    target,
    DeliveryStatus::ReadyForPickup | DeliveryStatus::AssignedToCourier
  ) {
    // Courier assignment carries a courier id and goes through
    // `Order::assign_courier`; nothing transitions back into the initial
    // status.
    return Err(EntregaErrorType::InvalidTransition);
  }

  let Some(target_pos) = target.sequence_position() else {
    return Err(EntregaErrorType::InvalidTransition);
  };
  match current.sequence_position() {
    // The order was canceled after the caller last looked at it.
    None => Err(EntregaErrorType::StaleOrderState),
    Some(current_pos) if target_pos <= current_pos => Err(EntregaErrorType::StaleOrderState),
    Some(current_pos) if target_pos == current_pos + 1 => {
      authorize_forward(order, actor)?;
      Ok(TransitionKind::Forward)
    }
    Some(_) => Err(EntregaErrorType::InvalidTransition),
  }
}

/// Forward progress is driven only by the courier assigned to the order.
fn authorize_forward(order: &Order, actor: Actor) -> Result<(), EntregaErrorType> {
  match actor {
    Actor::Courier(courier_id) => match order.courier_id {
      Some(assigned) if assigned == courier_id => Ok(()),
      Some(_) => Err(EntregaErrorType::Unauthorized),
      None => Err(EntregaErrorType::CourierNotAssigned),
    },
    Actor::Restaurant(_) => Err(EntregaErrorType::Unauthorized),
  }
}

/// Either side of the fulfillment may cancel: the assigned courier or the
/// restaurant the order belongs to.
fn authorize_cancel(order: &Order, actor: Actor) -> Result<(), EntregaErrorType> {
  match actor {
    Actor::Courier(courier_id) if order.courier_id == Some(courier_id) => Ok(()),
    Actor::Restaurant(restaurant_id) if order.restaurant_id == restaurant_id => Ok(()),
    _ => Err(EntregaErrorType::Unauthorized),
  }
}

/// A replayed request is acknowledged for any party attached to the order.
fn duplicate_authorized(order: &Order, actor: Actor) -> Result<(), EntregaErrorType> {
  match actor {
    Actor::Courier(courier_id) if order.courier_id == Some(courier_id) => Ok(()),
    Actor::Restaurant(restaurant_id) if order.restaurant_id == restaurant_id => Ok(()),
    _ => Err(EntregaErrorType::Unauthorized),
  }
}

impl Order {
  /// Assigns a courier to an order that is ready for pickup and moves it
  /// into `AssignedToCourier`. Restaurant-only. Re-assigning the same
  /// courier is an idempotent no-op; an order that already moved on yields
  /// `StaleOrderState`.
  pub async fn assign_courier(
    pool: &mut DbPool<'_>,
    order_id: OrderId,
    actor: Actor,
    courier_id: CourierId,
  ) -> EntregaResult<Self> {
    let Actor::Restaurant(restaurant_id) = actor else {
      return Err(EntregaErrorType::Unauthorized.into());
    };

    let conn = &mut get_conn(pool).await?;
    conn
      .run_transaction(|conn| {
        async move {
          let order = delivery_order::table
            .find(order_id)
            .for_update()
            .first::<Self>(conn)
            .await?;

          if order.restaurant_id != restaurant_id {
            return Err(EntregaErrorType::Unauthorized.into());
          }

          match order.status {
            DeliveryStatus::AssignedToCourier if order.courier_id == Some(courier_id) => Ok(order),
            DeliveryStatus::ReadyForPickup => {
              let now = Utc::now();
              let form = OrderUpdateForm {
                status: Some(DeliveryStatus::AssignedToCourier),
                courier_id: Some(Some(courier_id)),
                assigned_at: Some(Some(now)),
                updated_at: Some(now),
                ..Default::default()
              };
              diesel::update(delivery_order::table.find(order_id))
                .set(&form)
                .get_result::<Self>(conn)
                .await
                .with_entrega_type(EntregaErrorType::CouldntUpdateOrder)
            }
            _ => Err(EntregaErrorType::StaleOrderState.into()),
          }
        }
        .scope_boxed()
      })
      .await
  }

  /// Validates and applies a status transition for one order.
  ///
  /// The order row is locked for the duration, so concurrent requests for
  /// the same order serialize: the loser re-reads the committed status and
  /// is classified as a replay (`Noop`) or as stale. Reaching `Delivered`
  /// records the courier's earnings entry in the same transaction, so the
  /// status write and the ledger entry commit or roll back together.
  pub async fn transition(
    pool: &mut DbPool<'_>,
    order_id: OrderId,
    actor: Actor,
    target: DeliveryStatus,
    reason: Option<String>,
    metrics: DeliveryMetrics,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    conn
      .run_transaction(|conn| {
        async move {
          let order = delivery_order::table
            .find(order_id)
            .for_update()
            .first::<Self>(conn)
            .await?;

          let kind = classify_transition(&order, actor, target).map_err(EntregaError::from)?;
          if kind == TransitionKind::Noop {
            return Ok(order);
          }

          let mut form = OrderUpdateForm {
            status: Some(target),
            updated_at: Some(Utc::now()),
            ..Default::default()
          };
          if kind == TransitionKind::Cancel {
            form.cancellation_reason = Some(reason);
          }

          let updated = diesel::update(delivery_order::table.find(order_id))
            .set(&form)
            .get_result::<Self>(conn)
            .await
            .with_entrega_type(EntregaErrorType::CouldntUpdateOrder)?;

          if target == DeliveryStatus::Delivered {
            record_delivery_earning(conn, &updated, metrics).await?;
          }

          tracing::debug!(
            order_id = %updated.id,
            status = %updated.status,
            "applied delivery status transition"
          );
          Ok(updated)
        }
        .scope_boxed()
      })
      .await
  }
}

/// The `Delivered` side effect: exactly one pending earnings entry, with the
/// order total as its base amount.
async fn record_delivery_earning(
  conn: &mut AsyncPgConnection,
  order: &Order,
  metrics: DeliveryMetrics,
) -> EntregaResult<EarningsEntry> {
  let courier_id = order
    .courier_id
    .ok_or(EntregaErrorType::CourierNotAssigned)?;
  let form = EarningsEntryInsertForm {
    distance_km: metrics.distance_km,
    duration_minutes: metrics.duration_minutes,
    ..EarningsEntryInsertForm::new(order.id, courier_id, order.total)
  };
  EarningsEntry::record_on(conn, &form).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::newtypes::{Coin, CustomerId, RestaurantId};
  use pretty_assertions::assert_eq;

  fn test_order(status: DeliveryStatus, courier_id: Option<CourierId>) -> Order {
    let now = Utc::now();
    Order {
      id: OrderId(1),
      restaurant_id: RestaurantId(10),
      customer_id: CustomerId(20),
      courier_id,
      status,
      total: Coin(3000),
      cancellation_reason: None,
      assigned_at: None,
      created_at: now,
      updated_at: now,
    }
  }

  const COURIER: Actor = Actor::Courier(CourierId(7));
  const OTHER_COURIER: Actor = Actor::Courier(CourierId(8));
  const RESTAURANT: Actor = Actor::Restaurant(RestaurantId(10));
  const OTHER_RESTAURANT: Actor = Actor::Restaurant(RestaurantId(11));

  fn assigned(status: DeliveryStatus) -> Order {
    test_order(status, Some(CourierId(7)))
  }

  #[test]
  fn courier_walks_the_full_forward_chain() {
    let mut status = DeliveryStatus::AssignedToCourier;
    while let Some(next) = status.forward_successor() {
      let order = assigned(status);
      assert_eq!(
        classify_transition(&order, COURIER, next),
        Ok(TransitionKind::Forward),
        "{status} -> {next}"
      );
      status = next;
    }
    assert_eq!(status, DeliveryStatus::Delivered);
  }

  #[test]
  fn skipping_a_status_is_rejected() {
    let order = assigned(DeliveryStatus::AssignedToCourier);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::PickedUp),
      Err(EntregaErrorType::InvalidTransition)
    );
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::Delivered),
      Err(EntregaErrorType::InvalidTransition)
    );
  }

  #[test]
  fn replaying_a_transition_is_a_noop() {
    let order = assigned(DeliveryStatus::PickedUp);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::PickedUp),
      Ok(TransitionKind::Noop)
    );
    // A replayed `Delivered` must not produce a second earnings entry.
    let order = assigned(DeliveryStatus::Delivered);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::Delivered),
      Ok(TransitionKind::Noop)
    );
  }

  #[test]
  fn acting_on_an_outdated_view_is_stale() {
    // The courier's app still shows PickedUp, but the order is already
    // further along; its successor is now behind the committed status.
    let order = assigned(DeliveryStatus::ArrivedAtCustomer);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::EnRouteToCustomer),
      Err(EntregaErrorType::StaleOrderState)
    );
    let order = assigned(DeliveryStatus::Delivered);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::ArrivedAtCustomer),
      Err(EntregaErrorType::StaleOrderState)
    );
    // Canceled from under the courier.
    let order = assigned(DeliveryStatus::Canceled);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::EnRouteToRestaurant),
      Err(EntregaErrorType::StaleOrderState)
    );
  }

  #[test]
  fn only_the_assigned_courier_moves_forward() {
    let order = assigned(DeliveryStatus::PickedUp);
    assert_eq!(
      classify_transition(&order, OTHER_COURIER, DeliveryStatus::EnRouteToCustomer),
      Err(EntregaErrorType::Unauthorized)
    );
    assert_eq!(
      classify_transition(&order, RESTAURANT, DeliveryStatus::EnRouteToCustomer),
      Err(EntregaErrorType::Unauthorized)
    );
  }

  #[test]
  fn forward_without_an_assigned_courier_is_rejected() {
    let order = test_order(DeliveryStatus::EnRouteToRestaurant, None);
    assert_eq!(
      classify_transition(&order, COURIER, DeliveryStatus::ArrivedAtRestaurant),
      Err(EntregaErrorType::CourierNotAssigned)
    );
  }

  #[test]
  fn cancel_is_reachable_from_every_non_terminal_status() {
    for status in [
      DeliveryStatus::ReadyForPickup,
      DeliveryStatus::AssignedToCourier,
      DeliveryStatus::EnRouteToRestaurant,
      DeliveryStatus::ArrivedAtRestaurant,
      DeliveryStatus::PickedUp,
      DeliveryStatus::EnRouteToCustomer,
      DeliveryStatus::ArrivedAtCustomer,
    ] {
      let order = assigned(status);
      assert_eq!(
        classify_transition(&order, RESTAURANT, DeliveryStatus::Canceled),
        Ok(TransitionKind::Cancel),
        "{status}"
      );
      assert_eq!(
        classify_transition(&order, COURIER, DeliveryStatus::Canceled),
        Ok(TransitionKind::Cancel),
        "{status}"
      );
    }
  }

  #[test]
  fn cancel_of_a_delivered_order_is_rejected() {
    let order = assigned(DeliveryStatus::Delivered);
    assert_eq!(
      classify_transition(&order, RESTAURANT, DeliveryStatus::Canceled),
      Err(EntregaErrorType::InvalidTransition)
    );
  }

  #[test]
  fn cancel_by_an_unrelated_party_is_rejected() {
    let order = assigned(DeliveryStatus::PickedUp);
    assert_eq!(
      classify_transition(&order, OTHER_RESTAURANT, DeliveryStatus::Canceled),
      Err(EntregaErrorType::Unauthorized)
    );
    assert_eq!(
      classify_transition(&order, OTHER_COURIER, DeliveryStatus::Canceled),
      Err(EntregaErrorType::Unauthorized)
    );
  }

  #[test]
  fn assignment_does_not_go_through_transition() {
    let order = test_order(DeliveryStatus::ReadyForPickup, None);
    assert_eq!(
      classify_transition(&order, RESTAURANT, DeliveryStatus::AssignedToCourier),
      Err(EntregaErrorType::InvalidTransition)
    );
  }
}
