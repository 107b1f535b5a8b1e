use actix_web::web::{Data, Json, Path};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::{
  newtypes::OrderId,
  source::{earnings_entry::DeliveryMetrics, order::Actor, order::Order},
};
use entrega_db_views_delivery::{
  api::{OrderStatusResponse, TransitionOrderRequest},
  validator::ValidTransitionOrderRequest,
};
use entrega_utils::error::EntregaResult;

/// PUT /api/v1/deliveries/{order_id}/status
///
/// Validates and applies a status transition for a delivery order. Forward
/// steps are courier-only; cancellation is open to the assigned courier and
/// the owning restaurant and requires a reason. Replaying a transition that
/// already committed succeeds without changing anything; acting on an
/// outdated status yields a stale-state conflict the client should resolve
/// by refreshing.
pub async fn update_delivery_status(
  path: Path<OrderId>,
  data: Json<TransitionOrderRequest>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<OrderStatusResponse>> {
  let order_id = path.into_inner();
  let validated: ValidTransitionOrderRequest = data.into_inner().try_into()?;
  let request = validated.0;

  let actor = Actor::from_role(request.actor_role, request.actor_id);
  let metrics = DeliveryMetrics {
    distance_km: request.distance_km,
    duration_minutes: request.duration_minutes,
  };

  let updated = Order::transition(
    &mut context.pool(),
    order_id,
    actor,
    request.status,
    request.reason,
    metrics,
  )
  .await?;

  Ok(Json(OrderStatusResponse::from_order(&updated)))
}
