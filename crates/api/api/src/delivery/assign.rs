use actix_web::web::{Data, Json, Path};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::{
  newtypes::{OrderId, RestaurantId},
  source::order::{Actor, Order},
};
use entrega_db_views_delivery::api::{AssignCourierRequest, OrderStatusResponse};
use entrega_utils::error::EntregaResult;

/// POST /api/v1/deliveries/{order_id}/assign
///
/// Assigns a courier to an order that is ready for pickup and moves it into
/// `AssignedToCourier`. Only the restaurant the order belongs to may assign.
/// Repeating the same assignment is a no-op success.
pub async fn assign_courier(
  path: Path<OrderId>,
  data: Json<AssignCourierRequest>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<OrderStatusResponse>> {
  let order_id = path.into_inner();
  let request = data.into_inner();

  let actor = Actor::Restaurant(RestaurantId(request.actor_id));
  let updated =
    Order::assign_courier(&mut context.pool(), order_id, actor, request.courier_id).await?;

  tracing::debug!(
    order_id = %updated.id,
    courier_id = %request.courier_id,
    "courier assigned to delivery order"
  );
  Ok(Json(OrderStatusResponse::from_order(&updated)))
}
