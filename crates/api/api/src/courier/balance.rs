use actix_web::web::{Data, Json, Path, Query};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::newtypes::CourierId;
use entrega_db_views_earnings::{
  api::{CourierBalanceResponse, GetCourierBalanceQuery},
  impls::CourierBalanceView,
  validator::ValidBalanceQuery,
};
use entrega_utils::error::EntregaResult;

/// GET /api/v1/couriers/{courier_id}/balance
///
/// Returns the courier's live available balance (pending earnings only) and
/// an earnings summary over the requested window.
pub async fn get_courier_balance(
  path: Path<CourierId>,
  query: Query<GetCourierBalanceQuery>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<CourierBalanceResponse>> {
  let courier_id = path.into_inner();
  let validated: ValidBalanceQuery = query.into_inner().try_into()?;

  let response = CourierBalanceView::read(&mut context.pool(), courier_id, &validated.0).await?;
  Ok(Json(response))
}
