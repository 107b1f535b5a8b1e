use actix_web::web::{Data, Json, Path};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::{newtypes::CourierId, source::withdraw_request::WithdrawRequest};
use entrega_db_views_withdraw::{
  api::{ListWithdrawRequestsResponse, SubmitWithdrawRequest, WithdrawRequestResponse},
  validator::ValidSubmitWithdrawRequest,
};
use entrega_utils::error::EntregaResult;

/// POST /api/v1/couriers/{courier_id}/withdrawals
///
/// Submits a withdrawal request bounded by the courier's live available
/// balance, snapshotting the registered payout destination. Nothing is
/// stored when validation fails.
pub async fn submit_withdraw(
  path: Path<CourierId>,
  data: Json<SubmitWithdrawRequest>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<WithdrawRequestResponse>> {
  let courier_id = path.into_inner();
  let validated: ValidSubmitWithdrawRequest = data.into_inner().try_into()?;

  let created = WithdrawRequest::submit(
    &mut context.pool(),
    courier_id,
    validated.0.amount,
    validated.0.idempotency_key,
  )
  .await?;

  Ok(Json(WithdrawRequestResponse::from_request(&created)))
}

/// GET /api/v1/couriers/{courier_id}/withdrawals
pub async fn list_withdraw_requests(
  path: Path<CourierId>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<ListWithdrawRequestsResponse>> {
  let courier_id = path.into_inner();
  let requests = WithdrawRequest::list_for_courier(&mut context.pool(), courier_id).await?;

  Ok(Json(ListWithdrawRequestsResponse {
    requests: requests
      .iter()
      .map(WithdrawRequestResponse::from_request)
      .collect(),
  }))
}
