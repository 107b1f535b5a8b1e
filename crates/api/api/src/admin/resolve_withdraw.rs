use actix_web::web::{Data, Json, Path};
use entrega_api_utils::context::EntregaContext;
use entrega_db_schema::{newtypes::WithdrawRequestId, source::withdraw_request::WithdrawRequest};
use entrega_db_views_withdraw::{
  api::{ResolveWithdrawRequest, WithdrawRequestResponse},
  validator::ValidResolveWithdrawRequest,
};
use entrega_utils::error::EntregaResult;

/// POST /api/v1/admin/withdrawals/{request_id}/resolve
///
/// Resolves a pending withdrawal. Approval settles the matched pending
/// earnings atomically with the status write; rejection leaves the ledger
/// untouched, so the amount becomes requestable again. The approver role is
/// enforced by the out-of-scope auth collaborator.
pub async fn resolve_withdraw(
  path: Path<WithdrawRequestId>,
  data: Json<ResolveWithdrawRequest>,
  context: Data<EntregaContext>,
) -> EntregaResult<Json<WithdrawRequestResponse>> {
  let request_id = path.into_inner();
  let validated: ValidResolveWithdrawRequest = data.into_inner().try_into()?;

  let resolved = WithdrawRequest::resolve(
    &mut context.pool(),
    request_id,
    validated.0.decision,
    validated.0.entry_ids,
  )
  .await?;

  Ok(Json(WithdrawRequestResponse::from_request(&resolved)))
}
