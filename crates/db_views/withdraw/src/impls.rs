use crate::api::WithdrawRequestResponse;
use entrega_db_schema::source::withdraw_request::WithdrawRequest;

impl WithdrawRequestResponse {
  pub fn from_request(request: &WithdrawRequest) -> Self {
    WithdrawRequestResponse {
      id: request.id,
      courier_id: request.courier_id,
      amount: request.amount,
      status: request.status,
      bank_name: request.bank_name.clone(),
      bank_account_number: request.bank_account_number.clone(),
      bank_account_holder: request.bank_account_holder.clone(),
      created_at: request.created_at,
      resolved_at: request.resolved_at,
    }
  }
}
