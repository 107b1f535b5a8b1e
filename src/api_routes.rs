use actix_web::web::{get, post, put, scope, ServiceConfig};
use entrega_api::{
  admin::resolve_withdraw::resolve_withdraw,
  courier::{
    balance::get_courier_balance,
    withdraw::{list_withdraw_requests, submit_withdraw},
  },
  delivery::{assign::assign_courier, status::update_delivery_status},
};

pub fn config(cfg: &mut ServiceConfig) {
  cfg.service(
    scope("/api/v1")
      .service(
        scope("/deliveries")
          .route("/{order_id}/assign", post().to(assign_courier))
          .route("/{order_id}/status", put().to(update_delivery_status)),
      )
      .service(
        scope("/couriers")
          .route("/{courier_id}/balance", get().to(get_courier_balance))
          .route("/{courier_id}/withdrawals", post().to(submit_withdraw))
          .route("/{courier_id}/withdrawals", get().to(list_withdraw_requests)),
      )
      .service(
        scope("/admin")
          .route("/withdrawals/{request_id}/resolve", post().to(resolve_withdraw)),
      ),
  );
}
