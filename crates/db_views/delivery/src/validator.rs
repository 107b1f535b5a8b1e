//! Validation for delivery transition requests.
use crate::api::TransitionOrderRequest;
use entrega_db_schema_file::enums::DeliveryStatus;
use entrega_utils::error::{EntregaError, EntregaErrorType};

#[derive(Debug, Clone)]
pub struct ValidTransitionOrderRequest(pub TransitionOrderRequest);

impl TryFrom<TransitionOrderRequest> for ValidTransitionOrderRequest {
  type Error = EntregaError;

  fn try_from(value: TransitionOrderRequest) -> Result<Self, Self::Error> {
    if value.status == DeliveryStatus::Canceled
      && value.reason.as_ref().map_or(true, |r| r.trim().is_empty())
    {
      return Err(EntregaErrorType::ReasonIsRequiredWhenCancelling.into());
    }
    if value.distance_km.is_some_and(|d| !d.is_finite() || d < 0.0) {
      return Err(EntregaErrorType::InvalidField("distanceKm".to_string()).into());
    }
    if value.duration_minutes.is_some_and(|d| d < 0) {
      return Err(EntregaErrorType::InvalidField("durationMinutes".to_string()).into());
    }
    Ok(ValidTransitionOrderRequest(value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use entrega_db_schema_file::enums::ActorRole;
  use pretty_assertions::assert_eq;

  fn request(status: DeliveryStatus, reason: Option<&str>) -> TransitionOrderRequest {
    TransitionOrderRequest {
      actor_id: 7,
      actor_role: ActorRole::Courier,
      status,
      reason: reason.map(String::from),
      distance_km: None,
      duration_minutes: None,
    }
  }

  fn error_of(req: TransitionOrderRequest) -> Option<EntregaErrorType> {
    ValidTransitionOrderRequest::try_from(req)
      .err()
      .map(|e| e.error_type)
  }

  #[test]
  fn cancelling_requires_a_reason() {
    assert_eq!(
      error_of(request(DeliveryStatus::Canceled, None)),
      Some(EntregaErrorType::ReasonIsRequiredWhenCancelling)
    );
    assert_eq!(
      error_of(request(DeliveryStatus::Canceled, Some("   "))),
      Some(EntregaErrorType::ReasonIsRequiredWhenCancelling)
    );
    assert_eq!(
      error_of(request(DeliveryStatus::Canceled, Some("customer unreachable"))),
      None
    );
  }

  #[test]
  fn forward_transitions_need_no_reason() {
    assert_eq!(error_of(request(DeliveryStatus::PickedUp, None)), None);
  }

  #[test]
  fn negative_metrics_are_rejected() {
    let mut req = request(DeliveryStatus::Delivered, None);
    req.distance_km = Some(-1.0);
    assert_eq!(
      error_of(req),
      Some(EntregaErrorType::InvalidField("distanceKm".to_string()))
    );

    let mut req = request(DeliveryStatus::Delivered, None);
    req.duration_minutes = Some(-5);
    assert_eq!(
      error_of(req),
      Some(EntregaErrorType::InvalidField("durationMinutes".to_string()))
    );
  }
}
