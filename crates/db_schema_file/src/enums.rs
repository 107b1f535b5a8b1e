#[cfg(feature = "full")]
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  ExistingTypePath = "crate::schema::sql_types::DeliveryStatusEnum"
)]
#[cfg_attr(feature = "full", DbValueStyle = "verbatim")]
/// The fulfillment status of a delivery order.
///
/// The happy path advances one step at a time from `AssignedToCourier` to
/// `Delivered`. `ReadyForPickup` is the pre-courier condition a restaurant
/// assigns out of; `Delivered` and `Canceled` are terminal.
pub enum DeliveryStatus {
  /// Prepared by the restaurant, waiting for a courier assignment.
  #[default]
  ReadyForPickup,
  AssignedToCourier,
  EnRouteToRestaurant,
  ArrivedAtRestaurant,
  PickedUp,
  EnRouteToCustomer,
  ArrivedAtCustomer,
  /// Successful terminal state. Reaching it records an earnings entry.
  Delivered,
  /// Failure terminal state, reachable from any non-terminal state.
  Canceled,
}

impl DeliveryStatus {
  /// The only status a forward transition may move into from `self`.
  pub fn forward_successor(self) -> Option<DeliveryStatus> {
    use DeliveryStatus::*;
    match self {
      ReadyForPickup => Some(AssignedToCourier),
      AssignedToCourier => Some(EnRouteToRestaurant),
      EnRouteToRestaurant => Some(ArrivedAtRestaurant),
      ArrivedAtRestaurant => Some(PickedUp),
      PickedUp => Some(EnRouteToCustomer),
      EnRouteToCustomer => Some(ArrivedAtCustomer),
      ArrivedAtCustomer => Some(Delivered),
      Delivered | Canceled => None,
    }
  }

  pub fn is_terminal(self) -> bool {
    matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Canceled)
  }

  /// Position in the forward sequence. `Canceled` sits outside of it.
  pub fn sequence_position(self) -> Option<u8> {
    use DeliveryStatus::*;
    match self {
      ReadyForPickup => Some(0),
      AssignedToCourier => Some(1),
      EnRouteToRestaurant => Some(2),
      ArrivedAtRestaurant => Some(3),
      PickedUp => Some(4),
      EnRouteToCustomer => Some(5),
      ArrivedAtCustomer => Some(6),
      Delivered => Some(7),
      Canceled => None,
    }
  }
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  ExistingTypePath = "crate::schema::sql_types::PaymentStatusEnum"
)]
#[cfg_attr(feature = "full", DbValueStyle = "verbatim")]
/// Whether an earnings entry still counts towards the available balance.
pub enum PaymentStatus {
  /// Earned, not yet paid out. Counted in the available balance.
  #[default]
  Pending,
  /// Settled by an approved withdrawal.
  Paid,
}

#[derive(
  EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash,
)]
#[cfg_attr(feature = "full", derive(DbEnum))]
#[cfg_attr(
  feature = "full",
  ExistingTypePath = "crate::schema::sql_types::WithdrawStatusEnum"
)]
#[cfg_attr(feature = "full", DbValueStyle = "verbatim")]
/// Lifecycle of a withdrawal request. Both resolutions are terminal.
pub enum WithdrawStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

#[derive(EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// The party driving a status transition. Authorization of the identity
/// behind it is the auth collaborator's concern.
pub enum ActorRole {
  Courier,
  Restaurant,
}

#[derive(EnumString, Display, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
/// An approver's verdict on a withdrawal request.
pub enum WithdrawDecision {
  Approved,
  Rejected,
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn forward_chain_visits_every_status_once() {
    let mut status = DeliveryStatus::ReadyForPickup;
    let mut seen = vec![status];
    while let Some(next) = status.forward_successor() {
      status = next;
      seen.push(status);
    }
    assert_eq!(status, DeliveryStatus::Delivered);
    assert_eq!(seen.len(), 8);
    // Positions are dense and strictly increasing along the chain.
    for (expected, s) in seen.iter().enumerate() {
      assert_eq!(s.sequence_position(), Some(expected as u8));
    }
  }

  #[test]
  fn terminal_statuses_have_no_successor() {
    assert!(DeliveryStatus::Delivered.is_terminal());
    assert!(DeliveryStatus::Canceled.is_terminal());
    assert_eq!(DeliveryStatus::Delivered.forward_successor(), None);
    assert_eq!(DeliveryStatus::Canceled.forward_successor(), None);
    assert_eq!(DeliveryStatus::Canceled.sequence_position(), None);
  }
}
