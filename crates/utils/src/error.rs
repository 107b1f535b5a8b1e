use cfg_if::cfg_if;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use strum::{Display, EnumIter};

#[derive(Display, Debug, Serialize, Deserialize, Clone, PartialEq, Eq, EnumIter, Hash)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
#[non_exhaustive]
pub enum EntregaErrorType {
  // Delivery state machine
  /// The requested target status is not reachable from the order's current status.
  InvalidTransition,
  /// The acting party is not allowed to drive this transition.
  Unauthorized,
  /// The order already moved past the status the caller acted on; refresh and retry.
  StaleOrderState,
  ReasonIsRequiredWhenCancelling,
  CourierNotAssigned,
  // Earnings ledger
  /// An earnings entry already exists for this order.
  DuplicateEarning,
  /// One or more earnings entries were already marked paid.
  AlreadySettled,
  // Payout workflow
  MissingPayoutDestination,
  InsufficientBalance,
  /// The withdrawal was already approved or rejected.
  AlreadyResolved,
  /// No set of pending earnings entries matches the approved amount exactly.
  SettlementSelectionMismatch,
  AmountMustBePositive,
  InvalidTimeWindow,
  // Persistence
  NotFound,
  DatabaseError,
  CouldntConnectDatabase,
  CouldntCreateOrder,
  CouldntUpdateOrder,
  CouldntCreateEarningsEntry,
  CouldntCreateWithdrawRequest,
  CouldntUpdateWithdrawRequest,
  CouldntFindBankAccount,
  CouldntCreateBankAccount,
  CouldntUpdateBankAccount,
  InvalidField(String),
  Unknown(String),
}

cfg_if! {
  if #[cfg(feature = "full")] {

    use std::{fmt, backtrace::Backtrace};
    pub type EntregaResult<T> = Result<T, EntregaError>;

    pub struct EntregaError {
      pub error_type: EntregaErrorType,
      pub inner: anyhow::Error,
      pub context: Backtrace,
    }

    impl<T> From<T> for EntregaError
    where
      T: Into<anyhow::Error>,
    {
      fn from(t: T) -> Self {
        let cause = t.into();
        let error_type = match cause.downcast_ref::<diesel::result::Error>() {
          Some(&diesel::NotFound) => EntregaErrorType::NotFound,
          _ => EntregaErrorType::Unknown(format!("{}", &cause)),
        };
        EntregaError {
          error_type,
          inner: cause,
          context: Backtrace::capture(),
        }
      }
    }

    impl Debug for EntregaError {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntregaError")
         .field("message", &self.error_type)
         .field("inner", &self.inner)
         .field("context", &self.context)
         .finish()
      }
    }

    impl fmt::Display for EntregaError {
      fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: ", &self.error_type)?;
        writeln!(f, "{}", self.inner)?;
        fmt::Display::fmt(&self.context, f)
      }
    }

    impl actix_web::error::ResponseError for EntregaError {
      fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self.error_type {
          EntregaErrorType::NotFound => StatusCode::NOT_FOUND,
          EntregaErrorType::Unauthorized => StatusCode::FORBIDDEN,
          // The caller acted on an outdated view; a refresh plus an explicit
          // resubmission is the only safe recovery.
          EntregaErrorType::StaleOrderState
          | EntregaErrorType::AlreadySettled
          | EntregaErrorType::AlreadyResolved
          | EntregaErrorType::DuplicateEarning => StatusCode::CONFLICT,
          _ => StatusCode::BAD_REQUEST,
        }
      }

      fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(&self.error_type)
      }
    }

    impl From<EntregaErrorType> for EntregaError {
      fn from(error_type: EntregaErrorType) -> Self {
        let inner = anyhow::anyhow!("{}", error_type);
        EntregaError {
          error_type,
          inner,
          context: Backtrace::capture(),
        }
      }
    }

    pub trait EntregaErrorExt<T, E: Into<anyhow::Error>> {
      fn with_entrega_type(self, error_type: EntregaErrorType) -> EntregaResult<T>;
    }

    impl<T, E: Into<anyhow::Error>> EntregaErrorExt<T, E> for Result<T, E> {
      fn with_entrega_type(self, error_type: EntregaErrorType) -> EntregaResult<T> {
        self.map_err(|error| EntregaError {
          error_type,
          inner: error.into(),
          context: Backtrace::capture(),
        })
      }
    }

    pub trait EntregaErrorExt2<T> {
      fn with_entrega_type(self, error_type: EntregaErrorType) -> EntregaResult<T>;
      fn into_anyhow(self) -> Result<T, anyhow::Error>;
    }

    impl<T> EntregaErrorExt2<T> for EntregaResult<T> {
      fn with_entrega_type(self, error_type: EntregaErrorType) -> EntregaResult<T> {
        self.map_err(|mut e| {
          e.error_type = error_type;
          e
        })
      }
      // this function can't be an impl From or similar because it would conflict with one of the
      // other broad Into<> implementations
      fn into_anyhow(self) -> Result<T, anyhow::Error> {
        self.map_err(|e| e.inner)
      }
    }

    #[cfg(test)]
    mod tests {
      #![allow(clippy::indexing_slicing)]
      use super::*;
      use actix_web::{body::MessageBody, ResponseError};
      use pretty_assertions::assert_eq;

      #[test]
      fn deserializes_no_message() -> EntregaResult<()> {
        let err = EntregaError::from(EntregaErrorType::StaleOrderState).error_response();
        let json = String::from_utf8(err.into_body().try_into_bytes().unwrap_or_default().to_vec())?;
        assert_eq!(&json, "{\"error\":\"stale_order_state\"}");

        Ok(())
      }

      #[test]
      fn deserializes_with_message() -> EntregaResult<()> {
        let invalid = EntregaErrorType::InvalidField(String::from("amount"));
        let err = EntregaError::from(invalid).error_response();
        let json = String::from_utf8(err.into_body().try_into_bytes().unwrap_or_default().to_vec())?;
        assert_eq!(&json, "{\"error\":\"invalid_field\",\"message\":\"amount\"}");

        Ok(())
      }

      #[test]
      fn test_convert_diesel_errors() {
        let not_found_error = EntregaError::from(diesel::NotFound);
        assert_eq!(EntregaErrorType::NotFound, not_found_error.error_type);
        assert_eq!(404, not_found_error.status_code().as_u16());

        let other_error = EntregaError::from(diesel::result::Error::NotInTransaction);
        assert!(matches!(other_error.error_type, EntregaErrorType::Unknown { .. }));
        assert_eq!(400, other_error.status_code().as_u16());
      }

      #[test]
      fn conflict_class_errors_map_to_409() {
        for e in [
          EntregaErrorType::StaleOrderState,
          EntregaErrorType::AlreadySettled,
          EntregaErrorType::AlreadyResolved,
          EntregaErrorType::DuplicateEarning,
        ] {
          assert_eq!(409, EntregaError::from(e).status_code().as_u16());
        }
      }
    }
  }
}
