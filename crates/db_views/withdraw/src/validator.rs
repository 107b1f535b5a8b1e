//! Validation for withdrawal submission and resolution requests.
use crate::api::{ResolveWithdrawRequest, SubmitWithdrawRequest};
use entrega_db_schema::newtypes::Coin;
use entrega_utils::error::{EntregaError, EntregaErrorType, EntregaResult};
use std::collections::HashSet;

pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 64;

pub fn validate_amount_positive(amount: Coin) -> EntregaResult<()> {
  if amount <= 0 {
    return Err(EntregaErrorType::AmountMustBePositive.into());
  }
  Ok(())
}

fn validate_idempotency_key(key: &str) -> EntregaResult<()> {
  if key.trim().is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LENGTH {
    return Err(EntregaErrorType::InvalidField("idempotencyKey".to_string()).into());
  }
  Ok(())
}

#[derive(Debug, Clone)]
pub struct ValidSubmitWithdrawRequest(pub SubmitWithdrawRequest);

impl TryFrom<SubmitWithdrawRequest> for ValidSubmitWithdrawRequest {
  type Error = EntregaError;

  fn try_from(value: SubmitWithdrawRequest) -> Result<Self, Self::Error> {
    validate_amount_positive(value.amount)?;
    if let Some(key) = &value.idempotency_key {
      validate_idempotency_key(key)?;
    }
    Ok(ValidSubmitWithdrawRequest(value))
  }
}

#[derive(Debug, Clone)]
pub struct ValidResolveWithdrawRequest(pub ResolveWithdrawRequest);

impl TryFrom<ResolveWithdrawRequest> for ValidResolveWithdrawRequest {
  type Error = EntregaError;

  fn try_from(value: ResolveWithdrawRequest) -> Result<Self, Self::Error> {
    if let Some(ids) = &value.entry_ids {
      if ids.is_empty() {
        return Err(EntregaErrorType::InvalidField("entryIds".to_string()).into());
      }
      let unique: HashSet<_> = ids.iter().collect();
      if unique.len() != ids.len() {
        return Err(EntregaErrorType::InvalidField("entryIds".to_string()).into());
      }
    }
    Ok(ValidResolveWithdrawRequest(value))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use entrega_db_schema::newtypes::EarningsEntryId;
  use entrega_db_schema_file::enums::WithdrawDecision;
  use pretty_assertions::assert_eq;

  #[test]
  fn amount_must_be_positive() {
    for amount in [0, -500] {
      let err = ValidSubmitWithdrawRequest::try_from(SubmitWithdrawRequest {
        amount: Coin(amount),
        idempotency_key: None,
      })
      .expect_err("non-positive amount");
      assert_eq!(err.error_type, EntregaErrorType::AmountMustBePositive);
    }
  }

  #[test]
  fn blank_or_oversized_idempotency_keys_are_rejected() {
    for key in [" ".to_string(), "k".repeat(MAX_IDEMPOTENCY_KEY_LENGTH + 1)] {
      let err = ValidSubmitWithdrawRequest::try_from(SubmitWithdrawRequest {
        amount: Coin(5000),
        idempotency_key: Some(key),
      })
      .expect_err("bad key");
      assert_eq!(
        err.error_type,
        EntregaErrorType::InvalidField("idempotencyKey".to_string())
      );
    }
  }

  #[test]
  fn resolution_selection_must_be_non_empty_and_unique() {
    let err = ValidResolveWithdrawRequest::try_from(ResolveWithdrawRequest {
      decision: WithdrawDecision::Approved,
      entry_ids: Some(vec![]),
    })
    .expect_err("empty selection");
    assert_eq!(
      err.error_type,
      EntregaErrorType::InvalidField("entryIds".to_string())
    );

    let err = ValidResolveWithdrawRequest::try_from(ResolveWithdrawRequest {
      decision: WithdrawDecision::Approved,
      entry_ids: Some(vec![EarningsEntryId(1), EarningsEntryId(1)]),
    })
    .expect_err("duplicated selection");
    assert_eq!(
      err.error_type,
      EntregaErrorType::InvalidField("entryIds".to_string())
    );
  }

  #[test]
  fn rejection_needs_no_selection() {
    let valid = ValidResolveWithdrawRequest::try_from(ResolveWithdrawRequest {
      decision: WithdrawDecision::Rejected,
      entry_ids: None,
    });
    assert!(valid.is_ok());
  }
}
