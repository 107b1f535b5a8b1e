//! Validation for balance queries.
use crate::api::{EarningsWindow, GetCourierBalanceQuery, WindowKind};
use entrega_utils::error::{EntregaError, EntregaErrorType};

#[derive(Debug, Clone, Copy)]
pub struct ValidBalanceQuery(pub EarningsWindow);

impl TryFrom<GetCourierBalanceQuery> for ValidBalanceQuery {
  type Error = EntregaError;

  fn try_from(value: GetCourierBalanceQuery) -> Result<Self, Self::Error> {
    let window = match value.window.unwrap_or_default() {
      WindowKind::Today => EarningsWindow::Today,
      WindowKind::Week => EarningsWindow::Week,
      WindowKind::Month => EarningsWindow::Month,
      WindowKind::Custom => {
        let (Some(start), Some(end)) = (value.start, value.end) else {
          return Err(EntregaErrorType::InvalidTimeWindow.into());
        };
        if start > end {
          return Err(EntregaErrorType::InvalidTimeWindow.into());
        }
        EarningsWindow::Custom { start, end }
      }
    };
    Ok(ValidBalanceQuery(window))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn window_defaults_to_today() {
    let valid = ValidBalanceQuery::try_from(GetCourierBalanceQuery::default())
      .expect("default query is valid");
    assert_eq!(valid.0, EarningsWindow::Today);
  }

  #[test]
  fn custom_requires_both_bounds() {
    let query = GetCourierBalanceQuery {
      window: Some(WindowKind::Custom),
      start: Some("2026-07-01T00:00:00Z".parse().expect("timestamp")),
      end: None,
    };
    let err = ValidBalanceQuery::try_from(query).expect_err("missing end");
    assert_eq!(err.error_type, EntregaErrorType::InvalidTimeWindow);
  }

  #[test]
  fn custom_bounds_must_be_ordered() {
    let query = GetCourierBalanceQuery {
      window: Some(WindowKind::Custom),
      start: Some("2026-07-15T00:00:00Z".parse().expect("timestamp")),
      end: Some("2026-07-01T00:00:00Z".parse().expect("timestamp")),
    };
    let err = ValidBalanceQuery::try_from(query).expect_err("inverted bounds");
    assert_eq!(err.error_type, EntregaErrorType::InvalidTimeWindow);
  }
}
