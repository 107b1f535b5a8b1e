use crate::api::{CourierBalanceResponse, EarningsSummary, EarningsWindow};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use entrega_db_schema::{
  newtypes::CourierId,
  source::earnings_entry::EarningsEntry,
  utils::DbPool,
};
use entrega_utils::error::{EntregaErrorType, EntregaResult};

impl EarningsWindow {
  /// Resolves the window to a `[from, to)` range of `created_at` values.
  /// Calendar windows are computed in UTC: the current day, the current ISO
  /// week (starting Monday) and the current month, each up to `now`.
  pub fn bounds(&self, now: DateTime<Utc>) -> EntregaResult<(DateTime<Utc>, DateTime<Utc>)> {
    fn day_start(date: NaiveDate) -> DateTime<Utc> {
      date.and_time(NaiveTime::MIN).and_utc()
    }

    match self {
      EarningsWindow::Today => Ok((day_start(now.date_naive()), now)),
      EarningsWindow::Week => {
        let monday = now.date_naive().week(Weekday::Mon).first_day();
        Ok((day_start(monday), now))
      }
      EarningsWindow::Month => {
        let first = now
          .date_naive()
          .with_day(1)
          .ok_or(EntregaErrorType::InvalidTimeWindow)?;
        Ok((day_start(first), now))
      }
      EarningsWindow::Custom { start, end } => {
        if start > end {
          return Err(EntregaErrorType::InvalidTimeWindow.into());
        }
        Ok((*start, *end))
      }
    }
  }
}

impl EarningsSummary {
  /// Pure fold over ledger entries; the window filter happens in the query.
  pub fn from_entries(entries: &[EarningsEntry]) -> Self {
    let mut summary = EarningsSummary {
      delivery_count: entries.len() as i64,
      ..Default::default()
    };
    for entry in entries {
      summary.total_earned += entry.total();
      summary.base_total += entry.base_amount;
      summary.tip_total += entry.tip;
      summary.bonus_total += entry.bonus;
      summary.deduction_total += entry.deduction;
    }
    summary
  }
}

pub struct CourierBalanceView;

impl CourierBalanceView {
  /// The authoritative balance read: the available balance is derived from
  /// the pending entries at query time, never from a stored figure, and the
  /// summary aggregates every entry whose `created_at` falls in the window.
  pub async fn read(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
    window: &EarningsWindow,
  ) -> EntregaResult<CourierBalanceResponse> {
    let (from, to) = window.bounds(Utc::now())?;

    let pending = EarningsEntry::pending_for_courier(pool, courier_id, None, None).await?;
    let in_window = EarningsEntry::for_courier_in_window(pool, courier_id, from, to).await?;

    Ok(CourierBalanceResponse {
      courier_id,
      available_balance: EarningsEntry::ledger_total(&pending),
      summary: EarningsSummary::from_entries(&in_window),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use entrega_db_schema::newtypes::{Coin, EarningsEntryId, OrderId};
  use entrega_db_schema_file::enums::PaymentStatus;
  use pretty_assertions::assert_eq;

  fn utc(s: &str) -> DateTime<Utc> {
    s.parse().expect("valid rfc3339 timestamp")
  }

  fn entry(id: i32, base: i64, tip: i64, bonus: i64, deduction: i64) -> EarningsEntry {
    EarningsEntry {
      id: EarningsEntryId(id),
      order_id: OrderId(id),
      courier_id: CourierId(7),
      base_amount: Coin(base),
      tip: Coin(tip),
      bonus: Coin(bonus),
      deduction: Coin(deduction),
      distance_km: None,
      duration_minutes: None,
      payment_status: PaymentStatus::Pending,
      created_at: utc("2026-08-05T10:00:00Z"),
    }
  }

  #[test]
  fn today_starts_at_midnight_utc() -> EntregaResult<()> {
    let now = utc("2026-08-05T15:30:00Z");
    let (from, to) = EarningsWindow::Today.bounds(now)?;
    assert_eq!(from, utc("2026-08-05T00:00:00Z"));
    assert_eq!(to, now);
    Ok(())
  }

  #[test]
  fn week_starts_on_monday() -> EntregaResult<()> {
    // 2026-08-05 is a Wednesday.
    let now = utc("2026-08-05T15:30:00Z");
    let (from, to) = EarningsWindow::Week.bounds(now)?;
    assert_eq!(from, utc("2026-08-03T00:00:00Z"));
    assert_eq!(to, now);
    Ok(())
  }

  #[test]
  fn month_starts_on_the_first() -> EntregaResult<()> {
    let now = utc("2026-08-05T15:30:00Z");
    let (from, to) = EarningsWindow::Month.bounds(now)?;
    assert_eq!(from, utc("2026-08-01T00:00:00Z"));
    assert_eq!(to, now);
    Ok(())
  }

  #[test]
  fn custom_window_is_passed_through() -> EntregaResult<()> {
    let start = utc("2026-07-01T00:00:00Z");
    let end = utc("2026-07-15T00:00:00Z");
    let (from, to) = EarningsWindow::Custom { start, end }.bounds(utc("2026-08-05T15:30:00Z"))?;
    assert_eq!((from, to), (start, end));
    Ok(())
  }

  #[test]
  fn inverted_custom_window_is_rejected() {
    let window = EarningsWindow::Custom {
      start: utc("2026-07-15T00:00:00Z"),
      end: utc("2026-07-01T00:00:00Z"),
    };
    let err = window
      .bounds(utc("2026-08-05T15:30:00Z"))
      .expect_err("inverted window");
    assert_eq!(err.error_type, EntregaErrorType::InvalidTimeWindow);
  }

  #[test]
  fn summary_folds_every_component() {
    let entries = vec![
      entry(1, 3000, 500, 0, 0),
      entry(2, 1250, 0, 200, 150),
      entry(3, 800, 0, 0, 0),
    ];
    let summary = EarningsSummary::from_entries(&entries);
    assert_eq!(
      summary,
      EarningsSummary {
        total_earned: Coin(5600),
        delivery_count: 3,
        base_total: Coin(5050),
        tip_total: Coin(500),
        bonus_total: Coin(200),
        deduction_total: Coin(150),
      }
    );
  }

  #[test]
  fn empty_window_folds_to_zero() {
    assert_eq!(EarningsSummary::from_entries(&[]), EarningsSummary::default());
  }
}
