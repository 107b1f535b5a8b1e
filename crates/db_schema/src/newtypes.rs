use serde::{Deserialize, Serialize};
use std::{
  cmp::Ordering,
  fmt,
  iter::Sum,
  ops::{Add, AddAssign, Neg, Sub, SubAssign},
};
#[cfg(feature = "full")]
use diesel_derive_newtype::DieselNewType;

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The delivery order id.
pub struct OrderId(pub i32);

impl fmt::Display for OrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The courier id.
pub struct CourierId(pub i32);

impl fmt::Display for CourierId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The restaurant id.
pub struct RestaurantId(pub i32);

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The customer id.
pub struct CustomerId(pub i32);

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The earnings entry id.
pub struct EarningsEntryId(pub i32);

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The withdrawal request id.
pub struct WithdrawRequestId(pub i32);

impl fmt::Display for WithdrawRequestId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// The bank account id.
pub struct BankAccountId(pub i32);

#[derive(
  Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[cfg_attr(feature = "full", derive(DieselNewType))]
/// A monetary amount in centavos. Money never touches floating point.
pub struct Coin(pub i64);

impl PartialEq<i64> for Coin {
  #[inline]
  fn eq(&self, other: &i64) -> bool {
    self.0 == *other
  }
}

impl PartialOrd<i64> for Coin {
  #[inline]
  fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
    self.0.partial_cmp(other)
  }
}

impl Add for Coin {
  type Output = Coin;
  #[inline]
  fn add(self, rhs: Coin) -> Coin {
    Coin(self.0 + rhs.0)
  }
}

impl Sub for Coin {
  type Output = Coin;
  #[inline]
  fn sub(self, rhs: Coin) -> Coin {
    Coin(self.0 - rhs.0)
  }
}

impl AddAssign for Coin {
  #[inline]
  fn add_assign(&mut self, rhs: Coin) {
    self.0 += rhs.0;
  }
}

impl SubAssign for Coin {
  #[inline]
  fn sub_assign(&mut self, rhs: Coin) {
    self.0 -= rhs.0;
  }
}

impl Neg for Coin {
  type Output = Coin;
  #[inline]
  fn neg(self) -> Coin {
    Coin(-self.0)
  }
}

impl Sum for Coin {
  fn sum<I: Iterator<Item = Coin>>(iter: I) -> Coin {
    iter.fold(Coin(0), Add::add)
  }
}

impl fmt::Display for Coin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
