use crate::newtypes::{BankAccountId, CourierId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "full")]
use entrega_db_schema_file::schema::bank_account;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[cfg_attr(
  feature = "full",
  derive(diesel::Queryable, diesel::Selectable, diesel::Identifiable)
)]
#[cfg_attr(feature = "full", diesel(table_name = bank_account))]
#[cfg_attr(feature = "full", diesel(primary_key(id)))]
#[cfg_attr(feature = "full", diesel(check_for_backend(diesel::pg::Pg)))]
#[serde(rename_all = "camelCase")]
/// A courier's registered payout destination. Maintained by the
/// profile/banking collaborator; this core only reads it, and locks it to
/// serialize withdrawal submissions per courier.
pub struct BankAccount {
  pub id: BankAccountId,
  pub courier_id: CourierId,
  pub bank_name: String,
  pub account_number: String,
  pub account_holder: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, derive_new::new, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(diesel::Insertable, diesel::AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = bank_account))]
pub struct BankAccountInsertForm {
  pub courier_id: CourierId,
  pub bank_name: String,
  pub account_number: String,
  pub account_holder: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "full", derive(diesel::AsChangeset))]
#[cfg_attr(feature = "full", diesel(table_name = bank_account))]
#[serde(rename_all = "camelCase")]
pub struct BankAccountUpdateForm {
  pub bank_name: Option<String>,
  pub account_number: Option<String>,
  pub account_holder: Option<String>,
  pub updated_at: Option<DateTime<Utc>>,
}
