use crate::{
  newtypes::{BankAccountId, CourierId},
  source::bank_account::{BankAccount, BankAccountInsertForm, BankAccountUpdateForm},
  traits::Crud,
  utils::{get_conn, DbPool},
};
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use entrega_db_schema_file::schema::bank_account;
use entrega_utils::error::{EntregaErrorExt, EntregaErrorType, EntregaResult};

impl Crud for BankAccount {
  type InsertForm = BankAccountInsertForm;
  type UpdateForm = BankAccountUpdateForm;
  type IdType = BankAccountId;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::insert_into(bank_account::table)
      .values(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntCreateBankAccount)
  }

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    bank_account::table
      .find(id)
      .first::<Self>(conn)
      .await
      .map_err(Into::into)
  }

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> EntregaResult<Self> {
    let conn = &mut get_conn(pool).await?;
    diesel::update(bank_account::table.find(id))
      .set(form)
      .get_result::<Self>(conn)
      .await
      .with_entrega_type(EntregaErrorType::CouldntUpdateBankAccount)
  }
}

impl BankAccount {
  pub async fn get_by_courier(
    pool: &mut DbPool<'_>,
    courier_id: CourierId,
  ) -> EntregaResult<Option<Self>> {
    let conn = &mut get_conn(pool).await?;
    bank_account::table
      .filter(bank_account::courier_id.eq(courier_id))
      .first::<Self>(conn)
      .await
      .optional()
      .with_entrega_type(EntregaErrorType::CouldntFindBankAccount)
  }

  /// Loads the courier's payout destination with a row lock on the caller's
  /// transaction connection. Besides providing the banking snapshot, this
  /// row is the serialization point for a courier's withdrawal submissions.
  pub async fn lock_for_courier(
    conn: &mut AsyncPgConnection,
    courier_id: CourierId,
  ) -> EntregaResult<Option<Self>> {
    bank_account::table
      .filter(bank_account::courier_id.eq(courier_id))
      .for_update()
      .first::<Self>(conn)
      .await
      .optional()
      .with_entrega_type(EntregaErrorType::CouldntFindBankAccount)
  }
}
