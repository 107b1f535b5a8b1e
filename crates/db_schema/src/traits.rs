use crate::utils::DbPool;
use entrega_utils::error::EntregaResult;

/// Form-based create / read / update, implemented per table.
#[allow(async_fn_in_trait)]
pub trait Crud: Sized {
  type InsertForm;
  type UpdateForm;
  type IdType;

  async fn create(pool: &mut DbPool<'_>, form: &Self::InsertForm) -> EntregaResult<Self>;

  async fn read(pool: &mut DbPool<'_>, id: Self::IdType) -> EntregaResult<Self>;

  async fn update(
    pool: &mut DbPool<'_>,
    id: Self::IdType,
    form: &Self::UpdateForm,
  ) -> EntregaResult<Self>;
}
