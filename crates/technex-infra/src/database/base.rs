use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityName, EntityTrait, IntoActiveModel,
    PaginatorTrait, PrimaryKeyTrait, QueryOrder, QuerySelect, SqlErr,
};

use technex_core::domain::PageRequest;
use technex_core::error::RepoError;
use technex_core::ports::BaseRepository;

/// Per-table facts the generic repository needs.
pub trait Table: EntityTrait {
    /// Public message for a unique constraint violation on this table.
    const DUPLICATE_MESSAGE: &'static str;

    fn created_at() -> Self::Column;

    fn id() -> Self::Column;
}

/// Generic SeaORM repository over one table.
pub struct SqlRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> SqlRepository<E>
where
    E: Table,
    E::Model: Sync,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Every row, newest first.
    pub(crate) async fn all_newest_first(&self) -> Result<Vec<E::Model>, RepoError> {
        E::find()
            .order_by_desc(E::created_at())
            .order_by_desc(E::id())
            .all(&self.db)
            .await
            .map_err(classify::<E>)
    }

    /// One page of rows, newest first, plus the table's row count.
    pub(crate) async fn page(
        &self,
        request: PageRequest,
    ) -> Result<(Vec<E::Model>, u64), RepoError> {
        let total = E::find().count(&self.db).await.map_err(classify::<E>)?;

        let rows = E::find()
            .order_by_desc(E::created_at())
            .order_by_desc(E::id())
            .offset(request.offset())
            .limit(request.limit)
            .all(&self.db)
            .await
            .map_err(classify::<E>)?;

        Ok((rows, total))
    }

    pub(crate) async fn delete_by_id(&self, id: i32) -> Result<(), RepoError>
    where
        E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(classify::<E>)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl<E, T, N> BaseRepository<T, N> for SqlRepository<E>
where
    E: Table,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + From<N> + Send,
    N: Send + 'static,
    T: TryFrom<E::Model> + Send + 'static,
    RepoError: From<<T as TryFrom<E::Model>>::Error>,
{
    async fn create(&self, new: N) -> Result<T, RepoError> {
        let model = E::ActiveModel::from(new)
            .insert(&self.db)
            .await
            .map_err(classify::<E>)?;

        Ok(T::try_from(model)?)
    }
}

/// Map a store error onto the repository taxonomy. Unique violations are
/// read from the backend-neutral signal first, with a message sniff as a
/// fallback for drivers that do not classify them.
pub(crate) fn classify<E: Table>(err: DbErr) -> RepoError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        tracing::debug!(table = E::default().table_name(), %detail, "Unique constraint violated");
        return RepoError::Duplicate(E::DUPLICATE_MESSAGE.to_string());
    }

    let text = err.to_string();
    let lowered = text.to_lowercase();
    if lowered.contains("unique constraint") || lowered.contains("duplicate key") {
        return RepoError::Duplicate(E::DUPLICATE_MESSAGE.to_string());
    }

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(text),
        _ => RepoError::Query(text),
    }
}
