//! Core traits for entities and models.
//!
//! Following SeaORM's split, an *entity* is a zero-sized type that names a table
//! and its behavior, and a *model* is a row decoded from that table.

use crate::query::select::SelectQuery;
use crate::soft_delete::DeletionStrategy;
use may_postgres::types::ToSql;
use may_postgres::Row;
use sea_query::Value;

/// Trait for types that can be created from a database row
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, may_postgres::Error>;
}

/// A storage-mapped entity.
///
/// `Deletion` decides how rows of this entity disappear: [`HardDelete`] for plain
/// tables, [`SoftDeleted`] for tables with a nullable `deleted_at` column. The
/// visibility filter reads it from every entity a query targets.
///
/// [`HardDelete`]: crate::soft_delete::HardDelete
/// [`SoftDeleted`]: crate::soft_delete::SoftDeleted
///
/// # Example
///
/// ```
/// use lifeguard_softdelete::{FromRow, LifeModelTrait, ModelTrait, SoftDeleted};
/// use chrono::NaiveDateTime;
///
/// pub struct Account;
///
/// pub struct AccountModel {
///     pub id: i64,
///     pub name: String,
///     pub deleted_at: Option<NaiveDateTime>,
/// }
///
/// impl LifeModelTrait for Account {
///     const TABLE_NAME: &'static str = "account";
///     type Model = AccountModel;
///     type PrimaryKey = i64;
///     type Deletion = SoftDeleted;
/// }
///
/// impl ModelTrait for AccountModel {
///     type Entity = Account;
///     fn primary_key_value(&self) -> i64 {
///         self.id
///     }
/// }
///
/// impl FromRow for AccountModel {
///     fn from_row(row: &may_postgres::Row) -> Result<Self, may_postgres::Error> {
///         Ok(Self {
///             id: row.try_get("id")?,
///             name: row.try_get("name")?,
///             deleted_at: row.try_get("deleted_at")?,
///         })
///     }
/// }
/// ```
pub trait LifeModelTrait: Sized + 'static {
    /// Table the entity is stored in
    const TABLE_NAME: &'static str;

    /// Primary key column
    const PRIMARY_KEY: &'static str = "id";

    /// Row type returned by queries against this entity
    type Model: ModelTrait<Entity = Self> + FromRow;

    /// Rust type of the primary key column
    type PrimaryKey: Into<Value> + ToSql + Sync + Send + Clone + 'static;

    /// Hard or soft delete
    type Deletion: DeletionStrategy;

    /// Start a SELECT over this entity's table
    fn find() -> SelectQuery<Self> {
        SelectQuery::new()
    }
}

/// A decoded row that knows its entity and primary key.
pub trait ModelTrait: Sized {
    type Entity: LifeModelTrait<Model = Self>;

    fn primary_key_value(&self) -> <Self::Entity as LifeModelTrait>::PrimaryKey;
}
