//! Query building and execution for entities.
//!
//! - **Traits**: entity and model traits (`LifeModelTrait`, `ModelTrait`, `FromRow`)
//! - **Select**: SELECT query builder (`SelectQuery`) with its filter targets and options
//! - **Execution**: `all`, `first`, `count` through a [`Session`](crate::session::Session)
//! - **Value Conversion**: SeaQuery `Value` to `ToSql` parameter conversion

pub mod traits;
#[doc(inline)]
pub use traits::{FromRow, LifeModelTrait, ModelTrait};

pub(crate) mod value_conversion;

pub mod select;
#[doc(inline)]
pub use select::{ExecutionOptions, QueryJoin, SelectQuery, TargetEntity};

pub mod execution;
