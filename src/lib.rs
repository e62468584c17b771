//! # Lifeguard soft delete
//!
//! Soft delete for Lifeguard entities on PostgreSQL: rows are stamped in a nullable
//! `deleted_at` column instead of being removed, and every read compiled through a
//! [`QueryPipeline`] hides stamped rows unless the query sets `include_deleted`.
//!
//! - [`SoftDeleted`] / [`HardDelete`]: per-entity deletion strategy
//! - [`SoftDelete`]: `delete` / `restore` on models
//! - [`SoftDeleteEntity`]: `get(session, id, include_deleted)` on entities
//! - [`SoftDeleteFilter`]: the compile hook adding `deleted_at IS NULL`
//! - [`Session`]: unit of work that compiles reads and commits writes
//!
//! See [README on GitHub](https://github.com/microscaler/lifeguard) for the wider ORM.

pub mod config;
pub mod connection;
pub mod executor;
pub mod metrics;
pub mod pipeline;
pub mod query;
pub mod session;
pub mod soft_delete;

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests_cfg;

pub use config::DatabaseConfig;
pub use connection::{connect, connect_from_config, ConnectionError};
pub use executor::{LifeError, LifeExecutor, MayPostgresExecutor};
pub use pipeline::{BeforeCompile, CompiledQuery, QueryPipeline, DEFAULT_PIPELINE};
pub use query::{
    ExecutionOptions, FromRow, LifeModelTrait, ModelTrait, QueryJoin, SelectQuery, TargetEntity,
};
pub use session::Session;
pub use soft_delete::{
    DeletionStrategy, HardDelete, SoftDelete, SoftDeleteEntity, SoftDeleteFilter, SoftDeleted,
};
