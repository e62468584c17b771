//! Soft delete: keep the row, hide it from reads.
//!
//! An entity opts in with `type Deletion = SoftDeleted;` and a nullable
//! `deleted_at TIMESTAMP` column. From then on:
//!
//! - every query compiled through a pipeline holding [`SoftDeleteFilter`] gets
//!   `"<table>"."deleted_at" IS NULL` for each soft-deleting entity it targets,
//!   unless the query sets [`include_deleted`](crate::query::SelectQuery::include_deleted);
//! - its model implements [`SoftDelete`] for `delete` / `restore`;
//! - the entity gets [`SoftDeleteEntity::get`] for primary-key lookups.
//!
//! `deleted_at = NULL` means active, any other value means deleted. The timestamp
//! is informational; two deleted rows are equally deleted.

use crate::executor::{LifeError, LifeExecutor};
use crate::pipeline::{BeforeCompile, CompiledQuery};
use crate::query::select::{Ident, SelectQuery};
use crate::query::traits::{LifeModelTrait, ModelTrait};
use crate::session::Session;
use chrono::{NaiveDateTime, Utc};
use sea_query::{Expr, ExprTrait};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

/// How rows of an entity are deleted.
pub trait DeletionStrategy: 'static {
    /// Nullable timestamp column marking deleted rows, if any
    const DELETED_AT: Option<&'static str>;
}

/// Rows are removed with `DELETE`; queries are never filtered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HardDelete;

impl DeletionStrategy for HardDelete {
    const DELETED_AT: Option<&'static str> = None;
}

/// Rows are kept and stamped in `deleted_at`; queries hide stamped rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SoftDeleted;

impl SoftDeleted {
    pub const COLUMN: &'static str = "deleted_at";
}

impl DeletionStrategy for SoftDeleted {
    const DELETED_AT: Option<&'static str> = Some(SoftDeleted::COLUMN);
}

/// Model-side soft delete.
///
/// Implementors only provide access to their `deleted_at` field. Assigning the
/// field directly is equivalent to calling the helpers: what gets written is the
/// field's value at the time the model is [added](Session::add) to a session.
pub trait SoftDelete: ModelTrait<Entity: LifeModelTrait<Deletion = SoftDeleted>> {
    fn deleted_at(&self) -> Option<NaiveDateTime>;

    fn set_deleted_at(&mut self, deleted_at: Option<NaiveDateTime>);

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Mark the model deleted without writing anything.
    ///
    /// `deleted_at` defaults to the current UTC time, read at every call. The
    /// zero timestamp (`NaiveDateTime::default()`, the Unix epoch) counts as not
    /// supplied. Stage the change with [`Session::add`] and commit it to make it
    /// visible to other sessions.
    fn delete(&mut self, deleted_at: Option<NaiveDateTime>) {
        let stamp = deleted_at
            .filter(|ts| *ts != NaiveDateTime::default())
            .unwrap_or_else(|| Utc::now().naive_utc());
        self.set_deleted_at(Some(stamp));
    }

    /// [`delete`](Self::delete), then add to `session` and commit it.
    fn delete_and_commit<Ex>(
        &mut self,
        session: &Session<'_, Ex>,
        deleted_at: Option<NaiveDateTime>,
    ) -> Result<(), LifeError>
    where
        Ex: LifeExecutor + ?Sized,
        Self: Sized,
    {
        self.delete(deleted_at);
        session.add(&*self);
        session.commit()
    }

    /// Mark the model active again without writing anything.
    fn restore(&mut self) {
        self.set_deleted_at(None);
    }

    /// [`restore`](Self::restore), then add to `session` and commit it.
    fn restore_and_commit<Ex>(&mut self, session: &Session<'_, Ex>) -> Result<(), LifeError>
    where
        Ex: LifeExecutor + ?Sized,
        Self: Sized,
    {
        self.restore();
        session.add(&*self);
        session.commit()
    }
}

/// Entity-side soft delete, available on every entity using [`SoftDeleted`].
pub trait SoftDeleteEntity: LifeModelTrait<Deletion = SoftDeleted> {
    /// Look up one row by primary key.
    ///
    /// Deleted rows are `None` unless `include_deleted` is set, in which case the
    /// row comes back with its `deleted_at` stamp. Unknown ids are `None` too.
    fn get<Ex>(
        session: &Session<'_, Ex>,
        row_id: Self::PrimaryKey,
        include_deleted: bool,
    ) -> Result<Option<Self::Model>, LifeError>
    where
        Ex: LifeExecutor + ?Sized,
    {
        let key = Expr::col((Ident(Self::TABLE_NAME), Ident(Self::PRIMARY_KEY)));
        Self::find()
            .filter(key.eq(Expr::val(row_id)))
            .include_deleted(include_deleted)
            .first(session)
    }

    /// `find()` with the override already set
    fn find_with_deleted() -> SelectQuery<Self> {
        Self::find().include_deleted(true)
    }
}

impl<E> SoftDeleteEntity for E where E: LifeModelTrait<Deletion = SoftDeleted> {}

/// Compile hook that hides soft-deleted rows.
///
/// For each distinct target entity with a `deleted_at` column it ANDs
/// `"<table>"."deleted_at" IS NULL` onto the WHERE clause, so a joined row
/// disappears when any of its soft-deleting parts is deleted. An entity reached
/// only through LEFT JOINs gets the predicate in each join's ON clause instead,
/// so unmatched left rows keep their NULL padding. Entities without the column
/// and raw joined tables are skipped. Queries with `include_deleted` pass
/// through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftDeleteFilter;

impl SoftDeleteFilter {
    fn is_null(table: &'static str, column: &'static str) -> Expr {
        Expr::col((Ident(table), Ident(column))).is_null()
    }
}

impl BeforeCompile for SoftDeleteFilter {
    fn before_compile(&self, mut query: CompiledQuery) -> CompiledQuery {
        if query.options().include_deleted {
            log::debug!("include_deleted set, skipping soft-delete filter");
            #[cfg(feature = "metrics")]
            METRICS.record_filter_bypassed();
            return query;
        }

        let base_table = query.targets().first().map(|target| target.table());
        let left_only = |table: &str| {
            Some(table) != base_table
                && query.joins().iter().all(|join| {
                    join.is_left() || join.target().map(|t| t.table()) != Some(table)
                })
        };
        let where_columns: Vec<(&'static str, &'static str)> = query
            .targets()
            .iter()
            .filter(|target| !left_only(target.table()))
            .filter_map(|target| target.deleted_at_column().map(|col| (target.table(), col)))
            .collect();

        for (table, column) in &where_columns {
            query
                .statement_mut()
                .and_where(Self::is_null(*table, *column));
        }

        let mut on_count = 0;
        for join in query.joins_mut().iter_mut().filter(|join| join.is_left()) {
            let column = join
                .target()
                .and_then(|t| t.deleted_at_column().map(|col| (t.table(), col)));
            if let Some((table, column)) = column {
                join.and_on(Self::is_null(table, column));
                on_count += 1;
            }
        }

        let applied = where_columns.len() + on_count;
        if applied > 0 {
            log::debug!("soft-delete filter applied {applied} predicate(s)");
        }
        #[cfg(feature = "metrics")]
        METRICS.record_filters_applied(applied as u64);

        query
    }

    fn name(&self) -> &'static str {
        "SoftDeleteFilter"
    }
}
