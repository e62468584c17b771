//! Select query builder for LifeModel.
//!
//! `SelectQuery` records, next to the SeaQuery statement, every entity the query
//! targets and its typed execution options. Both are handed to the compile
//! pipeline, which is where the soft-delete filter gets to see them. Execution
//! methods live in the execution module.

use crate::pipeline::{CompiledQuery, QueryPipeline};
use crate::query::traits::LifeModelTrait;
use crate::soft_delete::DeletionStrategy;
use sea_query::{
    DynIden, Expr, ExprTrait, Iden, IntoColumnRef, IntoIden, JoinType, Order, SelectStatement,
    Values,
};
use std::marker::PhantomData;

/// Identifier backed by a static name (table or column).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ident(pub(crate) &'static str);

impl Iden for Ident {
    fn unquoted(&self) -> &str {
        self.0
    }
}

/// An entity referenced by a query, as seen by compile hooks.
///
/// `deleted_at` is `Some(column)` exactly when the entity's
/// [`LifeModelTrait::Deletion`] is soft; it is fixed by the type when the query
/// is built, not probed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetEntity {
    table: &'static str,
    deleted_at: Option<&'static str>,
}

impl TargetEntity {
    pub fn of<E: LifeModelTrait>() -> Self {
        Self {
            table: E::TABLE_NAME,
            deleted_at: <E::Deletion as DeletionStrategy>::DELETED_AT,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn deleted_at_column(&self) -> Option<&'static str> {
        self.deleted_at
    }
}

/// A join recorded on a query, applied to the statement when it is rendered.
///
/// Joins stay separate from the statement until then so compile hooks can still
/// extend their ON condition. `target` is `None` for raw tables.
#[derive(Debug, Clone)]
pub struct QueryJoin {
    join_type: JoinType,
    table: DynIden,
    on: Expr,
    target: Option<TargetEntity>,
}

impl QueryJoin {
    pub fn target(&self) -> Option<&TargetEntity> {
        self.target.as_ref()
    }

    pub fn is_left(&self) -> bool {
        matches!(self.join_type, JoinType::LeftJoin)
    }

    /// AND `condition` onto the join's ON clause
    pub fn and_on(&mut self, condition: Expr) {
        self.on = self.on.clone().and(condition);
    }

    pub(crate) fn apply(self, statement: &mut SelectStatement) {
        statement.join(self.join_type, self.table, self.on);
    }
}

/// Per-query options read by compile hooks.
///
/// Owned by a single [`SelectQuery`]; building another query starts from the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Skip the soft-delete filter and return deleted rows as well
    pub include_deleted: bool,
}

/// Query builder for selecting records
///
/// Returned by `LifeModelTrait::find()`; chain filters, joins and ordering, then
/// execute it through a [`Session`](crate::session::Session).
///
/// # Example
///
/// ```ignore
/// use sea_query::{Expr, ExprTrait, Order};
///
/// let accounts = Account::find()
///     .filter(Expr::col("name").like("acme%"))
///     .order_by("id", Order::Asc)
///     .limit(10)
///     .all(&session)?;
/// ```
pub struct SelectQuery<E>
where
    E: LifeModelTrait,
{
    pub(crate) statement: SelectStatement,
    pub(crate) targets: Vec<TargetEntity>,
    pub(crate) joins: Vec<QueryJoin>,
    pub(crate) options: ExecutionOptions,
    _phantom: PhantomData<E>,
}

impl<E> Clone for SelectQuery<E>
where
    E: LifeModelTrait,
{
    fn clone(&self) -> Self {
        Self {
            statement: self.statement.clone(),
            targets: self.targets.clone(),
            joins: self.joins.clone(),
            options: self.options,
            _phantom: PhantomData,
        }
    }
}

impl<E> Default for SelectQuery<E>
where
    E: LifeModelTrait,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SelectQuery<E>
where
    E: LifeModelTrait,
{
    /// Create a new select query over `E`'s table, selecting `"<table>".*`
    pub fn new() -> Self {
        let mut statement = SelectStatement::default();
        statement
            .column((Ident(E::TABLE_NAME), sea_query::Asterisk))
            .from(Ident(E::TABLE_NAME));
        Self {
            statement,
            targets: vec![TargetEntity::of::<E>()],
            joins: Vec::new(),
            options: ExecutionOptions::default(),
            _phantom: PhantomData,
        }
    }

    /// Add a filter condition, ANDed with the existing ones
    ///
    /// Accepts anything implementing `IntoCondition` (`Expr`, `Condition`, ...).
    pub fn filter<F>(mut self, condition: F) -> Self
    where
        F: sea_query::IntoCondition,
    {
        self.statement.cond_where(condition.into_condition());
        self
    }

    /// Add an ORDER BY clause
    pub fn order_by<C: IntoColumnRef>(mut self, column: C, order: Order) -> Self {
        self.statement.order_by(column, order);
        self
    }

    /// Add a LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        self.statement.limit(limit);
        self
    }

    /// Add an OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        self.statement.offset(offset);
        self
    }

    /// INNER JOIN another entity's table; the entity becomes a filter target
    pub fn join_entity<J: LifeModelTrait>(self, on: Expr) -> Self {
        self.join_entity_as::<J>(JoinType::InnerJoin, on)
    }

    /// LEFT JOIN another entity's table; the entity becomes a filter target
    ///
    /// The soft-delete predicate for `J` joins the ON clause, so a left row whose
    /// joined rows are all deleted comes back padded with NULLs.
    pub fn left_join_entity<J: LifeModelTrait>(self, on: Expr) -> Self {
        self.join_entity_as::<J>(JoinType::LeftJoin, on)
    }

    fn join_entity_as<J: LifeModelTrait>(mut self, join_type: JoinType, on: Expr) -> Self {
        let target = TargetEntity::of::<J>();
        self.joins.push(QueryJoin {
            join_type,
            table: Ident(J::TABLE_NAME).into_iden(),
            on,
            target: Some(target),
        });
        self.add_target(target);
        self
    }

    /// INNER JOIN a table that no entity describes
    ///
    /// Raw tables are not filter targets: no compile hook can tell whether they
    /// soft delete, so they are left alone.
    pub fn join_table<T: Iden + 'static>(mut self, table: T, on: Expr) -> Self {
        self.joins.push(QueryJoin {
            join_type: JoinType::InnerJoin,
            table: table.into_iden(),
            on,
            target: None,
        });
        self
    }

    /// Set or clear the override that returns deleted rows too
    pub fn include_deleted(mut self, include: bool) -> Self {
        self.options.include_deleted = include;
        self
    }

    pub fn options(&self) -> ExecutionOptions {
        self.options
    }

    /// Distinct entities this query targets, base entity first
    pub fn targets(&self) -> &[TargetEntity] {
        &self.targets
    }

    /// Joins in the order they were added
    pub fn joins(&self) -> &[QueryJoin] {
        &self.joins
    }

    fn add_target(&mut self, target: TargetEntity) {
        if !self.targets.iter().any(|t| t.table == target.table) {
            self.targets.push(target);
        }
    }

    /// Run the query through `pipeline` and render PostgreSQL SQL, leaving `self` untouched
    pub fn build(&self, pipeline: &QueryPipeline) -> (String, Values) {
        self.clone().into_sql(pipeline)
    }

    pub(crate) fn into_sql(self, pipeline: &QueryPipeline) -> (String, Values) {
        #[cfg(feature = "tracing")]
        let _span = crate::metrics::tracing_helpers::compile_query_span(
            E::TABLE_NAME,
            self.options.include_deleted,
        )
        .entered();

        let compiled = CompiledQuery::new(self.statement, self.targets, self.options)
            .with_joins(self.joins);
        pipeline.run(compiled).build()
    }
}
