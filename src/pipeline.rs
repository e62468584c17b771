//! Compile pipeline for read queries.
//!
//! Every [`SelectQuery`](crate::query::SelectQuery) is rendered to SQL through a
//! [`QueryPipeline`]: an ordered set of [`BeforeCompile`] hooks that each take the
//! fully built query and return it, possibly with extra predicates. The pipeline is
//! wired once (usually the process-wide [`DEFAULT_PIPELINE`]) and handed to
//! sessions, so callers never opt in per query.

use crate::query::select::{ExecutionOptions, QueryJoin, TargetEntity};
use crate::soft_delete::SoftDeleteFilter;
use once_cell::sync::Lazy;
use sea_query::{PostgresQueryBuilder, SelectStatement, Values};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Pipeline with the soft-delete filter registered, shared by [`Session::new`].
///
/// [`Session::new`]: crate::session::Session::new
pub static DEFAULT_PIPELINE: Lazy<QueryPipeline> = Lazy::new(QueryPipeline::default);

/// A read query on its way to SQL.
///
/// Joins are kept aside and added to the statement by [`build`](Self::build),
/// after every hook has run.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    statement: SelectStatement,
    targets: Vec<TargetEntity>,
    joins: Vec<QueryJoin>,
    options: ExecutionOptions,
}

impl CompiledQuery {
    pub fn new(
        statement: SelectStatement,
        targets: Vec<TargetEntity>,
        options: ExecutionOptions,
    ) -> Self {
        Self {
            statement,
            targets,
            joins: Vec::new(),
            options,
        }
    }

    pub fn with_joins(mut self, joins: Vec<QueryJoin>) -> Self {
        self.joins = joins;
        self
    }

    pub fn statement(&self) -> &SelectStatement {
        &self.statement
    }

    pub fn statement_mut(&mut self) -> &mut SelectStatement {
        &mut self.statement
    }

    /// Distinct entities referenced by the query
    pub fn targets(&self) -> &[TargetEntity] {
        &self.targets
    }

    pub fn joins(&self) -> &[QueryJoin] {
        &self.joins
    }

    pub fn joins_mut(&mut self) -> &mut [QueryJoin] {
        &mut self.joins
    }

    pub fn options(&self) -> ExecutionOptions {
        self.options
    }

    /// Apply the joins, then render PostgreSQL SQL and its bound values
    pub fn build(self) -> (String, Values) {
        let mut statement = self.statement;
        for join in self.joins {
            join.apply(&mut statement);
        }
        statement.build(PostgresQueryBuilder)
    }
}

/// A stage that runs after a query is built and before it is rendered.
///
/// Hooks are pure transformations: they must return a query for every
/// well-formed input and must not fail.
pub trait BeforeCompile: Send + Sync + 'static {
    fn before_compile(&self, query: CompiledQuery) -> CompiledQuery;

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Ordered set of compile hooks, at most one per hook type.
#[derive(Clone)]
pub struct QueryPipeline {
    hooks: Vec<(TypeId, Arc<dyn BeforeCompile>)>,
}

impl QueryPipeline {
    /// A pipeline that leaves queries as built
    pub fn empty() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Append `hook` unless a hook of the same type is already registered.
    ///
    /// Returns whether the hook was added.
    pub fn register<H: BeforeCompile>(&mut self, hook: H) -> bool {
        let id = TypeId::of::<H>();
        if self.hooks.iter().any(|(existing, _)| *existing == id) {
            log::debug!("compile hook {} already registered", hook.name());
            return false;
        }
        self.hooks.push((id, Arc::new(hook)));
        true
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<H: BeforeCompile>(mut self, hook: H) -> Self {
        self.register(hook);
        self
    }

    pub fn contains<H: BeforeCompile>(&self) -> bool {
        let id = TypeId::of::<H>();
        self.hooks.iter().any(|(existing, _)| *existing == id)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Pass `query` through every hook in registration order
    pub fn run(&self, query: CompiledQuery) -> CompiledQuery {
        self.hooks
            .iter()
            .fold(query, |query, (_, hook)| hook.before_compile(query))
    }
}

impl Default for QueryPipeline {
    fn default() -> Self {
        Self::empty().with(SoftDeleteFilter)
    }
}

impl fmt::Debug for QueryPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(_, hook)| hook.name()))
            .finish()
    }
}
