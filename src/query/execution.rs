//! Query execution methods for SelectQuery.
//!
//! Queries execute through a [`Session`]: the session flushes its pending writes,
//! compiles the query with its pipeline, and runs the SQL on its executor.

use crate::executor::{LifeError, LifeExecutor};
use crate::query::select::SelectQuery;
use crate::query::traits::{FromRow, LifeModelTrait};
use crate::query::value_conversion::with_converted_params;
use crate::session::Session;

impl<E> SelectQuery<E>
where
    E: LifeModelTrait,
{
    /// Execute the query and return all visible results
    pub fn all<Ex>(self, session: &Session<'_, Ex>) -> Result<Vec<E::Model>, LifeError>
    where
        Ex: LifeExecutor + ?Sized,
    {
        let (sql, values) = session.compile(self)?;

        with_converted_params(&values, |params| {
            let rows = session.executor().query_all(&sql, params)?;
            rows.iter()
                .map(|row| {
                    <E::Model as FromRow>::from_row(row)
                        .map_err(|e| LifeError::ParseError(format!("Failed to parse row: {}", e)))
                })
                .collect()
        })
    }

    /// Execute the query with `LIMIT 1` and return the first result, if any
    pub fn first<Ex>(self, session: &Session<'_, Ex>) -> Result<Option<E::Model>, LifeError>
    where
        Ex: LifeExecutor + ?Sized,
    {
        Ok(self.limit(1).all(session)?.into_iter().next())
    }

    /// Count the rows this query would return
    ///
    /// The query is wrapped as a subquery, so LIMIT/OFFSET set on it still apply.
    pub fn count<Ex>(self, session: &Session<'_, Ex>) -> Result<u64, LifeError>
    where
        Ex: LifeExecutor + ?Sized,
    {
        let (sql, values) = session.compile(self)?;
        let count_sql = format!("SELECT COUNT(*) FROM ({sql}) AS counted");

        with_converted_params(&values, |params| {
            let row = session.executor().query_one(&count_sql, params)?;
            let count: i64 = row.try_get(0)?;
            u64::try_from(count)
                .map_err(|_| LifeError::ParseError(format!("negative row count: {count}")))
        })
    }
}
