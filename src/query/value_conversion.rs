//! Value conversion utilities for SeaQuery to may_postgres.
//!
//! Converts SeaQuery `Value`s into owned `ToSql` parameters and hands borrowed
//! views of them to a closure, so the references stay valid for exactly as long
//! as the statement runs.

use crate::executor::LifeError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use may_postgres::types::ToSql;
use sea_query::{Value, Values};

type OwnedParam = Box<dyn ToSql + Sync>;

/// Convert SeaQuery values to may_postgres ToSql parameters and run `f` with them.
///
/// # Errors
///
/// Returns `LifeError::Other` if an unsupported value type is encountered, or if
/// an unsigned value does not fit in a PostgreSQL `BIGINT`.
pub fn with_converted_params<F, R>(values: &Values, f: F) -> Result<R, LifeError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, LifeError>,
{
    let owned = values
        .iter()
        .map(to_param)
        .collect::<Result<Vec<OwnedParam>, LifeError>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|p| &**p as &dyn ToSql).collect();
    f(&params)
}

fn to_param(value: &Value) -> Result<OwnedParam, LifeError> {
    let param: OwnedParam = match value {
        Value::Bool(v) => Box::new(*v),
        Value::TinyInt(v) => Box::new(v.map(i32::from)),
        Value::SmallInt(v) => Box::new(v.map(i32::from)),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::TinyUnsigned(v) => Box::new(v.map(i32::from)),
        Value::SmallUnsigned(v) => Box::new(v.map(i32::from)),
        Value::Unsigned(v) => Box::new(v.map(i64::from)),
        Value::BigUnsigned(Some(u)) => {
            let signed = i64::try_from(*u).map_err(|_| {
                LifeError::Other(format!(
                    "BigUnsigned value {} exceeds i64::MAX ({}), cannot be safely cast to i64",
                    u,
                    i64::MAX
                ))
            })?;
            Box::new(Some(signed))
        }
        Value::BigUnsigned(None) => Box::new(None::<i64>),
        Value::Float(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        Value::Json(Some(j)) => {
            let text = serde_json::to_string(&**j)
                .map_err(|e| LifeError::Other(format!("Failed to serialize JSON: {}", e)))?;
            Box::new(Some(text))
        }
        Value::Json(None) => Box::new(None::<String>),
        Value::ChronoDate(v) => Box::new(v.as_ref().map(|d| NaiveDate::clone(d))),
        Value::ChronoTime(v) => Box::new(v.as_ref().map(|t| NaiveTime::clone(t))),
        Value::ChronoDateTime(v) => Box::new(v.as_ref().map(|dt| NaiveDateTime::clone(dt))),
        Value::ChronoDateTimeUtc(v) => Box::new(v.as_ref().map(|dt| DateTime::<Utc>::clone(dt))),
        _ => {
            return Err(LifeError::Other(format!(
                "Unsupported value type in query: {:?}",
                value
            )));
        }
    };
    Ok(param)
}
