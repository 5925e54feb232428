//! Value conversion utilities for SeaQuery to may_postgres.
//!
//! Conversion is two-pass: every `sea_query::Value` is first moved into an owned
//! parameter, then a slice of references to those parameters is handed to the
//! closure, so the borrows stay valid for the whole database call.

use crate::error::{Result, TableError};
use may_postgres::types::ToSql;
use sea_query::Value;

type OwnedParam = Box<dyn ToSql + Sync>;

fn to_param(value: &Value) -> Result<OwnedParam> {
    let param: OwnedParam = match value {
        Value::Bool(v) => Box::new(*v),
        Value::TinyInt(v) => Box::new(v.map(i16::from)),
        Value::SmallInt(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::TinyUnsigned(v) => Box::new(v.map(i16::from)),
        Value::SmallUnsigned(v) => Box::new(v.map(i32::from)),
        Value::Unsigned(v) => Box::new(v.map(i64::from)),
        Value::BigUnsigned(v) => {
            let converted = match v {
                Some(u) => Some(i64::try_from(*u).map_err(|_| {
                    TableError::Query(format!(
                        "BigUnsigned value {u} exceeds i64::MAX, cannot be bound"
                    ))
                })?),
                None => None,
            };
            Box::new(converted)
        }
        Value::Float(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        Value::Json(v) => Box::new(v.as_ref().map(|j| (**j).clone())),
        _ => {
            return Err(TableError::Query(format!(
                "Unsupported value type in query: {value:?}"
            )));
        }
    };
    Ok(param)
}

/// Convert SeaQuery values to may_postgres ToSql parameters and run `f` with them.
///
/// # Errors
///
/// Returns `TableError::Query` if an unsupported value type is encountered, or
/// whatever `f` returns.
pub fn with_converted_params<F, R>(values: &sea_query::Values, f: F) -> Result<R>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R>,
{
    let owned = values.iter().map(to_param).collect::<Result<Vec<_>>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|p| p.as_ref() as &dyn ToSql).collect();
    f(&params)
}
