//! Decoding of `may_postgres` rows into JSON records.

use crate::error::{Result, TableError};
use crate::executor::Record;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use may_postgres::types::{FromSql, Kind, Type};
use may_postgres::Row;
use rust_decimal::Decimal;
use serde_json::Value;
use std::error::Error;

/// Text of a Postgres enum value; enums arrive as their label in UTF-8.
struct EnumLabel(String);

impl<'a> FromSql<'a> for EnumLabel {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> std::result::Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(EnumLabel(std::str::from_utf8(raw)?.to_owned()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(ty.kind(), Kind::Enum(_))
    }
}

fn get<'a, T>(row: &'a Row, idx: usize) -> Result<Option<T>>
where
    T: FromSql<'a>,
{
    row.try_get::<_, Option<T>>(idx).map_err(|e| {
        TableError::Parse(format!(
            "Failed to decode column {}: {e}",
            row.columns()[idx].name()
        ))
    })
}

fn to_value<T: Into<Value>>(value: Option<T>) -> Value {
    value.map_or(Value::Null, Into::into)
}

fn decode_column(row: &Row, idx: usize, ty: &Type) -> Result<Value> {
    let value = match *ty {
        Type::BOOL => to_value(get::<bool>(row, idx)?),
        Type::INT2 => to_value(get::<i16>(row, idx)?),
        Type::INT4 => to_value(get::<i32>(row, idx)?),
        Type::INT8 => to_value(get::<i64>(row, idx)?),
        Type::OID => to_value(get::<u32>(row, idx)?),
        Type::FLOAT4 => to_value(get::<f32>(row, idx)?),
        Type::FLOAT8 => to_value(get::<f64>(row, idx)?),
        // Decimal precision survives as a string.
        Type::NUMERIC => to_value(get::<Decimal>(row, idx)?.map(|d| d.to_string())),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            to_value(get::<String>(row, idx)?)
        }
        Type::JSON | Type::JSONB => get::<Value>(row, idx)?.unwrap_or(Value::Null),
        Type::UUID => to_value(get::<uuid::Uuid>(row, idx)?.map(|u| u.to_string())),
        Type::DATE => to_value(get::<NaiveDate>(row, idx)?.map(|d| d.to_string())),
        Type::TIME => to_value(get::<NaiveTime>(row, idx)?.map(|t| t.to_string())),
        Type::TIMESTAMP => to_value(
            get::<NaiveDateTime>(row, idx)?.map(|t| t.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        ),
        Type::TIMESTAMPTZ => to_value(get::<DateTime<Utc>>(row, idx)?.map(|t| t.to_rfc3339())),
        _ if matches!(ty.kind(), Kind::Enum(_)) => to_value(get::<EnumLabel>(row, idx)?.map(|l| l.0)),
        _ => match row.try_get::<_, Option<String>>(idx) {
            Ok(value) => to_value(value),
            Err(e) => {
                log::warn!(
                    "column {} has undecodable type {}; rendering null: {e}",
                    row.columns()[idx].name(),
                    ty.name()
                );
                Value::Null
            }
        },
    };
    Ok(value)
}

/// Convert a row into a record keyed by column name, preserving select order.
pub fn row_to_record(row: &Row) -> Result<Record> {
    let mut record = Record::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column.type_())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}
