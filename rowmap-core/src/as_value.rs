use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use rust_decimal::Decimal;
use std::{any, fmt::Display, str::FromStr, sync::Arc};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamic [`Value`].
///
/// This is what the derive macros rely on to read a field into a bound
/// argument and to decode a column back into a field.
///
/// # Conversion contract
/// - `as_empty_value` returns the typed absence for the type (e.g.
///   `Value::Varchar(None)` for `String`). Optional wrappers return it for
///   `None`, which is what makes the field walker skip unset fields.
/// - `try_from_value` accepts the canonical variant and, where the storage
///   engine may hand back a different representation (integers of another
///   width, text delivered as bytes, binary identifiers), converts it with
///   range checks. Anything else is an error naming the target type.
///
/// ```rust
/// use rowmap_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn mismatch<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {value:?} to {}",
        any::type_name::<T>()
    ))
}

fn convert_integer<S, T>(value: S) -> Result<T>
where
    S: Display + Copy,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| {
        Error::msg(format!(
            "Value {value} is out of range for {}",
            any::type_name::<T>()
        ))
    })
}

fn text_of(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).context("The value is not valid UTF-8 text")
}

fn parse_text<T>(text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.trim().parse::<T>().with_context(|| {
        format!(
            "Cannot parse `{}` as {}",
            truncate_long!(text),
            any::type_name::<T>()
        )
    })
}

fn uuid_from_bytes(bytes: &[u8]) -> Result<Uuid> {
    if bytes.len() == 16 {
        Uuid::from_slice(bytes).map_err(Error::new)
    } else {
        parse_text(text_of(bytes)?)
    }
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v)) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    _ => Err(mismatch::<Self>(&value)),
                }
            }
        }
    };
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl_as_value!(
            $source,
            $destination,
            Value::Int8(Some(v)) => convert_integer(v),
            Value::Int16(Some(v)) => convert_integer(v),
            Value::Int32(Some(v)) => convert_integer(v),
            Value::Int64(Some(v)) => convert_integer(v),
            Value::UInt8(Some(v)) => convert_integer(v),
            Value::UInt16(Some(v)) => convert_integer(v),
            Value::UInt32(Some(v)) => convert_integer(v),
            Value::UInt64(Some(v)) => convert_integer(v),
            Value::Boolean(Some(v)) => Ok(v as _),
            Value::Varchar(Some(ref v)) => parse_text(v),
            Value::Blob(Some(ref v)) => parse_text(text_of(v)?),
        );
    };
}

impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

impl_as_value!(
    bool,
    Value::Boolean,
    Value::Int8(Some(v)) => Ok(v != 0),
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt8(Some(v)) => Ok(v != 0),
    Value::UInt16(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);

macro_rules! impl_as_value_float {
    ($source:ty, $destination:path) => {
        impl_as_value!(
            $source,
            $destination,
            Value::Float32(Some(v)) => Ok(v as _),
            Value::Float64(Some(v)) => Ok(v as _),
            Value::Int32(Some(v)) => Ok(v as _),
            Value::Int64(Some(v)) => Ok(v as _),
            Value::UInt32(Some(v)) => Ok(v as _),
            Value::UInt64(Some(v)) => Ok(v as _),
            Value::Decimal(Some(v)) => {
                <$source as TryFrom<Decimal>>::try_from(v).map_err(|e| Error::new(e))
            },
            Value::Varchar(Some(ref v)) => parse_text(v),
            Value::Blob(Some(ref v)) => parse_text(text_of(v)?),
        );
    };
}

impl_as_value_float!(f32, Value::Float32);
impl_as_value_float!(f64, Value::Float64);

impl_as_value!(
    Decimal,
    Value::Decimal,
    Value::Int32(Some(v)) => Ok(v.into()),
    Value::Int64(Some(v)) => Ok(v.into()),
    Value::UInt32(Some(v)) => Ok(v.into()),
    Value::UInt64(Some(v)) => Ok(v.into()),
    Value::Float64(Some(v)) => Decimal::try_from(v).map_err(Error::new),
    Value::Varchar(Some(ref v)) => parse_text(v),
    Value::Blob(Some(ref v)) => parse_text(text_of(v)?),
);

impl_as_value!(
    String,
    Value::Varchar,
    Value::Blob(Some(v)) => String::from_utf8(v.into_vec()).map_err(Error::new),
);

impl_as_value!(
    Box<[u8]>,
    Value::Blob,
    Value::Varchar(Some(v)) => Ok(v.into_bytes().into_boxed_slice()),
);

impl_as_value!(
    Vec<u8>,
    Value::Blob,
    Value::Varchar(Some(v)) => Ok(v.into_bytes()),
);

impl_as_value!(
    Date,
    Value::Date,
    Value::Timestamp(Some(v)) => Ok(v.date()),
    Value::TimestampWithTimezone(Some(v)) => Ok(v.to_offset(UtcOffset::UTC).date()),
    Value::Varchar(Some(ref v)) => Date::parse(v.trim(), format_description!("[year]-[month]-[day]"))
        .with_context(|| format!("Cannot parse `{}` as a date", truncate_long!(v))),
);

impl_as_value!(
    Time,
    Value::Time,
    Value::Timestamp(Some(v)) => Ok(v.time()),
    Value::Varchar(Some(ref v)) => Time::parse(v.trim(), format_description!("[hour]:[minute]:[second]"))
        .with_context(|| format!("Cannot parse `{}` as a time", truncate_long!(v))),
);

impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    Value::TimestampWithTimezone(Some(v)) => {
        let v = v.to_offset(UtcOffset::UTC);
        Ok(PrimitiveDateTime::new(v.date(), v.time()))
    },
    Value::Date(Some(v)) => Ok(v.midnight()),
    Value::Varchar(Some(ref v)) => PrimitiveDateTime::parse(
        v.trim(),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .with_context(|| format!("Cannot parse `{}` as a timestamp", truncate_long!(v))),
);

impl_as_value!(
    OffsetDateTime,
    Value::TimestampWithTimezone,
    Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
    Value::Date(Some(v)) => Ok(v.midnight().assume_utc()),
    Value::Varchar(Some(ref v)) => OffsetDateTime::parse(v.trim(), &Rfc3339)
        .with_context(|| format!("Cannot parse `{}` as a timestamp", truncate_long!(v))),
);

impl_as_value!(
    Uuid,
    Value::Uuid,
    Value::Blob(Some(ref v)) => uuid_from_bytes(v),
    Value::Varchar(Some(ref v)) => parse_text(v),
);

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(if value.is_null() {
            None
        } else {
            Some(<T as AsValue>::try_from_value(value)?)
        })
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Self::new(<T as AsValue>::try_from_value(value)?))
    }
}

impl<T: AsValue + Clone> AsValue for Arc<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        Arc::unwrap_or_clone(self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Self::new(<T as AsValue>::try_from_value(value)?))
    }
}
