use rowmap_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => Value::Blob(Some(v.into())),
            mysql_async::Value::Int(v) => Value::Int64(v.into()),
            mysql_async::Value::UInt(v) => Value::UInt64(v.into()),
            mysql_async::Value::Float(v) => Value::Float32(v.into()),
            mysql_async::Value::Double(v) => Value::Float64(v.into()),
            mysql_async::Value::Date(year, month, day, hour, minute, second, microsecond) => {
                let date = Month::try_from(month)
                    .ok()
                    .and_then(|month| Date::from_calendar_date(year as _, month, day).ok());
                let time = Time::from_hms_micro(hour, minute, second, microsecond).ok();
                match (date, time) {
                    (Some(date), Some(time)) => {
                        Value::Timestamp(Some(PrimitiveDateTime::new(date, time)))
                    }
                    _ => return Err(mysql_async::FromValueError(value)),
                }
            }
            mysql_async::Value::Time(false, 0, hours, minutes, seconds, micro) => {
                Value::Time(Some(
                    Time::from_hms_micro(hours, minutes, seconds, micro)
                        .map_err(|_| mysql_async::FromValueError(value.clone()))?,
                ))
            }
            // Durations have no counterpart
            mysql_async::Value::Time(..) => return Err(mysql_async::FromValueError(value)),
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySqlValue = mysql_async::Value;
        fn timestamp(value: PrimitiveDateTime) -> Result<MySqlValue, Error> {
            if !(0..=9999).contains(&value.year()) {
                return Err(Error::msg(format!(
                    "Timestamp {value} is out of range for MySQL"
                )));
            }
            Ok(MySqlValue::Date(
                value.year() as _,
                value.month().into(),
                value.day(),
                value.hour(),
                value.minute(),
                value.second(),
                value.microsecond(),
            ))
        }
        Ok(match value.0 {
            _ if value.0.is_null() => MySqlValue::NULL,
            Value::Boolean(Some(v)) => MySqlValue::from(v),
            Value::Int8(Some(v)) => MySqlValue::from(v),
            Value::Int16(Some(v)) => MySqlValue::from(v),
            Value::Int32(Some(v)) => MySqlValue::from(v),
            Value::Int64(Some(v)) => MySqlValue::from(v),
            Value::UInt8(Some(v)) => MySqlValue::from(v),
            Value::UInt16(Some(v)) => MySqlValue::from(v),
            Value::UInt32(Some(v)) => MySqlValue::from(v),
            Value::UInt64(Some(v)) => MySqlValue::from(v),
            Value::Float32(Some(v)) => MySqlValue::from(v),
            Value::Float64(Some(v)) => MySqlValue::from(v),
            Value::Decimal(Some(v)) => MySqlValue::from(v),
            Value::Varchar(Some(v)) => MySqlValue::from(v),
            Value::Blob(Some(v)) => MySqlValue::Bytes(v.into_vec()),
            Value::Date(Some(v)) => MySqlValue::from(v),
            Value::Time(Some(v)) => MySqlValue::from(v),
            Value::Timestamp(Some(v)) => timestamp(v)?,
            Value::TimestampWithTimezone(Some(v)) => {
                let utc = v.to_utc();
                timestamp(PrimitiveDateTime::new(utc.date(), utc.time()))?
            }
            // Read back by UUID_TO_BIN
            Value::Uuid(Some(v)) => MySqlValue::from(v.hyphenated().to_string()),
            _ => {
                return Err(Error::msg(format!(
                    "Value `{:?}` is not supported by MySQL",
                    value.0
                )));
            }
        })
    }
}
