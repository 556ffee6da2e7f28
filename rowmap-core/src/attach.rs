use crate::{AsValue, Context, Error, FieldSlot, Result, Tagged, Value};
use time::{UtcOffset, format_description::well_known::Rfc3339};

/// External shape filled from a tagged source. Implemented through `#[derive(Attach)]`.
///
/// Fields with an attach path copy the value found at that path in the source,
/// `recurse` fields are filled from the same source. Paths that do not resolve
/// leave the field untouched.
pub trait Attach: Default {
    fn attach_from(&mut self, source: &dyn Tagged) -> Result<()>;
}

impl<T: Attach> Attach for Option<T> {
    fn attach_from(&mut self, source: &dyn Tagged) -> Result<()> {
        self.get_or_insert_with(Default::default).attach_from(source)
    }
}

impl<T: Attach> Attach for Box<T> {
    fn attach_from(&mut self, source: &dyn Tagged) -> Result<()> {
        (**self).attach_from(source)
    }
}

/// Build a `T` from `source`.
pub fn project<T: Attach>(source: &dyn Tagged) -> Result<T> {
    let mut result = T::default();
    result.attach_from(source)?;
    Ok(result)
}

/// Build one `T` per source, in the same order.
pub fn project_all<T, I>(sources: I) -> Result<Vec<T>>
where
    T: Attach,
    I: IntoIterator,
    I::Item: Tagged,
{
    sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| project(&source).with_context(|| format!("While projecting item {i}")))
        .collect()
}

/// Field `ident` of `source`, searched first among its own fields then depth
/// first inside its `recurse` fields.
fn find<'a>(source: &'a dyn Tagged, ident: &str) -> Option<FieldSlot<'a>> {
    let defs = source.field_defs();
    if let Some(index) = defs.iter().position(|v| v.ident == ident) {
        return Some(source.field(index));
    }
    defs.iter()
        .enumerate()
        .filter(|(_, v)| v.recurse)
        .find_map(|(index, _)| match source.field(index) {
            FieldSlot::Nested(Some(nested)) => find(nested, ident),
            _ => None,
        })
}

fn lookup<'a>(source: &'a dyn Tagged, path: &str) -> Option<FieldSlot<'a>> {
    let mut current = source;
    let mut segments = path.split('.').map(str::trim).peekable();
    while let Some(segment) = segments.next() {
        let slot = find(current, segment)?;
        if segments.peek().is_none() {
            return Some(slot);
        }
        match slot {
            FieldSlot::Nested(Some(nested)) => current = nested,
            _ => return None,
        }
    }
    None
}

/// Value at the dotted `path` of `source`, `None` when a segment is missing, an
/// intermediate value is absent or the value is null.
pub fn resolve(source: &dyn Tagged, path: &str) -> Option<Value> {
    match lookup(source, path)? {
        FieldSlot::Value(v) if !v.is_null() => Some(v),
        _ => None,
    }
}

/// Whether the dotted `path` of `source` leads to a present value or nested value.
pub fn resolves(source: &dyn Tagged, path: &str) -> bool {
    match lookup(source, path) {
        Some(FieldSlot::Value(v)) => !v.is_null(),
        Some(FieldSlot::Nested(v)) => v.is_some(),
        _ => false,
    }
}

/// Convert a resolved value into the target type. Timestamps become RFC 3339 UTC
/// text and identifiers their hyphenated form when the target is textual.
pub fn coerce<T: AsValue>(value: Value) -> Result<T> {
    let value = match value {
        Value::Timestamp(Some(v)) if matches!(T::as_empty_value(), Value::Varchar(..)) => {
            Value::Varchar(Some(v.assume_utc().format(&Rfc3339)?))
        }
        Value::TimestampWithTimezone(Some(v))
            if matches!(T::as_empty_value(), Value::Varchar(..)) =>
        {
            Value::Varchar(Some(v.to_offset(UtcOffset::UTC).format(&Rfc3339)?))
        }
        Value::Uuid(Some(v)) if matches!(T::as_empty_value(), Value::Varchar(..)) => {
            Value::Varchar(Some(v.hyphenated().to_string()))
        }
        v => v,
    };
    T::try_from_value(value)
}

/// Copy the value at `path` of `source` into `target` when it resolves.
pub fn attach_value<T: AsValue>(
    target: &mut T,
    source: &dyn Tagged,
    path: &str,
    field: &str,
) -> Result<()> {
    if let Some(value) = resolve(source, path) {
        *target = coerce(value).map_err(|e| {
            Error::msg(format!("Cannot attach `{path}` to field `{field}`: {e:#}"))
        })?;
    }
    Ok(())
}
