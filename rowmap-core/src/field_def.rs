use crate::{AsValue, Context, Result, RowLabeled, Value};
use std::borrow::Cow;

/// Placeholder storage name that removes a field from every generated statement.
pub const EXCLUDED: &str = "-";

/// Comparison operator used when a field does not declare one.
pub const DEFAULT_OPERATOR: &str = "=";

/// Declarative tags of one field.
///
/// Generated by the derive macros as a `static` table, one entry per field in
/// declaration order. Everything is `&'static str` so the table is built at
/// compile time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust identifier of the field, used by attach paths.
    pub ident: &'static str,
    /// Storage name. Empty or `"-"` excludes the field, several space separated
    /// names form a fan-out group.
    pub name: &'static str,
    /// Bind name override, empty means derived from `name`.
    pub alias: &'static str,
    /// Comparison operator, empty means `=`.
    pub operator: &'static str,
    /// Descend into the field instead of treating it as a leaf.
    pub recurse: bool,
    /// Dotted path into a source value, read by the attach engine.
    pub attach: &'static str,
    /// Bind through the binary identifier conversion.
    pub binary_id: bool,
    /// The field type is optional.
    pub nullable: bool,
}

impl FieldDef {
    pub const fn new(ident: &'static str) -> Self {
        Self {
            ident,
            name: ident,
            alias: "",
            operator: "",
            recurse: false,
            attach: "",
            binary_id: false,
            nullable: false,
        }
    }
    pub fn is_excluded(&self) -> bool {
        let name = self.name.trim();
        name.is_empty() || name == EXCLUDED
    }
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + Clone {
        self.name.split_whitespace()
    }
    pub fn is_fan_out(&self) -> bool {
        self.columns().nth(1).is_some()
    }
    pub fn operator(&self) -> &'static str {
        match self.operator.trim() {
            "" => DEFAULT_OPERATOR,
            v => v,
        }
    }
    /// Name of the named placeholder and of the row label decoded into this field.
    pub fn bind_name(&self) -> Cow<'static, str> {
        if !self.alias.is_empty() {
            return Cow::Borrowed(self.alias);
        }
        let mut columns = self.columns();
        match (columns.next(), columns.next()) {
            (Some(first), None) => Cow::Borrowed(first),
            _ => Cow::Owned(self.columns().collect::<Vec<_>>().join("_")),
        }
    }
}

/// What a tagged value exposes for one of its fields.
pub enum FieldSlot<'a> {
    /// Excluded field, its content is never read.
    Skipped,
    /// Leaf value. A null value is an unset optional.
    Value(Value),
    /// Nested tagged value of a `recurse` field, `None` when the optional is unset.
    Nested(Option<&'a dyn Tagged>),
}

/// A value whose fields carry tags. Implemented through `#[derive(Tagged)]`.
pub trait Tagged {
    /// Tags of every field, in declaration order.
    fn field_defs(&self) -> &'static [FieldDef];
    /// Content of the field at `index` in [`Tagged::field_defs`].
    fn field(&self, index: usize) -> FieldSlot<'_>;
}

impl<T: Tagged + ?Sized> Tagged for &T {
    fn field_defs(&self) -> &'static [FieldDef] {
        (**self).field_defs()
    }
    fn field(&self, index: usize) -> FieldSlot<'_> {
        (**self).field(index)
    }
}

impl<T: Tagged + ?Sized> Tagged for Box<T> {
    fn field_defs(&self) -> &'static [FieldDef] {
        (**self).field_defs()
    }
    fn field(&self, index: usize) -> FieldSlot<'_> {
        (**self).field(index)
    }
}

/// Decoding of a storage-shaped value from a labeled row.
pub trait FromRow {
    /// Labels of the columns read by `from_row`, nested values included.
    fn column_labels() -> Vec<&'static str>
    where
        Self: Sized;
    fn from_row(row: &RowLabeled) -> Result<Self>
    where
        Self: Sized;
}

/// `None` when every column of `T` is missing or NULL, decode errors are returned.
impl<T: FromRow> FromRow for Option<T> {
    fn column_labels() -> Vec<&'static str> {
        T::column_labels()
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        let absent = T::column_labels()
            .into_iter()
            .all(|label| row.get_column(label).is_none_or(Value::is_null));
        if absent {
            return Ok(None);
        }
        T::from_row(row).map(Some)
    }
}

impl<T: FromRow> FromRow for Box<T> {
    fn column_labels() -> Vec<&'static str> {
        T::column_labels()
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        T::from_row(row).map(Box::new)
    }
}

/// Storage-shaped value backed by a table.
pub trait Entity: Tagged + FromRow {
    fn table_name() -> &'static str;
}

/// Decode the column labeled `label`. A missing column decodes like a NULL,
/// which succeeds only for optional fields.
pub fn decode_column<T: AsValue>(row: &RowLabeled, label: &str) -> Result<T> {
    match row.get_column(label) {
        Some(value) => T::try_from_value(value.clone())
            .with_context(|| format!("While decoding column `{label}`")),
        None => T::try_from_value(Value::Null).map_err(|_| {
            crate::Error::msg(format!(
                "Column `{label}` does not exist in the row provided"
            ))
        }),
    }
}
