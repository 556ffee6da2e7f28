use crate::{Arguments, FieldDef, FieldSlot, Result, Tagged, Value};
use std::borrow::Cow;

/// Kind of statement a walk is done for, it decides the shape of the bind tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Insert,
    ConditionPositional,
    ConditionNamed,
}

impl Mode {
    pub fn condition(named: bool) -> Self {
        if named {
            Mode::ConditionNamed
        } else {
            Mode::ConditionPositional
        }
    }
    /// Mode of the assigned side of insert and update statements.
    pub fn assignment(named: bool) -> Self {
        if named {
            Mode::Insert
        } else {
            Mode::ConditionPositional
        }
    }
    pub fn is_named(&self) -> bool {
        !matches!(self, Mode::ConditionPositional)
    }
    pub fn arguments(&self) -> Arguments {
        if self.is_named() {
            Arguments::named()
        } else {
            Arguments::positional()
        }
    }
}

/// One field that takes part in a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Storage name, possibly a space separated fan-out group.
    pub storage_name: &'static str,
    pub operator: &'static str,
    pub bind_name: Cow<'static, str>,
    /// Placeholder text, `?` or `:name`, wrapped when the field is a binary identifier.
    pub bind_token: String,
    pub value: Value,
}

impl FieldDescriptor {
    pub fn new(def: &FieldDef, mode: Mode, value: Value) -> Self {
        let bind_name = def.bind_name();
        let token = if mode.is_named() {
            Cow::Owned(format!(":{bind_name}"))
        } else {
            Cow::Borrowed("?")
        };
        let bind_token = if def.binary_id {
            format!("UUID_TO_BIN({token})")
        } else {
            token.into_owned()
        };
        Self {
            storage_name: def.name,
            operator: def.operator(),
            bind_name,
            bind_token,
            value,
        }
    }
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + Clone {
        self.storage_name.split_whitespace()
    }
    pub fn is_fan_out(&self) -> bool {
        self.columns().nth(1).is_some()
    }
    /// Bind the value for every token this field writes in a comparison: once per
    /// column for positional tokens, once for a named token.
    pub fn bind_comparison(&self, args: &mut Arguments) -> Result<()> {
        if args.is_named() {
            args.push(&self.bind_name, self.value.clone())
        } else {
            for _ in self.columns() {
                args.push(&self.bind_name, self.value.clone())?;
            }
            Ok(())
        }
    }
}

/// Collect the fields of `value` that take part in a `mode` statement, depth first
/// in declaration order.
///
/// Excluded fields, unset optionals and unset nested values are left out.
pub fn walk(value: &dyn Tagged, mode: Mode) -> Vec<FieldDescriptor> {
    let mut result = Vec::new();
    walk_into(value, mode, &mut result);
    result
}

fn walk_into(value: &dyn Tagged, mode: Mode, result: &mut Vec<FieldDescriptor>) {
    for (index, def) in value.field_defs().iter().enumerate() {
        if def.is_excluded() {
            continue;
        }
        match value.field(index) {
            FieldSlot::Skipped | FieldSlot::Nested(None) => {}
            FieldSlot::Nested(Some(nested)) => walk_into(nested, mode, result),
            FieldSlot::Value(v) if v.is_null() => {}
            FieldSlot::Value(v) => result.push(FieldDescriptor::new(def, mode, v)),
        }
    }
}
