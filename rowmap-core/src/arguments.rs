use crate::{Result, ShapeError, Value};
use std::collections::BTreeMap;

/// Values bound to a statement, in the shape its bind tokens expect.
#[derive(Debug, Clone, PartialEq)]
pub enum Arguments {
    /// One value per `?`, in order of appearance.
    Positional(Vec<Value>),
    /// One value per `:name`, a name can appear several times in the text.
    Named(BTreeMap<String, Value>),
}

impl Arguments {
    pub fn positional() -> Self {
        Self::Positional(Vec::new())
    }
    pub fn named() -> Self {
        Self::Named(BTreeMap::new())
    }
    pub fn is_named(&self) -> bool {
        matches!(self, Self::Named(..))
    }
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(v) => v.len(),
            Self::Named(v) => v.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bind `value` for the token named `name`.
    ///
    /// Positional arguments ignore the name and append. Named arguments accept the
    /// same name again only with an equal value.
    pub fn push(&mut self, name: &str, value: Value) -> Result<()> {
        match self {
            Self::Positional(values) => values.push(value),
            Self::Named(values) => match values.get(name) {
                Some(current) if *current != value => {
                    return Err(ShapeError::AliasCollision { alias: name.into() }.into());
                }
                Some(..) => {}
                None => {
                    values.insert(name.into(), value);
                }
            },
        }
        Ok(())
    }

    /// Move every value of `other` into `self`, with the same collision rule as [`Arguments::push`].
    pub fn merge(&mut self, other: Arguments) -> Result<()> {
        match other {
            Self::Positional(values) => {
                for value in values {
                    self.push("", value)?;
                }
            }
            Self::Named(values) => {
                for (name, value) in values {
                    self.push(&name, value)?;
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Positional(..) => None,
            Self::Named(values) => values.get(name),
        }
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self::positional()
    }
}
