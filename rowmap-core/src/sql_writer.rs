use crate::{
    Arguments, FieldDescriptor, Mode, QueryParameters, Result, ShapeError, Tagged, Value,
    possibly_parenthesized, separated_by, walk,
};
use uuid::Uuid;

/// Lookup key of [`SqlWriter::write_select_by_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Surrogate identifier, compared with the binary `id` column.
    Id(Uuid),
    /// Natural key, compared with the `identity` column.
    Identity(String),
}

impl From<Uuid> for Key {
    fn from(value: Uuid) -> Self {
        Key::Id(value)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Identity(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Identity(value.into())
    }
}

/// Writes statements from tagged values.
///
/// The default methods produce the MySQL dialect. The kind of `args` (positional or
/// named) decides the bind tokens written in the text, the values are appended to
/// `args` in the order the tokens appear.
pub trait SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    /// `column <op> token`, or `(a <op> token OR b <op> token)` for a fan-out group.
    fn write_comparison(
        &self,
        out: &mut String,
        field: &FieldDescriptor,
        args: &mut Arguments,
    ) -> Result<()> {
        possibly_parenthesized!(
            out,
            field.is_fan_out(),
            separated_by(
                out,
                field.columns(),
                |out, column| {
                    self.write_identifier(out, column);
                    out.push(' ');
                    out.push_str(field.operator);
                    out.push(' ');
                    out.push_str(&field.bind_token);
                },
                " OR ",
            )
        );
        field.bind_comparison(args)
    }

    /// Conditions of `condition` joined with `AND`, writes nothing when it has no
    /// eligible field. Returns whether something was written.
    fn write_where_body(
        &self,
        out: &mut String,
        condition: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<bool> {
        let fields = walk(condition, Mode::condition(args.is_named()));
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(" AND ");
            }
            self.write_comparison(out, field, args)?;
        }
        Ok(!fields.is_empty())
    }

    /// ` WHERE <conditions>`, or nothing when `condition` has no eligible field.
    fn write_where(
        &self,
        out: &mut String,
        condition: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<bool> {
        let mut body = String::new();
        let written = self.write_where_body(&mut body, condition, args)?;
        if written {
            out.push_str(" WHERE ");
            out.push_str(&body);
        }
        Ok(written)
    }

    fn write_insert(
        &self,
        out: &mut String,
        table: &str,
        assignment: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<()> {
        let fields = walk(assignment, Mode::assignment(args.is_named()));
        if fields.is_empty() {
            return Err(ShapeError::NoEligibleFields { statement: "INSERT" }.into());
        }
        check_assignable(&fields)?;
        out.push_str("INSERT INTO ");
        self.write_identifier(out, table);
        out.push_str(" (");
        separated_by(
            out,
            fields.iter(),
            |out, field| self.write_identifier(out, field.storage_name),
            ", ",
        );
        out.push_str(") VALUES (");
        separated_by(
            out,
            fields.iter(),
            |out, field| out.push_str(&field.bind_token),
            ", ",
        );
        out.push(')');
        for field in fields {
            args.push(&field.bind_name, field.value)?;
        }
        Ok(())
    }

    fn write_exists(
        &self,
        out: &mut String,
        table: &str,
        condition: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<()> {
        out.push_str("SELECT EXISTS(SELECT 1 FROM ");
        self.write_identifier(out, table);
        self.write_where(out, condition, args)?;
        out.push(')');
        Ok(())
    }

    fn write_select(
        &self,
        out: &mut String,
        table: &str,
        condition: Option<&dyn Tagged>,
        parameters: &QueryParameters,
        paginate: bool,
        args: &mut Arguments,
    ) -> Result<()> {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, table);
        let has_condition = match condition {
            Some(condition) => self.write_where(out, condition, args)?,
            None => false,
        };
        out.push_str(&parameters.build(args, has_condition, paginate)?);
        Ok(())
    }

    fn write_select_by_key(
        &self,
        out: &mut String,
        table: &str,
        key: &Key,
        args: &mut Arguments,
    ) -> Result<()> {
        out.push_str("SELECT * FROM ");
        self.write_identifier(out, table);
        out.push_str(" WHERE ");
        let (column, value) = match key {
            Key::Id(id) => ("id", Value::Uuid(Some(*id))),
            Key::Identity(identity) => ("identity", Value::Varchar(Some(identity.clone()))),
        };
        self.write_identifier(out, column);
        out.push_str(" = ");
        let token = if args.is_named() {
            format!(":{column}")
        } else {
            "?".into()
        };
        if matches!(key, Key::Id(..)) {
            out.push_str("UUID_TO_BIN(");
            out.push_str(&token);
            out.push(')');
        } else {
            out.push_str(&token);
        }
        out.push_str(" LIMIT 1");
        args.push(column, value)
    }

    /// `UPDATE <table> SET ... WHERE ...`.
    ///
    /// The assigned and the conditional side are bound in separate scopes, merging
    /// them fails when the same bind name holds different values.
    fn write_update(
        &self,
        out: &mut String,
        table: &str,
        condition: &dyn Tagged,
        assignment: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<()> {
        let named = args.is_named();
        let fields = walk(assignment, Mode::assignment(named));
        if fields.is_empty() {
            return Err(ShapeError::NoEligibleFields { statement: "UPDATE" }.into());
        }
        check_assignable(&fields)?;
        let mut set_args = Mode::assignment(named).arguments();
        let mut where_args = Mode::condition(named).arguments();
        let mut conditions = String::new();
        if !self.write_where_body(&mut conditions, condition, &mut where_args)? {
            return Err(ShapeError::UnboundedWrite { statement: "UPDATE" }.into());
        }
        out.push_str("UPDATE ");
        self.write_identifier(out, table);
        out.push_str(" SET ");
        separated_by(
            out,
            fields.iter(),
            |out, field| {
                self.write_identifier(out, field.storage_name);
                out.push_str(" = ");
                out.push_str(&field.bind_token);
            },
            ", ",
        );
        out.push_str(" WHERE ");
        out.push_str(&conditions);
        for field in fields {
            set_args.push(&field.bind_name, field.value)?;
        }
        args.merge(set_args)?;
        args.merge(where_args)
    }

    fn write_delete(
        &self,
        out: &mut String,
        table: &str,
        condition: &dyn Tagged,
        args: &mut Arguments,
    ) -> Result<()> {
        let mut conditions = String::new();
        if !self.write_where_body(&mut conditions, condition, args)? {
            return Err(ShapeError::UnboundedWrite { statement: "DELETE" }.into());
        }
        out.push_str("DELETE FROM ");
        self.write_identifier(out, table);
        out.push_str(" WHERE ");
        out.push_str(&conditions);
        Ok(())
    }
}

fn check_assignable(fields: &[FieldDescriptor]) -> Result<()> {
    match fields.iter().find(|v| v.is_fan_out()) {
        Some(field) => Err(ShapeError::FanOutAssignment {
            field: field.storage_name.into(),
        }
        .into()),
        None => Ok(()),
    }
}

pub struct GenericSqlWriter;
impl GenericSqlWriter {
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{GenericSqlWriter, Key, SqlWriter};
    use crate::{
        Arguments, QueryParameters, ShapeError, Value,
        walker::tests::{Account, Audit, account},
    };
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[test]
    fn insert() {
        let id = Uuid::new_v4();
        let value = Account {
            id: Some(id),
            age: Some(40),
            audit: Some(Audit {
                author: Some("ada".into()),
                revision: 1,
            }),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::named();
        WRITER
            .write_insert(&mut out, "account", &value, &mut args)
            .unwrap();
        assert_eq!(
            out,
            "INSERT INTO account (id, age, author, revision) VALUES (UUID_TO_BIN(:id), :age, :author, :revision)"
        );
        assert_eq!(args.len(), 4);
        assert_eq!(args.get("id"), Some(&Value::Uuid(Some(id))));
    }

    #[test]
    fn insert_without_fields() {
        let mut out = String::new();
        let error = WRITER
            .write_insert(&mut out, "account", &account(), &mut Arguments::named())
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<ShapeError>(),
            Some(&ShapeError::NoEligibleFields { statement: "INSERT" })
        );
        assert!(out.is_empty());
    }

    #[test]
    fn insert_fan_out() {
        let value = Account {
            identity: Some("ada".into()),
            ..account()
        };
        let error = WRITER
            .write_insert(&mut String::new(), "account", &value, &mut Arguments::named())
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<ShapeError>(),
            Some(ShapeError::FanOutAssignment { .. })
        ));
    }

    #[test]
    fn where_fan_out_and_operator() {
        let value = Account {
            identity: Some("ada".into()),
            age: Some(21),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::positional();
        assert!(WRITER.write_where(&mut out, &value, &mut args).unwrap());
        assert_eq!(out, " WHERE (id_text = ? OR name = ?) AND age >= ?");
        assert_eq!(args.len(), 3);

        let mut out = String::new();
        assert!(!WRITER.write_where(&mut out, &account(), &mut args).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn exists() {
        let value = Account {
            age: Some(21),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::positional();
        WRITER
            .write_exists(&mut out, "account", &value, &mut args)
            .unwrap();
        assert_eq!(out, "SELECT EXISTS(SELECT 1 FROM account WHERE age >= ?)");
        let mut out = String::new();
        WRITER
            .write_exists(&mut out, "account", &account(), &mut args)
            .unwrap();
        assert_eq!(out, "SELECT EXISTS(SELECT 1 FROM account)");
    }

    #[test]
    fn select() {
        let value = Account {
            age: Some(21),
            ..account()
        };
        let params = QueryParameters::new().search("x", ["name"]);
        let mut out = String::new();
        let mut args = Arguments::positional();
        WRITER
            .write_select(&mut out, "account", Some(&value), &params, true, &mut args)
            .unwrap();
        assert_eq!(
            out,
            "SELECT * FROM account WHERE age >= ? AND (name LIKE ?) LIMIT ?, ?"
        );
        assert_eq!(args.len(), 4);

        let mut out = String::new();
        WRITER
            .write_select(&mut out, "account", None, &params, false, &mut args)
            .unwrap();
        assert_eq!(out, "SELECT * FROM account WHERE name LIKE ?");
    }

    #[test]
    fn select_by_key() {
        let id = Uuid::new_v4();
        let mut out = String::new();
        let mut args = Arguments::positional();
        WRITER
            .write_select_by_key(&mut out, "account", &Key::from(id), &mut args)
            .unwrap();
        assert_eq!(
            out,
            "SELECT * FROM account WHERE id = UUID_TO_BIN(?) LIMIT 1"
        );
        let mut out = String::new();
        let mut args = Arguments::named();
        WRITER
            .write_select_by_key(&mut out, "account", &Key::from("ada"), &mut args)
            .unwrap();
        assert_eq!(out, "SELECT * FROM account WHERE identity = :identity LIMIT 1");
        assert_eq!(args.get("identity"), Some(&Value::Varchar(Some("ada".into()))));
    }

    #[test]
    fn update_skips_absent_assignments() {
        let id = Uuid::new_v4();
        let condition = Account {
            id: Some(id),
            ..account()
        };
        let assignment = Account {
            age: Some(33),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::named();
        WRITER
            .write_update(&mut out, "account", &condition, &assignment, &mut args)
            .unwrap();
        assert_eq!(
            out,
            "UPDATE account SET age = :age WHERE id = UUID_TO_BIN(:id)"
        );
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn update_positional_order() {
        let condition = Account {
            identity: Some("ada".into()),
            ..account()
        };
        let assignment = Account {
            age: Some(33),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::positional();
        WRITER
            .write_update(&mut out, "account", &condition, &assignment, &mut args)
            .unwrap();
        assert_eq!(
            out,
            "UPDATE account SET age = ? WHERE (id_text = ? OR name = ?)"
        );
        let ada = Value::Varchar(Some("ada".into()));
        assert_eq!(
            args,
            Arguments::Positional(vec![Value::Int64(Some(33)), ada.clone(), ada])
        );
    }

    #[test]
    fn update_alias_collision() {
        let condition = Account {
            age: Some(20),
            ..account()
        };
        let assignment = Account {
            age: Some(21),
            ..account()
        };
        let error = WRITER
            .write_update(
                &mut String::new(),
                "account",
                &condition,
                &assignment,
                &mut Arguments::named(),
            )
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<ShapeError>(),
            Some(&ShapeError::AliasCollision { alias: "age".into() })
        );
        // Same value on both sides is the same binding
        let mut args = Arguments::named();
        WRITER
            .write_update(
                &mut String::new(),
                "account",
                &condition,
                &condition,
                &mut args,
            )
            .unwrap();
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn unbounded_writes() {
        let assignment = Account {
            age: Some(21),
            ..account()
        };
        let error = WRITER
            .write_update(
                &mut String::new(),
                "account",
                &account(),
                &assignment,
                &mut Arguments::named(),
            )
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<ShapeError>(),
            Some(&ShapeError::UnboundedWrite { statement: "UPDATE" })
        );
        let error = WRITER
            .write_delete(&mut String::new(), "account", &account(), &mut Arguments::positional())
            .unwrap_err();
        assert_eq!(
            error.downcast_ref::<ShapeError>(),
            Some(&ShapeError::UnboundedWrite { statement: "DELETE" })
        );
    }

    #[test]
    fn delete() {
        let value = Account {
            identity: Some("ada".into()),
            ..account()
        };
        let mut out = String::new();
        let mut args = Arguments::named();
        WRITER
            .write_delete(&mut out, "account", &value, &mut args)
            .unwrap();
        assert_eq!(
            out,
            "DELETE FROM account WHERE (id_text = :identity OR name = :identity)"
        );
        assert_eq!(args.len(), 1);
    }
}
