use crate::{
    Arguments, AsValue, Context, Driver, Entity, Executor, FromRow, Key, Query, QueryParameters,
    Result, RowLabeled, RowsAffected, SqlWriter, Tagged,
    stream::{StreamExt, TryStreamExt},
    truncate_long,
};
use std::{borrow::Cow, future::Future, marker::PhantomData};

/// Uniform operations on one table, rows are decoded into `R`.
///
/// Every statement is written before the returned future is polled, so the
/// condition and assignment values are only borrowed for the duration of the call.
///
/// ```rust,ignore
/// let engine = Engine::<User>::for_entity();
/// engine.insert(&mut connection, &user).await?;
/// let found = engine.fetch_one(&mut connection, &UserByName { name: Some("ada".into()) }).await?;
/// ```
pub struct Engine<R> {
    table: Cow<'static, str>,
    _row: PhantomData<fn() -> R>,
}

impl<R> Engine<R> {
    pub fn new(table: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table: table.into(),
            _row: PhantomData,
        }
    }
    pub fn table(&self) -> &str {
        &self.table
    }

    fn build(
        &self,
        statement: &'static str,
        mut arguments: Arguments,
        write: impl FnOnce(&str, &mut String, &mut Arguments) -> Result<()>,
    ) -> Result<Query> {
        let mut sql = String::with_capacity(128);
        write(&self.table, &mut sql, &mut arguments).with_context(|| {
            format!(
                "While writing the {statement} statement for table `{}`",
                self.table
            )
        })?;
        log::debug!("{}", truncate_long!(sql));
        Ok(Query::new(sql, arguments))
    }
}

impl<R: Entity> Engine<R> {
    pub fn for_entity() -> Self {
        Self::new(R::table_name())
    }
}

impl<R: FromRow + Send> Engine<R> {
    pub fn insert<Exec: Executor>(
        &self,
        executor: &mut Exec,
        assignment: &dyn Tagged,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("INSERT", Arguments::named(), |table, out, args| {
            writer.write_insert(out, table, assignment, args)
        });
        async move { executor.execute(query?).await }
    }

    pub fn exists<Exec: Executor>(
        &self,
        executor: &mut Exec,
        condition: &dyn Tagged,
    ) -> impl Future<Output = Result<bool>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("EXISTS", Arguments::positional(), |table, out, args| {
            writer.write_exists(out, table, condition, args)
        });
        async move {
            let rows: Vec<RowLabeled> = executor.fetch(query?).try_collect().await?;
            match rows.first().and_then(|v| v.values().first()) {
                Some(value) => bool::try_from_value(value.clone()),
                None => Ok(false),
            }
        }
    }

    /// Rows matching `condition`, searched, ordered and paginated by `parameters`.
    /// A condition without eligible fields matches every row.
    pub fn fetch_many<Exec: Executor>(
        &self,
        executor: &mut Exec,
        condition: Option<&dyn Tagged>,
        parameters: &QueryParameters,
        paginate: bool,
    ) -> impl Future<Output = Result<Vec<R>>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("SELECT", Arguments::positional(), |table, out, args| {
            writer.write_select(out, table, condition, parameters, paginate, args)
        });
        async move {
            executor
                .fetch(query?)
                .map(|row| row.and_then(|row| R::from_row(&row)))
                .try_collect()
                .await
        }
    }

    /// First row matching `condition`, `None` when nothing matches.
    pub fn fetch_one<Exec: Executor>(
        &self,
        executor: &mut Exec,
        condition: &dyn Tagged,
    ) -> impl Future<Output = Result<Option<R>>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("SELECT", Arguments::positional(), |table, out, args| {
            writer.write_select(
                out,
                table,
                Some(condition),
                &QueryParameters::default(),
                false,
                args,
            )?;
            out.push_str(" LIMIT 1");
            Ok(())
        });
        async move { first_row(executor, query?).await }
    }

    /// Row with the surrogate identifier or the natural key `key`.
    pub fn fetch_by_key<Exec: Executor>(
        &self,
        executor: &mut Exec,
        key: impl Into<Key>,
    ) -> impl Future<Output = Result<Option<R>>> + Send {
        let key = key.into();
        let writer = executor.driver().sql_writer();
        let query = self.build("SELECT", Arguments::positional(), |table, out, args| {
            writer.write_select_by_key(out, table, &key, args)
        });
        async move { first_row(executor, query?).await }
    }

    /// Returns the number of rows affected. Refuses a condition without eligible fields.
    pub fn update<Exec: Executor>(
        &self,
        executor: &mut Exec,
        condition: &dyn Tagged,
        assignment: &dyn Tagged,
    ) -> impl Future<Output = Result<u64>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("UPDATE", Arguments::named(), |table, out, args| {
            writer.write_update(out, table, condition, assignment, args)
        });
        async move { Ok(executor.execute(query?).await?.rows_affected) }
    }

    /// Returns the number of rows affected. Refuses a condition without eligible fields.
    pub fn delete<Exec: Executor>(
        &self,
        executor: &mut Exec,
        condition: &dyn Tagged,
    ) -> impl Future<Output = Result<u64>> + Send {
        let writer = executor.driver().sql_writer();
        let query = self.build("DELETE", Arguments::positional(), |table, out, args| {
            writer.write_delete(out, table, condition, args)
        });
        async move { Ok(executor.execute(query?).await?.rows_affected) }
    }
}

async fn first_row<R: FromRow, Exec: Executor>(
    executor: &mut Exec,
    query: Query,
) -> Result<Option<R>> {
    let rows: Vec<RowLabeled> = executor.fetch(query).try_collect().await?;
    rows.first().map(R::from_row).transpose()
}
