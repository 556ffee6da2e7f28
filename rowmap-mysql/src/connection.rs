use crate::{MySqlDriver, RowWrap, ValueWrap};
use async_stream::try_stream;
use mysql_async::{Conn, Opts, Params, prelude::Queryable};
use rowmap_core::{
    Arguments, ConstraintViolation, Connection, Context, Driver, Error, Executor, Query,
    QueryResult, Result, RowsAffected,
    stream::{Stream, StreamExt, TryStreamExt},
    truncate_long,
};
use std::{borrow::Cow, collections::HashMap, sync::Arc};
use url::Url;

pub struct MySqlConnection {
    pub(crate) connection: Conn,
}

impl Executor for MySqlConnection {
    type Driver = MySqlDriver;

    fn driver(&self) -> &Self::Driver {
        &MySqlDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            let params = params(query.arguments)?;
            let mut result = self.connection.exec_iter(query.sql, params).await?;
            if result.columns().is_some_and(|v| !v.is_empty()) {
                while let Some(mut stream) = result.stream::<RowWrap>().await? {
                    while let Some(row) = stream.next().await.transpose()? {
                        yield row.0.into()
                    }
                }
            } else {
                let affected = RowsAffected {
                    rows_affected: result.affected_rows(),
                    last_affected_id: result.last_insert_id().and_then(|v| i64::try_from(v).ok()),
                };
                result.drop_result().await?;
                yield affected.into()
            }
        }
        .map_err(move |e: Error| {
            let e = classify(e).context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for MySqlConnection {
    async fn connect(url: Cow<'static, str>) -> Result<MySqlConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", <Self::Driver as Driver>::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url).with_context(context)?;
        let config = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(config).await.with_context(context)?;
        Ok(MySqlConnection { connection })
    }
}

pub(crate) fn params(arguments: Arguments) -> Result<Params> {
    Ok(match arguments {
        Arguments::Positional(values) if values.is_empty() => Params::Empty,
        Arguments::Positional(values) => Params::Positional(
            values
                .into_iter()
                .map(|v| ValueWrap(v).try_into())
                .collect::<Result<_>>()?,
        ),
        Arguments::Named(values) if values.is_empty() => Params::Empty,
        Arguments::Named(values) => Params::Named(
            values
                .into_iter()
                .map(|(k, v)| Ok((k.into_bytes(), ValueWrap(v).try_into()?)))
                .collect::<Result<HashMap<_, _>>>()?,
        ),
    })
}

/// Replace a server error carrying a constraint code with its [`ConstraintViolation`].
pub(crate) fn classify(error: Error) -> Error {
    let violation = match error.downcast_ref::<mysql_async::Error>() {
        Some(mysql_async::Error::Server(e)) => ConstraintViolation::from_code(e.code, &e.message),
        _ => None,
    };
    match violation {
        Some(violation) => Error::new(violation),
        None => error,
    }
}
