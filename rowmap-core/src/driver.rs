use crate::{Executor, Result, SqlWriter};
use std::{borrow::Cow, future::Future};

pub trait Driver {
    type Connection: Connection;
    type SqlWriter: SqlWriter;

    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}

pub trait Connection: Executor {
    /// Open a connection to the given URL
    fn connect(url: Cow<'static, str>) -> impl Future<Output = Result<Self>>;
}
