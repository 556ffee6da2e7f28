use log::LevelFilter;
use rowmap::{
    Connection, Driver, Executor, GenericSqlWriter, Query, QueryResult, Result, RowLabeled,
    RowsAffected, Value,
    stream::{self, Stream},
};
use std::{borrow::Cow, collections::VecDeque, env};

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
    RowLabeled::new(
        labels.iter().map(|v| v.to_string()).collect(),
        values.into_boxed_slice(),
    )
}

pub fn affected(rows_affected: u64) -> QueryResult {
    RowsAffected {
        rows_affected,
        last_affected_id: None,
    }
    .into()
}

#[derive(Clone, Copy, Default)]
pub struct RecordingDriver;

impl Driver for RecordingDriver {
    type Connection = RecordingExecutor;
    type SqlWriter = GenericSqlWriter;

    const NAME: &'static str = "recording";
    fn sql_writer(&self) -> Self::SqlWriter {
        GenericSqlWriter::new()
    }
}

/// Keeps every query it receives and answers with the queued responses, an empty
/// result once they are over.
#[derive(Default)]
pub struct RecordingExecutor {
    pub queries: Vec<Query>,
    pub responses: VecDeque<Result<Vec<QueryResult>>>,
}

impl RecordingExecutor {
    pub fn respond(&mut self, results: impl IntoIterator<Item = QueryResult>) -> &mut Self {
        self.responses.push_back(Ok(results.into_iter().collect()));
        self
    }
    pub fn fail(&mut self, error: rowmap::Error) -> &mut Self {
        self.responses.push_back(Err(error));
        self
    }
    pub fn last(&self) -> &Query {
        self.queries.last().expect("No query was executed")
    }
}

impl Executor for RecordingExecutor {
    type Driver = RecordingDriver;

    fn driver(&self) -> &Self::Driver {
        &RecordingDriver {}
    }

    fn run(&mut self, query: Query) -> impl Stream<Item = Result<QueryResult>> + Send {
        log::debug!("{query}");
        self.queries.push(query);
        let items: Vec<Result<QueryResult>> = match self.responses.pop_front() {
            Some(Ok(results)) => results.into_iter().map(Ok).collect(),
            Some(Err(error)) => vec![Err(error)],
            None => Vec::new(),
        };
        stream::iter(items)
    }
}

impl Connection for RecordingExecutor {
    async fn connect(url: Cow<'static, str>) -> Result<Self> {
        log::debug!("Recording the queries for `{url}`");
        Ok(Self::default())
    }
}
