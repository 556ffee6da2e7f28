use crate::{MySqlConnection, MySqlSqlWriter};
use rowmap_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct MySqlDriver;
impl MySqlDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySqlDriver {
    type Connection = MySqlConnection;
    type SqlWriter = MySqlSqlWriter;

    const NAME: &'static str = "mysql";
    fn sql_writer(&self) -> Self::SqlWriter {
        MySqlSqlWriter::default()
    }
}
