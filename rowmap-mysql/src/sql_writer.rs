use rowmap_core::SqlWriter;

/// The dialect written by the default [`SqlWriter`] methods is already MySQL.
#[derive(Default)]
pub struct MySqlSqlWriter {}

impl SqlWriter for MySqlSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
