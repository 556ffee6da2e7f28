mod arguments;
mod as_value;
mod attach;
mod driver;
mod engine;
mod error;
mod executor;
mod field_def;
mod pagination;
mod prototype;
mod query;
mod query_parameters;
mod sql_writer;
mod util;
mod value;
mod walker;

pub use ::anyhow::Context;
pub use arguments::*;
pub use as_value::*;
pub use attach::*;
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use executor::*;
pub use field_def::*;
pub use pagination::*;
pub use prototype::*;
pub use query::*;
pub use query_parameters::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;
pub use walker::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
