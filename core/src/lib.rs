pub mod config;
pub mod connector;
pub mod error;
pub mod table_expand;
pub mod types;

pub use config::{JobConfig, ReaderConfig, ReaderConnection, WriterConfig, WriterConnection};
pub use connector::{Connection, Connector, TextRow};
pub use error::{Error, ErrorKind, Result};
pub use table_expand::{count_tables, expand_tables, first_table};
pub use types::*;
