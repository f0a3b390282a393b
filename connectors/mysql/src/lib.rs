mod auto_create;
mod connector;
mod ddl;

pub use auto_create::{AutoTableCreator, ConnectionInfo};
pub use connector::{to_driver_url, MySqlConnector, MySqlSession};
pub use ddl::{table_from_query, CreateStatementRewriter, RegexRewriter};
