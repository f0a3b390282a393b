use thiserror::Error;

/// Machine-checkable category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRequiredValue,
    Configuration,
    Query,
    Connection,
    Read,
    Write,
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Read error: {0}")]
    Read(String),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Missing required value: {0}")]
    MissingValue(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query error: {message} (sql: `{sql}`, table: `{table}`)")]
    Query {
        message: String,
        sql: String,
        table: String,
        #[source]
        source: Option<Box<Error>>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn query(message: impl Into<String>, sql: &str, table: &str) -> Self {
        Error::Query {
            message: message.into(),
            sql: sql.to_string(),
            table: table.to_string(),
            source: None,
        }
    }

    /// Attaches the underlying driver error to a [`Error::Query`].
    /// Other variants are returned unchanged.
    pub fn with_source(self, cause: Error) -> Self {
        match self {
            Error::Query {
                message,
                sql,
                table,
                ..
            } => Error::Query {
                message,
                sql,
                table,
                source: Some(Box::new(cause)),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Connection(_) => ErrorKind::Connection,
            Error::Read(_) => ErrorKind::Read,
            Error::Write(_) => ErrorKind::Write,
            Error::MissingValue(_) => ErrorKind::MissingRequiredValue,
            Error::Config(_) => ErrorKind::Configuration,
            Error::Query { .. } => ErrorKind::Query,
        }
    }
}
