use async_trait::async_trait;
use datasync_core::{Connection, Connector, Error, Result, TextRow};
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow},
    Connection as _, Executor, Row,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens single, unpooled MySQL sessions from JDBC style URLs.
#[derive(Debug, Clone)]
pub struct MySqlConnector {
    connect_timeout: Duration,
}

impl MySqlConnector {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl Default for MySqlConnector {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns `jdbc:mysql://host:port/db?useUnicode=true` into `mysql://host:port/db`.
/// JDBC driver parameters mean nothing to sqlx, so the query string of a
/// `jdbc:` url is dropped; plain `mysql://` urls pass through untouched.
pub fn to_driver_url(url: &str) -> String {
    let url = url.trim();
    match url.get(..5) {
        Some(prefix) if prefix.eq_ignore_ascii_case("jdbc:") => {
            let url = &url[5..];
            url.split('?').next().unwrap_or(url).to_string()
        }
        _ => url.to_string(),
    }
}

#[async_trait]
impl Connector for MySqlConnector {
    async fn connect(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn Connection>> {
        let driver_url = to_driver_url(url);
        info!("Connecting to MySQL: {}", driver_url);

        let mut options = MySqlConnectOptions::from_str(&driver_url)
            .map_err(|e| Error::Connection(format!("Invalid MySQL url {}: {}", driver_url, e)))?;
        if !username.is_empty() {
            options = options.username(username);
        }
        if !password.is_empty() {
            options = options.password(password);
        }

        match tokio::time::timeout(self.connect_timeout, MySqlConnection::connect_with(&options))
            .await
        {
            Ok(Ok(conn)) => Ok(Box::new(MySqlSession { conn })),
            Ok(Err(e)) => {
                let err = Error::Connection(format!("Failed to connect to {}: {}", driver_url, e));
                error!("{}", err);
                Err(err)
            }
            Err(_) => {
                let err = Error::Connection(format!(
                    "Timed out after {:?} connecting to {}",
                    self.connect_timeout, driver_url
                ));
                error!("{}", err);
                Err(err)
            }
        }
    }
}

pub struct MySqlSession {
    conn: MySqlConnection,
}

#[async_trait]
impl Connection for MySqlSession {
    async fn query_first_row(&mut self, sql: &str) -> Result<Option<TextRow>> {
        let row = (&mut self.conn)
            .fetch_optional(sql)
            .await
            .map_err(|e| Error::Read(e.to_string()))?;

        match row {
            Some(row) => {
                let values = (0..row.len())
                    .map(|index| column_text(&row, index))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Some(values))
            }
            None => Ok(None),
        }
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        let result = (&mut self.conn)
            .execute(sql)
            .await
            .map_err(|e| Error::Write(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| Error::Connection(e.to_string()))
    }
}

// SHOW CREATE TABLE may report its columns with a binary collation
fn column_text(row: &MySqlRow, index: usize) -> Result<Option<String>> {
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return Ok(value);
    }
    row.try_get::<Option<Vec<u8>>, _>(index)
        .map(|value| value.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
        .map_err(|e| Error::Read(format!("Cannot decode column {} as text: {}", index, e)))
}
