use crate::ddl::{table_from_query, CreateStatementRewriter, RegexRewriter};
use datasync_core::{
    count_tables, first_table, Connection, Connector, DatabaseType, Error, ReaderConfig, Result,
    WriterConfig,
};
use std::fmt;
use tracing::{debug, info, warn};

/// Endpoint, credentials and table resolved for one side of a job.
#[derive(Clone)]
pub struct ConnectionInfo {
    pub jdbc_url: String,
    pub username: String,
    pub password: String,
    pub table_name: Option<String>,
}

impl fmt::Debug for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionInfo")
            .field("jdbc_url", &self.jdbc_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("table_name", &self.table_name)
            .finish()
    }
}

/// Creates the writer's table from the reader's `SHOW CREATE TABLE` output
/// before a MySQL to MySQL job starts. Enabled by `autoCreateTable` on the
/// writer side.
pub struct AutoTableCreator<C> {
    connector: C,
    rewriter: Box<dyn CreateStatementRewriter>,
}

impl<C: Connector> AutoTableCreator<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            rewriter: Box::new(RegexRewriter),
        }
    }

    pub fn with_rewriter<R: CreateStatementRewriter + 'static>(mut self, rewriter: R) -> Self {
        self.rewriter = Box::new(rewriter);
        self
    }

    /// Returns the statement executed on the destination, or `None` when the
    /// feature is switched off.
    pub async fn maybe_create_table(
        &self,
        reader: &ReaderConfig,
        writer: &WriterConfig,
    ) -> Result<Option<String>> {
        if !writer.auto_create_table {
            debug!("autoCreateTable is off, skipping table creation");
            return Ok(None);
        }

        let target_table = resolve_single_writer_table(writer)?;

        let reader_info = reader_connection_info(reader)?;
        let engine = DatabaseType::from_url(&reader_info.jdbc_url);
        if engine != DatabaseType::MySql {
            return Err(Error::Config(format!(
                "autoCreateTable only supports mysql to mysql, reader is {}",
                engine
            )));
        }

        let source_ddl = self.fetch_source_ddl(&reader_info).await?;

        let writer_info = writer_connection_info(writer, target_table)?;
        let target_table = writer_info.table_name.as_deref().unwrap_or_default();
        let create_sql = self
            .rewriter
            .rewrite_create_statement(&source_ddl, target_table)?;
        info!(table = target_table, ddl = %create_sql, "Writer table DDL");

        self.create_writer_table(&writer_info, &create_sql).await?;
        Ok(Some(create_sql))
    }

    async fn fetch_source_ddl(&self, info: &ConnectionInfo) -> Result<String> {
        let table = info.table_name.as_deref().ok_or_else(|| {
            Error::MissingValue(
                "Cannot resolve the reader table from its table list or querySql".into(),
            )
        })?;
        let sql = format!("SHOW CREATE TABLE {}", table);

        let mut conn = self
            .connector
            .connect(&info.jdbc_url, &info.username, &info.password)
            .await?;
        let row = conn.query_first_row(&sql).await;
        close_quietly(conn).await;

        let row = row.map_err(|e| {
            Error::query("Failed to read reader table DDL", &sql, table).with_source(e)
        })?;
        // 第二列是建表语句
        let ddl = row
            .and_then(|columns| columns.into_iter().nth(1).flatten())
            .ok_or_else(|| Error::query("Cannot obtain reader table DDL", &sql, table))?;

        info!(table, ddl = %ddl, "Reader table DDL");
        Ok(ddl)
    }

    async fn create_writer_table(&self, info: &ConnectionInfo, sql: &str) -> Result<()> {
        let table = info.table_name.as_deref().unwrap_or_default();

        let mut conn = self
            .connector
            .connect(&info.jdbc_url, &info.username, &info.password)
            .await?;
        let result = conn.execute(sql).await;
        close_quietly(conn).await;

        result.map_err(|e| {
            Error::query("Failed to create writer table", sql, table).with_source(e)
        })?;
        info!(table, "Writer table is ready");
        Ok(())
    }
}

async fn close_quietly(conn: Box<dyn Connection>) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close connection: {}", e);
    }
}

/// Every writer block must name a url and tables, and all of them together
/// must expand to exactly one physical table.
fn resolve_single_writer_table(writer: &WriterConfig) -> Result<String> {
    let mut total: u64 = 0;
    for (index, conn) in writer.connection.iter().enumerate() {
        if conn.jdbc_url().is_none() {
            return Err(Error::MissingValue(format!(
                "Writer connection[{}] has no jdbcUrl",
                index
            )));
        }
        if conn.table.is_empty() {
            return Err(Error::MissingValue(format!(
                "Writer connection[{}] has no table",
                index
            )));
        }

        // 只计数，不展开分表
        let count = count_tables(&conn.table)?;
        if count == 0 {
            return Err(Error::Config(format!(
                "Writer connection[{}] tables {:?} resolve to no table",
                index, conn.table
            )));
        }
        total = total.saturating_add(count);
    }

    match total {
        0 => Err(Error::Config(
            "No writer table found for autoCreateTable".into(),
        )),
        // every block names at least one table, so the only one is in block 0
        1 => first_table(&writer.connection[0].table)?
            .ok_or_else(|| Error::Config("No writer table found for autoCreateTable".into())),
        n => Err(Error::Config(format!(
            "autoCreateTable supports exactly one writer table, found {}",
            n
        ))),
    }
}

/// The first reader block wins: its first table, or else the table named by
/// its first querySql.
fn reader_connection_info(reader: &ReaderConfig) -> Result<ConnectionInfo> {
    let conn = reader
        .connection
        .first()
        .ok_or_else(|| Error::MissingValue("Reader has no connection".into()))?;
    let jdbc_url = conn
        .jdbc_url()
        .ok_or_else(|| Error::MissingValue("Reader connection[0] has no jdbcUrl".into()))?;

    let table_name = match first_table(&conn.table)? {
        Some(table) => Some(table),
        None => conn.query_sql.first().and_then(|sql| table_from_query(sql)),
    };

    Ok(ConnectionInfo {
        jdbc_url: jdbc_url.to_string(),
        username: reader.username.clone(),
        password: reader.password.clone(),
        table_name,
    })
}

fn writer_connection_info(writer: &WriterConfig, table: String) -> Result<ConnectionInfo> {
    let jdbc_url = writer
        .connection
        .first()
        .and_then(|conn| conn.jdbc_url())
        .ok_or_else(|| Error::MissingValue("Writer connection[0] has no jdbcUrl".into()))?;

    Ok(ConnectionInfo {
        jdbc_url: jdbc_url.to_string(),
        username: writer.username.clone(),
        password: writer.password.clone(),
        table_name: Some(table),
    })
}
