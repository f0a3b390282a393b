use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    MySql,
    PostgreSql,
    Oracle,
    SqlServer,
    Other,
}

impl DatabaseType {
    /// Detects the engine from a JDBC (or driver) URL by substring.
    /// `mysql` is checked first, so any URL mentioning it counts as MySQL.
    pub fn from_url(url: &str) -> Self {
        let url = url.to_lowercase();
        if url.contains("mysql") {
            DatabaseType::MySql
        } else if url.contains("postgresql") {
            DatabaseType::PostgreSql
        } else if url.contains("oracle") {
            DatabaseType::Oracle
        } else if url.contains("sqlserver") {
            DatabaseType::SqlServer
        } else {
            DatabaseType::Other
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatabaseType::MySql => "mysql",
            DatabaseType::PostgreSql => "postgresql",
            DatabaseType::Oracle => "oracle",
            DatabaseType::SqlServer => "sqlserver",
            DatabaseType::Other => "unknown",
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
