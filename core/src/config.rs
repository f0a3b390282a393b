use crate::error::{Error, Result};
use jsonschema::Validator;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

lazy_static::lazy_static! {
    static ref JOB_SCHEMA: Validator = {
        let schema = include_str!("../schema/job.json");
        let schema = serde_json::from_str(schema).unwrap();
        Validator::new(&schema).unwrap()
    };
}

/// Reader and writer sides of one sync job.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub connection: Vec<ReaderConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderConnection {
    #[serde(default, deserialize_with = "one_or_many")]
    pub jdbc_url: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub table: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub query_sql: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub auto_create_table: bool,
    #[serde(default)]
    pub connection: Vec<WriterConnection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriterConnection {
    #[serde(default, deserialize_with = "one_or_many")]
    pub jdbc_url: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub table: Vec<String>,
}

impl ReaderConnection {
    pub fn jdbc_url(&self) -> Option<&str> {
        first_non_blank(&self.jdbc_url)
    }
}

impl WriterConnection {
    pub fn jdbc_url(&self) -> Option<&str> {
        first_non_blank(&self.jdbc_url)
    }
}

fn first_non_blank(values: &[String]) -> Option<&str> {
    values
        .first()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

impl JobConfig {
    pub fn from_json(value: Value) -> Result<Self> {
        if let Err(error) = JOB_SCHEMA.validate(&value) {
            return Err(Error::Config(format!(
                "Schema validation failed: {}",
                error
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("Invalid job config: {}", e)))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("Job file is not valid JSON: {}", e)))?;
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_config_parsing() {
        let config = JobConfig::from_json(json!({
            "reader": {
                "name": "mysqlreader",
                "username": "root",
                "password": "secret",
                "connection": [{
                    "jdbcUrl": ["jdbc:mysql://127.0.0.1:3306/shop"],
                    "querySql": "SELECT * FROM customers"
                }]
            },
            "writer": {
                "username": "root",
                "password": "secret",
                "autoCreateTable": true,
                "connection": [{
                    "jdbcUrl": "jdbc:mysql://127.0.0.1:3306/backup",
                    "table": ["customers_bak"]
                }]
            }
        }))
        .unwrap();

        let reader = &config.reader.connection[0];
        assert_eq!(reader.jdbc_url(), Some("jdbc:mysql://127.0.0.1:3306/shop"));
        assert!(reader.table.is_empty());
        assert_eq!(reader.query_sql, vec!["SELECT * FROM customers"]);

        assert!(config.writer.auto_create_table);
        let writer = &config.writer.connection[0];
        assert_eq!(writer.jdbc_url(), Some("jdbc:mysql://127.0.0.1:3306/backup"));
        assert_eq!(writer.table, vec!["customers_bak"]);
    }

    #[test]
    fn test_auto_create_defaults_to_false() {
        let config = JobConfig::from_json(json!({
            "reader": {},
            "writer": { "connection": [] }
        }))
        .unwrap();
        assert!(!config.writer.auto_create_table);
        assert!(config.reader.connection.is_empty());
    }

    #[test]
    fn test_blank_jdbc_url_is_none() {
        let conn = WriterConnection {
            jdbc_url: vec!["   ".to_string()],
            table: vec![],
        };
        assert_eq!(conn.jdbc_url(), None);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_json() {
        let path = std::env::temp_dir().join(format!("datasync-job-{}.json", std::process::id()));
        fs::write(&path, "{ \"reader\": ").unwrap();
        let err = JobConfig::load_from_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);

        let err = JobConfig::load_from_file("/nonexistent/datasync/job.json").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }

    #[test]
    fn test_schema_validation() {
        // 缺少 writer
        assert!(JobConfig::from_json(json!({ "reader": {} })).is_err());

        // 错误的字段类型
        let invalid = json!({
            "reader": {},
            "writer": { "autoCreateTable": "yes" }
        });
        assert!(JobConfig::from_json(invalid).is_err());

        let invalid = json!({
            "reader": { "connection": [{ "table": 42 }] },
            "writer": {}
        });
        assert!(JobConfig::from_json(invalid).is_err());
    }
}
