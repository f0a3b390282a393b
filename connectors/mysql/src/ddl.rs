use datasync_core::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CREATE_TABLE_PATTERN: Regex =
        Regex::new(r"(?i)\s*create\s+table\s+(`[^`]+`|\w+)").unwrap();
    static ref SELECT_FROM_PATTERN: Regex =
        Regex::new(r"(?i)\bfrom\s+((?:`[^`]+`|\w+)(?:\.(?:`[^`]+`|\w+))?)").unwrap();
}

/// Turns a source `CREATE TABLE` statement into one that targets another table.
pub trait CreateStatementRewriter: Send + Sync {
    fn rewrite_create_statement(&self, ddl: &str, new_table: &str) -> Result<String>;
}

/// Textual rewrite, not a SQL parser.
///
/// The table name token right after `CREATE TABLE` is located with a regex,
/// then the first occurrence of that exact text anywhere in the statement is
/// replaced with `IF NOT EXISTS <new_table>`. `SHOW CREATE TABLE` output names
/// the table once, right after the keywords; if the same text appeared earlier
/// in the statement, that earlier occurrence would be the one replaced.
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexRewriter;

impl CreateStatementRewriter for RegexRewriter {
    fn rewrite_create_statement(&self, ddl: &str, new_table: &str) -> Result<String> {
        let token = CREATE_TABLE_PATTERN
            .captures(ddl)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::query("Cannot locate source table name in DDL", ddl, new_table))?;

        let replacement = format!("IF NOT EXISTS {}", new_table);
        Ok(ddl.replacen(token, &replacement, 1))
    }
}

/// Table named after the first `FROM` keyword of a query, quoting kept as written.
pub fn table_from_query(sql: &str) -> Option<String> {
    SELECT_FROM_PATTERN
        .captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use datasync_core::ErrorKind;

    #[test]
    fn test_rewrite_quoted_table() {
        let ddl = "CREATE TABLE `orders` (id INT, name VARCHAR(10))";
        let sql = RegexRewriter
            .rewrite_create_statement(ddl, "orders_bak")
            .unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS orders_bak (id INT, name VARCHAR(10))"
        );
    }

    #[test]
    fn test_rewrite_show_create_output() {
        let ddl = "CREATE TABLE `customers` (\n  `id` bigint NOT NULL AUTO_INCREMENT,\n  `email` varchar(255) DEFAULT NULL,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";
        let sql = RegexRewriter
            .rewrite_create_statement(ddl, "customers_copy")
            .unwrap();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS customers_copy (\n  `id` bigint"));
        assert!(sql.ends_with("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"));
    }

    #[test]
    fn test_rewrite_is_case_insensitive() {
        let sql = RegexRewriter
            .rewrite_create_statement("create Table items (sku varchar(32))", "items_2024")
            .unwrap();
        assert_eq!(sql, "create Table IF NOT EXISTS items_2024 (sku varchar(32))");
    }

    #[test]
    fn test_rewrite_replaces_first_textual_occurrence() {
        // 已知行为：替换的是整条语句中第一次出现的表名文本
        let ddl = "/* orders */ CREATE TABLE orders (id INT)";
        let sql = RegexRewriter.rewrite_create_statement(ddl, "orders_bak").unwrap();
        assert_eq!(sql, "/* IF NOT EXISTS orders_bak */ CREATE TABLE orders (id INT)");
    }

    #[test]
    fn test_rewrite_without_table_name() {
        let err = RegexRewriter
            .rewrite_create_statement("CREATE VIEW v AS SELECT 1", "v_bak")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Query);
        assert!(err.to_string().contains("v_bak"));
    }

    #[test]
    fn test_table_from_query() {
        assert_eq!(
            table_from_query("SELECT * FROM customers WHERE id > 1").as_deref(),
            Some("customers")
        );
        assert_eq!(
            table_from_query("select id, name fRoM `orders` o join items i on o.id = i.oid")
                .as_deref(),
            Some("`orders`")
        );
        assert_eq!(
            table_from_query("SELECT a FROM shop.orders").as_deref(),
            Some("shop.orders")
        );
        assert_eq!(
            table_from_query("SELECT datefrom FROM audit").as_deref(),
            Some("audit")
        );
        assert_eq!(table_from_query("SELECT 1"), None);
    }
}
