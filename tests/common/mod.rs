use datasync_core::JobConfig;
use serde_json::json;
use std::env;

// 未设置 TEST_MYSQL_URL 时跳过需要数据库的测试
pub fn setup_mysql_env() -> Option<String> {
    env::var("TEST_MYSQL_URL").ok().filter(|url| !url.trim().is_empty())
}

// 创建读写两端都指向同一个库的作业配置
pub fn create_job_config(url: &str, source_table: &str, target_table: &str) -> JobConfig {
    JobConfig::from_json(json!({
        "reader": {
            "name": "mysqlreader",
            "connection": [{
                "jdbcUrl": [url],
                "table": [source_table]
            }]
        },
        "writer": {
            "name": "mysqlwriter",
            "autoCreateTable": true,
            "connection": [{
                "jdbcUrl": url,
                "table": [target_table]
            }]
        }
    }))
    .expect("job config should be valid")
}
