use clap::Parser;
use datasync_core::{JobConfig, Result};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 作业配置文件路径
    #[arg(short, long, default_value = "job.json")]
    config: PathBuf,

    /// 日志级别，RUST_LOG 优先
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

pub fn parse_config() -> Result<JobConfig> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or(cli.log_level))
        .init();

    JobConfig::load_from_file(&cli.config)
}
