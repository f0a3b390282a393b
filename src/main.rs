mod cli;

use datasync_mysql::{AutoTableCreator, MySqlConnector};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let job = match cli::parse_config() {
        Ok(job) => job,
        Err(e) => {
            error!(kind = ?e.kind(), "Failed to load job config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let creator = AutoTableCreator::new(MySqlConnector::new());
    match creator.maybe_create_table(&job.reader, &job.writer).await {
        Ok(Some(_)) => {
            info!("Writer table prepared");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            info!("Nothing to prepare");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = ?e.kind(), "{}", e);
            ExitCode::FAILURE
        }
    }
}
