use crate::Result;
use async_trait::async_trait;

/// One result row with every column rendered as text; `None` is SQL NULL.
pub type TextRow = Vec<Option<String>>;

#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<Box<dyn Connection>>;
}

/// A single open database session. Callers must `close` it once done,
/// whatever the outcome of the statements run on it.
#[async_trait]
pub trait Connection: Send {
    async fn query_first_row(&mut self, sql: &str) -> Result<Option<TextRow>>;
    async fn execute(&mut self, sql: &str) -> Result<u64>;
    async fn close(self: Box<Self>) -> Result<()>;
}
