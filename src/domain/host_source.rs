use crate::domain::Host;

/// Supplies hosts one grouping at a time.
#[async_trait::async_trait]
pub trait HostSource {
    type Error: std::error::Error + Send;
    /// Routes a result back to where its host came from.
    type Context: Send + 'static;

    async fn groups(&mut self) -> Result<Vec<String>, Self::Error>;

    async fn hosts(&mut self, group: &str) -> Result<Vec<Host<Self::Context>>, Self::Error>;
}
