/// Receives extracted values. Failed hosts are never recorded.
#[async_trait::async_trait]
pub trait ResultSink<Context: Sync> {
    type Error: std::error::Error + Send;

    async fn record(&mut self, context: &Context, value: &str) -> Result<(), Self::Error>;

    /// Persist everything recorded so far.
    async fn save(&mut self) -> Result<(), Self::Error>;
}
