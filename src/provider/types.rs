use std::future::Future;
use std::pin::Pin;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
}

pub type ProviderFuture = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send>>;

/// Model-call interface.
///
/// One prompt in, the raw generated text out. No retries.
pub trait Provider {
    fn name(&self) -> &'static str;

    fn generate(&self, req: GenerateRequest) -> ProviderFuture;
}
