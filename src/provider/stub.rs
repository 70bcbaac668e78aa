use super::{GenerateRequest, Provider, ProviderFuture};

/// Offline provider that answers every prompt with the same text.
#[derive(Debug, Clone)]
pub struct StubProvider {
    reply: String,
}

impl StubProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl Provider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn generate(&self, req: GenerateRequest) -> ProviderFuture {
        let reply = self.reply.clone();
        Box::pin(async move {
            tracing::debug!(model = %req.model, prompt_len = req.prompt.len(), "stub provider called");
            Ok(reply)
        })
    }
}
