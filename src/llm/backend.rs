use crate::error::Result;
use std::future::Future;

/// One structured-generation call: the model must answer with JSON matching `response_schema`.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub flow: &'static str,
    pub system_prompt: String,
    pub prompt: String,
    pub response_schema: serde_json::Value,
}

/// The external "invoke model" facility. Returns the raw JSON text of the reply or fails.
///
/// Implementations make exactly one attempt per call; there is no retry at this layer.
pub trait ModelBackend: Send + Sync {
    fn generate(&self, request: ModelRequest) -> impl Future<Output = Result<String>> + Send;
}

impl<B: ModelBackend> ModelBackend for &B {
    fn generate(&self, request: ModelRequest) -> impl Future<Output = Result<String>> + Send {
        (**self).generate(request)
    }
}
