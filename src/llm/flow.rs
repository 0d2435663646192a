use crate::error::{ReportError, Result};
use crate::llm::backend::{ModelBackend, ModelRequest};
use log::{debug, info, warn};
use schemars::gen::SchemaSettings;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Semantic checks that the type system can't express.
/// The error string ends up in `InvalidInput` / `InvalidModelOutput`.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// A named prompt template plus its input and output schemas.
pub trait ReportFlow {
    type Input: Serialize + DeserializeOwned + JsonSchema + Validate;
    /// What the model must return; its JSON schema is sent with the request.
    type Response: DeserializeOwned + JsonSchema + Validate;
    type Output;

    fn name(&self) -> &'static str;

    fn system_prompt(&self) -> &str;

    fn render_prompt(&self, input: &Self::Input) -> Result<String>;

    /// Turn the validated model reply into the flow's result.
    fn finish(&self, input: &Self::Input, response: Self::Response) -> Self::Output;
}

/// Dispatches flows to a model backend: validate input, render, call once, validate output.
pub struct FlowRunner<B> {
    backend: B,
}

impl<B: ModelBackend> FlowRunner<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn run<F: ReportFlow>(&self, flow: &F, input: F::Input) -> Result<F::Output> {
        input.validate().map_err(|details| {
            warn!("Flow '{}' rejected its input: {}", flow.name(), details);
            ReportError::InvalidInput {
                flow: flow.name().to_string(),
                details,
            }
        })?;

        let request = ModelRequest {
            flow: flow.name(),
            system_prompt: flow.system_prompt().to_string(),
            prompt: flow.render_prompt(&input)?,
            response_schema: response_schema::<F::Response>()?,
        };

        info!("Running flow '{}'", flow.name());
        debug!("Prompt for '{}' is {} bytes", flow.name(), request.prompt.len());

        let raw = self.backend.generate(request).await.map_err(|e| {
            warn!("Flow '{}' model call failed: {}", flow.name(), e);
            e
        })?;

        let response = parse_response::<F::Response>(flow.name(), &raw)?;
        info!("Flow '{}' completed", flow.name());

        Ok(flow.finish(&input, response))
    }

    /// Same as [`FlowRunner::run`] for untyped callers; a body that doesn't match the
    /// input schema is rejected before the backend is touched.
    pub async fn run_json<F: ReportFlow>(
        &self,
        flow: &F,
        input: serde_json::Value,
    ) -> Result<F::Output> {
        let input: F::Input =
            serde_json::from_value(input).map_err(|e| ReportError::InvalidInput {
                flow: flow.name().to_string(),
                details: e.to_string(),
            })?;
        self.run(flow, input).await
    }
}

/// JSON schema for `T` with every subschema inlined (no `$ref`), which is what
/// structured-output endpoints accept.
pub fn response_schema<T: JsonSchema>() -> Result<serde_json::Value> {
    let settings = SchemaSettings::openapi3().with(|s| {
        s.inline_subschemas = true;
        s.meta_schema = None;
    });
    let schema = settings.into_generator().into_root_schema_for::<T>();
    Ok(serde_json::to_value(schema)?)
}

pub fn input_schema<F: ReportFlow>() -> Result<serde_json::Value> {
    response_schema::<F::Input>()
}

pub(crate) fn parse_response<T: DeserializeOwned + Validate>(flow: &str, raw: &str) -> Result<T> {
    let invalid = |details: String| {
        warn!("Flow '{}' returned invalid output: {}", flow, details);
        ReportError::InvalidModelOutput {
            flow: flow.to_string(),
            details,
        }
    };

    let cleaned = clean_json_output(raw);
    let value: T = serde_json::from_str(cleaned).map_err(|e| invalid(e.to_string()))?;
    value.validate().map_err(invalid)?;
    Ok(value)
}

/// Models sometimes wrap JSON in prose or code fences; keep the outermost object.
fn clean_json_output(raw: &str) -> &str {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            return &raw[start..=end];
        }
    }
    raw.trim()
}
