use crate::error::Result;
use crate::llm::flow::{ReportFlow, Validate};
use crate::llm::prompts::{
    render_template, PROJECT_PROGRESS_TEMPLATE, SYSTEM_PROMPT_PROJECT_PROGRESS,
};
use crate::schema::{Project, Task, TaskStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Attached to every progress summary regardless of what the model said.
pub const PROGRESS_MESSAGE: &str = "Generated a progress summary for the project.";

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProjectProgressInput {
    pub project: Project,
    #[schemars(description = "Tasks belonging to the project")]
    pub tasks: Vec<Task>,
}

impl Validate for ProjectProgressInput {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.project.id.trim().is_empty() {
            return Err("project id is empty".to_string());
        }
        if self.project.progress > 100 {
            return Err(format!(
                "project progress {} is above 100",
                self.project.progress
            ));
        }
        if let Some(stray) = self.tasks.iter().find(|t| t.project_id != self.project.id) {
            return Err(format!(
                "task '{}' belongs to project '{}', not '{}'",
                stray.id, stray.project_id, self.project.id
            ));
        }
        Ok(())
    }
}

/// The part of the result the model produces.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProgressSummaryResponse {
    #[schemars(description = "Plain-text progress summary of the project")]
    pub summary: String,
}

impl Validate for ProgressSummaryResponse {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgressSummary {
    pub summary: String,
    pub progress: String,
}

#[derive(Debug, Default)]
pub struct ProjectProgressFlow;

impl ReportFlow for ProjectProgressFlow {
    type Input = ProjectProgressInput;
    type Response = ProgressSummaryResponse;
    type Output = ProjectProgressSummary;

    fn name(&self) -> &'static str {
        "generate-project-progress-summary"
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT_PROJECT_PROGRESS
    }

    fn render_prompt(&self, input: &ProjectProgressInput) -> Result<String> {
        let count = |status: TaskStatus| input.tasks.iter().filter(|t| t.status == status).count();

        let prompt = render_template(
            PROJECT_PROGRESS_TEMPLATE,
            &[
                ("project_name", input.project.name.as_str()),
                ("project_json", serde_json::to_string_pretty(&input.project)?.as_str()),
                ("tasks_json", serde_json::to_string_pretty(&input.tasks)?.as_str()),
                ("done", count(TaskStatus::Done).to_string().as_str()),
                ("in_progress", count(TaskStatus::InProgress).to_string().as_str()),
                ("todo", count(TaskStatus::Todo).to_string().as_str()),
            ],
        );
        Ok(prompt)
    }

    fn finish(
        &self,
        _input: &ProjectProgressInput,
        response: ProgressSummaryResponse,
    ) -> ProjectProgressSummary {
        ProjectProgressSummary {
            summary: response.summary,
            progress: PROGRESS_MESSAGE.to_string(),
        }
    }
}
