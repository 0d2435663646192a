use crate::error::Result;
use crate::llm::flow::{ReportFlow, Validate};
use crate::llm::prompts::{render_template, DAILY_BRIEFING_TEMPLATE, SYSTEM_PROMPT_DAILY_BRIEFING};
use crate::schema::{Project, ProjectStatus, Task, TaskStatus};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyBriefingInput {
    #[schemars(description = "Username of the person being briefed")]
    pub username: String,
    pub date: NaiveDate,
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
}

impl Validate for DailyBriefingInput {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.username.trim().is_empty() {
            return Err("username is empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyBriefing {
    #[schemars(description = "One-line greeting addressed to the user")]
    pub greeting: String,

    #[schemars(description = "Two to four sentences on overall project health")]
    pub summary: String,

    #[schemars(description = "Up to five concrete actions for today, most urgent first")]
    pub priorities: Vec<String>,
}

impl Validate for DailyBriefing {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.greeting.trim().is_empty() {
            return Err("greeting is empty".to_string());
        }
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DailyBriefingFlow;

impl ReportFlow for DailyBriefingFlow {
    type Input = DailyBriefingInput;
    type Response = DailyBriefing;
    type Output = DailyBriefing;

    fn name(&self) -> &'static str {
        "generate-daily-briefing"
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT_DAILY_BRIEFING
    }

    fn render_prompt(&self, input: &DailyBriefingInput) -> Result<String> {
        let active_projects: Vec<&Project> = input
            .projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Completed)
            .collect();

        // Undated tasks sort last.
        let mut open_tasks: Vec<&Task> = input
            .tasks
            .iter()
            .filter(|t| t.status != TaskStatus::Done)
            .collect();
        open_tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date));

        let prompt = render_template(
            DAILY_BRIEFING_TEMPLATE,
            &[
                ("username", input.username.trim()),
                ("date", input.date.to_string().as_str()),
                ("projects_json", serde_json::to_string_pretty(&active_projects)?.as_str()),
                ("tasks_json", serde_json::to_string_pretty(&open_tasks)?.as_str()),
            ],
        );
        Ok(prompt)
    }

    fn finish(&self, _input: &DailyBriefingInput, response: DailyBriefing) -> DailyBriefing {
        response
    }
}
