use crate::error::{ReportError, Result};
use crate::filter::within_range;
use crate::period::DateRange;
use crate::schema::{Expense, Invoice, Project, Task};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only access to the records reports are built from.
pub trait FinancialStore {
    /// Invoices issued within `range`, any status.
    fn list_invoices(&self, range: &DateRange) -> Result<Vec<Invoice>>;

    fn list_expenses(&self, range: &DateRange) -> Result<Vec<Expense>>;

    fn list_projects(&self) -> Result<Vec<Project>>;

    fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>>;

    fn get_project(&self, project_id: &str) -> Result<Project> {
        self.list_projects()?
            .into_iter()
            .find(|p| p.id == project_id)
            .ok_or_else(|| ReportError::ProjectNotFound(project_id.to_string()))
    }
}

/// Store backed by plain vectors, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(mut self, invoices: Vec<Invoice>) -> Self {
        self.invoices = invoices;
        self
    }

    pub fn with_expenses(mut self, expenses: Vec<Expense>) -> Self {
        self.expenses = expenses;
        self
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Load a JSON document shaped `{ "invoices": [...], "expenses": [...], "projects": [...], "tasks": [...] }`.
    /// Missing sections are treated as empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let store: Self = serde_json::from_str(json)?;
        debug!(
            "Loaded store with {} invoices, {} expenses, {} projects, {} tasks",
            store.invoices.len(),
            store.expenses.len(),
            store.projects.len(),
            store.tasks.len()
        );
        Ok(store)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

impl FinancialStore for InMemoryStore {
    fn list_invoices(&self, range: &DateRange) -> Result<Vec<Invoice>> {
        Ok(within_range(&self.invoices, range))
    }

    fn list_expenses(&self, range: &DateRange) -> Result<Vec<Expense>> {
        Ok(within_range(&self.expenses, range))
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    fn list_tasks(&self, project_id: Option<&str>) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|task| project_id.map_or(true, |id| task.project_id == id))
            .cloned()
            .collect())
    }
}
