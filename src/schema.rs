use crate::money::Cents;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum InvoiceStatus {
    #[schemars(description = "Being prepared, not yet sent to the client")]
    Draft,

    #[schemars(description = "Sent to the client, awaiting payment")]
    Sent,

    #[schemars(description = "Fully paid. The only status that counts as realized revenue.")]
    Paid,

    #[schemars(description = "Past its due date without full payment")]
    Overdue,

    #[schemars(description = "Partially paid")]
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    #[schemars(description = "Unit price in cents")]
    pub unit_price: Cents,
    #[schemars(description = "Line total in cents")]
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub project_id: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[schemars(description = "Sum of line items in cents")]
    pub subtotal: Cents,
    #[schemars(description = "Tax amount in cents")]
    pub tax: Cents,
    #[schemars(description = "Discount amount in cents")]
    pub discount: Cents,
    #[schemars(description = "Amount due in cents (subtotal + tax - discount)")]
    pub total: Cents,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
#[serde(rename_all = "PascalCase")]
pub enum ExpenseCategory {
    Materials,
    Labor,
    Equipment,
    Subcontractor,
    Permits,
    Fuel,
    Office,
    Utilities,
    Other,
}

impl ExpenseCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Materials => "Materials",
            ExpenseCategory::Labor => "Labor",
            ExpenseCategory::Equipment => "Equipment",
            ExpenseCategory::Subcontractor => "Subcontractor",
            ExpenseCategory::Permits => "Permits",
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::Office => "Office",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpenseCategory {
    type Err = std::convert::Infallible;

    /// Case-insensitive; anything unrecognised lands in `Other`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let category = match s.trim().to_ascii_lowercase().as_str() {
            "materials" | "material" => ExpenseCategory::Materials,
            "labor" | "labour" | "wages" => ExpenseCategory::Labor,
            "equipment" | "equipment rental" => ExpenseCategory::Equipment,
            "subcontractor" | "subcontractors" => ExpenseCategory::Subcontractor,
            "permits" | "permit" | "permits & fees" => ExpenseCategory::Permits,
            "fuel" => ExpenseCategory::Fuel,
            "office" | "office supplies" => ExpenseCategory::Office,
            "utilities" => ExpenseCategory::Utilities,
            _ => ExpenseCategory::Other,
        };
        Ok(category)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Expense {
    pub id: String,
    pub description: String,
    #[schemars(description = "Expense amount in cents")]
    pub amount: Cents,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    pub project_id: Option<String>,
    #[serde(default)]
    pub is_billable: bool,
    #[serde(default)]
    pub is_recurring: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client_id: String,
    pub status: ProjectStatus,
    #[schemars(description = "Approved budget in cents")]
    pub budget: Cents,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schemars(description = "Completion percentage, 0 to 100")]
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<String>,
}

/// Records that can be placed on a calendar for date-window filtering.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for Invoice {
    fn date(&self) -> NaiveDate {
        self.issue_date
    }
}

impl Dated for Expense {
    fn date(&self) -> NaiveDate {
        self.date
    }
}
