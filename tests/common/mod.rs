// Shared by several test binaries; not every helper is used by each.
#![allow(dead_code)]

use chrono::NaiveDate;
use project_finance_reports::llm::{ModelBackend, ModelRequest};
use project_finance_reports::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn invoice(id: &str, project_id: &str, total: Cents, status: InvoiceStatus, issued: &str) -> Invoice {
    Invoice {
        id: id.to_string(),
        client_id: "client-harbor".to_string(),
        project_id: project_id.to_string(),
        line_items: vec![],
        subtotal: total,
        tax: 0,
        discount: 0,
        total,
        issue_date: date(issued),
        due_date: date(issued),
        status,
    }
}

pub fn expense(id: &str, amount: Cents, category: ExpenseCategory, on: &str) -> Expense {
    Expense {
        id: id.to_string(),
        description: format!("{} purchase", category),
        amount,
        category,
        date: date(on),
        project_id: Some("p-depot".to_string()),
        is_billable: false,
        is_recurring: false,
    }
}

pub fn project(id: &str, name: &str, status: ProjectStatus) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        client_id: "client-harbor".to_string(),
        status,
        budget: 12_000_000,
        start_date: date("2024-01-08"),
        end_date: Some(date("2024-09-30")),
        progress: 45,
    }
}

pub fn task(id: &str, project_id: &str, status: TaskStatus, priority: TaskPriority) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: format!("Task {}", id),
        status,
        priority,
        due_date: Some(date("2024-03-20")),
        assignee: Some("jordan".to_string()),
    }
}

/// A small construction ledger covering Feb to Apr 2024.
pub fn sample_store() -> InMemoryStore {
    InMemoryStore::new()
        .with_invoices(vec![
            invoice("INV-101", "p-depot", 1_500_000, InvoiceStatus::Paid, "2024-03-04"),
            invoice("INV-102", "p-depot", 400_000, InvoiceStatus::Sent, "2024-03-11"),
            invoice("INV-103", "p-clinic", 900_000, InvoiceStatus::Paid, "2024-03-28"),
            invoice("INV-104", "p-clinic", 250_000, InvoiceStatus::Overdue, "2024-03-15"),
            invoice("INV-099", "p-depot", 700_000, InvoiceStatus::Paid, "2024-02-20"),
            invoice("INV-105", "p-clinic", 300_000, InvoiceStatus::Paid, "2024-04-02"),
        ])
        .with_expenses(vec![
            expense("EXP-1", 420_000, ExpenseCategory::Materials, "2024-03-05"),
            expense("EXP-2", 610_000, ExpenseCategory::Labor, "2024-03-15"),
            expense("EXP-3", 85_000, ExpenseCategory::Equipment, "2024-03-31"),
            expense("EXP-0", 50_000, ExpenseCategory::Fuel, "2024-02-28"),
        ])
        .with_projects(vec![
            project("p-depot", "Depot Roof Replacement", ProjectStatus::InProgress),
            project("p-clinic", "Eastside Clinic Fit-out", ProjectStatus::InProgress),
            project("p-old", "Warehouse Slab", ProjectStatus::Completed),
        ])
        .with_tasks(vec![
            task("t1", "p-depot", TaskStatus::Done, TaskPriority::High),
            task("t2", "p-depot", TaskStatus::InProgress, TaskPriority::High),
            task("t3", "p-depot", TaskStatus::Todo, TaskPriority::Low),
            task("t4", "p-clinic", TaskStatus::Todo, TaskPriority::Medium),
        ])
}

pub fn march() -> DateRange {
    DateRange::new(date("2024-03-01"), date("2024-03-31"))
}

/// Model stand-in that records every request and answers with a fixed reply.
pub struct StubBackend {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ModelRequest>>,
}

impl StubBackend {
    pub fn replying(json: &str) -> Self {
        Self {
            reply: Ok(json.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ModelRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl ModelBackend for StubBackend {
    async fn generate(&self, request: ModelRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        match &self.reply {
            Ok(json) => Ok(json.clone()),
            Err(message) => Err(ReportError::ModelCallFailed(message.clone())),
        }
    }
}
