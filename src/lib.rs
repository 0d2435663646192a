//! # Project Finance Reports
//!
//! Period financial reports for a construction project ledger.
//!
//! ## Core Concepts
//!
//! - **Revenue**: the sum of `Paid` invoice totals issued inside the window. Draft, sent,
//!   overdue and partially paid invoices never count.
//! - **Expenses**: every expense dated inside the window.
//! - **Money**: integer cents throughout, so `net_profit == total_revenue - total_expenses`
//!   holds exactly. The profit margin is `0` when there is no revenue.
//! - **Local reports**: filter → aggregate → deterministic narrative text.
//! - **Flows**: the same data handed to a generative model with a fixed prompt and a JSON
//!   schema the reply must satisfy (financial report, daily briefing, project progress).
//!
//! ## Example
//!
//! ```rust,ignore
//! use project_finance_reports::*;
//! use chrono::NaiveDate;
//!
//! let store = InMemoryStore::from_path("ledger.json")?;
//! let generator = ReportGenerator::new(store, ReportConfig::new("Northside Builders"));
//!
//! let march = DateRange::new(
//!     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
//! );
//! let report = generator.generate(&march)?;
//! println!("{}", report.summary);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod llm;
pub mod money;
pub mod narrative;
pub mod period;
pub mod report;
pub mod schema;
pub mod statement;
pub mod store;

pub use aggregate::{profit_margin, CategorySummary, FinancialSummary};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use filter::{expenses_in_range, paid_invoices_in_range, within_range};
pub use ingestion::{import_expenses_csv, normalize_date, ImportError, ImportOptions, ImportResult};
pub use money::{format_cents, format_currency, parse_cents, Cents};
pub use narrative::{format_narrative, ProfitVerdict};
pub use period::{DateRange, ReportPeriod};
pub use report::{financial_report, FinancialReport, ReportGenerator};
pub use schema::*;
pub use statement::{ProfitAndLossStatement, StatementLine};
pub use store::{FinancialStore, InMemoryStore};

use chrono::NaiveDate;

/// Build a local report for `[start_date, end_date]` straight from a store.
pub fn generate_financial_report<S: FinancialStore>(
    store: &S,
    start_date: NaiveDate,
    end_date: NaiveDate,
    config: &ReportConfig,
) -> Result<FinancialReport> {
    let range = DateRange::new(start_date, end_date);
    let invoices = store.list_invoices(&range)?;
    let expenses = store.list_expenses(&range)?;
    financial_report(&invoices, &expenses, &range, config)
}
