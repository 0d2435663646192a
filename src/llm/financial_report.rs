use crate::aggregate::FinancialSummary;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::filter::{expenses_in_range, paid_invoices_in_range};
use crate::llm::flow::{ReportFlow, Validate};
use crate::llm::prompts::{
    render_template, FINANCIAL_REPORT_TEMPLATE, SYSTEM_PROMPT_FINANCIAL_REPORT,
};
use crate::money::format_currency;
use crate::period::DateRange;
use crate::schema::{Expense, Invoice};
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest accepted gap between `netProfit` and `totalRevenue - totalExpenses`, in currency units.
const NET_PROFIT_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FinancialReportInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schemars(description = "Paid invoices issued within the window")]
    pub invoices: Vec<Invoice>,
    #[schemars(description = "Expenses dated within the window")]
    pub expenses: Vec<Expense>,
}

impl FinancialReportInput {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

impl Validate for FinancialReportInput {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.start_date > self.end_date {
            return Err(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiFinancialReport {
    #[schemars(description = "Short report title, e.g. 'Financial Report - March 2024'")]
    pub title: String,

    #[schemars(description = "The reporting window, e.g. '2024-03-01 to 2024-03-31'")]
    pub period: String,

    #[schemars(description = "Two or three paragraphs summarising performance over the period")]
    pub summary: String,

    #[schemars(description = "Sum of paid invoice totals, in major currency units")]
    pub total_revenue: f64,

    #[schemars(description = "Sum of expense amounts, in major currency units")]
    pub total_expenses: f64,

    #[schemars(description = "totalRevenue minus totalExpenses, in major currency units")]
    pub net_profit: f64,

    #[schemars(description = "Actionable recommendations for the business")]
    pub recommendations: Vec<String>,
}

impl Validate for AiFinancialReport {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        if self.summary.trim().is_empty() {
            return Err("summary is empty".to_string());
        }
        for (field, value) in [
            ("totalRevenue", self.total_revenue),
            ("totalExpenses", self.total_expenses),
            ("netProfit", self.net_profit),
        ] {
            if !value.is_finite() {
                return Err(format!("{} is not a finite number", field));
            }
        }
        let expected = self.total_revenue - self.total_expenses;
        if (self.net_profit - expected).abs() > NET_PROFIT_TOLERANCE {
            return Err(format!(
                "netProfit {} does not equal totalRevenue - totalExpenses ({})",
                self.net_profit, expected
            ));
        }
        if self.recommendations.iter().any(|r| r.trim().is_empty()) {
            return Err("recommendations contain an empty entry".to_string());
        }
        Ok(())
    }
}

pub struct FinancialReportFlow {
    organization_name: String,
    currency_symbol: String,
}

impl FinancialReportFlow {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            organization_name: config.organization_name.clone(),
            currency_symbol: config.currency_symbol.clone(),
        }
    }
}

impl Default for FinancialReportFlow {
    fn default() -> Self {
        Self::new(&ReportConfig::default())
    }
}

impl ReportFlow for FinancialReportFlow {
    type Input = FinancialReportInput;
    type Response = AiFinancialReport;
    type Output = AiFinancialReport;

    fn name(&self) -> &'static str {
        "generate-financial-report"
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT_FINANCIAL_REPORT
    }

    fn render_prompt(&self, input: &FinancialReportInput) -> Result<String> {
        let range = input.range();
        let invoices = paid_invoices_in_range(&input.invoices, &range);
        let expenses = expenses_in_range(&input.expenses, &range);
        let summary = FinancialSummary::compute(&invoices, &expenses)?;

        let money = |cents| format_currency(cents, &self.currency_symbol);
        let reference_figures = format!(
            "- Total revenue: {} ({} paid invoices)\n\
             - Total expenses: {} ({} expenses)\n\
             - Net profit: {}\n\
             - Profit margin: {:.1}%",
            money(summary.total_revenue),
            summary.invoice_count,
            money(summary.total_expenses),
            summary.expense_count,
            money(summary.net_profit),
            summary.profit_margin
        );

        let organization = if self.organization_name.is_empty() {
            "the business"
        } else {
            self.organization_name.as_str()
        };

        let prompt = render_template(
            FINANCIAL_REPORT_TEMPLATE,
            &[
                ("organization", organization),
                ("start_date", input.start_date.to_string().as_str()),
                ("end_date", input.end_date.to_string().as_str()),
                ("reference_figures", reference_figures.as_str()),
                ("invoices_json", serde_json::to_string_pretty(&invoices)?.as_str()),
                ("expenses_json", serde_json::to_string_pretty(&expenses)?.as_str()),
            ],
        );
        Ok(prompt)
    }

    fn finish(&self, _input: &FinancialReportInput, response: AiFinancialReport) -> AiFinancialReport {
        response
    }
}
