use crate::aggregate::FinancialSummary;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::filter::{expenses_in_range, paid_invoices_in_range};
use crate::llm::{
    AiFinancialReport, DailyBriefing, DailyBriefingFlow, DailyBriefingInput, FinancialReportFlow,
    FinancialReportInput, FlowRunner, ModelBackend, ProjectProgressFlow, ProjectProgressInput,
    ProjectProgressSummary,
};
use crate::money::Cents;
use crate::narrative::format_narrative;
use crate::period::{DateRange, ReportPeriod};
use crate::schema::{Expense, Invoice};
use crate::statement::ProfitAndLossStatement;
use crate::store::FinancialStore;
use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Locally generated report. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub period: DateRange,
    pub summary: String,
    pub total_revenue: Cents,
    pub total_expenses: Cents,
    pub net_profit: Cents,
    pub profit_margin: f64,
}

/// Filter, aggregate and narrate in one step. Invoices and expenses may be unfiltered.
pub fn financial_report(
    invoices: &[Invoice],
    expenses: &[Expense],
    range: &DateRange,
    config: &ReportConfig,
) -> Result<FinancialReport> {
    let paid = paid_invoices_in_range(invoices, range);
    let selected = expenses_in_range(expenses, range);
    let summary = FinancialSummary::compute(&paid, &selected)?;

    Ok(FinancialReport {
        period: *range,
        summary: format_narrative(range, &summary, config),
        total_revenue: summary.total_revenue,
        total_expenses: summary.total_expenses,
        net_profit: summary.net_profit,
        profit_margin: summary.profit_margin,
    })
}

pub struct ReportGenerator<S> {
    store: S,
    config: ReportConfig,
}

impl<S: FinancialStore> ReportGenerator<S> {
    pub fn new(store: S, config: ReportConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    fn collect(&self, range: &DateRange) -> Result<(Vec<Invoice>, Vec<Expense>)> {
        let invoices = paid_invoices_in_range(&self.store.list_invoices(range)?, range);
        let expenses = expenses_in_range(&self.store.list_expenses(range)?, range);
        Ok((invoices, expenses))
    }

    pub fn summarize(&self, range: &DateRange) -> Result<FinancialSummary> {
        let (invoices, expenses) = self.collect(range)?;
        FinancialSummary::compute(&invoices, &expenses)
    }

    pub fn generate(&self, range: &DateRange) -> Result<FinancialReport> {
        if range.is_empty() {
            warn!("Report requested for inverted range {}", range);
        }
        let (invoices, expenses) = self.collect(range)?;
        info!(
            "Generating financial report for {}: {} paid invoices, {} expenses",
            range,
            invoices.len(),
            expenses.len()
        );
        financial_report(&invoices, &expenses, range, &self.config)
    }

    pub fn generate_for_period(
        &self,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<FinancialReport> {
        let range = period.resolve(today, self.config.fiscal_year_end_month)?;
        self.generate(&range)
    }

    pub fn statement(&self, range: &DateRange) -> Result<ProfitAndLossStatement> {
        let (invoices, expenses) = self.collect(range)?;
        let projects = self.store.list_projects()?;
        ProfitAndLossStatement::build(
            &self.config.organization_name,
            *range,
            &invoices,
            &expenses,
            &projects,
        )
    }

    /// Delegate the narrative to the model. Filtering happens here; the model only writes.
    pub async fn generate_with_model<B: ModelBackend>(
        &self,
        runner: &FlowRunner<B>,
        range: &DateRange,
    ) -> Result<AiFinancialReport> {
        let (invoices, expenses) = self.collect(range)?;
        info!(
            "Delegating financial report for {} ({} paid invoices, {} expenses)",
            range,
            invoices.len(),
            expenses.len()
        );

        let input = FinancialReportInput {
            start_date: range.start,
            end_date: range.end,
            invoices,
            expenses,
        };
        runner
            .run(&FinancialReportFlow::new(&self.config), input)
            .await
    }

    pub async fn daily_briefing<B: ModelBackend>(
        &self,
        runner: &FlowRunner<B>,
        username: &str,
        date: NaiveDate,
    ) -> Result<DailyBriefing> {
        let input = DailyBriefingInput {
            username: username.to_string(),
            date,
            projects: self.store.list_projects()?,
            tasks: self.store.list_tasks(None)?,
        };
        runner.run(&DailyBriefingFlow, input).await
    }

    pub async fn project_progress<B: ModelBackend>(
        &self,
        runner: &FlowRunner<B>,
        project_id: &str,
    ) -> Result<ProjectProgressSummary> {
        let input = ProjectProgressInput {
            project: self.store.get_project(project_id)?,
            tasks: self.store.list_tasks(Some(project_id))?,
        };
        runner.run(&ProjectProgressFlow, input).await
    }
}
