use crate::aggregate::{profit_margin, sum_cents};
use crate::error::{ReportError, Result};
use crate::money::{format_cents, format_currency, Cents};
use crate::period::DateRange;
use crate::schema::{Expense, Invoice, Project};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementLine {
    pub name: String,
    /// Set on revenue lines; two projects may share a display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub amount: Cents,
    pub count: usize,
}

/// Profit-and-loss statement for one window: revenue per project, expenses per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitAndLossStatement {
    pub organization_name: String,
    pub period: DateRange,
    pub revenue: Vec<StatementLine>,
    pub expenses: Vec<StatementLine>,
    pub total_revenue: Cents,
    pub total_expenses: Cents,
    pub net_profit: Cents,
    pub profit_margin: f64,
}

impl ProfitAndLossStatement {
    /// `paid_invoices` and `expenses` must already be filtered to `period`.
    /// Revenue is grouped per project id and labelled with the name from `projects` where
    /// known, else the id. Lines are ordered by name, then id.
    pub fn build(
        organization_name: &str,
        period: DateRange,
        paid_invoices: &[Invoice],
        expenses: &[Expense],
        projects: &[Project],
    ) -> Result<Self> {
        let project_names: BTreeMap<&str, &str> = projects
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str()))
            .collect();

        let revenue = group_lines(paid_invoices.iter().map(|invoice| {
            let id = invoice.project_id.as_str();
            let name = project_names.get(id).copied().unwrap_or(id);
            (name.to_string(), Some(id.to_string()), invoice.total)
        }))?;

        let expense_lines = group_lines(
            expenses
                .iter()
                .map(|expense| (expense.category.label().to_string(), None, expense.amount)),
        )?;

        let total_revenue = sum_cents(revenue.iter().map(|l| l.amount), "statement revenue")?;
        let total_expenses =
            sum_cents(expense_lines.iter().map(|l| l.amount), "statement expenses")?;
        let net_profit = total_revenue
            .checked_sub(total_expenses)
            .ok_or(ReportError::AmountOverflow("statement net profit"))?;

        Ok(Self {
            organization_name: organization_name.to_string(),
            period,
            revenue,
            expenses: expense_lines,
            total_revenue,
            total_expenses,
            net_profit,
            profit_margin: profit_margin(net_profit, total_revenue),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Amounts are written as plain decimals in major units.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["Section", "Line", "Count", "Amount"])?;

        for line in &self.revenue {
            write_line(&mut writer, "Revenue", line)?;
        }
        for line in &self.expenses {
            write_line(&mut writer, "Expenses", line)?;
        }
        for (label, amount) in [
            ("Revenue", self.total_revenue),
            ("Expenses", self.total_expenses),
            ("Net Profit", self.net_profit),
        ] {
            let amount = format_cents(amount);
            writer.write_record(["Total", label, "", amount.as_str()])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| {
            ReportError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    pub fn to_markdown(&self, currency_symbol: &str) -> String {
        let money = |cents| format_currency(cents, currency_symbol);
        let mut output = String::new();

        if self.organization_name.is_empty() {
            output.push_str("# Profit and Loss\n\n");
        } else {
            output.push_str(&format!("# Profit and Loss - {}\n\n", self.organization_name));
        }
        output.push_str(&format!("**Period:** {}\n\n", self.period));

        output.push_str("## Revenue\n\n");
        output.push_str("| Project | Invoices | Amount |\n|---|---:|---:|\n");
        for line in &self.revenue {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                line.name,
                line.count,
                money(line.amount)
            ));
        }
        output.push_str(&format!(
            "| **Total revenue** | | **{}** |\n\n",
            money(self.total_revenue)
        ));

        output.push_str("## Expenses\n\n");
        output.push_str("| Category | Entries | Amount |\n|---|---:|---:|\n");
        for line in &self.expenses {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                line.name,
                line.count,
                money(line.amount)
            ));
        }
        output.push_str(&format!(
            "| **Total expenses** | | **{}** |\n\n",
            money(self.total_expenses)
        ));

        output.push_str(&format!("**Net profit:** {}\n\n", money(self.net_profit)));
        output.push_str(&format!("**Profit margin:** {:.1}%\n", self.profit_margin));

        output
    }
}

fn write_line<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    section: &str,
    line: &StatementLine,
) -> Result<()> {
    let count = line.count.to_string();
    let amount = format_cents(line.amount);
    writer.write_record([section, line.name.as_str(), count.as_str(), amount.as_str()])?;
    Ok(())
}

fn group_lines(
    entries: impl Iterator<Item = (String, Option<String>, Cents)>,
) -> Result<Vec<StatementLine>> {
    // Keyed by (name, id): distinct projects never merge, and lines come out sorted by name.
    let mut grouped: BTreeMap<(String, Option<String>), (Cents, usize)> = BTreeMap::new();
    for (name, project_id, amount) in entries {
        let entry = grouped.entry((name, project_id)).or_insert((0, 0));
        entry.0 = entry
            .0
            .checked_add(amount)
            .ok_or(ReportError::AmountOverflow("statement lines"))?;
        entry.1 += 1;
    }

    Ok(grouped
        .into_iter()
        .map(|((name, project_id), (amount, count))| StatementLine {
            name,
            project_id,
            amount,
            count,
        })
        .collect())
}
