use crate::aggregate::FinancialSummary;
use crate::config::ReportConfig;
use crate::money::format_currency;
use crate::period::DateRange;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many categories the narrative lists under "Top expense categories".
const TOP_CATEGORIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitVerdict {
    Profitable,
    BreakEven,
    Loss,
}

impl ProfitVerdict {
    pub fn from_net_profit(net_profit: i64) -> Self {
        match net_profit {
            n if n > 0 => ProfitVerdict::Profitable,
            0 => ProfitVerdict::BreakEven,
            _ => ProfitVerdict::Loss,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitVerdict::Profitable => "Profitable",
            ProfitVerdict::BreakEven => "Break-even",
            ProfitVerdict::Loss => "Loss",
        }
    }
}

impl fmt::Display for ProfitVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render the plain-text report body. Deterministic: same inputs, same text.
pub fn format_narrative(
    period: &DateRange,
    summary: &FinancialSummary,
    config: &ReportConfig,
) -> String {
    let money = |cents| format_currency(cents, &config.currency_symbol);
    let verdict = ProfitVerdict::from_net_profit(summary.net_profit);
    let subject = if config.organization_name.is_empty() {
        "the business"
    } else {
        config.organization_name.as_str()
    };

    let mut output = String::new();

    output.push_str(&format!("Financial Report: {}\n", period));
    if !config.organization_name.is_empty() {
        output.push_str(&format!("Organization: {}\n", config.organization_name));
    }
    output.push('\n');

    output.push_str("Overview\n");
    output.push_str(&format!(
        "During this period, {} collected {} in revenue from {} (average {} per invoice) \
         and recorded {} in expenses across {} (average {} per expense).\n\n",
        subject,
        money(summary.total_revenue),
        plural(summary.invoice_count, "paid invoice", "paid invoices"),
        money(summary.average_invoice),
        money(summary.total_expenses),
        plural(summary.expense_count, "expense entry", "expense entries"),
        money(summary.average_expense),
    ));

    output.push_str(&format!("Net profit: {}\n", money(summary.net_profit)));
    output.push_str(&format!("Profit margin: {:.1}%\n", summary.profit_margin));
    output.push_str(&format!("Status: {}\n\n", verdict));

    output.push_str("Key insights\n");
    match verdict {
        ProfitVerdict::Profitable => {
            output.push_str(&format!(
                "- Revenue exceeded expenses by {}, a {:.1}% margin.\n",
                money(summary.net_profit),
                summary.profit_margin
            ));
            output.push_str(
                "- The period generated a surplus that can fund upcoming project costs or reserves.\n",
            );
        }
        ProfitVerdict::BreakEven => {
            output.push_str("- Revenue exactly covered expenses for the period.\n");
            output.push_str(
                "- Any additional cost would have produced a loss; review pricing on open projects.\n",
            );
        }
        ProfitVerdict::Loss => {
            output.push_str(&format!(
                "- Expenses exceeded revenue by {}.\n",
                money(summary.net_profit.saturating_neg())
            ));
            output.push_str(
                "- Review the largest cost categories and follow up on unpaid invoices.\n",
            );
        }
    }

    if !summary.expense_breakdown.is_empty() {
        output.push_str("\nTop expense categories\n");
        for category in summary.expense_breakdown.iter().take(TOP_CATEGORIES) {
            output.push_str(&format!(
                "- {}: {} ({:.1}% of expenses)\n",
                category.category,
                money(category.total),
                category.percentage
            ));
        }
    }

    output
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {}", singular)
    } else {
        format!("{} {}", count, plural)
    }
}
