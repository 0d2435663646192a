use crate::error::{ReportError, Result};
use crate::money::Cents;
use crate::schema::{Expense, ExpenseCategory, Invoice};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: ExpenseCategory,
    pub total: Cents,
    pub count: usize,
    /// Share of total expenses, in percent.
    pub percentage: f64,
}

/// Scalars for one reporting window. Inputs are expected to be already filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_revenue: Cents,
    pub total_expenses: Cents,
    pub net_profit: Cents,
    pub profit_margin: f64,
    pub invoice_count: usize,
    pub expense_count: usize,
    pub average_invoice: Cents,
    pub average_expense: Cents,
    pub expense_breakdown: Vec<CategorySummary>,
}

impl FinancialSummary {
    pub fn compute(paid_invoices: &[Invoice], expenses: &[Expense]) -> Result<Self> {
        let total_revenue = sum_cents(paid_invoices.iter().map(|i| i.total), "invoice totals")?;
        let total_expenses = sum_cents(expenses.iter().map(|e| e.amount), "expense amounts")?;
        let net_profit = total_revenue
            .checked_sub(total_expenses)
            .ok_or(ReportError::AmountOverflow("net profit"))?;

        Ok(Self {
            total_revenue,
            total_expenses,
            net_profit,
            profit_margin: profit_margin(net_profit, total_revenue),
            invoice_count: paid_invoices.len(),
            expense_count: expenses.len(),
            average_invoice: average(total_revenue, paid_invoices.len()),
            average_expense: average(total_expenses, expenses.len()),
            expense_breakdown: expense_breakdown(expenses, total_expenses)?,
        })
    }

    pub fn is_profitable(&self) -> bool {
        self.net_profit > 0
    }
}

/// Net profit as a percentage of revenue; 0 when there is no revenue.
pub fn profit_margin(net_profit: Cents, total_revenue: Cents) -> f64 {
    if total_revenue > 0 {
        net_profit as f64 * 100.0 / total_revenue as f64
    } else {
        0.0
    }
}

pub fn sum_cents(amounts: impl IntoIterator<Item = Cents>, what: &'static str) -> Result<Cents> {
    amounts
        .into_iter()
        .try_fold(0i64, |acc, amount| acc.checked_add(amount))
        .ok_or(ReportError::AmountOverflow(what))
}

fn average(total: Cents, count: usize) -> Cents {
    if count == 0 {
        0
    } else {
        total / count as i64
    }
}

fn expense_breakdown(expenses: &[Expense], total_expenses: Cents) -> Result<Vec<CategorySummary>> {
    let mut by_category: BTreeMap<ExpenseCategory, (Cents, usize)> = BTreeMap::new();

    for expense in expenses {
        let entry = by_category.entry(expense.category).or_insert((0, 0));
        entry.0 = entry
            .0
            .checked_add(expense.amount)
            .ok_or(ReportError::AmountOverflow("category totals"))?;
        entry.1 += 1;
    }

    let mut breakdown: Vec<CategorySummary> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category,
            total,
            count,
            percentage: if total_expenses != 0 {
                total as f64 * 100.0 / total_expenses as f64
            } else {
                0.0
            },
        })
        .collect();

    // Largest spend first; ties keep category order.
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));
    Ok(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InvoiceStatus;
    use chrono::NaiveDate;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn paid(total: Cents) -> Invoice {
        Invoice {
            id: format!("inv-{}", total),
            client_id: "c1".to_string(),
            project_id: "p1".to_string(),
            line_items: vec![],
            subtotal: total,
            tax: 0,
            discount: 0,
            total,
            issue_date: d(),
            due_date: d(),
            status: InvoiceStatus::Paid,
        }
    }

    fn expense(amount: Cents, category: ExpenseCategory) -> Expense {
        Expense {
            id: format!("exp-{}", amount),
            description: "Site cost".to_string(),
            amount,
            category,
            date: d(),
            project_id: None,
            is_billable: false,
            is_recurring: false,
        }
    }

    #[test]
    fn test_basic_summary() {
        let summary = FinancialSummary::compute(
            &[paid(100_000)],
            &[expense(30_000, ExpenseCategory::Materials)],
        )
        .unwrap();

        assert_eq!(summary.total_revenue, 100_000);
        assert_eq!(summary.total_expenses, 30_000);
        assert_eq!(summary.net_profit, 70_000);
        assert!((summary.profit_margin - 70.0).abs() < 1e-9);
        assert!(summary.is_profitable());
    }

    #[test]
    fn test_zero_revenue_margin_is_zero() {
        let summary =
            FinancialSummary::compute(&[], &[expense(5_000, ExpenseCategory::Fuel)]).unwrap();

        assert_eq!(summary.net_profit, -5_000);
        assert_eq!(summary.profit_margin, 0.0);
        assert!(summary.profit_margin.is_finite());
    }

    #[test]
    fn test_empty_inputs() {
        let summary = FinancialSummary::compute(&[], &[]).unwrap();
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(summary.total_expenses, 0);
        assert_eq!(summary.net_profit, 0);
        assert_eq!(summary.profit_margin, 0.0);
        assert_eq!(summary.average_invoice, 0);
        assert_eq!(summary.average_expense, 0);
        assert!(summary.expense_breakdown.is_empty());
    }

    #[test]
    fn test_net_profit_identity() {
        let invoices = vec![paid(12_345), paid(67_891), paid(1)];
        let expenses = vec![
            expense(99_999, ExpenseCategory::Labor),
            expense(3, ExpenseCategory::Office),
        ];
        let summary = FinancialSummary::compute(&invoices, &expenses).unwrap();
        assert_eq!(
            summary.net_profit,
            summary.total_revenue - summary.total_expenses
        );
        assert_eq!(summary.total_revenue, 80_237);
        assert_eq!(summary.average_invoice, 80_237 / 3);
    }

    #[test]
    fn test_breakdown_sorted_by_spend() {
        let expenses = vec![
            expense(1_000, ExpenseCategory::Office),
            expense(6_000, ExpenseCategory::Labor),
            expense(3_000, ExpenseCategory::Office),
        ];
        let summary = FinancialSummary::compute(&[], &expenses).unwrap();

        assert_eq!(summary.expense_breakdown.len(), 2);
        assert_eq!(summary.expense_breakdown[0].category, ExpenseCategory::Labor);
        assert_eq!(summary.expense_breakdown[1].category, ExpenseCategory::Office);
        assert_eq!(summary.expense_breakdown[1].total, 4_000);
        assert_eq!(summary.expense_breakdown[1].count, 2);
        assert!((summary.expense_breakdown[0].percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_is_reported() {
        let result = sum_cents([i64::MAX, 1], "test amounts");
        assert!(matches!(result, Err(ReportError::AmountOverflow(_))));
    }
}
