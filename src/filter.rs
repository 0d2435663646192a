use crate::period::DateRange;
use crate::schema::{Dated, Expense, Invoice};
use log::debug;

/// Records whose date falls inside `range` (inclusive on both ends), in input order.
pub fn within_range<T: Dated + Clone>(records: &[T], range: &DateRange) -> Vec<T> {
    records
        .iter()
        .filter(|record| range.contains(record.date()))
        .cloned()
        .collect()
}

/// Paid invoices issued inside `range`. Any other status is excluded even when in range.
pub fn paid_invoices_in_range(invoices: &[Invoice], range: &DateRange) -> Vec<Invoice> {
    let paid: Vec<Invoice> = invoices
        .iter()
        .filter(|invoice| invoice.is_paid() && range.contains(invoice.issue_date))
        .cloned()
        .collect();

    debug!(
        "{} of {} invoices are paid within {}",
        paid.len(),
        invoices.len(),
        range
    );
    paid
}

pub fn expenses_in_range(expenses: &[Expense], range: &DateRange) -> Vec<Expense> {
    let selected = within_range(expenses, range);
    debug!(
        "{} of {} expenses fall within {}",
        selected.len(),
        expenses.len(),
        range
    );
    selected
}
