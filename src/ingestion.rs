use crate::error::{ReportError, Result};
use crate::money::parse_cents;
use crate::schema::{Expense, ExpenseCategory};
use chrono::NaiveDate;
use log::{debug, info};
use std::io::Read;

/// Accepted date layouts, tried in order. Day-first with dots, month-first with slashes.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub expenses: Vec<Expense>,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn imported(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Generated ids are `{id_prefix}{n}`, counting imported rows from 1.
    pub id_prefix: String,
    /// Used when the file has no project column or the cell is blank.
    pub default_project_id: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            id_prefix: "imp-".to_string(),
            default_project_id: None,
        }
    }
}

struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    category: Option<usize>,
    project: Option<usize>,
    billable: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_ascii_lowercase().as_str()))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| ReportError::MissingColumn(names[0].to_string()))
        };

        Ok(Self {
            date: require(&["date", "transaction date"])?,
            description: require(&["description", "memo", "details"])?,
            amount: require(&["amount", "value"])?,
            category: find(&["category"]),
            project: find(&["project_id", "project"]),
            billable: find(&["billable", "is_billable"]),
        })
    }
}

/// Read expenses from CSV with a header row.
///
/// Required columns: `date`, `description`, `amount`. Optional: `category`, `project_id`,
/// `billable`. A bad row is recorded in [`ImportResult::errors`] and skipped; only a missing
/// required column or an unreadable header fails the whole import.
pub fn import_expenses_csv<R: Read>(reader: R, options: &ImportOptions) -> Result<ImportResult> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?)?;
    let mut result = ImportResult::default();

    for (index, record) in csv_reader.records().enumerate() {
        // +2: header row, 1-based lines
        let fallback_line = index + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                result.errors.push(ImportError {
                    line: fallback_line,
                    field: None,
                    error: format!("CSV parse error: {}", e),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        match parse_row(&record, &columns, options, result.expenses.len() + 1) {
            Ok(expense) => result.expenses.push(expense),
            Err((field, error)) => {
                debug!("Skipping CSV line {}: {} ({})", line, error, field);
                result.errors.push(ImportError {
                    line,
                    field: Some(field.to_string()),
                    error,
                });
            }
        }
    }

    info!(
        "Imported {} expenses from CSV ({} rows rejected)",
        result.imported(),
        result.errors.len()
    );
    Ok(result)
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    options: &ImportOptions,
    sequence: usize,
) -> std::result::Result<Expense, (&'static str, String)> {
    let cell = |index: Option<usize>| index.and_then(|i| record.get(i)).unwrap_or("");

    let date_str = cell(Some(columns.date));
    let date = normalize_date(date_str)
        .ok_or_else(|| ("date", format!("Unrecognised date '{}'", date_str)))?;

    let description = cell(Some(columns.description));
    if description.is_empty() {
        return Err(("description", "Description is empty".to_string()));
    }

    // Bank exports list debits as negative numbers; an expense is always a positive amount.
    let amount = parse_cents(cell(Some(columns.amount)))
        .map_err(|e| ("amount", e.to_string()))?
        .abs();

    let category = cell(columns.category)
        .parse::<ExpenseCategory>()
        .unwrap_or(ExpenseCategory::Other);

    let project_id = match cell(columns.project) {
        "" => options.default_project_id.clone(),
        id => Some(id.to_string()),
    };

    let is_billable = matches!(
        cell(columns.billable).to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    );

    Ok(Expense {
        id: format!("{}{}", options.id_prefix, sequence),
        description: description.to_string(),
        amount,
        category,
        date,
        project_id,
        is_billable,
        is_recurring: false,
    })
}

/// Parse the date layouts found in bank and spreadsheet exports.
/// A trailing time component (`2024-03-05T10:00:00`, `2024-03-05 10:00`) is ignored.
pub fn normalize_date(input: &str) -> Option<NaiveDate> {
    let date_part = input
        .trim()
        .split(['T', ' '])
        .next()
        .unwrap_or_default();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("2024-03-05"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("2024/03/05"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("03/05/2024"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("3/5/2024"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("05.03.2024"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("2024-03-05T10:15:00Z"), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date(" 2024-03-05 08:00 "), Some(d(2024, 3, 5)));
        assert_eq!(normalize_date("March 5th"), None);
        assert_eq!(normalize_date("2024-02-30"), None);
    }

    #[test]
    fn test_import_with_bad_rows() {
        let csv = "\
Date,Description,Amount,Category,Project,Billable
2024-03-05,Concrete delivery,\"1,250.50\",Materials,p1,yes
03/07/2024,Crane hire,-800,equipment rental,,no
not-a-date,Broken row,10,Fuel,p1,no
2024-03-09,,10,Fuel,p1,no
2024-03-10,Lunch,abc,Other,p1,no
10.03.2024,Site fence permit,95,Permits & Fees,p2,1
";
        let options = ImportOptions {
            default_project_id: Some("general".to_string()),
            ..ImportOptions::default()
        };
        let result = import_expenses_csv(csv.as_bytes(), &options).unwrap();

        assert_eq!(result.imported(), 3);
        assert_eq!(result.errors.len(), 3);

        let concrete = &result.expenses[0];
        assert_eq!(concrete.id, "imp-1");
        assert_eq!(concrete.amount, 125_050);
        assert_eq!(concrete.category, ExpenseCategory::Materials);
        assert_eq!(concrete.project_id.as_deref(), Some("p1"));
        assert!(concrete.is_billable);

        let crane = &result.expenses[1];
        assert_eq!(crane.date, d(2024, 3, 7));
        assert_eq!(crane.amount, 80_000);
        assert_eq!(crane.category, ExpenseCategory::Equipment);
        assert_eq!(crane.project_id.as_deref(), Some("general"));
        assert!(!crane.is_billable);

        let permit = &result.expenses[2];
        assert_eq!(permit.id, "imp-3");
        assert_eq!(permit.date, d(2024, 3, 10));
        assert_eq!(permit.category, ExpenseCategory::Permits);

        assert_eq!(result.errors[0].line, 4);
        assert_eq!(result.errors[0].field.as_deref(), Some("date"));
        assert_eq!(result.errors[1].field.as_deref(), Some("description"));
        assert_eq!(result.errors[2].field.as_deref(), Some("amount"));
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Date,Amount\n2024-03-05,10\n";
        let result = import_expenses_csv(csv.as_bytes(), &ImportOptions::default());
        assert!(matches!(result, Err(ReportError::MissingColumn(ref c)) if c == "description"));
    }

    #[test]
    fn test_short_rows_are_reported_not_fatal() {
        let csv = "date,description,amount\n2024-03-05,Nails\n2024-03-06,Screws,4.20\n";
        let result = import_expenses_csv(csv.as_bytes(), &ImportOptions::default()).unwrap();
        assert_eq!(result.imported(), 1);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].field.as_deref(), Some("amount"));
        assert_eq!(result.expenses[0].category, ExpenseCategory::Other);
    }
}
