use crate::error::{ReportError, Result};
use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar window `[start, end]`.
///
/// A range with `start > end` is allowed and simply contains no dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Whole calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ReportError::DateError(format!("invalid month {}-{}", year, month)))?;
        Ok(Self::new(start, last_day_of_month(year, month)?))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Named reporting windows, resolved relative to a reference date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum ReportPeriod {
    ThisMonth,
    LastMonth,
    ThisQuarter,
    YearToDate,
    FiscalYearToDate,
}

impl ReportPeriod {
    /// Current-period presets end at `today`; `LastMonth` covers the whole previous month.
    pub fn resolve(&self, today: NaiveDate, fiscal_year_end_month: u32) -> Result<DateRange> {
        validate_fiscal_year_end_month(fiscal_year_end_month)?;

        let range = match self {
            ReportPeriod::ThisMonth => DateRange::new(first_day_of_month(today)?, today),
            ReportPeriod::LastMonth => {
                let (year, month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                DateRange::month(year, month)?
            }
            ReportPeriod::ThisQuarter => {
                let quarter_start_month = (today.month0() / 3) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), quarter_start_month, 1)
                    .ok_or_else(|| ReportError::DateError(format!("quarter start for {}", today)))?;
                DateRange::new(start, today)
            }
            ReportPeriod::YearToDate => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                    .ok_or_else(|| ReportError::DateError(format!("year start for {}", today)))?;
                DateRange::new(start, today)
            }
            ReportPeriod::FiscalYearToDate => {
                DateRange::new(fiscal_year_start_for_date(today, fiscal_year_end_month)?, today)
            }
        };

        Ok(range)
    }
}

pub fn first_day_of_month(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| ReportError::DateError(format!("first day of month for {}", date)))
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| ReportError::DateError(format!("last day of {}-{}", year, month)))
}

pub fn validate_fiscal_year_end_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidFiscalYearEndMonth(month));
    }
    Ok(())
}

/// First day of the fiscal year containing `date`.
///
/// # Examples
/// - FY ends Dec (12): 2024-05-10 -> 2024-01-01
/// - FY ends June (6): 2024-05-10 -> 2023-07-01, 2024-08-01 -> 2024-07-01
pub fn fiscal_year_start_for_date(date: NaiveDate, fiscal_year_end_month: u32) -> Result<NaiveDate> {
    validate_fiscal_year_end_month(fiscal_year_end_month)?;

    let start_month = if fiscal_year_end_month == 12 {
        1
    } else {
        fiscal_year_end_month + 1
    };

    let start_year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };

    NaiveDate::from_ymd_opt(start_year, start_month, 1)
        .ok_or_else(|| ReportError::DateError(format!("fiscal year start for {}", date)))
}
