use chrono::NaiveDate;
use dotenv::dotenv;
use project_finance_reports::llm::{FlowRunner, GeminiClient};
use project_finance_reports::*;
use std::error::Error;
use std::result::Result;

fn day(y: i32, m: u32, d: u32) -> Result<NaiveDate, Box<dyn Error>> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| format!("invalid date {y}-{m}-{d}").into())
}

fn sample_store() -> Result<InMemoryStore, Box<dyn Error>> {
    let invoice = |id: &str, project: &str, total: Cents, status, issued| Invoice {
        id: id.to_string(),
        client_id: "harbor-logistics".to_string(),
        project_id: project.to_string(),
        line_items: vec![],
        subtotal: total,
        tax: 0,
        discount: 0,
        total,
        issue_date: issued,
        due_date: issued,
        status,
    };
    let expense = |id: &str, description: &str, amount: Cents, category, date| Expense {
        id: id.to_string(),
        description: description.to_string(),
        amount,
        category,
        date,
        project_id: Some("depot".to_string()),
        is_billable: false,
        is_recurring: false,
    };

    Ok(InMemoryStore::new()
        .with_invoices(vec![
            invoice("INV-201", "depot", 1_850_000, InvoiceStatus::Paid, day(2024, 3, 4)?),
            invoice("INV-202", "depot", 640_000, InvoiceStatus::Sent, day(2024, 3, 18)?),
            invoice("INV-203", "clinic", 920_000, InvoiceStatus::Paid, day(2024, 3, 22)?),
        ])
        .with_expenses(vec![
            expense("EXP-11", "Roofing membrane", 512_000, ExpenseCategory::Materials, day(2024, 3, 6)?),
            expense("EXP-12", "Crew wages", 780_000, ExpenseCategory::Labor, day(2024, 3, 15)?),
            expense("EXP-13", "Telehandler hire", 145_000, ExpenseCategory::Equipment, day(2024, 3, 20)?),
            expense("EXP-14", "Site diesel", 38_500, ExpenseCategory::Fuel, day(2024, 3, 27)?),
        ])
        .with_projects(vec![
            Project {
                id: "depot".to_string(),
                name: "Depot Roof Replacement".to_string(),
                client_id: "harbor-logistics".to_string(),
                status: ProjectStatus::InProgress,
                budget: 6_500_000,
                start_date: day(2024, 2, 12)?,
                end_date: Some(day(2024, 5, 31)?),
                progress: 55,
            },
            Project {
                id: "clinic".to_string(),
                name: "Eastside Clinic Fit-out".to_string(),
                client_id: "eastside-health".to_string(),
                status: ProjectStatus::InProgress,
                budget: 4_200_000,
                start_date: day(2024, 1, 8)?,
                end_date: None,
                progress: 30,
            },
        ]))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    println!("📊 Project Finance Report Demonstration");
    println!("═══════════════════════════════════════════════════════════════\n");

    let config = ReportConfig::new("Harbor Construction").with_currency_symbol("$");
    let generator = ReportGenerator::new(sample_store()?, config);
    let march = DateRange::month(2024, 3)?;

    // 1. Local report
    let report = generator.generate(&march)?;
    println!("{}", report.summary);

    let statement = generator.statement(&march)?;
    println!("{}", statement.to_markdown("$"));

    // 2. Model-written report
    let client = match GeminiClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            println!("⚠️  {e}. Set GEMINI_API_KEY to run the model flows.");
            return Ok(());
        }
    };
    let runner = FlowRunner::new(client);

    println!("🤖 Asking {} for a financial report...", runner.backend().model());
    let ai_report = generator.generate_with_model(&runner, &march).await?;
    println!("\n{} ({})", ai_report.title, ai_report.period);
    println!("{}\n", ai_report.summary);
    println!(
        "Revenue {:.2} | Expenses {:.2} | Net {:.2}",
        ai_report.total_revenue, ai_report.total_expenses, ai_report.net_profit
    );
    for recommendation in &ai_report.recommendations {
        println!("  • {}", recommendation);
    }

    // 3. Project progress
    let progress = generator.project_progress(&runner, "depot").await?;
    println!("\n🏗️  {}\n{}", progress.progress, progress.summary);

    Ok(())
}
