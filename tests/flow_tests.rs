mod common;

use common::*;
use project_finance_reports::llm::*;
use project_finance_reports::*;
use serde_json::json;

const MARCH_REPLY: &str = r#"{
    "title": "Financial Report - March 2024",
    "period": "2024-03-01 to 2024-03-31",
    "summary": "March closed with two paid invoices and healthy margins.",
    "totalRevenue": 24000.0,
    "totalExpenses": 11150.0,
    "netProfit": 12850.0,
    "recommendations": ["Chase the overdue clinic invoice", "Lock in timber prices for Q2"]
}"#;

#[tokio::test]
async fn test_financial_report_flow() {
    let generator = ReportGenerator::new(sample_store(), ReportConfig::new("Harbor Construction"));
    let runner = FlowRunner::new(StubBackend::replying(MARCH_REPLY));

    let report = generator.generate_with_model(&runner, &march()).await.unwrap();

    assert_eq!(report.title, "Financial Report - March 2024");
    assert_eq!(report.net_profit, 12850.0);
    assert_eq!(report.recommendations.len(), 2);
    assert_eq!(runner.backend().calls(), 1);

    let request = runner.backend().last_request().unwrap();
    assert_eq!(request.flow, "generate-financial-report");
    assert!(request.prompt.contains("Harbor Construction"));
    assert!(request.prompt.contains("INV-101"));
    assert!(request.prompt.contains("INV-103"));
    // Only paid invoices reach the model.
    assert!(!request.prompt.contains("INV-102"));
    assert!(!request.prompt.contains("INV-099"));
    assert!(request.prompt.contains("- Net profit: $12,850.00"));

    let properties = &request.response_schema["properties"];
    assert!(properties.get("netProfit").is_some());
    assert!(properties.get("recommendations").is_some());
}

#[tokio::test]
async fn test_model_reply_in_code_fence() {
    let fenced = format!("```json\n{}\n```", MARCH_REPLY);
    let runner = FlowRunner::new(StubBackend::replying(&fenced));
    let input = FinancialReportInput {
        start_date: date("2024-03-01"),
        end_date: date("2024-03-31"),
        invoices: vec![],
        expenses: vec![],
    };

    let report = runner.run(&FinancialReportFlow::default(), input).await.unwrap();
    assert_eq!(report.period, "2024-03-01 to 2024-03-31");
}

#[tokio::test]
async fn test_malformed_input_never_reaches_model() {
    let runner = FlowRunner::new(StubBackend::replying(MARCH_REPLY));

    // Missing `expenses`.
    let result = runner
        .run_json(
            &FinancialReportFlow::default(),
            json!({ "start_date": "2024-03-01", "end_date": "2024-03-31", "invoices": [] }),
        )
        .await;
    assert!(matches!(result, Err(ReportError::InvalidInput { .. })));

    // Wrong type for a date.
    let result = runner
        .run_json(
            &FinancialReportFlow::default(),
            json!({ "start_date": 20240301, "end_date": "2024-03-31", "invoices": [], "expenses": [] }),
        )
        .await;
    assert!(matches!(result, Err(ReportError::InvalidInput { .. })));

    assert_eq!(runner.backend().calls(), 0);
}

#[tokio::test]
async fn test_inverted_window_rejected_before_model() {
    let runner = FlowRunner::new(StubBackend::replying(MARCH_REPLY));
    let input = FinancialReportInput {
        start_date: date("2024-03-31"),
        end_date: date("2024-03-01"),
        invoices: vec![],
        expenses: vec![],
    };

    let result = runner.run(&FinancialReportFlow::default(), input).await;

    match result {
        Err(ReportError::InvalidInput { flow, details }) => {
            assert_eq!(flow, "generate-financial-report");
            assert!(details.contains("after"));
        }
        other => panic!("expected InvalidInput, got {:?}", other),
    }
    assert_eq!(runner.backend().calls(), 0);
}

#[tokio::test]
async fn test_model_failure_propagates() {
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::failing("quota exhausted"));

    let result = generator.generate_with_model(&runner, &march()).await;

    assert!(matches!(result, Err(ReportError::ModelCallFailed(ref m)) if m == "quota exhausted"));
    assert_eq!(runner.backend().calls(), 1);
}

#[tokio::test]
async fn test_inconsistent_model_figures_rejected() {
    let reply = json!({
        "title": "March",
        "period": "2024-03-01 to 2024-03-31",
        "summary": "Numbers that do not add up.",
        "totalRevenue": 24000.0,
        "totalExpenses": 11150.0,
        "netProfit": 15000.0,
        "recommendations": []
    })
    .to_string();
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::replying(&reply));

    let result = generator.generate_with_model(&runner, &march()).await;
    assert!(matches!(result, Err(ReportError::InvalidModelOutput { .. })));
}

#[tokio::test]
async fn test_reply_missing_field_rejected() {
    let runner = FlowRunner::new(StubBackend::replying(r#"{ "greeting": "Morning" }"#));
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());

    let result = generator
        .daily_briefing(&runner, "jordan", date("2024-03-18"))
        .await;

    match result {
        Err(ReportError::InvalidModelOutput { flow, .. }) => {
            assert_eq!(flow, "generate-daily-briefing")
        }
        other => panic!("expected InvalidModelOutput, got {:?}", other),
    }
}

#[tokio::test]
async fn test_daily_briefing() {
    let reply = json!({
        "greeting": "Good morning, jordan!",
        "summary": "Two projects are active and on schedule.",
        "priorities": ["Finish the depot flashing", "Order clinic drywall"]
    })
    .to_string();
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::replying(&reply));

    let briefing = generator
        .daily_briefing(&runner, "jordan", date("2024-03-18"))
        .await
        .unwrap();

    assert_eq!(briefing.greeting, "Good morning, jordan!");
    assert_eq!(briefing.priorities.len(), 2);

    let request = runner.backend().last_request().unwrap();
    assert_eq!(request.flow, "generate-daily-briefing");
    assert!(request.prompt.contains("jordan"));
    assert!(request.prompt.contains("2024-03-18"));
    assert!(request.prompt.contains("Depot Roof Replacement"));
    // Completed projects and finished tasks are left out.
    assert!(!request.prompt.contains("Warehouse Slab"));
    assert!(!request.prompt.contains("Task t1"));
}

#[tokio::test]
async fn test_blank_username_rejected() {
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::replying("{}"));

    let result = generator.daily_briefing(&runner, "  ", date("2024-03-18")).await;

    assert!(matches!(result, Err(ReportError::InvalidInput { .. })));
    assert_eq!(runner.backend().calls(), 0);
}

#[tokio::test]
async fn test_project_progress() {
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::replying(
        r#"{ "summary": "The depot roof is 45% complete with one task left to start." }"#,
    ));

    let summary = generator.project_progress(&runner, "p-depot").await.unwrap();

    assert_eq!(
        summary.summary,
        "The depot roof is 45% complete with one task left to start."
    );
    assert_eq!(summary.progress, PROGRESS_MESSAGE);

    let request = runner.backend().last_request().unwrap();
    assert_eq!(request.flow, "generate-project-progress-summary");
    assert!(request.prompt.contains("Depot Roof Replacement"));
    assert!(!request.prompt.contains("Task t4"));
}

#[tokio::test]
async fn test_unknown_project() {
    let generator = ReportGenerator::new(sample_store(), ReportConfig::default());
    let runner = FlowRunner::new(StubBackend::replying("{}"));

    let result = generator.project_progress(&runner, "p-missing").await;

    assert!(matches!(result, Err(ReportError::ProjectNotFound(ref id)) if id == "p-missing"));
    assert_eq!(runner.backend().calls(), 0);
}

#[tokio::test]
async fn test_runner_over_borrowed_backend() {
    let backend = StubBackend::replying(r#"{ "summary": "On track." }"#);
    let runner = FlowRunner::new(&backend);
    let input = ProjectProgressInput {
        project: project("p1", "Depot", ProjectStatus::InProgress),
        tasks: vec![task("t1", "p1", TaskStatus::Done, TaskPriority::Low)],
    };

    let summary = runner.run(&ProjectProgressFlow, input).await.unwrap();

    assert_eq!(summary.progress, PROGRESS_MESSAGE);
    assert_eq!(backend.calls(), 1);
}
