pub mod backend;
pub mod daily_briefing;
pub mod financial_report;
pub mod flow;
pub mod project_progress;
pub mod prompts;

#[cfg(feature = "gemini")]
pub mod client;
#[cfg(feature = "gemini")]
pub mod types;

pub use backend::*;
pub use daily_briefing::*;
pub use financial_report::*;
pub use flow::*;
pub use project_progress::*;

#[cfg(feature = "gemini")]
pub use client::*;
