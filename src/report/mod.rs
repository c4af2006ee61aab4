pub mod json;
pub mod md;
pub mod scores;

use crate::error::ScoreError;
use crate::types::report::ScoreReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Scores,
    Md,
}

pub fn render(report: &ScoreReport, format: OutputFormat) -> Result<String, ScoreError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(ScoreError::Json),
        OutputFormat::Scores => scores::to_score_map(report).map_err(ScoreError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
