//! Terminal output for one-shot commands

use chd_common::display::{badge, gauge, summary_box, StatusLevel};
use chd_common::ui_colors::{format_probability, format_probability_colored, COLOR_INFO};
use chd_common::{
    Assessment, AssessmentSummary, ModelMetadata, PatientRecord, PipelineSummary, RECOMMENDATION,
};
use owo_colors::OwoColorize;
use serde::Serialize;

const GAUGE_WIDTH: usize = 40;

/// `assess --json` payload
#[derive(Debug, Serialize)]
pub struct AssessOutput<'a> {
    pub record: &'a PatientRecord,
    #[serde(flatten)]
    pub result: AssessmentSummary,
}

/// `model --json` payload
#[derive(Debug, Serialize)]
pub struct ModelOutput<'a> {
    pub metadata: &'a ModelMetadata,
    pub summary: PipelineSummary,
    pub source: Option<String>,
}

/// Human-readable assessment report
pub fn render_assessment(assessment: &Assessment, use_color: bool) -> String {
    let mut out = String::new();

    let [left, right] = assessment.metric_columns();
    let items: Vec<(&str, &str)> = left
        .iter()
        .chain(right.iter())
        .map(|m| (m.label, m.value.as_str()))
        .collect();
    out.push_str(&summary_box("Patient", &items, use_color));
    out.push('\n');

    let percentage = if use_color {
        format_probability_colored(assessment.probability)
    } else {
        format_probability(assessment.probability)
    };
    out.push_str(&format!(
        "Probability of CHD  {} {}\n\n",
        gauge(assessment.probability, GAUGE_WIDTH, assessment.tone(), use_color),
        percentage
    ));

    let diagnosis = assessment.diagnosis();
    let level = if diagnosis.is_elevated() {
        StatusLevel::Critical
    } else {
        StatusLevel::Success
    };
    out.push_str(&format!("{}\n", badge(level, diagnosis.badge_text(), use_color)));
    out.push_str(&format!("{}\n\n", diagnosis.advisory()));

    let recommendation = format!("Recommendation: {}", RECOMMENDATION);
    if use_color {
        let (r, g, b) = COLOR_INFO;
        out.push_str(&format!(
            "{} {}\n",
            StatusLevel::Info.icon(true),
            recommendation.truecolor(r, g, b)
        ));
    } else {
        out.push_str(&format!("{} {}\n", StatusLevel::Info.icon(false), recommendation));
    }

    out
}

/// Human-readable model information
pub fn render_model(
    metadata: &ModelMetadata,
    summary: &PipelineSummary,
    source: Option<&str>,
    use_color: bool,
) -> String {
    let columns = summary.columns.join(", ");
    let shape = format!(
        "{} -> {} -> {}",
        summary.columns.len(),
        summary.encoded_width,
        summary.n_components
    );
    let variance: f64 = summary.explained_variance_ratio.iter().sum();
    let variance = format_probability(variance);

    let mut items: Vec<(&str, &str)> = vec![
        ("Name", metadata.name.as_str()),
        ("Algorithm", metadata.algorithm.as_str()),
        ("Dataset", metadata.dataset.as_str()),
        ("Columns", columns.as_str()),
        ("Shape", shape.as_str()),
        ("Variance kept", variance.as_str()),
    ];
    if let Some(trained_at) = &metadata.trained_at {
        items.push(("Trained", trained_at.as_str()));
    }
    if let Some(source) = source {
        items.push(("Artifact", source));
    }

    let mut out = summary_box("Model", &items, use_color);
    if let Some(notes) = &metadata.notes {
        out.push_str(&format!("\n{} {}\n", StatusLevel::Critical.icon(use_color), notes));
    }
    out
}
