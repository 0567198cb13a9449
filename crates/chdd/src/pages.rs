//! HTML pages for chdd
//!
//! One page: the input form in three groups, followed by the results when a
//! submission was assessed, with the model information panel on the side.

use chd_common::record::{field_spec, parse_age, parse_real, FieldDomain, FieldSpec};
use chd_common::{Assessment, ModelMetadata, PatientRecord, Result, RECOMMENDATION};
use serde::{Deserialize, Serialize};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6fa; color: #222; }
header { background: linear-gradient(90deg, #667eea 0%, #764ba2 100%); color: #fff; padding: 1.5rem 2rem; }
header h1 { margin: 0; font-size: 1.8rem; }
header p { margin: .3rem 0 0; opacity: .9; }
.layout { display: flex; gap: 1.5rem; padding: 1.5rem 2rem; }
main { flex: 3; }
aside { flex: 1; background: #fff; border-radius: 8px; padding: 1rem 1.2rem; height: fit-content; }
.columns { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
fieldset { background: #fff; border: 1px solid #ddd; border-radius: 8px; padding: 1rem; }
legend { font-weight: 600; color: #764ba2; }
label { display: block; margin-top: .6rem; font-weight: 500; }
label small { display: block; font-weight: 400; color: #808080; }
input[type=number], select { width: 100%; padding: .4rem; margin-top: .2rem; box-sizing: border-box; }
input[type=range] { width: 80%; }
button { margin-top: 1.2rem; width: 100%; padding: .8rem; border: 0; border-radius: 6px; background: #667eea; color: #fff; font-size: 1rem; cursor: pointer; }
.results { margin-top: 2rem; background: #fff; border-radius: 8px; padding: 1.2rem; }
.metrics { display: grid; grid-template-columns: repeat(2, 1fr); gap: .4rem 2rem; }
.metric span { color: #808080; }
.bar { background: #e0e0e0; border-radius: 6px; height: 18px; overflow: hidden; margin: 1rem 0 .4rem; }
.bar div { height: 100%; }
.percentage { font-size: 2rem; font-weight: 700; }
.badge { margin-top: 1rem; padding: .8rem 1rem; border-radius: 6px; color: #fff; }
.badge strong { text-transform: uppercase; }
.recommendation { margin-top: 1rem; padding: .8rem 1rem; border-left: 4px solid #6495ed; background: #eef3fd; }
"#;

// ============================================================================
// Form values
// ============================================================================

/// Raw form fields as posted; parsed into a [`PatientRecord`] on submit.
///
/// Absent fields deserialize to empty strings and fail parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    #[serde(default)]
    pub sbp: String,
    #[serde(default)]
    pub ldl: String,
    #[serde(default)]
    pub adiposity: String,
    #[serde(default)]
    pub obesity: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub famhist: String,
}

impl Default for FormValues {
    fn default() -> Self {
        FormValues::from(&PatientRecord::default())
    }
}

impl From<&PatientRecord> for FormValues {
    fn from(record: &PatientRecord) -> Self {
        Self {
            sbp: record.sbp.to_string(),
            ldl: record.ldl.to_string(),
            adiposity: record.adiposity.to_string(),
            obesity: record.obesity.to_string(),
            age: record.age.to_string(),
            famhist: record.famhist.clone(),
        }
    }
}

impl FormValues {
    /// Parse and range-check every field
    pub fn parse(&self) -> Result<PatientRecord> {
        let record = PatientRecord {
            sbp: parse_real("sbp", &self.sbp)?,
            ldl: parse_real("ldl", &self.ldl)?,
            adiposity: parse_real("adiposity", &self.adiposity)?,
            obesity: parse_real("obesity", &self.obesity)?,
            age: parse_age(&self.age)?,
            famhist: self.famhist.clone(),
        };
        record.validate()?;
        Ok(record)
    }

    fn value(&self, name: &str) -> &str {
        match name {
            "sbp" => &self.sbp,
            "ldl" => &self.ldl,
            "adiposity" => &self.adiposity,
            "obesity" => &self.obesity,
            "age" => &self.age,
            "famhist" => &self.famhist,
            _ => "",
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Minimal HTML escaping for text and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page: form (pre-filled with `values`), optional results, model panel
pub fn render_page(
    values: &FormValues,
    assessment: Option<&Assessment>,
    metadata: &ModelMetadata,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>CHD Risk Assessment</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n<h1>❤️ CHD Risk Assessment</h1>\n");
    html.push_str("<p>Enter the patient's measurements to estimate the risk of coronary heart disease.</p>\n</header>\n");

    html.push_str("<div class=\"layout\">\n<main>\n");
    html.push_str(&render_form(values));
    if let Some(assessment) = assessment {
        html.push_str(&render_results(assessment));
    }
    html.push_str("</main>\n");
    html.push_str(&render_model_panel(metadata));
    html.push_str("</div>\n</body>\n</html>\n");

    html
}

fn render_form(values: &FormValues) -> String {
    let mut html = String::new();
    html.push_str("<form method=\"post\" action=\"/assess\">\n<div class=\"columns\">\n");

    for (legend, fields) in [
        ("Demographics", ["age", "famhist"]),
        ("Cardiovascular", ["sbp", "ldl"]),
        ("Body measurements", ["adiposity", "obesity"]),
    ] {
        html.push_str(&format!("<fieldset>\n<legend>{}</legend>\n", legend));
        for name in fields {
            if let Some(spec) = field_spec(name) {
                html.push_str(&render_control(spec, values.value(name)));
            }
        }
        html.push_str("</fieldset>\n");
    }

    html.push_str("</div>\n<button type=\"submit\">🔍 Assess risk</button>\n</form>\n");
    html
}

fn render_control(spec: &FieldSpec, value: &str) -> String {
    let caption = match spec.unit {
        Some(unit) => format!("{} ({})", spec.label, unit),
        None => spec.label.to_string(),
    };
    let mut html = format!(
        "<label for=\"{name}\">{caption}<small>{help}</small></label>\n",
        name = spec.name,
        caption = escape(&caption),
        help = escape(spec.help),
    );

    let control = match spec.domain {
        FieldDomain::Integer { min, max, .. } => format!(
            "<input type=\"range\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"1\" value=\"{value}\" required oninput=\"this.nextElementSibling.value=this.value\"> <output>{value}</output>\n",
            name = spec.name,
            value = escape(value),
        ),
        FieldDomain::Real { min, max, step, .. } => format!(
            "<input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\" required>\n",
            name = spec.name,
            value = escape(value),
        ),
        FieldDomain::Choice { options, .. } => {
            let selected = value.trim();
            let mut select = format!(
                "<select id=\"{name}\" name=\"{name}\" required>\n",
                name = spec.name
            );
            for option in options {
                let marker = if option.eq_ignore_ascii_case(selected) {
                    " selected"
                } else {
                    ""
                };
                select.push_str(&format!(
                    "<option value=\"{o}\"{marker}>{o}</option>\n",
                    o = option
                ));
            }
            select.push_str("</select>\n");
            select
        }
    };
    html.push_str(&control);
    html
}

fn render_results(assessment: &Assessment) -> String {
    let diagnosis = assessment.diagnosis();
    let color = assessment.tone().hex();
    let width = (assessment.probability.clamp(0.0, 1.0) * 100.0).round();

    let mut html = String::new();
    html.push_str("<section class=\"results\" id=\"results\">\n<h2>📊 Results</h2>\n");

    html.push_str("<div class=\"metrics\">\n");
    let [left, right] = assessment.metric_columns();
    for (a, b) in left.iter().zip(right.iter()) {
        for metric in [a, b] {
            html.push_str(&format!(
                "<div class=\"metric\"><span>{}:</span> <strong>{}</strong></div>\n",
                escape(metric.label),
                escape(&metric.value)
            ));
        }
    }
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<div class=\"bar\"><div style=\"width: {}%; background: {}\"></div></div>\n",
        width, color
    ));
    html.push_str(&format!(
        "<div>Probability of CHD: <span class=\"percentage\" style=\"color: {}\">{}</span></div>\n",
        color,
        assessment.percentage()
    ));

    let (icon, class) = if diagnosis.is_elevated() {
        ("⚠️", "elevated")
    } else {
        ("✅", "low")
    };
    html.push_str(&format!(
        "<div class=\"badge {}\" style=\"background: {}\">{} <strong>{}</strong><br>{}</div>\n",
        class,
        color,
        icon,
        diagnosis.badge_text(),
        diagnosis.advisory()
    ));
    html.push_str(&format!(
        "<div class=\"recommendation\">💡 <strong>Recommendation:</strong> {}</div>\n",
        RECOMMENDATION
    ));

    html.push_str("</section>\n");
    html
}

fn render_model_panel(metadata: &ModelMetadata) -> String {
    let mut html = String::new();
    html.push_str("<aside>\n<h3>ℹ️ About the model</h3>\n<ul>\n");
    html.push_str(&format!(
        "<li><strong>Algorithm:</strong> {}</li>\n",
        escape(&metadata.algorithm)
    ));
    html.push_str(&format!(
        "<li><strong>Dataset:</strong> {}</li>\n",
        escape(&metadata.dataset)
    ));
    if let Some(trained_at) = &metadata.trained_at {
        html.push_str(&format!(
            "<li><strong>Trained:</strong> {}</li>\n",
            escape(trained_at)
        ));
    }
    html.push_str("</ul>\n");
    if let Some(notes) = &metadata.notes {
        html.push_str(&format!("<p><em>⚠️ {}</em></p>\n", escape(notes)));
    }
    html.push_str("</aside>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use chd_common::ChdError;

    fn metadata() -> ModelMetadata {
        ModelMetadata {
            name: "test".to_string(),
            algorithm: "Logistic regression + PCA".to_string(),
            dataset: "CHD.csv".to_string(),
            trained_at: None,
            notes: Some("Educational use only.".to_string()),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_value_lookup_by_name() {
        let values = FormValues::default();
        assert_eq!(values.value("age"), "50");
        assert_eq!(values.value("famhist"), "Present");
        assert_eq!(values.value("tobacco"), "");
    }

    #[test]
    fn test_default_values_parse() {
        assert_eq!(FormValues::default().parse().unwrap(), PatientRecord::default());
    }

    #[test]
    fn test_parse_rejects_text_and_range() {
        let values = FormValues {
            sbp: "high".to_string(),
            ..FormValues::default()
        };
        assert!(matches!(values.parse(), Err(ChdError::TypeMismatch { .. })));

        let values = FormValues {
            age: "-4".to_string(),
            ..FormValues::default()
        };
        assert!(matches!(values.parse(), Err(ChdError::OutOfRange { field: "age", .. })));

        let values = FormValues {
            ldl: "".to_string(),
            ..FormValues::default()
        };
        assert!(values.parse().is_err());
    }

    #[test]
    fn test_form_has_bounded_controls() {
        let html = render_page(&FormValues::default(), None, &metadata());
        assert!(html.contains("name=\"age\" min=\"10\" max=\"100\""));
        assert!(html.contains("name=\"sbp\" min=\"80\" max=\"250\""));
        assert!(html.contains("name=\"ldl\" min=\"0\" max=\"10\""));
        assert_eq!(html.matches(" required").count(), 6);
        assert!(html.contains("<option value=\"Present\" selected>"));
        assert!(!html.contains("id=\"results\""));
        assert!(html.contains("Educational use only."));
    }

    #[test]
    fn test_results_section() {
        let assessment = Assessment::new(PatientRecord::default(), 0.7312, 1);
        let html = render_page(&FormValues::default(), Some(&assessment), &metadata());
        assert!(html.contains("id=\"results\""));
        assert!(html.contains("73.1%"));
        assert!(html.contains("#d32f2f"));
        assert!(html.contains("elevated risk"));
        assert!(html.contains("The model detects a significant risk of heart disease."));
        assert!(html.contains(RECOMMENDATION));
        assert!(html.contains("140 mmHg"));
        assert!(html.contains("50 years"));
    }
}
