//! Form state - field buffers, focus and the last assessment
//!
//! Key handling is pure so it can be tested without a terminal; the event
//! loop only acts on the returned [`FormAction`].

use chd_common::record::{field_spec, parse_age, parse_real, FieldDomain, FieldSpec, FAMHIST_OPTIONS};
use chd_common::{Assessment, PatientRecord, Result, RiskPredictor};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Slider step for PgUp/PgDn
pub const SLIDER_PAGE: i64 = 10;

/// Display order, grouped as rendered
pub const GROUPS: [(&str, [&str; 2]); 3] = [
    ("Demographics", ["age", "famhist"]),
    ("Cardiovascular", ["sbp", "ldl"]),
    ("Body measurements", ["adiposity", "obesity"]),
];

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Quit,
}

/// Editable value of one control
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Typed number
    Text(String),
    /// Integer slider, always within bounds
    Slider { value: i64, min: i64, max: i64 },
    /// Index into the option list
    Toggle(usize),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub spec: &'static FieldSpec,
    pub input: FieldInput,
}

impl FormField {
    fn new(spec: &'static FieldSpec) -> Self {
        let input = match spec.domain {
            FieldDomain::Real { default, .. } => FieldInput::Text(default.to_string()),
            FieldDomain::Integer { min, max, default } => FieldInput::Slider {
                value: default,
                min,
                max,
            },
            FieldDomain::Choice { options, default } => {
                FieldInput::Toggle(options.iter().position(|o| *o == default).unwrap_or(0))
            }
        };
        Self { spec, input }
    }

    /// Text shown in the control
    pub fn display_value(&self) -> String {
        match &self.input {
            FieldInput::Text(text) => text.clone(),
            FieldInput::Slider { value, .. } => value.to_string(),
            FieldInput::Toggle(index) => FAMHIST_OPTIONS
                .get(*index)
                .copied()
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// Parses and lies within the field's domain
    pub fn is_valid(&self) -> bool {
        match &self.input {
            FieldInput::Text(text) => parse_real(self.spec.name, text)
                .map(|v| self.spec.domain.contains(v))
                .unwrap_or(false),
            FieldInput::Slider { value, min, max } => (*min..=*max).contains(value),
            FieldInput::Toggle(index) => *index < FAMHIST_OPTIONS.len(),
        }
    }

    fn adjust(&mut self, delta: i64) {
        match &mut self.input {
            FieldInput::Slider { value, min, max } => {
                *value = (*value + delta).clamp(*min, *max);
            }
            FieldInput::Toggle(index) => {
                let n = FAMHIST_OPTIONS.len() as i64;
                *index = (*index as i64 + delta).rem_euclid(n) as usize;
            }
            FieldInput::Text(_) => {}
        }
    }

    fn type_char(&mut self, c: char) {
        if let FieldInput::Text(text) = &mut self.input {
            if c.is_ascii_digit() || (c == '.' && !text.contains('.')) {
                text.push(c);
            }
        }
    }

    fn backspace(&mut self) {
        if let FieldInput::Text(text) = &mut self.input {
            text.pop();
        }
    }
}

/// Whole-form state
#[derive(Debug, Clone)]
pub struct FormState {
    pub fields: Vec<FormField>,
    /// Index into `fields`; `fields.len()` is the submit button
    pub focus: usize,
    pub assessment: Option<Assessment>,
    pub error: Option<String>,
    pub show_help: bool,
}

impl Default for FormState {
    fn default() -> Self {
        let fields = GROUPS
            .iter()
            .flat_map(|(_, names)| names.iter())
            .filter_map(|name| field_spec(name))
            .map(FormField::new)
            .collect();
        Self {
            fields,
            focus: 0,
            assessment: None,
            error: None,
            show_help: false,
        }
    }
}

impl FormState {
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    pub fn submit_focused(&self) -> bool {
        self.focus == self.fields.len()
    }

    /// Every field parses and is in range
    pub fn submit_enabled(&self) -> bool {
        self.fields.iter().all(FormField::is_valid)
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (self.fields.len() + 1);
    }

    fn focus_prev(&mut self) {
        let n = self.fields.len() + 1;
        self.focus = (self.focus + n - 1) % n;
    }

    fn focused_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.focus)
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                return FormAction::Quit
            }
            (KeyCode::F(1), _) => self.show_help = !self.show_help,
            (KeyCode::Tab, _) | (KeyCode::Down, _) => self.focus_next(),
            (KeyCode::BackTab, _) | (KeyCode::Up, _) => self.focus_prev(),
            (KeyCode::Enter, _) => {
                if self.submit_focused() {
                    if self.submit_enabled() {
                        return FormAction::Submit;
                    }
                } else {
                    self.focus_next();
                }
            }
            (KeyCode::Left, _) => self.adjust_focused(-1),
            (KeyCode::Right, _) => self.adjust_focused(1),
            (KeyCode::PageDown, _) => self.adjust_focused(-SLIDER_PAGE),
            (KeyCode::PageUp, _) => self.adjust_focused(SLIDER_PAGE),
            (KeyCode::Char(' '), _) => {
                if let Some(field) = self.focused_mut() {
                    if matches!(field.input, FieldInput::Toggle(_)) {
                        field.adjust(1);
                    }
                }
            }
            (KeyCode::Backspace, _) => {
                if let Some(field) = self.focused_mut() {
                    field.backspace();
                }
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                if let Some(field) = self.focused_mut() {
                    field.type_char(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn adjust_focused(&mut self, delta: i64) {
        if let Some(field) = self.focused_mut() {
            // Toggles cycle one option per key regardless of step
            let delta = match field.input {
                FieldInput::Toggle(_) => delta.signum(),
                _ => delta,
            };
            field.adjust(delta);
        }
    }

    /// Assemble the record from the current buffers
    pub fn record(&self) -> Result<PatientRecord> {
        let value = |name: &str| {
            self.field(name)
                .map(FormField::display_value)
                .unwrap_or_default()
        };
        let record = PatientRecord {
            sbp: parse_real("sbp", &value("sbp"))?,
            ldl: parse_real("ldl", &value("ldl"))?,
            adiposity: parse_real("adiposity", &value("adiposity"))?,
            obesity: parse_real("obesity", &value("obesity"))?,
            age: parse_age(&value("age"))?,
            famhist: value("famhist"),
        };
        record.validate()?;
        Ok(record)
    }

    /// Score the form; the result or the error replaces the previous one
    pub fn submit(&mut self, predictor: &RiskPredictor) {
        match self.record().and_then(|record| predictor.assess(&record)) {
            Ok(assessment) => {
                self.assessment = Some(assessment);
                self.error = None;
            }
            Err(e) => {
                self.assessment = None;
                self.error = Some(e.to_string());
            }
        }
    }
}
