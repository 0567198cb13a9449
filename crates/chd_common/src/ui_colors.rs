//! UI Colors Module
//!
//! CANONICAL source for risk colours, the display cut and percentage formatting.
//! The web page, the TUI and the plain terminal output all import from here.

use owo_colors::OwoColorize;

// ============================================================================
// Display cut
// ============================================================================

/// Probabilities strictly above this are shown in red.
///
/// Independent of the classifier's own threshold; it only drives colour.
pub const DISPLAY_CUT: f64 = 0.5;

// ============================================================================
// Colors (RGB tuples for true color terminals)
// ============================================================================

/// Elevated risk - Red (#d32f2f)
pub const COLOR_RISK_HIGH: (u8, u8, u8) = (211, 47, 47);

/// Low risk - Green (#388e3c)
pub const COLOR_RISK_LOW: (u8, u8, u8) = (56, 142, 60);

/// Header gradient start - Indigo (#667eea)
pub const COLOR_ACCENT: (u8, u8, u8) = (102, 126, 234);

/// Header gradient end - Purple (#764ba2)
pub const COLOR_ACCENT_DEEP: (u8, u8, u8) = (118, 75, 162);

/// Info banner - Blue
pub const COLOR_INFO: (u8, u8, u8) = (100, 149, 237);

/// Muted/dimmed - Dark gray
pub const COLOR_MUTED: (u8, u8, u8) = (128, 128, 128);

// ============================================================================
// Risk tone
// ============================================================================

/// Colour class of a probability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTone {
    /// > 50%
    Red,
    /// <= 50%
    Green,
}

impl RiskTone {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DISPLAY_CUT {
            RiskTone::Red
        } else {
            RiskTone::Green
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            RiskTone::Red => COLOR_RISK_HIGH,
            RiskTone::Green => COLOR_RISK_LOW,
        }
    }

    /// CSS hex form, e.g. "#d32f2f"
    pub fn hex(&self) -> String {
        let (r, g, b) = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

// ============================================================================
// Percentage Formatting
// ============================================================================

/// Format a 0-1 float as percentage with specified decimal places.
///
/// # Examples
/// ```
/// use chd_common::ui_colors::format_percentage_decimals;
/// assert_eq!(format_percentage_decimals(0.4534, 1), "45.3%");
/// assert_eq!(format_percentage_decimals(0.4534, 2), "45.34%");
/// ```
pub fn format_percentage_decimals(value: f64, decimals: usize) -> String {
    match decimals {
        0 => format!("{:.0}%", value * 100.0),
        1 => format!("{:.1}%", value * 100.0),
        2 => format!("{:.2}%", value * 100.0),
        _ => format!("{:.0}%", value * 100.0),
    }
}

/// Probability as shown to the user: one decimal.
pub fn format_probability(probability: f64) -> String {
    format_percentage_decimals(probability, 1)
}

/// Probability coloured red/green by the display cut.
pub fn format_probability_colored(probability: f64) -> String {
    let (r, g, b) = RiskTone::from_probability(probability).color();
    format_probability(probability)
        .truecolor(r, g, b)
        .bold()
        .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_cut_is_strict() {
        assert_eq!(RiskTone::from_probability(0.5), RiskTone::Green);
        assert_eq!(RiskTone::from_probability(0.500001), RiskTone::Red);
        assert_eq!(RiskTone::from_probability(0.0), RiskTone::Green);
        assert_eq!(RiskTone::from_probability(1.0), RiskTone::Red);
    }

    #[test]
    fn test_tone_hex() {
        assert_eq!(RiskTone::Red.hex(), "#d32f2f");
        assert_eq!(RiskTone::Green.hex(), "#388e3c");
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.0), "0.0%");
        assert_eq!(format_probability(0.4534), "45.3%");
        assert_eq!(format_probability(1.0), "100.0%");
    }

    #[test]
    fn test_format_percentage_decimals() {
        assert_eq!(format_percentage_decimals(0.923, 0), "92%");
        assert_eq!(format_percentage_decimals(0.9234, 2), "92.34%");
        // Invalid decimals (defaults to 0)
        assert_eq!(format_percentage_decimals(0.923, 5), "92%");
    }

    #[test]
    fn test_colored_probability_keeps_text() {
        let colored = format_probability_colored(0.8);
        assert!(colored.contains("80.0%"));
    }
}
