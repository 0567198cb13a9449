//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap. Field bounds come from the shared
//! field table, so `assess` rejects out-of-range values before loading anything.

use chd_common::record::{field_spec, FAMHIST_OPTIONS};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CHD risk assessment terminal client
#[derive(Parser, Debug)]
#[command(name = "chdctl")]
#[command(about = "CHD risk assessment - terminal form and one-shot scoring", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Pipeline artifact (overrides config and $CHD_MODEL_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Config file (overrides $CHD_CONFIG and discovery)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand (if not provided, starts the interactive form)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive full-screen form
    Form,

    /// Score one patient record and print the result
    Assess {
        /// Systolic blood pressure (mmHg, 80-250)
        #[arg(long, value_parser = bounded("sbp"))]
        sbp: f64,

        /// LDL cholesterol (mmol/L, 0-10)
        #[arg(long, value_parser = bounded("ldl"))]
        ldl: f64,

        /// Body fat percentage (0-60)
        #[arg(long, value_parser = bounded("adiposity"))]
        adiposity: f64,

        /// Body mass index (0-60)
        #[arg(long, value_parser = bounded("obesity"))]
        obesity: f64,

        /// Age in years (10-100)
        #[arg(long, value_parser = clap::value_parser!(u32).range(10..=100))]
        age: u32,

        /// Family history of heart disease (Present/Absent)
        #[arg(long, value_parser = parse_famhist)]
        famhist: String,

        /// Output JSON only
        #[arg(long)]
        json: bool,
    },

    /// Show the loaded model's metadata and shape
    Model {
        /// Output JSON only
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// The TUI owns the terminal; everything else may log to stderr
    pub fn is_interactive(command: Option<&Commands>) -> bool {
        matches!(command, None | Some(Commands::Form))
    }
}

/// Value parser enforcing a real field's declared bounds
fn bounded(name: &'static str) -> impl Fn(&str) -> Result<f64, String> + Clone + Send + Sync + 'static {
    move |text: &str| {
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", text))?;
        match field_spec(name) {
            Some(spec) if spec.domain.contains(value) => Ok(value),
            Some(spec) => {
                let (min, max) = spec.domain.bounds().unwrap_or((f64::MIN, f64::MAX));
                Err(format!("{} must be between {} and {}", value, min, max))
            }
            None => Err(format!("unknown field {}", name)),
        }
    }
}

/// Accept the family history options in any case
fn parse_famhist(text: &str) -> Result<String, String> {
    if FAMHIST_OPTIONS
        .iter()
        .any(|option| option.eq_ignore_ascii_case(text.trim()))
    {
        Ok(text.to_string())
    } else {
        Err(format!("expected one of: {}", FAMHIST_OPTIONS.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assess_args(extra: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = [
            "chdctl", "assess", "--sbp", "140", "--ldl", "4", "--adiposity", "25", "--obesity",
            "30", "--age", "50", "--famhist", "Present",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.extend(extra.iter().map(|s| s.to_string()));
        args
    }

    #[test]
    fn test_no_subcommand_is_interactive() {
        let cli = Cli::try_parse_from(["chdctl"]).unwrap();
        assert!(cli.command.is_none());
        assert!(Commands::is_interactive(cli.command.as_ref()));
    }

    #[test]
    fn test_assess_parses() {
        let cli = Cli::try_parse_from(assess_args(&["--json"])).unwrap();
        match cli.command {
            Some(Commands::Assess { sbp, age, famhist, json, .. }) => {
                assert_eq!(sbp, 140.0);
                assert_eq!(age, 50);
                assert_eq!(famhist, "Present");
                assert!(json);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_assess_bounds() {
        let mut args = assess_args(&[]);
        args[9] = "61".to_string(); // --obesity
        assert!(Cli::try_parse_from(&args).is_err());

        let mut args = assess_args(&[]);
        args[11] = "9".to_string(); // --age
        assert!(Cli::try_parse_from(&args).is_err());

        let mut args = assess_args(&[]);
        args[3] = "250".to_string(); // --sbp upper bound is inclusive
        assert!(Cli::try_parse_from(&args).is_ok());
    }

    #[test]
    fn test_famhist_case_insensitive() {
        let mut args = assess_args(&[]);
        args[13] = "absent".to_string();
        assert!(Cli::try_parse_from(&args).is_ok());
        args[13] = "unknown".to_string();
        assert!(Cli::try_parse_from(&args).is_err());
    }

    #[test]
    fn test_missing_field_rejected() {
        let args = ["chdctl", "assess", "--sbp", "140"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_global_model_flag() {
        let cli = Cli::try_parse_from(["chdctl", "model", "--json", "--model", "/tmp/m.json"]).unwrap();
        assert_eq!(cli.model, Some(PathBuf::from("/tmp/m.json")));
        assert_eq!(cli.command, Some(Commands::Model { json: true }));
    }
}
