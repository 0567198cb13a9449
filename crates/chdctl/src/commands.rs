//! Command dispatch
//!
//! Loads config and the predictor once, then hands them to the chosen command.

use crate::cli::{Cli, Commands};
use crate::output::{self, AssessOutput, ModelOutput};
use crate::tui;
use anyhow::{Context, Result};
use chd_common::{Config, PatientRecord, RiskPredictor};
use tracing::{debug, info};

/// Resolve config: file/env first, then `--model`
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(model) = &cli.model {
        config.model.path = model.clone();
    }
    debug!("Model path: {}", config.model.path.display());
    Ok(config)
}

pub fn load_predictor(config: &Config) -> Result<RiskPredictor> {
    let predictor = RiskPredictor::load(&config.model.path)
        .with_context(|| format!("Failed to load model from {}", config.model.path.display()))?;
    info!("Loaded model {}", predictor.metadata().name);
    Ok(predictor)
}

/// Execute the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    let predictor = load_predictor(&config)?;
    let use_color = config.display.color.use_color();

    match cli.command {
        None | Some(Commands::Form) => tui::run(&predictor),
        Some(Commands::Assess {
            sbp,
            ldl,
            adiposity,
            obesity,
            age,
            famhist,
            json,
        }) => {
            let record = PatientRecord {
                sbp,
                ldl,
                adiposity,
                obesity,
                age,
                famhist,
            };
            assess(&predictor, &record, json, use_color)
        }
        Some(Commands::Model { json }) => model(&predictor, json, use_color),
    }
}

fn assess(predictor: &RiskPredictor, record: &PatientRecord, json: bool, use_color: bool) -> Result<()> {
    let assessment = predictor.assess(record)?;

    if json {
        let payload = AssessOutput {
            record,
            result: assessment.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", output::render_assessment(&assessment, use_color));
    }
    Ok(())
}

fn model(predictor: &RiskPredictor, json: bool, use_color: bool) -> Result<()> {
    let source = predictor.source().map(|p| p.display().to_string());

    if json {
        let payload = ModelOutput {
            metadata: predictor.metadata(),
            summary: predictor.summary(),
            source,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!(
            "{}",
            output::render_model(
                predictor.metadata(),
                &predictor.summary(),
                source.as_deref(),
                use_color
            )
        );
    }
    Ok(())
}
