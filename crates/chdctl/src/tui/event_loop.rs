//! Event Loop - TUI entry point and key dispatch

use super::render::draw_ui;
use super::state::{FormAction, FormState};
use anyhow::Result;
use chd_common::RiskPredictor;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Run the form until the user quits
pub fn run(predictor: &RiskPredictor) -> Result<()> {
    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = FormState::default();
    let result = run_event_loop(&mut terminal, &mut state, predictor);

    // Always restore, then report whichever failed first
    let cleanup_result = restore_terminal(&mut terminal);
    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut FormState,
    predictor: &RiskPredictor,
) -> Result<()> {
    let metadata = predictor.metadata();

    loop {
        terminal.draw(|f| draw_ui(f, state, metadata))?;

        // Nothing changes between key presses, so block on input
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match state.handle_key(key) {
                FormAction::Quit => break,
                FormAction::Submit => state.submit(predictor),
                FormAction::None => {}
            }
        }
    }

    Ok(())
}
