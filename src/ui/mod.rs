//! Progress reporting for a `sync` run
//!
//! The pipeline talks to a [`Ui`]. [`UiApp`] draws a full-screen dashboard
//! (step, gauge, per-table row counts, activity, final results), [`LogUi`]
//! turns the same calls into `tracing` events and [`SilentUi`] drops them.

mod components;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

use crate::query::Report;
use crate::writer::WriteSummary;
use components::{LogPanel, Progress, ProgressPanel, ResultsPanel, StatusPanel, TablePanel};

/// Pipeline phases shown in the status panel
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Fetching,
    Normalizing,
    Writing,
    Querying,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Fetching => write!(f, "Fetching recipes"),
            Phase::Normalizing => write!(f, "Normalizing recipes"),
            Phase::Writing => write!(f, "Writing to SQLite"),
            Phase::Querying => write!(f, "Running queries"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_info(&mut self, info: impl Into<String>);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);

    /// One table's inserts are done
    fn table_written(&mut self, table: &'static str, summary: WriteSummary);

    /// Whether the user asked to stop
    fn cancelled(&mut self) -> bool {
        false
    }
}

/// Key that stops a run or closes the results screen. Raw mode swallows
/// SIGINT, so Ctrl-C arrives here as a key too.
fn is_exit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Full-screen dashboard on the alternate screen
pub struct UiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusPanel,
    progress: ProgressPanel,
    tables: TablePanel,
    log: LogPanel,
    results: Option<ResultsPanel>,
    cancel_requested: bool,
    restored: bool,
}

impl UiApp {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        io::stdout().execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        Ok(Self {
            terminal,
            status: StatusPanel::new(),
            progress: ProgressPanel::new(),
            tables: TablePanel::default(),
            log: LogPanel::new(),
            results: None,
            cancel_requested: false,
            restored: false,
        })
    }

    fn redraw(&mut self) {
        let Self {
            terminal,
            status,
            progress,
            tables,
            log,
            results,
            ..
        } = self;

        let drawn = terminal.draw(|frame| {
            let [header, gauge, body] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Min(6),
                ])
                .areas(frame.area());
            let [left, right] = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(36), Constraint::Min(20)])
                .areas(body);

            status.render(frame, header);
            progress.render(frame, gauge);
            tables.render(frame, left);
            match results.as_ref() {
                Some(results) => results.render(frame, right),
                None => log.render(frame, right),
            }
        });

        if let Err(e) = drawn {
            tracing::debug!(error = %e, "Redraw failed");
        }
    }

    /// Show the report in place of the activity log and wait for an exit key
    pub fn finish(mut self, report: &Report) -> Result<()> {
        self.status.set_phase(Phase::Complete);
        self.progress.clear();
        self.results = Some(ResultsPanel::new(report));
        self.redraw();

        loop {
            if let Event::Key(key) = event::read()? {
                let done = key.kind == KeyEventKind::Press
                    && (key.code == KeyCode::Enter || is_exit_key(key.code, key.modifiers));
                if done {
                    break;
                }
            }
        }

        self.restore()
    }

    /// Leave the alternate screen, e.g. before printing an error
    pub fn restore(mut self) -> Result<()> {
        self.restored = true;
        leave_terminal(&mut self.terminal)
    }
}

fn leave_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal::disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

impl Ui for UiApp {
    fn set_phase(&mut self, phase: Phase) {
        self.status.set_phase(phase);
        self.redraw();
    }

    fn set_info(&mut self, info: impl Into<String>) {
        self.status.set_info(info);
        self.redraw();
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        self.progress.set_progress(Progress {
            current,
            total,
            label: label.into(),
        });
        self.redraw();
    }

    fn clear_progress(&mut self) {
        self.progress.clear();
        self.redraw();
    }

    fn log(&mut self, message: impl Into<String>) {
        self.log.add(message);
        self.redraw();
    }

    fn table_written(&mut self, table: &'static str, summary: WriteSummary) {
        self.tables.record(table, summary);
        self.redraw();
    }

    fn cancelled(&mut self) -> bool {
        while !self.cancel_requested && event::poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.cancel_requested = is_exit_key(key.code, key.modifiers);
            }
        }
        self.cancel_requested
    }
}

impl Drop for UiApp {
    fn drop(&mut self) {
        if !self.restored {
            leave_terminal(&mut self.terminal).ok();
        }
    }
}

/// Non-interactive UI: phases and log lines become `tracing` info events,
/// progress ticks trace events
#[derive(Default)]
pub struct LogUi;

impl LogUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for LogUi {
    fn set_phase(&mut self, phase: Phase) {
        tracing::info!("{}", phase);
    }

    fn set_info(&mut self, info: impl Into<String>) {
        let info: String = info.into();
        tracing::info!("{}", info);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let label: String = label.into();
        tracing::trace!(current, total, %label, "progress");
    }

    fn clear_progress(&mut self) {}

    fn log(&mut self, message: impl Into<String>) {
        let message: String = message.into();
        tracing::info!("{}", message);
    }

    fn table_written(&mut self, table: &'static str, summary: WriteSummary) {
        tracing::info!(
            table,
            written = summary.inserted,
            rejected = summary.failed,
            "Table loaded"
        );
    }
}

/// Discards everything; used by tests
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
    fn table_written(&mut self, _table: &'static str, _summary: WriteSummary) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_keys() {
        assert!(is_exit_key(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(is_exit_key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(is_exit_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_exit_key(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!is_exit_key(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Writing.to_string(), "Writing to SQLite");
    }
}
