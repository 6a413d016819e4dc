//! Widgets for the terminal interface

use std::collections::VecDeque;

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, LineGauge, List, ListItem, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use super::Phase;
use crate::query::Report;
use crate::writer::WriteSummary;

const ACCENT: Color = Color::Magenta;

/// Pipeline steps in the order a `sync` run walks through them
const STEPS: [Phase; 4] = [
    Phase::Fetching,
    Phase::Normalizing,
    Phase::Writing,
    Phase::Querying,
];

/// Current phase, step counter and a one-line detail
pub struct StatusPanel {
    phase: Phase,
    info: String,
}

impl StatusPanel {
    pub fn new() -> Self {
        Self {
            phase: Phase::Fetching,
            info: String::new(),
        }
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn set_info(&mut self, info: impl Into<String>) {
        self.info = info.into();
    }

    fn step_label(&self) -> String {
        match STEPS.iter().position(|p| *p == self.phase) {
            Some(idx) => format!("[{}/{}]", idx + 1, STEPS.len()),
            None => "[done]".to_string(),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let color = if self.phase == Phase::Complete {
            Color::Green
        } else {
            Color::Yellow
        };
        let phase_style = Style::default().fg(color).add_modifier(Modifier::BOLD);

        let lines = vec![
            Line::from(vec![
                Span::styled(format!(" {} ", self.step_label()), Style::default().fg(Color::Gray)),
                Span::styled(self.phase.to_string(), phase_style),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                format!("   {}", self.info),
                Style::default().fg(Color::Gray),
            )),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Cocktails to SQLite ")
            .border_style(Style::default().fg(ACCENT));

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Position within the running operation
#[derive(Debug, Clone, Default)]
pub struct Progress {
    pub current: u64,
    pub total: u64,
    pub label: String,
}

impl Progress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64).min(1.0)
        }
    }
}

/// Single-line gauge for the running operation
pub struct ProgressPanel {
    progress: Option<Progress>,
}

impl ProgressPanel {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = Some(progress);
    }

    pub fn clear(&mut self) {
        self.progress = None;
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(Style::default().fg(ACCENT));

        let Some(progress) = &self.progress else {
            frame.render_widget(Paragraph::new("").block(block), area);
            return;
        };

        let label = if progress.total > 0 {
            format!("{} {}/{}", progress.label, progress.current, progress.total)
        } else {
            progress.label.clone()
        };

        let gauge = LineGauge::default()
            .block(block)
            .filled_style(Style::default().fg(Color::Yellow))
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .ratio(progress.ratio())
            .label(label);

        frame.render_widget(gauge, area);
    }
}

/// Rows written and rejected per table, in write order
#[derive(Default)]
pub struct TablePanel {
    tables: Vec<(&'static str, WriteSummary)>,
}

impl TablePanel {
    pub fn record(&mut self, table: &'static str, summary: WriteSummary) {
        match self.tables.iter_mut().find(|(name, _)| *name == table) {
            Some((_, existing)) => *existing = summary,
            None => self.tables.push((table, summary)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["table", "written", "rejected"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

        let rows = self.tables.iter().map(|(name, summary)| {
            let rejected_style = if summary.failed > 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(*name),
                Cell::from(summary.inserted.to_string()),
                Cell::from(summary.failed.to_string()).style(rejected_style),
            ])
        });

        let widths = [
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(8),
        ];
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Tables ")
                .border_style(Style::default().fg(ACCENT)),
        );

        frame.render_widget(table, area);
    }
}

/// Final report: table counts and each query's drinks
pub struct ResultsPanel {
    lines: Vec<Line<'static>>,
}

impl ResultsPanel {
    pub fn new(report: &Report) -> Self {
        let count = |n: Option<i64>| n.map_or_else(|| "n/a".to_string(), |n| n.to_string());
        let mut lines = vec![Line::from(Span::styled(
            format!(
                " {} drinks, {} ingredients, {} measurements",
                count(report.counts.drinks),
                count(report.counts.ingredients),
                count(report.counts.measurements)
            ),
            Style::default().fg(Color::Gray),
        ))];

        for result in &report.results {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(" {}", result.query.title),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            match &result.rows {
                None => lines.push(Line::from(Span::styled(
                    "   query failed, see log",
                    Style::default().fg(Color::Red),
                ))),
                Some(rows) if rows.is_empty() => lines.push(Line::from(Span::styled(
                    "   no drinks",
                    Style::default().fg(Color::DarkGray),
                ))),
                Some(rows) => {
                    lines.extend(rows.iter().map(|name| Line::from(format!("   {}", name))))
                }
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Press q, Esc or Enter to exit",
            Style::default().fg(Color::DarkGray),
        )));

        Self { lines }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Results ")
            .border_style(Style::default().fg(Color::Green));

        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// Bounded history of log lines, newest highlighted
pub struct LogPanel {
    entries: VecDeque<String>,
    capacity: usize,
}

impl LogPanel {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: 200,
        }
    }

    pub fn add(&mut self, message: impl Into<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message.into());
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(Style::default().fg(ACCENT));

        let visible = area.height.saturating_sub(2) as usize;
        let skip = self.entries.len().saturating_sub(visible);
        let newest = self.entries.len().saturating_sub(1);

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .skip(skip)
            .map(|(i, entry)| {
                let color = if i == newest { Color::White } else { Color::DarkGray };
                ListItem::new(Span::styled(format!(" {}", entry), Style::default().fg(color)))
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }
}
