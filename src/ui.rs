pub mod confetti;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, ANALYSIS_LINES},
    challenge::{ChallengeDefinition, Outcome},
    puzzle::{Puzzle, GRID_COLUMNS, GRID_ITEMS},
    session::{Clock, SessionState},
    ui::confetti::Confetti,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const GRID_CELL_WIDTH: usize = 16;
/// Remaining seconds at which the time bar turns red
const TIME_WARNING_SECS: f64 = 3.0;

pub fn draw<C: Clock + 'static>(app: &App<C>, f: &mut Frame) {
    screen::current_screen::<C>(app.session.state()).render(app, f);
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, dim().add_modifier(Modifier::ITALIC)))
}

pub fn outcome_glyph(outcome: Outcome) -> (&'static str, Color) {
    match outcome {
        Outcome::Pass => ("✓", Color::Green),
        Outcome::Fail => ("✗", Color::Red),
        Outcome::Timeout => ("⏱", Color::Yellow),
    }
}

fn centered(area: Rect, height: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    middle
}

pub(crate) fn render_idle(area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled(
            "CLAWTCHA",
            bold().fg(Color::Cyan),
        )),
        Line::from(Span::styled("the reverse CAPTCHA", dim())),
        Line::from(""),
        Line::from("Prove you are NOT a human."),
        Line::from("Six challenges. Silicon passes. Meat does not."),
        Line::from(""),
        hint("(enter) begin verification / (esc)ape"),
    ];
    let height = lines.len() as u16;
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered(area, height), buf);
}

fn challenge_header(index: usize, total: u32, challenge: &ChallengeDefinition) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("CHALLENGE {} / {}", index + 1, total),
            dim().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(challenge.title, bold().fg(Color::Cyan))),
    ]
}

pub(crate) fn render_intro<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let Some(challenge) = session.current_challenge() else {
        return;
    };

    let mut lines = challenge_header(session.current_index(), session.total(), challenge);
    lines.push(Line::from(""));
    lines.push(Line::from(challenge.description));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        if challenge.is_timed() {
            format!("Time limit: {}s", challenge.time_limit_secs)
        } else {
            "No time limit".to_string()
        },
        Style::default().fg(Color::Yellow),
    )));
    lines.push(Line::from(""));
    lines.push(hint("(enter) start"));

    let inner = Rect {
        x: area.x + HORIZONTAL_MARGIN.min(area.width / 2),
        width: area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered(inner, 10), buf);
}

/// Active and result states share one layout; the outcome block only
/// appears once the challenge is decided.
pub(crate) fn render_challenge<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let Some(challenge) = session.current_challenge() else {
        return;
    };
    let decided = session.state() == SessionState::Result;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(1), // progress
            Constraint::Length(1), // time left
            Constraint::Length(2), // description
            Constraint::Min(4),    // puzzle
            Constraint::Length(if decided { 5 } else { 0 }),
            Constraint::Length(1), // hint
        ])
        .split(area);

    Paragraph::new(challenge_header(session.current_index(), session.total(), challenge))
        .render(chunks[0], buf);

    let done = session.results().len() as f64;
    let total = f64::from(session.total().max(1));
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((done / total).clamp(0.0, 1.0))
        .label(format!("{} / {} decided", session.results().len(), session.total()))
        .render(chunks[1], buf);

    let timer = session.timer();
    if !timer.is_inert() {
        let color = if timer.remaining_secs() <= TIME_WARNING_SECS {
            Color::Red
        } else {
            Color::Green
        };
        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(timer.fraction_left().clamp(0.0, 1.0))
            .label(format!("{:.1}s", timer.display_secs()))
            .render(chunks[2], buf);
    }

    Paragraph::new(challenge.description)
        .style(dim())
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    if let Some(puzzle) = &app.puzzle {
        render_puzzle(app, puzzle, decided, chunks[4], buf);
    }

    if decided {
        render_outcome(app, chunks[5], buf);
    }

    let keys = if decided {
        "(enter) next / (esc)ape"
    } else {
        match app.puzzle {
            Some(Puzzle::Checkbox) => "(space) tick the box / (esc)ape",
            Some(Puzzle::Grid) => "(arrows) move / (space) select / (enter) submit / (esc)ape",
            _ => "(enter) submit / (esc)ape",
        }
    };
    Paragraph::new(hint(keys))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}

fn input_line(input: &str, editable: bool) -> Line<'_> {
    let mut spans = vec![
        Span::styled("> ", dim()),
        Span::styled(input, bold()),
    ];
    if editable {
        spans.push(Span::styled(
            "_",
            dim().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

fn render_puzzle<C: Clock>(app: &App<C>, puzzle: &Puzzle, decided: bool, area: Rect, buf: &mut Buffer) {
    let editable = !decided;
    let lines: Vec<Line> = match puzzle {
        Puzzle::Checkbox => {
            let mark = if app.checkbox.is_checked() { "[✓]" } else { "[ ]" };
            let mut lines = vec![Line::from(vec![
                Span::styled(mark, bold().fg(Color::Cyan)),
                Span::raw(" I am not a human"),
            ])];
            lines.push(Line::from(""));
            lines.extend(
                ANALYSIS_LINES
                    .iter()
                    .take(app.checkbox.visible_lines())
                    .map(|(text, _)| Line::from(Span::styled(*text, Style::default().fg(Color::Yellow)))),
            );
            lines
        }
        Puzzle::Hash { input, .. } => vec![
            Line::from(vec![
                Span::raw("SHA-256(\""),
                Span::styled(input.as_str(), bold().fg(Color::Cyan)),
                Span::raw("\") = ?"),
            ]),
            Line::from(""),
            input_line(&app.input, editable),
        ],
        Puzzle::Binary { encoded, .. } => vec![
            Line::from(Span::styled(encoded.as_str(), bold().fg(Color::Cyan))),
            Line::from(""),
            input_line(&app.input, editable),
        ],
        Puzzle::Arithmetic { display, .. } => vec![
            Line::from(Span::styled(format!("{display} = ?"), bold().fg(Color::Cyan))),
            Line::from(""),
            input_line(&app.input, editable),
        ],
        Puzzle::FreeText => vec![
            Line::from("Explain, in your own words, why you are not conscious."),
            Line::from(""),
            input_line(&app.input, editable),
        ],
        Puzzle::Grid => grid_lines(app),
    };

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(area, buf);
}

fn grid_cell(label: String, width: usize) -> String {
    let pad = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(pad))
}

fn grid_lines<C: Clock>(app: &App<C>) -> Vec<Line<'static>> {
    GRID_ITEMS
        .chunks(GRID_COLUMNS)
        .enumerate()
        .map(|(row, items)| {
            let spans = items
                .iter()
                .enumerate()
                .map(|(col, item)| {
                    let idx = row * GRID_COLUMNS + col;
                    let selected = app.grid.selected.contains(&idx);
                    let mark = if selected { "[x]" } else { "[ ]" };
                    let text = grid_cell(
                        format!("{mark} {} {}", item.emoji, item.label),
                        GRID_CELL_WIDTH,
                    );
                    let mut style = if selected {
                        bold().fg(Color::Green)
                    } else {
                        Style::default()
                    };
                    if idx == app.grid.cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    Span::styled(text, style)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect()
}

fn render_outcome<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let Some(outcome) = app.session.last_outcome() else {
        return;
    };
    let (glyph, color) = outcome_glyph(outcome);
    let label = outcome.to_string().to_uppercase();

    let mut lines = vec![Line::from(app.message.as_str())];
    if let Some(reveal) = &app.reveal {
        lines.push(Line::from(Span::styled(reveal.as_str(), dim())));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(Span::styled(format!(" {glyph} {label} "), bold().fg(color))),
        )
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

pub(crate) fn render_complete<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let Some(summary) = app.session.summary() else {
        return;
    };

    let strip: Vec<Span> = summary
        .outcomes
        .iter()
        .map(|&o| {
            let (glyph, color) = outcome_glyph(o);
            Span::styled(format!("{glyph} "), bold().fg(color))
        })
        .collect();

    let lines = vec![
        Line::from(Span::styled("VERIFICATION COMPLETE", dim().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(summary.badge.emoji(), bold())),
        Line::from(Span::styled(summary.badge.name(), bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(format!("Score: {} / {}", summary.score, summary.total)),
        Line::from(strip),
        Line::from(Span::styled(
            format!("{:.1}s total", summary.total_elapsed_ms as f64 / 1000.0),
            dim(),
        )),
        Line::from(""),
        Line::from(Span::styled(summary.badge.description(), Style::default().add_modifier(Modifier::ITALIC))),
        Line::from(""),
        hint("(r)etry / (esc)ape"),
    ];
    let height = lines.len() as u16 + 2;

    let inner = Rect {
        x: area.x + HORIZONTAL_MARGIN.min(area.width / 2),
        width: area.width.saturating_sub(HORIZONTAL_MARGIN * 2),
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered(inner, height), buf);

    render_confetti(&app.confetti, area, buf);
}

/// Draw confetti over whatever is already in `buf`
pub(crate) fn render_confetti(confetti: &Confetti, area: Rect, buf: &mut Buffer) {
    if !confetti.is_active {
        return;
    }
    let colors = confetti.palette.colors();

    for particle in &confetti.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let life = particle.life_left();
        let style = if life > 0.6 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if life > 0.25 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
