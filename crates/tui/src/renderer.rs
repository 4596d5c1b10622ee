use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lanetrace_protocol::{Color as PlotColor, SeriesKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph,
        canvas::{Canvas, Line as CanvasLine, Points},
    },
};

use crate::app::{Action, App, Focus, Picker, PlotView, Screen};

fn plot_color(color: Option<PlotColor>) -> Color {
    color.map_or(Color::White, |c| Color::Rgb(c.r, c.g, c.b))
}

fn key_to_action(code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    Some(match code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Esc => Action::Back,
        KeyCode::Tab => Action::NextField,
        KeyCode::BackTab => Action::PrevField,
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Left => Action::Left,
        KeyCode::Right => Action::Right,
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Enter => Action::Activate,
        KeyCode::Char('p') => Action::Plot,
        _ => return None,
    })
}

/// Run the interactive loop until the user quits. The terminal is restored
/// even when drawing fails.
pub fn run_tui(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(action) = key_to_action(key.code, key.modifiers)
        {
            app.handle(action);
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .split(frame.area());

    let help = match app.screen {
        Screen::Select => {
            " lanetrace | Tab field | ↑↓ change | Space select vehicle | Enter/p plot | q quit "
        }
        Screen::Plot(_) => " lanetrace | ←→ hover point | Tab next vehicle | Esc back | q quit ",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
        chunks[0],
    );

    match &app.screen {
        Screen::Select => draw_select(frame, app, chunks[1]),
        Screen::Plot(view) => draw_plot(frame, view, chunks[1]),
    }

    let status = app.notice.as_deref().unwrap_or("");
    let style = if status.starts_with("Error") {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::Gray)
    };
    frame.render_widget(Paragraph::new(status).style(style), chunks[2]);
}

fn picker_line<'a>(label: &'a str, picker: &'a Picker, focused: bool) -> Line<'a> {
    let value = picker.current().unwrap_or("-");
    let style = if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(vec![
        Span::raw(format!("{label:<18}")),
        Span::styled(format!(" ◀ {value} ▶ "), style),
    ])
}

fn draw_select(frame: &mut Frame, app: &App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Length(42), Constraint::Min(20)]).split(area);

    let button_style = if app.focus == Focus::PlotButton {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green)
    };
    let lines = vec![
        picker_line("Select Run Index:", &app.runs, app.focus == Focus::Run),
        Line::raw(""),
        picker_line("Select Time Window:", &app.windows, app.focus == Focus::Window),
        Line::raw(""),
        picker_line("Initial Lane:", &app.initial_lanes, app.focus == Focus::InitialLane),
        Line::raw(""),
        picker_line("Exit Lane:", &app.exit_lanes, app.focus == Focus::ExitLane),
        Line::raw(""),
        Line::from(Span::styled("  [ Plot ]  ", button_style)),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Filters ")),
        columns[0],
    );

    let items: Vec<ListItem> = app
        .vehicles
        .iter()
        .zip(&app.marked)
        .map(|(entry, marked)| {
            let mark = if *marked { "[x]" } else { "[ ]" };
            ListItem::new(format!("{mark} {entry}"))
        })
        .collect();
    let border = if app.focus == Focus::Vehicles {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(
                    " Select Vehicles ({} of {}) ",
                    app.marked.iter().filter(|m| **m).count(),
                    app.vehicles.len()
                )),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(
        (app.focus == Focus::Vehicles && !app.vehicles.is_empty()).then_some(app.vehicle_cursor),
    );
    frame.render_stateful_widget(list, columns[1], &mut state);
}

fn draw_plot(frame: &mut Frame, view: &PlotView, area: Rect) {
    let rows = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(area);
    let spec = &view.spec;
    let hovered = view
        .hovered_series()
        .and_then(|s| s.points.get(view.point))
        .copied();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", spec.title)))
        .marker(Marker::Braille)
        .x_bounds([spec.x_range.min, spec.x_range.max])
        .y_bounds([spec.y_range.min, spec.y_range.max])
        .paint(|ctx| {
            for series in &spec.series {
                let color = plot_color(series.color);
                match series.kind {
                    SeriesKind::Lines { .. } => {
                        for pair in series.points.windows(2) {
                            ctx.draw(&CanvasLine::new(
                                pair[0].x, pair[0].y, pair[1].x, pair[1].y, color,
                            ));
                        }
                    }
                    SeriesKind::Markers { .. } => {
                        let coords: Vec<(f64, f64)> =
                            series.points.iter().map(|p| (p.x, p.y)).collect();
                        ctx.draw(&Points {
                            coords: &coords,
                            color,
                        });
                    }
                    SeriesKind::Text => {
                        for (i, p) in series.points.iter().enumerate() {
                            let text = series.text_at(i).unwrap_or(&series.name).to_string();
                            ctx.print(p.x, p.y, Span::styled(text, Style::default().fg(Color::Gray)));
                        }
                    }
                }
            }
            if let Some(p) = hovered {
                ctx.layer();
                ctx.print(p.x, p.y, Span::styled("◆", Style::default().fg(Color::White)));
            }
        });
    frame.render_widget(canvas, rows[0]);

    let hover = view.hover_text().unwrap_or("no points").replace('\n', "  |  ");
    let footer_title = view
        .hovered_series()
        .map_or_else(String::new, |s| format!(" {} ", s.name));
    frame.render_widget(
        Paragraph::new(hover).block(Block::default().borders(Borders::ALL).title(footer_title)),
        rows[1],
    );
}
