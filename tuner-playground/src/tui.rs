//! Interactive terminal front end.

use std::{
    io,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use tuner_core::{CarouselEngine, ItemView, VisibilityController, VisibilityState};
use tuner_model::CarouselItem;

use crate::app::App;
use crate::input::{Action, map_key};

/// Upper bound on how long the loop blocks waiting for a key.
const MAX_POLL: Duration = Duration::from_millis(100);
/// Channels shown above and below the focused one.
const STACK_REACH: i64 = 4;
/// Programs shown either side of the focused one.
const BAR_REACH: i64 = 2;

pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut terminal = or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        restore_terminal,
    )?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    result
}

/// Run `setup`, calling `restore` when it fails.
fn or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

fn restore_terminal() {
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        log::warn!("failed to leave the alternate screen: {err}");
    }
    if let Err(err) = disable_raw_mode() {
        log::warn!("failed to disable raw mode: {err}");
    }
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        let now = Instant::now();
        let timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(MAX_POLL)
            .min(MAX_POLL);

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            match map_key(key) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Remote(remote)) => app.press(remote, Instant::now()),
                Some(Action::Wait(_)) | None => {}
            }
        }
        app.step(Instant::now());
    }
}

fn render(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(11),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(f.size());
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(20)])
        .split(rows[1]);

    render_status(f, rows[0], app);
    render_channel_stack(f, middle[0], app);
    render_events(f, middle[1], app);
    render_program_bar(f, rows[2], app);
    f.render_widget(
        Paragraph::new(
            "↑/↓ browse channels  ←/→ programs  PgUp/PgDn CH+/CH-  Enter select  Esc back  q quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let guide = app.guide();
    let playing = guide
        .channels()
        .committed_item()
        .map(|c| format!("CH {:03}", c.number))
        .unwrap_or_else(|| "no channel".into());
    let showing = guide
        .programs_channel()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    let line = Line::from(vec![
        Span::styled(playing, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(format!(
            "  programs of {showing}  paging {}  fetches {}  dropped {}  {}",
            guide.programs().paging_state(),
            app.pending_fetches(),
            app.dropped(),
            app.source().now().format("%H:%M UTC"),
        )),
    ]);
    f.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("tuner")),
        area,
    );
}

fn render_channel_stack(f: &mut Frame, area: Rect, app: &App) {
    let guide = app.guide();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title("channels", guide.channel_stack()));
    let items = window(guide.channels(), STACK_REACH)
        .into_iter()
        .rev()
        .map(|view| {
            let text = format!(
                "{} {:03}  {}",
                marker(&view),
                view.item.number,
                view.item.id
            );
            ListItem::new(Line::styled(text, item_style(&view)))
        })
        .collect::<Vec<_>>();
    let list = List::new(items)
        .block(block)
        .style(pane_style(guide.channel_stack()));
    f.render_widget(list, area);
}

fn render_program_bar(f: &mut Frame, area: Rect, app: &App) {
    let guide = app.guide();
    let spans = window(guide.programs(), BAR_REACH)
        .into_iter()
        .flat_map(|view| {
            let text = format!(
                " {} {} {} ",
                marker(&view),
                view.item
                    .start_at
                    .map(|at| at.format("%H:%M").to_string())
                    .unwrap_or_default(),
                view.item.title
            );
            [Span::styled(text, item_style(&view)), Span::raw("│")]
        })
        .collect::<Vec<_>>();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title("programs", guide.program_bar()));
    f.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .style(pane_style(guide.program_bar())),
        area,
    );
}

fn render_events(f: &mut Frame, area: Rect, app: &App) {
    let height = area.height.saturating_sub(2) as usize;
    let items = app
        .recent_events(height)
        .into_iter()
        .map(ListItem::new)
        .collect::<Vec<_>>();
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("events")),
        area,
    );
}

/// Items around the focus, in view order.
fn window<T: CarouselItem>(
    engine: &CarouselEngine<T>,
    reach: i64,
) -> Vec<ItemView<'_, T>> {
    let Some(focus) = engine.focus_view_index() else {
        return Vec::new();
    };
    (focus - reach..=focus + reach)
        .filter_map(|view| engine.item_at_view(view))
        .collect()
}

fn marker<T>(view: &ItemView<'_, T>) -> &'static str {
    match (view.is_focused, view.is_committed) {
        (true, true) => "▶●",
        (true, false) => "▶ ",
        (false, true) => " ●",
        (false, false) => "  ",
    }
}

fn item_style<T>(view: &ItemView<'_, T>) -> Style {
    let mut style = Style::default();
    if view.is_committed {
        style = style.fg(Color::Green);
    }
    if view.is_focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn pane_style(visibility: &VisibilityController) -> Style {
    match visibility.state() {
        VisibilityState::Gone => Style::default().fg(Color::DarkGray),
        _ if visibility.is_leaving() => Style::default().add_modifier(Modifier::DIM),
        VisibilityState::HintVisible => Style::default().add_modifier(Modifier::DIM),
        VisibilityState::Visible => Style::default(),
    }
}

fn title(name: &str, visibility: &VisibilityController) -> String {
    if visibility.is_leaving() {
        format!("{name} [{} leaving]", visibility.state())
    } else {
        format!("{name} [{}]", visibility.state())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    #[test]
    fn failed_setup_restores_the_terminal() {
        let restored = Cell::new(0);
        let result: Result<()> = or_restore(
            || Err(anyhow!("no alternate screen")),
            || restored.set(restored.get() + 1),
        );
        assert!(result.is_err());
        assert_eq!(restored.get(), 1);
    }

    #[test]
    fn successful_setup_leaves_the_terminal_alone() {
        let restored = Cell::new(false);
        let value = or_restore(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
