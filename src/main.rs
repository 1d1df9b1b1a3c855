mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tippwerk::config::Config;
use tippwerk::content::{Difficulty, Mode};
use tippwerk::session::Phase;
use tippwerk::store::JsonStore;
use tracing_subscriber::EnvFilter;

use app::App;
use event::{AppEvent, EventHandler};
use ui::components::builder_area::BuilderArea;
use ui::components::info_panel::InfoPanel;
use ui::components::menu::Menu;
use ui::components::result_screen::ResultScreen;
use ui::components::stats_header::StatsHeader;
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

const LOG_ENV: &str = "TIPPWERK_LOG";

#[derive(Parser)]
#[command(name = "tippwerk", version, about = "Terminal German practice: typing drills and sentence building")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, value_parser = parse_difficulty, help = "Preselected difficulty (beginner, intermediate, advanced)")]
    difficulty: Option<Difficulty>,

    #[arg(short, long, value_parser = parse_mode, help = "Preselected mode (typing, builder)")]
    mode: Option<Mode>,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::ALL
        .into_iter()
        .find(|d| d.as_str() == s)
        .ok_or_else(|| format!("unknown difficulty '{s}'"))
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    [Mode::Typing, Mode::Builder]
        .into_iter()
        .find(|m| m.as_str() == s)
        .ok_or_else(|| format!("unknown mode '{s}'"))
}

/// File logging, only when `TIPPWERK_LOG` is set. Stdout belongs to the UI.
fn init_logging() -> Result<()> {
    let Ok(directive) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let dir = JsonStore::default_dir();
    fs::create_dir_all(&dir)?;
    let file = fs::File::create(dir.join("tippwerk.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.list_themes {
        for name in ui::theme::Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }
    init_logging()?;

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    let theme = ui::theme::Theme::load(&config.theme).unwrap_or_default();

    let mut app = App::new(config, theme)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key, now) => {
                handle_key(app, key, now);
                // Keys can starve the tick thread; due timers fire here too.
                app.tick(now);
            }
            AppEvent::Tick(now) => app.tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.session.phase() {
        Phase::Menu => handle_menu_key(app, key, now),
        Phase::Active => handle_active_key(app, key, now),
        Phase::Result => handle_result_key(app, key, now),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.menu.difficulty = Difficulty::Beginner,
        KeyCode::Char('2') => app.menu.difficulty = Difficulty::Intermediate,
        KeyCode::Char('3') => app.menu.difficulty = Difficulty::Advanced,
        KeyCode::Char('t') => app.menu.mode = Mode::Typing,
        KeyCode::Char('b') => app.menu.mode = Mode::Builder,
        KeyCode::Tab => app.menu.toggle_mode(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.start_session(now),
        _ => {}
    }
}

fn handle_active_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.reset_current(now),
            KeyCode::Char('s') => app.reshuffle(now),
            KeyCode::Char('t') => app.toggle_info(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Tab => app.skip(now),
        KeyCode::Enter => {
            if app.session.mode() == Mode::Builder {
                app.submit_or_retry(now);
            }
        }
        KeyCode::Backspace => app.backspace(now),
        KeyCode::Char(ch) => app.type_char(ch, now),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('r') => app.practice_again(now),
        KeyCode::Char('m') | KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.session.phase() {
        Phase::Menu => render_menu(frame, app),
        Phase::Active => render_active(frame, app),
        Phase::Result => render_result(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(50, 80, frame.area());
    let menu = Menu::new(
        &app.menu,
        app.session.catalog(),
        &app.progress,
        &app.theme,
    );
    frame.render_widget(menu, area);
}

fn render_active(frame: &mut ratatui::Frame, app: &App) {
    let colors = &app.theme.colors;
    let layout = AppLayout::new(frame.area(), app.show_info);

    frame.render_widget(StatsHeader::new(&app.session, &app.theme), layout.header);

    match app.session.mode() {
        Mode::Typing => frame.render_widget(TypingArea::new(&app.session, &app.theme), layout.main),
        Mode::Builder => frame.render_widget(BuilderArea::new(&app.session, &app.theme), layout.main),
    }

    if let (Some(panel), Some(challenge)) = (layout.panel, app.session.current_challenge()) {
        frame.render_widget(InfoPanel::new(challenge, &app.glossary, &app.theme), panel);
    }

    let mut hints = vec!["[Tab] Skip", "[Ctrl+R] Reset", "[Ctrl+S] Shuffle", "[Ctrl+T] Info"];
    if app.session.mode() == Mode::Builder {
        hints.insert(0, "[Enter] Check");
    }
    hints.push("[Esc] Menu");
    let lines: Vec<Line> = pack_hint_lines(&hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
        .collect();
    frame.render_widget(Paragraph::new(lines), layout.footer);
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    if let Some(summary) = app.session.summary() {
        let area = centered_rect(60, 60, frame.area());
        frame.render_widget(ResultScreen::new(summary, &app.progress, &app.theme), area);
    }
}
