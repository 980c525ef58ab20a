//! Uptime Checker - UptimeRobot monitor status in the terminal
//!
//! A terminal UI application that polls the UptimeRobot API, caches the last
//! good response and renders monitor status in a live table.

mod app;
mod ui;

use std::io::{self, Stdout};
use std::panic;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{error, info};

use app::{App, AppState};
use uptime_checker::cli::{Cli, StartupConfig};
use uptime_checker::credentials::{TokenStore, TOKEN_ENV_VAR};
use uptime_checker::data::UptimeRobotClient;
use uptime_checker::logging;
use uptime_checker::refresh::{try_recv, RefreshHandle, Refresher};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long the event loop waits for input before redrawing
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Restores the terminal before the default panic output is printed
fn setup_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));
}

/// Switches to raw mode on the alternate screen
fn enter_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn leave_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn render_ui(frame: &mut Frame, app: &App) {
    match app.state {
        AppState::Loading => render_loading(frame),
        AppState::Dashboard => ui::render_monitor_list(frame, app),
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Placeholder shown until the first refresh cycle completes
fn render_loading(frame: &mut Frame) {
    let [line] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(frame.area());

    frame.render_widget(
        Paragraph::new("Loading monitors...")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center),
        line,
    );
}

/// Draws, reads keys and forwards refresh requests until the user quits
fn run_event_loop(terminal: &mut Tui, refresh: &mut RefreshHandle) -> io::Result<()> {
    let mut app = App::new();

    while !app.should_quit {
        while let Some(message) = try_recv(refresh) {
            app.apply_refresh(message);
        }

        terminal.draw(|frame| render_ui(frame, &app))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                // Ignore release and repeat events on platforms that report them
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.take_refresh_request() {
            refresh.request_refresh();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = match StartupConfig::from_cli(&cli) {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };
    let config = startup.config;

    logging::init_logging(&config.config_dir);
    info!(config_dir = %config.config_dir.display(), "starting");

    // No terminal setup and no network traffic without a token
    let tokens = TokenStore::new(&config.config_dir, std::env::var(TOKEN_ENV_VAR).ok());
    let token = match tokens.resolve(startup.token.as_deref()).await {
        Ok(token) => token,
        Err(e) => {
            error!(error = %e, "no access token");
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let client = UptimeRobotClient::with_base_url(config.api_url.clone());
    let refresher = Arc::new(Refresher::new(&config, token, client));

    setup_panic_hook();
    let mut terminal = enter_terminal()?;
    let mut refresh = RefreshHandle::spawn(refresher, config.refresh_interval);

    let result = run_event_loop(&mut terminal, &mut refresh);

    refresh.shutdown().await;
    leave_terminal(&mut terminal)?;

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    info!("exiting");
    result.map_err(Into::into)
}
