// File: ./src/tui/mod.rs
// Entry point and main loop for the TUI application.
pub mod action;
pub mod handlers;
pub mod network;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::context::{AppContext, StandardContext};
use crate::controller::WordController;
use crate::logging;
use crate::model::PageSnapshot;
use crate::tags::TagBoard;
use crate::tui::action::Action;
use crate::tui::state::AppState;
use crate::tui::view::draw;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::sync::mpsc;

/// Command line options understood by the TUI.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    pub root: Option<PathBuf>,
    pub page: Option<PathBuf>,
}

impl Options {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut opts = Options::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => {
                    let v = args.next().context("--root needs a directory")?;
                    opts.root = Some(PathBuf::from(v));
                }
                "--page" => {
                    let v = args.next().context("--page needs a JSON file")?;
                    opts.page = Some(PathBuf::from(v));
                }
                other => anyhow::bail!("Unknown argument '{}'", other),
            }
        }
        Ok(opts)
    }
}

/// Reads the lists and words to start from.
pub fn load_page(path: &Path) -> Result<PageSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse page file {:?}", path))
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn onboard(ctx: &dyn AppContext) -> Result<Config> {
    println!("Welcome to worddb. No configuration file found.");
    println!("Let's connect to your word database.\n");

    let mut config = Config::default();
    let url = prompt(&format!("Server URL [{}]: ", config.server_url))?;
    if !url.is_empty() {
        config.server_url = url;
    }
    config.csrf_token = prompt("CSRF token (from the csrftoken cookie, may be empty): ")?;

    if let Err(e) = config.save(ctx) {
        eprintln!("Warning: Could not save config file: {}", e);
    } else if let Ok(path) = Config::get_path_string(ctx) {
        println!("Configuration saved to: {}", path);
    }

    println!("Starting TUI...");
    std::thread::sleep(Duration::from_secs(1));
    Ok(config)
}

pub async fn run(opts: Options) -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let ctx: Arc<dyn AppContext> = Arc::new(StandardContext::new(opts.root.clone()));

    let cfg = match Config::load(ctx.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            // A broken file is reported, only a missing one triggers onboarding.
            if !Config::is_missing_config_error(&e) {
                eprintln!("Error loading configuration:\n{}", e);
                std::process::exit(1);
            }
            onboard(ctx.as_ref())?
        }
    };

    match logging::init(ctx.as_ref(), cfg.log_level_filter()) {
        Ok(_) => logging::install_panic_hook(),
        Err(e) => eprintln!("Warning: logging disabled: {}", e),
    }

    let board = Arc::new(match &opts.page {
        Some(path) => TagBoard::from_page(load_page(path)?),
        None => TagBoard::new(),
    });
    let controller = WordController::from_config(&cfg, board.clone())?;
    log::info!("using server {}", controller.client.base_url());

    // --- 2. TERMINAL SETUP ---
    // Give the shell back before the panic message is printed.
    let logged_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        logged_hook(info);
    }));
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = AppState::new(controller.clone(), board);

    let (action_tx, action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- 4. NETWORK TASK ---
    tokio::spawn(network::run_network_actor(
        controller.clone(),
        cfg.csrf_token,
        action_rx,
        event_tx,
    ));

    // --- 5. UI LOOP ---
    let result = async {
        loop {
            controller.tick().await;
            app_state.sync().await;
            terminal.draw(|f| draw(f, &mut app_state))?;

            // A. Network Events
            while let Ok(event) = event_rx.try_recv() {
                handlers::handle_app_event(&mut app_state, event);
            }

            // B. Input Events
            if event::poll(Duration::from_millis(50))? {
                match event::read()? {
                    Event::Mouse(mouse) => match mouse.kind {
                        MouseEventKind::ScrollDown => app_state.next(),
                        MouseEventKind::ScrollUp => app_state.previous(),
                        _ => {}
                    },
                    Event::Key(key) => {
                        // Filter out KeyRelease events to prevent double input on Windows
                        if key.kind == event::KeyEventKind::Release {
                            continue;
                        }
                        if let Some(action) = handlers::handle_key_event(key, &mut app_state).await
                        {
                            if action == Action::Quit {
                                let _ = action_tx.send(Action::Quit).await;
                                break;
                            }
                            let _ = action_tx.send(action).await;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    // --- 6. CLEANUP ---
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}
