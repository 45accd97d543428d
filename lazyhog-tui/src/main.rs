//! lazyhog entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lazyhog_tui::api_client::RestClient;
use lazyhog_tui::config::TuiConfig;
use lazyhog_tui::error::TuiError;
use lazyhog_tui::events::TuiEvent;
use lazyhog_tui::logging;
use lazyhog_tui::runtime::Runtime;
use lazyhog_tui::state::App;
use lazyhog_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = TuiConfig::load()?;
    logging::init(&config.log_path)?;
    info!(
        instance = %config.instance_url,
        environment = config.environment().label(),
        "starting lazyhog"
    );

    let client = RestClient::new(&config).map_err(TuiError::from)?;
    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    let runtime = Runtime::new(Arc::new(client), event_tx.clone(), config.request_timeout());
    let mut app = App::new(config, Instant::now());

    enable_raw_mode()?;
    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    spawn_input_reader(event_tx.clone());
    let size = terminal.size()?;
    app.handle_event(
        TuiEvent::Resize {
            width: size.width,
            height: size.height,
        },
        Instant::now(),
    );
    runtime.dispatch(app.start());

    let mut ticker = tokio::time::interval(app.poller.interval());

    loop {
        let now = Instant::now();
        terminal.draw(|f| render_view(f, &app, now))?;

        let event = tokio::select! {
            _ = ticker.tick() => TuiEvent::Tick,
            Some(event) = event_rx.recv() => event,
        };
        let intents = app.handle_event(event, Instant::now());
        if runtime.dispatch(intents) {
            break;
        }
    }

    info!("lazyhog exiting");
    Ok(())
}

/// Raw mode must already be on, with a `TerminalGuard` alive to undo it.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let forwarded = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if forwarded.is_err() {
                    break;
                }
            }
        }
    });
}
