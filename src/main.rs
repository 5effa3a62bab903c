//! WorldWise TUI

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventOutcome, RenderContext};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};
use worldwise::action::Action;
use worldwise::api::{BigDataCloud, DEFAULT_GEOCODE_URL};
use worldwise::effect::{self, Effect, Services};
use worldwise::reducer::reducer;
use worldwise::source::{source_for, DEFAULT_DATA_PATH};
use worldwise::state::{AppState, SPINNER_TICK_MS};
use worldwise::ui;

/// WorldWise - keep track of the cities you visited
#[derive(Parser, Debug)]
#[command(name = "worldwise")]
#[command(about = "Click the world map to record the cities you visited")]
struct Args {
    /// City data: a JSON file or an http(s) URL serving a JSON array
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: String,

    /// Reverse-geocoding endpoint (BigDataCloud compatible)
    #[arg(long, default_value = DEFAULT_GEOCODE_URL)]
    geocode_url: String,

    /// Log file; the terminal is taken by the UI. Level comes from RUST_LOG
    #[arg(long, default_value = "worldwise.log")]
    log_file: PathBuf,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        data,
        geocode_url,
        log_file,
        debug: debug_args,
    } = Args::parse();

    init_logging(&log_file)?;
    log::info!("starting with data source {data}");

    let services = Services::new(
        source_for(&data),
        Arc::new(BigDataCloud::new(geocode_url)),
    );

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(|| async {
            let mut state = AppState::new(Local::now().date_naive());
            if let Ok(size) = terminal::size() {
                state.terminal_size = size;
            }
            Ok::<AppState, io::Error>(state)
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, services, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    log::info!("bye");
    Ok(())
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    services: Services,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    debug
        .run_effect_app(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::CitiesFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(SPINNER_TICK_MS),
                    || Action::Tick,
                );
            },
            |frame, area, state, _render_ctx: RenderContext| {
                ui::render(frame, area, state);
            },
            |event, state| -> EventOutcome<Action> { ui::handle_event(event, state) },
            |action| matches!(action, Action::Quit),
            move |effect, ctx: &mut EffectContext<Action>| handle_effect(effect, ctx, &services),
        )
        .await
}

/// Handle effects by spawning them as keyed tasks.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    let key = effect.task_key();
    let services = services.clone();
    ctx.tasks()
        .spawn(key, async move { effect::resolve(effect, &services).await });
}
