//! Turn a flat list of file paths into a tree drawn as aligned columns.
//!
//! By default the laid-out tree is printed to stdout.  Run with `--tui` to
//! browse it interactively (and rebuild it with `r`).

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};

use crate::app::{
    build::{BuildOutcome, BuildPipeline},
    event::{spawn_event_reader, AppEvent},
    fetch_runtime::{spawn_fetch, FetchUpdate},
    handler::{self, STATUS_HINT},
    state::AppState,
};
use crate::config::{BuildConfig, DEFAULT_SOURCE};
use crate::core::source::Fetcher;
use crate::ui::{
    columns::{to_plain_lines, ColumnsWidget},
    layout::AppLayout,
    spinner::FetchIndicator,
    surface::{Surface, DEFAULT_MOUNT},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Draw a path list as nested columns")]
struct Cli {
    /// Path list to read: an http(s) URL, a file, or `-` for stdin.
    #[arg(default_value = DEFAULT_SOURCE)]
    source: String,

    /// Name of the mount point the tree is attached to.
    #[arg(long, default_value = DEFAULT_MOUNT)]
    mount: String,

    /// Browse the tree in an interactive terminal view.
    #[arg(long)]
    tui: bool,
}

/// A surface with the configured mount point registered.
fn surface_for(config: &BuildConfig) -> Surface {
    Surface::new([config.mount.as_str()])
}

// ───────────────────────────────────────── one-shot ─────────

async fn print_once(pipeline: BuildPipeline, fetcher: Fetcher) -> ExitCode {
    let mut surface = surface_for(pipeline.config());
    let outcome = pipeline.run(&fetcher, &mut surface).await;

    if let Some(message) = surface.fallback() {
        println!("{message}");
        return ExitCode::FAILURE;
    }
    if let Some(mount) = surface.mount(&pipeline.config().mount) {
        for line in to_plain_lines(mount) {
            println!("{line}");
        }
    }
    match outcome {
        BuildOutcome::Failed(_) => ExitCode::FAILURE,
        BuildOutcome::Attached { .. } | BuildOutcome::Superseded => ExitCode::SUCCESS,
    }
}

// ───────────────────────────────────────── interactive ──────

fn describe(outcome: &BuildOutcome) -> Option<String> {
    match outcome {
        BuildOutcome::Attached {
            elements,
            max_depth,
        } => Some(format!(
            "{elements} entries, {} levels deep",
            max_depth.map_or(0, |d| d + 1)
        )),
        BuildOutcome::Failed(e) => Some(e.to_string()),
        BuildOutcome::Superseded => None,
    }
}

async fn run_tui(pipeline: BuildPipeline, fetcher: Fetcher) -> Result<()> {
    let mut state = AppState::new(surface_for(pipeline.config()), pipeline.config().mount.clone());

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (fetch_tx, mut fetch_rx) = tokio::sync::mpsc::unbounded_channel::<FetchUpdate>();

    // ── event loop ────────────────────────────────────────────
    loop {
        // Start the new fetch before drawing so the spinner shows at once.
        if state.needs_rebuild {
            state.needs_rebuild = false;
            state.abort_in_flight();
            let ticket = pipeline.begin();
            state.in_flight = Some(spawn_fetch(
                fetch_tx.clone(),
                ticket,
                fetcher.clone(),
                pipeline.locator().clone(),
            ));
        }

        terminal.draw(|frame| {
            let layout = AppLayout::from_area(frame.area());

            let tree_block = Block::default()
                .title(format!(" {} ", pipeline.config().source))
                .title_style(Theme::title_style())
                .borders(Borders::ALL)
                .border_style(Theme::border_style());
            state.set_viewport(layout.tree_viewport());

            if let Some(message) = state.surface.fallback() {
                let text = Paragraph::new(message)
                    .style(Theme::fallback_style())
                    .wrap(Wrap { trim: true })
                    .block(tree_block);
                frame.render_widget(text, layout.tree_area);
            } else if let Some(mount) = state.surface.mount(&state.mount) {
                let columns = ColumnsWidget::new(mount)
                    .offset(state.scroll.0, state.scroll.1)
                    .block(tree_block);
                frame.render_widget(columns, layout.tree_area);
            }

            frame.render_widget(
                FetchIndicator {
                    visible: state.fetching(),
                    tick: state.tick,
                },
                layout.tree_area,
            );

            let status_text = state.status_message.as_deref().unwrap_or(STATUS_HINT);
            let status = Paragraph::new(status_text).style(Theme::status_bar_style());
            frame.render_widget(status, layout.status_area);
        })?;

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => handler::handle_resize(&mut state, w, h),
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = fetch_rx.recv() => {
                let outcome = pipeline.complete(&update.ticket, update.result, &mut state.surface);
                if !matches!(outcome, BuildOutcome::Superseded) {
                    state.scroll = (0, 0);
                    state.status_message = describe(&outcome);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    state.abort_in_flight();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialise tracing (silent unless RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let pipeline = BuildPipeline::new(BuildConfig::new(cli.source, cli.mount));
    let fetcher = Fetcher::new()?;

    if cli.tui {
        run_tui(pipeline, fetcher).await?;
        return Ok(ExitCode::SUCCESS);
    }
    Ok(print_once(pipeline, fetcher).await)
}
