//! weft - terminal session demo.
//!
//! ```text
//! stdin ─▶ InputPump ─▶ KeyDecoder ─▶ Session::handle_key ─▶ DemoBackend
//!                                          │
//!                              debounce ───┘
//!                                          ▼
//!                          compose(RenderState) ─▶ DiffRenderer ─▶ stdout
//! ```
//!
//! One task owns the session, the decoder and the renderer. Everything that
//! can wake the loop (input, SIGWINCH, the escape timeout, the redraw
//! deadline, a pending backend reply) is a branch of a single `select!`.
//! When stdin is not a TTY the same session runs in line mode instead.

mod backend;

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use weft_config::WeftConfig;
use weft_engine::{MessageMeta, Role, Session, SessionOptions};
use weft_tui::{
    DiffRenderer, ESCAPE_TIMEOUT, InputMsg, InputPump, KeyDecoder, LayoutConfig, LineAssembler,
    PlainPrinter, TerminalSession, compose,
};
use weft_types::ui::UiOptions;

use crate::backend::DemoBackend;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than write into the screen we own.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new().create(true).append(true).open(&candidate) {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => warnings.push(format!(
                "Failed to open log file {}: {e}",
                candidate.display()
            )),
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // ~/.weft/logs/weft.log
    if let Some(config_path) = WeftConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("weft.log"));
    }

    candidates.push(PathBuf::from(".weft").join("logs").join("weft.log"));
    candidates
}

fn layout_config(config: &WeftConfig) -> LayoutConfig {
    LayoutConfig {
        reserved_rows: config.ui.reserved_rows,
        min_visible_messages: config.ui.min_visible_messages,
        options: UiOptions {
            ascii_only: config.ui.ascii_only,
        },
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = WeftConfig::load_or_default();
    let mut session = Session::new(SessionOptions::from_config(&config));
    let mut backend = DemoBackend::new(&config.ui.trigger_prefix);
    session.add_message(
        Role::System,
        format!("Type {}help for commands", config.ui.trigger_prefix),
        MessageMeta::default(),
    );

    match TerminalSession::enter() {
        Ok(terminal) => {
            run_interactive(terminal, &mut session, &mut backend, layout_config(&config)).await
        }
        Err(err) => {
            tracing::info!("Falling back to line mode: {err}");
            run_line_mode(&mut session, &mut backend).await
        }
    }
}

async fn run_interactive(
    mut terminal: TerminalSession,
    session: &mut Session,
    backend: &mut DemoBackend,
    layout: LayoutConfig,
) -> Result<()> {
    let mut input = InputPump::stdin().context("failed to start input reader")?;
    let mut resize = ResizeSignal::new().context("failed to watch window size")?;
    let mut decoder = KeyDecoder::new();
    let mut renderer = DiffRenderer::new();
    let mut size = TerminalSession::size().context("failed to query terminal size")?;
    let mut escape_deadline: Option<Instant> = None;

    let result: Result<()> = loop {
        let redraw_at = session.redraw_deadline();
        let backend_at = backend.deadline(Instant::now());

        tokio::select! {
            msg = input.recv() => match msg {
                Some(InputMsg::Bytes(bytes)) => {
                    for key in decoder.feed(&bytes) {
                        session.handle_key(key, backend);
                    }
                    escape_deadline = decoder
                        .has_pending_escape()
                        .then(|| Instant::now() + ESCAPE_TIMEOUT);
                }
                Some(InputMsg::Error(err)) => {
                    tracing::warn!("Input reader failed: {err}");
                    break Ok(());
                }
                Some(InputMsg::Eof) | None => break Ok(()),
            },
            () = resize.recv() => match TerminalSession::size() {
                Ok(new_size) => {
                    size = new_size;
                    session.notify_resize();
                }
                Err(e) => break Err(e).context("failed to query terminal size"),
            },
            () = sleep_until(escape_deadline) => {
                escape_deadline = None;
                for key in decoder.flush() {
                    session.handle_key(key, backend);
                }
            }
            () = sleep_until(backend_at) => backend.tick(session, Instant::now()),
            () = sleep_until(redraw_at) => {}
        }

        if let Some(redraw) = session.poll_redraw(Instant::now()) {
            let frame = compose(session.state(), size, &layout);
            if let Err(e) = renderer.draw(terminal.writer(), frame, size, redraw) {
                break Err(e).context("failed to draw frame");
            }
        }

        if session.release_requested() || backend.should_quit() {
            break Ok(());
        }
    };

    tracing::info!(frames = renderer.frames_written(), "Session ended");
    terminal.release().context("failed to restore terminal")?;
    result
}

async fn run_line_mode(session: &mut Session, backend: &mut DemoBackend) -> Result<()> {
    let mut input = InputPump::stdin().context("failed to start input reader")?;
    let mut lines = LineAssembler::default();
    let mut printer = PlainPrinter::new();
    let mut out = io::stdout();
    let mut input_open = true;

    printer.print(&mut out, session.state())?;
    loop {
        let backend_at = backend.deadline(Instant::now());

        tokio::select! {
            msg = input.recv(), if input_open => match msg {
                Some(InputMsg::Bytes(bytes)) => {
                    for line in lines.feed(&bytes) {
                        session.submit_line(&line, backend);
                    }
                }
                Some(InputMsg::Error(err)) => {
                    tracing::warn!("Input reader failed: {err}");
                    input_open = false;
                }
                Some(InputMsg::Eof) | None => {
                    if let Some(line) = lines.finish() {
                        session.submit_line(&line, backend);
                    }
                    input_open = false;
                }
            },
            () = sleep_until(backend_at) => backend.tick(session, Instant::now()),
        }

        printer.print(&mut out, session.state())?;
        if backend.should_quit() || (!input_open && !backend.is_busy()) {
            break;
        }
    }
    out.flush()?;
    Ok(())
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

#[cfg(unix)]
struct ResizeSignal(tokio::signal::unix::Signal);

#[cfg(unix)]
impl ResizeSignal {
    fn new() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::window_change()).map(Self)
    }

    async fn recv(&mut self) {
        if self.0.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
struct ResizeSignal;

#[cfg(not(unix))]
impl ResizeSignal {
    #[allow(clippy::unnecessary_wraps)]
    fn new() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) {
        std::future::pending::<()>().await;
    }
}
