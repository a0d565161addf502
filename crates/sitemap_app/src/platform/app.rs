use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use sitemap_core::{update, AppState, AppViewModel, DownloadKind, Effect, Msg, Phase};
use sitemap_logging::{sitemap_info, sitemap_warn};

use super::config::{log_level, AppConfig, Cli};
use super::effects::EffectRunner;
use super::ui;
use super::ui::terminal::TerminalSurface;

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbox {
    Msg(Msg),
    /// Stdin reached EOF: finish the running crawl, then exit.
    InputClosed,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.merge_cli(&cli);
    sitemap_logging::initialize(
        config.log.into(),
        log_level(cli.verbose),
        config.log_file.as_deref(),
    );
    sitemap_info!(
        "Starting sitemap client server={} output_dir={:?}",
        config.server,
        config.output_dir
    );

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    let runner = EffectRunner::new(config.engine_config(), inbox_tx.clone())
        .context("starting crawl service client")?;

    let locale = config.locale;
    let mut surface = TerminalSurface::new(io::stdout());
    surface.apply(&ui::layout::initial_commands(locale))?;

    let mut controller = Controller::new(AppState::with_timing(config.poll_timing()));
    let mut auto_downloads = AutoDownload::new(config.auto_downloads());
    let mut exit_when_idle = false;

    // The one-shot URL bypasses the inbox so the idle check cannot fire before the first submit.
    let mut pending = VecDeque::new();
    match &cli.url {
        Some(url) => {
            exit_when_idle = true;
            pending.push_back(Msg::InputChanged(url.clone()));
            pending.push_back(Msg::Submitted);
        }
        None => spawn_stdin_reader(inbox_tx),
    }

    loop {
        while let Some(msg) = pending.pop_front() {
            let (effects, view) = controller.dispatch(msg);
            runner.enqueue(effects);
            if let Some(view) = view {
                surface.apply(&ui::render::render(&view, locale))?;
                pending.extend(auto_downloads.poll(&view));
            }
        }

        if exit_when_idle && controller.is_idle() {
            break;
        }

        match inbox_rx.recv() {
            Ok(Inbox::Msg(msg)) => pending.push_back(msg),
            Ok(Inbox::InputClosed) => exit_when_idle = true,
            Ok(Inbox::Quit) | Err(_) => break,
        }
    }

    sitemap_info!("Exiting in phase {:?}", controller.phase());
    if cli.url.is_some() && controller.phase() == Phase::Failed {
        anyhow::bail!("crawl did not complete");
    }
    Ok(())
}

/// Owns the state and threads messages through `update`.
struct Controller {
    state: AppState,
    downloads_in_flight: usize,
}

impl Controller {
    fn new(state: AppState) -> Self {
        Self {
            state,
            downloads_in_flight: 0,
        }
    }

    /// Returns the effects to run and, if anything visible changed, the view to render.
    fn dispatch(&mut self, msg: Msg) -> (Vec<Effect>, Option<AppViewModel>) {
        if matches!(msg, Msg::DownloadFinished { .. }) {
            self.downloads_in_flight = self.downloads_in_flight.saturating_sub(1);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.downloads_in_flight += effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Download(_)))
            .count();

        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;
        (effects, was_dirty.then_some(view))
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// No crawl or download is outstanding.
    fn is_idle(&self) -> bool {
        !matches!(self.phase(), Phase::Submitting | Phase::Polling) && self.downloads_in_flight == 0
    }
}

/// Clicks the configured download controls once per completed crawl.
struct AutoDownload {
    kinds: Vec<DownloadKind>,
    fired: bool,
}

impl AutoDownload {
    fn new(kinds: Vec<DownloadKind>) -> Self {
        Self {
            kinds,
            fired: false,
        }
    }

    fn poll(&mut self, view: &AppViewModel) -> Vec<Msg> {
        if view.phase != Phase::Completed {
            self.fired = false;
            return Vec::new();
        }
        if self.fired || !view.downloads_visible {
            return Vec::new();
        }
        self.fired = true;
        self.kinds
            .iter()
            .map(|kind| Msg::DownloadClicked(*kind))
            .collect()
    }
}

fn spawn_stdin_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    sitemap_warn!("Reading stdin failed: {}", err);
                    break;
                }
            };
            for item in parse_line(&line) {
                if inbox.send(item).is_err() {
                    return;
                }
            }
        }
        let _ = inbox.send(Inbox::InputClosed);
    });
}

/// Maps one line of user input to inbox items.
///
/// Only a truly empty line clears the input. Blank text is submitted like any
/// other value and the core drops it.
fn parse_line(line: &str) -> Vec<Inbox> {
    if line.is_empty() {
        return vec![Inbox::Msg(Msg::InputChanged(String::new()))];
    }
    match line.trim() {
        ":quit" | ":q" => vec![Inbox::Quit],
        ":sitemap" => vec![Inbox::Msg(Msg::DownloadClicked(DownloadKind::Sitemap))],
        ":csv" => vec![Inbox::Msg(Msg::DownloadClicked(DownloadKind::Csv))],
        command if command.starts_with(':') => {
            sitemap_warn!("Unknown command {}", command);
            Vec::new()
        }
        _ => vec![
            Inbox::Msg(Msg::InputChanged(line.to_string())),
            Inbox::Msg(Msg::Submitted),
        ],
    }
}
