use std::io::{self, Stdout};
use std::panic;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::Context;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use engine_logging::{engine_error, engine_info};
use pdfchat_core::{update, AppState, Msg};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use super::config::Args;
use super::effects::EffectRunner;
use super::input::{self, Action, UiState};
use super::logging;
use super::ui;

type Term = Terminal<CrosstermBackend<Stdout>>;

pub fn run_app(args: Args) -> anyhow::Result<()> {
    logging::initialize(&args.log_file, engine_logging::parse_level(&args.log_level));
    engine_info!("pdfchat {} starting", env!("CARGO_PKG_VERSION"));

    let settings = args
        .gateway_settings()
        .with_context(|| format!("invalid --backend-url {:?}", args.backend_url))?;
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(settings, msg_tx).context("cannot start the engine")?;

    let mut terminal = setup_terminal().context("cannot set up the terminal")?;
    install_panic_hook();

    let result = App::new(effects, msg_rx).run(&mut terminal);

    restore_terminal(&mut terminal)?;
    if let Err(err) = &result {
        engine_error!("pdfchat stopped: {:#}", err);
    }
    result
}

struct App {
    state: AppState,
    ui: UiState,
    effects: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
    started: Instant,
    needs_redraw: bool,
    quit: bool,
}

impl App {
    fn new(effects: EffectRunner, msg_rx: mpsc::Receiver<Msg>) -> Self {
        Self {
            state: AppState::new(),
            ui: UiState::default(),
            effects,
            msg_rx,
            started: Instant::now(),
            needs_redraw: true,
            quit: false,
        }
    }

    fn run(mut self, terminal: &mut Term) -> anyhow::Result<()> {
        self.dispatch(Msg::Started);

        while !self.quit {
            self.process_pending_messages();
            if self.started.elapsed() >= ui::constants::NOTICE_TIMEOUT {
                self.dispatch(Msg::NoticeDismissed);
            }

            if self.state.consume_dirty() || self.needs_redraw {
                self.needs_redraw = false;
                let view = self.state.view();
                terminal.draw(|frame| ui::render::draw(frame, &view, &self.ui))?;
            }

            if event::poll(ui::constants::FRAME_INTERVAL)? {
                self.handle_event(event::read()?);
            }
        }

        engine_info!("pdfchat quitting");
        Ok(())
    }

    fn process_pending_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn handle_event(&mut self, event: Event) {
        let view = self.state.view();
        let action = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                input::handle_key(&mut self.ui, &view, key)
            }
            Event::Paste(text) => input::handle_paste(&mut self.ui, &view, &text),
            Event::Resize(..) => Action::Redraw,
            _ => Action::Ignore,
        };

        match action {
            Action::Send(msg) => self.dispatch(msg),
            Action::Redraw => self.needs_redraw = true,
            Action::Quit => self.quit = true,
            Action::Ignore => {}
        }
    }
}

fn setup_terminal() -> io::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Term) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()
}

/// Leaves the alternate screen before the panic message is printed.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}
