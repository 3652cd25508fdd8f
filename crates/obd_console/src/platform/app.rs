use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use obd_core::{update, AppState, Msg};
use obd_logging::{obd_info, obd_warn};

use super::commands::{self, Command, HELP};
use super::config::{Cli, ConsoleConfig};
use super::effects::EffectRunner;
use super::{logging, render};

/// Console requests that do not go through the state machine.
enum Control {
    Show,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = ConsoleConfig::load(Cli::parse())?;
    logging::initialize(config.log, config.log_level);
    obd_info!("obd_console starting; exports go to {:?}", config.export_dir);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let (control_tx, control_rx) = mpsc::channel::<Control>();
    let runner = EffectRunner::new(&config, msg_tx.clone())?;

    spawn_input_reader(msg_tx, control_tx);

    let mut controller = Controller {
        state: AppState::new(),
        runner,
    };
    println!("{}", render::render(&controller.state.view()));
    prompt();

    loop {
        match control_rx.try_recv() {
            Ok(Control::Show) => {
                println!("{}", render::render(&controller.state.view()));
                prompt();
            }
            Ok(Control::Quit) | Err(mpsc::TryRecvError::Disconnected) => break,
            Err(mpsc::TryRecvError::Empty) => {}
        }
        match msg_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(msg) => controller.dispatch(msg),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    obd_info!("obd_console exiting");
    Ok(())
}

struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let notices = state.take_notices();
        let was_dirty = state.consume_dirty();
        let view = was_dirty.then(|| state.view());
        self.state = state;

        self.runner.enqueue(effects);
        for notice in &notices {
            println!("{}", render::render_notice(notice));
        }
        if let Some(view) = view {
            println!("{}", render::render(&view));
        }
        if was_dirty || !notices.is_empty() {
            prompt();
        }
    }
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>, control_tx: mpsc::Sender<Control>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    obd_warn!("Failed to read input: {}", err);
                    break;
                }
            };
            let sent = match commands::parse(&line) {
                Ok(None) => {
                    prompt();
                    true
                }
                Ok(Some(Command::Dispatch(msg))) => msg_tx.send(msg).is_ok(),
                Ok(Some(Command::Show)) => control_tx.send(Control::Show).is_ok(),
                Ok(Some(Command::Help)) => {
                    println!("{HELP}");
                    prompt();
                    true
                }
                Ok(Some(Command::Quit)) => {
                    let _ = control_tx.send(Control::Quit);
                    return;
                }
                Err(err) => {
                    println!("[error] {err}");
                    prompt();
                    true
                }
            };
            if !sent {
                return;
            }
        }
        let _ = control_tx.send(Control::Quit);
    });
}

fn prompt() {
    print!("obd> ");
    let _ = io::stdout().flush();
}
