use std::sync::{mpsc, Arc};
use std::thread;

use obd_core::{Effect, Msg};
use obd_logging::{obd_debug, obd_error};
use thiserror::Error;

use crate::executor::execute;
use crate::ObdService;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("http client setup failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("async runtime setup failed: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Runs network effects on a background tokio runtime.
///
/// Each submitted effect runs as its own task; its completion message is sent
/// to the channel given at spawn time. Requests never block the caller.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Effect>,
}

impl EngineHandle {
    pub fn spawn(
        service: Arc<dyn ObdService>,
        event_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(effect) = cmd_rx.recv() {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    if let Some(msg) = execute(service.as_ref(), effect).await {
                        if event_tx.send(msg).is_err() {
                            obd_debug!("Controller gone; dropping completion");
                        }
                    }
                });
            }
            obd_debug!("Engine command channel closed");
        });

        Ok(Self { cmd_tx })
    }

    /// Queues a network effect. Returns `false` if the engine thread has stopped.
    pub fn submit(&self, effect: Effect) -> bool {
        match self.cmd_tx.send(effect) {
            Ok(()) => true,
            Err(_) => {
                obd_error!("Engine thread is not running; effect dropped");
                false
            }
        }
    }
}
