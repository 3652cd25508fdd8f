use std::sync::{mpsc, Arc};

use chrono::Utc;
use obd_core::{Effect, Msg};
use obd_engine::{unreachable_completion, EngineHandle, ExportWriter, ReqwestObdService};
use obd_logging::{obd_error, obd_info};

use super::config::ConsoleConfig;
use super::render;

/// Routes effects: network calls to the engine, exports and copies locally.
pub struct EffectRunner {
    engine: EngineHandle,
    exports: ExportWriter,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(config: &ConsoleConfig, msg_tx: mpsc::Sender<Msg>) -> anyhow::Result<Self> {
        let service = ReqwestObdService::new(config.client.clone())?;
        obd_info!("Backend at {}", service.settings().base_url);
        let engine = EngineHandle::spawn(Arc::new(service), msg_tx.clone())?;
        Ok(Self {
            engine,
            exports: ExportWriter::new(config.export_dir.clone()),
            msg_tx,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SaveExport { payload, rows } => self.save_export(&payload, rows),
                Effect::CopyToClipboard { text } => render::print_copy_block(&text),
                remote => {
                    if !self.engine.submit(remote.clone()) {
                        self.report_undelivered(remote);
                    }
                }
            }
        }
    }

    fn report_undelivered(&self, effect: Effect) {
        if let Some(msg) = unreachable_completion(effect, "the request engine has stopped") {
            let _ = self.msg_tx.send(msg);
        }
    }

    fn save_export(&self, payload: &str, rows: usize) {
        let generated_at = Utc::now().timestamp_millis();
        let msg = match self.exports.write(payload, generated_at) {
            Ok(path) => {
                obd_info!("Exported {} rows to {:?}", rows, path);
                Msg::ExportSaved {
                    location: path.display().to_string(),
                }
            }
            Err(err) => {
                obd_error!("Export into {:?} failed: {}", self.exports.dir(), err);
                Msg::ExportFailed {
                    reason: err.to_string(),
                }
            }
        };
        let _ = self.msg_tx.send(msg);
    }
}
