//! OBD engine: HTTP client for the campaign backend and effect execution.
mod classify;
mod client;
mod engine;
mod executor;
mod export;
mod wire;

pub use client::{ClientSettings, ObdService, ReqwestObdService, DEFAULT_BASE_URL};
pub use engine::{EngineError, EngineHandle};
pub use executor::{execute, unreachable_completion};
pub use export::{ensure_export_dir, export_file_name, ExportWriter, PersistError};
pub use wire::{ScrubReport, UploadedList};
