use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::export::Exporters;

use super::events::{AppEvent, ExportTarget};

/// Centralized handle to the side-effecting capabilities the TUI needs.
///
/// Created once at startup and passed by reference to the app state.
/// The questionnaire core stays pure; copy and download go through here.
pub struct Services {
    pub exporters: Arc<Exporters>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn new(exporters: Exporters, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            exporters: Arc::new(exporters),
            event_tx,
        }
    }

    /// Build the default sinks from config.
    pub fn from_config(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self::new(Exporters::from_config(&config.export), event_tx)
    }

    /// Deliver `report` to the sink for `target` off the UI thread.
    ///
    /// The outcome arrives later as [`AppEvent::ExportFinished`].
    pub fn export(&self, target: ExportTarget, report: String) {
        let exporters = Arc::clone(&self.exporters);
        let tx = self.event_tx.clone();

        tokio::task::spawn_blocking(move || {
            let sink = match target {
                ExportTarget::Clipboard => &exporters.clipboard,
                ExportTarget::File => &exporters.file,
            };
            let result = sink.deliver(&report).map_err(|e| {
                log::warn!("Export via {} failed: {e}", sink.name());
                e.to_string()
            });
            if let Ok(ref receipt) = result {
                log::info!("Export via {}: {}", sink.name(), receipt.summary());
            }
            let _ = tx.send(AppEvent::ExportFinished { target, result });
        });
    }
}
