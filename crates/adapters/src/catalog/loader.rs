use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use bag_config_application::{ApplicationError, CatalogLoader, CatalogSource};
use bag_config_domain::Catalog;
use log::info;

type CatalogOutcome = Result<Catalog, ApplicationError>;

/// Runs a [`CatalogSource`] once on a worker thread.
pub struct BackgroundCatalogLoader {
    source: Arc<dyn CatalogSource>,
    requested: AtomicBool,
    result_tx: mpsc::Sender<CatalogOutcome>,
    result_rx: Mutex<mpsc::Receiver<CatalogOutcome>>,
}

impl BackgroundCatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            source,
            requested: AtomicBool::new(false),
            result_tx,
            result_rx: Mutex::new(result_rx),
        }
    }
}

impl CatalogLoader for BackgroundCatalogLoader {
    fn request_catalog(&self) -> Result<(), ApplicationError> {
        if self.requested.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let source = Arc::clone(&self.source);
        let result_tx = self.result_tx.clone();
        thread::Builder::new()
            .name("catalog-loader".to_string())
            .spawn(move || {
                let outcome = source.load_catalog();
                if let Ok(catalog) = &outcome {
                    info!("catalog fetch finished with {} templates", catalog.len());
                }
                let _ = result_tx.send(outcome);
            })
            .map_err(|error| ApplicationError::Io(format!("failed to spawn catalog loader: {error}")))?;
        Ok(())
    }

    fn try_receive_catalog(&self) -> Result<Option<CatalogOutcome>, ApplicationError> {
        let receiver = self
            .result_rx
            .lock()
            .map_err(|_| ApplicationError::Io("catalog result lock poisoned".to_string()))?;
        match receiver.try_recv() {
            Ok(outcome) => Ok(Some(outcome)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => Err(ApplicationError::Io(
                "catalog result channel disconnected".to_string(),
            )),
        }
    }
}
