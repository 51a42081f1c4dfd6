use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use bag_config_application::{
    ApplicationError, AssetEvent, AssetLoader, AssetPipeline, AssetRequest,
};
use bag_config_domain::AssetMetrics;
use log::{debug, warn};

const METRIC_WINDOW_SIZE: usize = 64;

#[derive(Default)]
struct MetricsState {
    submitted_requests: u64,
    completed_requests: u64,
    canceled_requests: u64,
    failed_requests: u64,
    last_load_time_ms: Option<u64>,
    load_samples_ms: Vec<u64>,
}

impl MetricsState {
    fn snapshot(&self) -> AssetMetrics {
        AssetMetrics {
            submitted_requests: self.submitted_requests,
            completed_requests: self.completed_requests,
            canceled_requests: self.canceled_requests,
            failed_requests: self.failed_requests,
            last_load_time_ms: self.last_load_time_ms,
            p95_load_time_ms: percentile_95(&self.load_samples_ms),
        }
    }

    fn push_load_sample(&mut self, sample_ms: u64) {
        self.last_load_time_ms = Some(sample_ms);
        self.load_samples_ms.push(sample_ms);
        if self.load_samples_ms.len() > METRIC_WINDOW_SIZE {
            let drain_count = self.load_samples_ms.len() - METRIC_WINDOW_SIZE;
            self.load_samples_ms.drain(0..drain_count);
        }
    }
}

fn percentile_95(samples: &[u64]) -> Option<u64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let index = (((sorted.len() - 1) as f64) * 0.95).round() as usize;
    sorted.get(index).copied()
}

#[derive(Debug, Clone)]
struct ScheduledLoad {
    sequence: u64,
    request: AssetRequest,
}

/// Resolves assets on a worker thread. Only the newest request is worth finishing:
/// queued requests behind a newer one are canceled and so are loads that finish
/// after being superseded.
pub struct BackgroundAssetPipeline {
    next_sequence: AtomicU64,
    latest_sequence: Arc<AtomicU64>,
    submit_tx: mpsc::Sender<ScheduledLoad>,
    result_rx: Mutex<mpsc::Receiver<AssetEvent>>,
    metrics: Arc<Mutex<MetricsState>>,
}

impl BackgroundAssetPipeline {
    pub fn new(loader: Arc<dyn AssetLoader>) -> Result<Self, ApplicationError> {
        let (submit_tx, submit_rx) = mpsc::channel::<ScheduledLoad>();
        let (result_tx, result_rx) = mpsc::channel::<AssetEvent>();
        let latest_sequence = Arc::new(AtomicU64::new(0));
        let metrics = Arc::new(Mutex::new(MetricsState::default()));

        spawn_worker(
            submit_rx,
            result_tx,
            Arc::clone(&latest_sequence),
            Arc::clone(&metrics),
            loader,
        )?;

        Ok(Self {
            next_sequence: AtomicU64::new(0),
            latest_sequence,
            submit_tx,
            result_rx: Mutex::new(result_rx),
            metrics,
        })
    }
}

impl AssetPipeline for BackgroundAssetPipeline {
    fn submit_asset(&self, request: AssetRequest) -> Result<u64, ApplicationError> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.latest_sequence.store(sequence, Ordering::SeqCst);
        {
            let mut metrics = self
                .metrics
                .lock()
                .map_err(|_| ApplicationError::Io("asset metrics lock poisoned".to_string()))?;
            metrics.submitted_requests += 1;
        }
        self.submit_tx
            .send(ScheduledLoad { sequence, request })
            .map_err(|error| ApplicationError::Io(format!("failed to enqueue asset load: {error}")))?;
        Ok(sequence)
    }

    fn try_receive_asset(&self) -> Result<Option<AssetEvent>, ApplicationError> {
        let receiver = self
            .result_rx
            .lock()
            .map_err(|_| ApplicationError::Io("asset result lock poisoned".to_string()))?;

        let mut newest = match receiver.try_recv() {
            Ok(event) => event,
            Err(mpsc::TryRecvError::Empty) => return Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                return Err(ApplicationError::Io(
                    "asset result channel disconnected".to_string(),
                ))
            }
        };

        let mut dropped = 0_u64;
        while let Ok(next) = receiver.try_recv() {
            dropped += 1;
            newest = next;
        }
        // Drained events were already counted by the worker.
        if dropped > 0 {
            debug!("dropped {dropped} superseded asset events");
        }

        Ok(Some(newest))
    }

    fn metrics(&self) -> Result<AssetMetrics, ApplicationError> {
        let metrics = self
            .metrics
            .lock()
            .map_err(|_| ApplicationError::Io("asset metrics lock poisoned".to_string()))?;
        Ok(metrics.snapshot())
    }
}

fn spawn_worker(
    submit_rx: mpsc::Receiver<ScheduledLoad>,
    result_tx: mpsc::Sender<AssetEvent>,
    latest_sequence: Arc<AtomicU64>,
    metrics: Arc<Mutex<MetricsState>>,
    loader: Arc<dyn AssetLoader>,
) -> Result<(), ApplicationError> {
    thread::Builder::new()
        .name("asset-loader".to_string())
        .spawn(move || {
            while let Ok(mut job) = submit_rx.recv() {
                while let Ok(next) = submit_rx.try_recv() {
                    mark_canceled(&metrics, 1);
                    job = next;
                }

                if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                    mark_canceled(&metrics, 1);
                    continue;
                }

                let started = Instant::now();
                let outcome = loader.resolve(&job.request.url);
                let elapsed = started.elapsed().as_millis() as u64;

                if job.sequence < latest_sequence.load(Ordering::SeqCst) {
                    debug!("asset {} finished after being superseded", job.request.url);
                    mark_canceled(&metrics, 1);
                    continue;
                }

                if let Ok(mut m) = metrics.lock() {
                    match &outcome {
                        Ok(_) => {
                            m.completed_requests += 1;
                            m.push_load_sample(elapsed);
                        }
                        Err(error) => {
                            warn!("asset {} failed to load: {error}", job.request.url);
                            m.failed_requests += 1;
                        }
                    }
                }

                let event = AssetEvent {
                    sequence: job.sequence,
                    request: job.request,
                    outcome,
                    load_time_ms: elapsed,
                };
                if result_tx.send(event).is_err() {
                    return;
                }
            }
        })
        .map(|_| ())
        .map_err(|error| ApplicationError::Io(format!("failed to spawn asset worker: {error}")))
}

fn mark_canceled(metrics: &Arc<Mutex<MetricsState>>, count: u64) {
    if let Ok(mut m) = metrics.lock() {
        m.canceled_requests += count;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bag_config_domain::SceneRoot;

    use super::*;

    struct SlowLoader {
        delay: Duration,
    }

    impl AssetLoader for SlowLoader {
        fn resolve(&self, url: &str) -> Result<Arc<SceneRoot>, ApplicationError> {
            thread::sleep(self.delay);
            if url.ends_with("missing.glb") {
                return Err(ApplicationError::NotFound(url.to_string()));
            }
            Ok(Arc::new(SceneRoot::default()))
        }
    }

    fn pipeline(delay_ms: u64) -> BackgroundAssetPipeline {
        BackgroundAssetPipeline::new(Arc::new(SlowLoader {
            delay: Duration::from_millis(delay_ms),
        }))
        .expect("pipeline")
    }

    fn request(index: usize) -> AssetRequest {
        AssetRequest {
            index,
            url: format!("/models/template-{index}.glb"),
        }
    }

    fn wait_for_event(pipeline: &BackgroundAssetPipeline) -> AssetEvent {
        for _ in 0..200 {
            if let Some(event) = pipeline.try_receive_asset().expect("receive") {
                return event;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("timed out waiting for asset event");
    }

    #[test]
    fn sequences_increase_monotonically() {
        let pipeline = pipeline(0);
        let first = pipeline.submit_asset(request(0)).expect("submit");
        let second = pipeline.submit_asset(request(1)).expect("submit");
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn latest_request_wins() {
        let pipeline = pipeline(30);
        for index in 0..5 {
            pipeline.submit_asset(request(index)).expect("submit");
        }

        let event = wait_for_event(&pipeline);
        assert_eq!(event.sequence, 5);
        assert_eq!(event.request.index, 4);
        assert!(event.outcome.is_ok());

        let metrics = pipeline.metrics().expect("metrics");
        assert_eq!(metrics.submitted_requests, 5);
        assert_eq!(metrics.completed_requests, 1);
        assert_eq!(metrics.canceled_requests, 4);
        assert!(metrics.last_load_time_ms.is_some());
        assert!(metrics.p95_load_time_ms.is_some());
    }

    #[test]
    fn drained_events_are_not_counted_twice() {
        let pipeline = pipeline(0);
        for index in 0..3 {
            pipeline.submit_asset(request(index)).expect("submit");
            thread::sleep(Duration::from_millis(50));
        }

        wait_for_event(&pipeline);

        let metrics = pipeline.metrics().expect("metrics");
        assert_eq!(metrics.submitted_requests, 3);
        assert!(
            metrics.completed_requests + metrics.canceled_requests + metrics.failed_requests
                <= metrics.submitted_requests
        );
    }

    #[test]
    fn failures_are_reported_not_swallowed() {
        let pipeline = pipeline(0);
        pipeline
            .submit_asset(AssetRequest {
                index: 0,
                url: "/models/missing.glb".to_string(),
            })
            .expect("submit");

        let event = wait_for_event(&pipeline);
        assert!(matches!(event.outcome, Err(ApplicationError::NotFound(_))));
        let metrics = pipeline.metrics().expect("metrics");
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.completed_requests, 0);
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        assert_eq!(percentile_95(&[]), None);
        let samples: Vec<u64> = (1..=20).collect();
        assert_eq!(percentile_95(&samples), Some(19));
    }
}
