use bag_config_domain::{
    normalize_materials, AssetMetrics, Catalog, ControlPanel, FrameRequest, NormalizationReport,
    OrbitCamera, RenderedFrame, SceneRoot, Stage, ViewerState, ViewportStatus,
};
use log::{debug, info, warn};

use crate::{
    ApplicationError, AssetEvent, AssetMetricsQuery, AssetPipeline, AssetRequest, CatalogLoader,
    ControlsQuery, FrameRenderer, NextTemplateCommand, OrbitCommand, PollCommand, PollReport,
    PrevTemplateCommand, RenderFrameCommand, SetIndexCommand, StartCommand, ViewportStatusQuery,
    ZoomCommand,
};

#[derive(Debug, Clone)]
struct PendingAsset {
    sequence: u64,
    index: usize,
    name: String,
}

#[derive(Debug, Clone)]
struct DisplayedAsset {
    index: usize,
    name: String,
    scene: SceneRoot,
    report: NormalizationReport,
}

#[derive(Debug, Clone)]
struct AssetFailure {
    name: String,
    reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetEventOutcome {
    Swapped,
    Failed,
    Stale,
}

/// Owns the viewer state machine and the displayed scene. Lives on the UI thread.
pub struct ApplicationService {
    catalog_loader: Box<dyn CatalogLoader>,
    assets: Box<dyn AssetPipeline>,
    renderer: Box<dyn FrameRenderer>,
    stage: Stage,
    camera: OrbitCamera,
    viewer: ViewerState,
    pending: Option<PendingAsset>,
    displayed: Option<DisplayedAsset>,
    failure: Option<AssetFailure>,
}

impl ApplicationService {
    pub fn new(
        catalog_loader: Box<dyn CatalogLoader>,
        assets: Box<dyn AssetPipeline>,
        renderer: Box<dyn FrameRenderer>,
    ) -> Self {
        Self {
            catalog_loader,
            assets,
            renderer,
            stage: Stage::default(),
            camera: OrbitCamera::default(),
            viewer: ViewerState::default(),
            pending: None,
            displayed: None,
            failure: None,
        }
    }

    /// Issues the one and only catalog request. Later calls are ignored.
    pub fn start(&mut self, _command: StartCommand) -> Result<(), ApplicationError> {
        if self.viewer.begin_loading().is_err() {
            debug!("catalog already requested, ignoring start");
            return Ok(());
        }

        info!("requesting template catalog");
        if let Err(error) = self.catalog_loader.request_catalog() {
            warn!("template catalog request failed: {error}");
            self.viewer.finish_loading(Err(error.to_string()));
        }
        Ok(())
    }

    pub fn poll(&mut self, _command: PollCommand) -> Result<PollReport, ApplicationError> {
        let mut report = PollReport::default();

        if matches!(self.viewer, ViewerState::Loading) {
            if let Some(outcome) = self.catalog_loader.try_receive_catalog()? {
                report.catalog_settled = true;
                self.settle_catalog(outcome)?;
            }
        }

        while let Some(event) = self.assets.try_receive_asset()? {
            match self.apply_asset_event(event) {
                AssetEventOutcome::Swapped => report.asset_swapped = true,
                AssetEventOutcome::Failed => {}
                AssetEventOutcome::Stale => report.stale_assets_dropped += 1,
            }
        }

        Ok(report)
    }

    pub fn set_index(&mut self, command: SetIndexCommand) -> Result<bool, ApplicationError> {
        let moved = self.viewer.set_index(command.index);
        self.after_cursor_change(moved)
    }

    pub fn next(&mut self, _command: NextTemplateCommand) -> Result<bool, ApplicationError> {
        let moved = self.viewer.next();
        self.after_cursor_change(moved)
    }

    pub fn prev(&mut self, _command: PrevTemplateCommand) -> Result<bool, ApplicationError> {
        let moved = self.viewer.prev();
        self.after_cursor_change(moved)
    }

    pub fn controls(&self, _query: ControlsQuery) -> ControlPanel {
        ControlPanel::from_state(&self.viewer)
    }

    pub fn viewport_status(&self, _query: ViewportStatusQuery) -> ViewportStatus {
        if let Some(pending) = &self.pending {
            return ViewportStatus::Loading {
                name: pending.name.clone(),
            };
        }
        if let Some(failure) = &self.failure {
            return ViewportStatus::Failed {
                name: failure.name.clone(),
                reason: failure.reason.clone(),
            };
        }
        match &self.displayed {
            Some(displayed) => ViewportStatus::Showing {
                name: displayed.name.clone(),
            },
            None => ViewportStatus::Idle,
        }
    }

    pub fn asset_metrics(&self, _query: AssetMetricsQuery) -> Result<AssetMetrics, ApplicationError> {
        self.assets.metrics()
    }

    pub fn orbit(&mut self, command: OrbitCommand) {
        self.camera.orbit(command.delta_yaw, command.delta_pitch);
    }

    pub fn zoom(&mut self, command: ZoomCommand) {
        self.camera.zoom(command.factor);
    }

    pub fn render_frame(&self, command: RenderFrameCommand) -> Result<RenderedFrame, ApplicationError> {
        if command.width == 0 || command.height == 0 {
            return Err(ApplicationError::InvalidInput(
                "frame dimensions must be non-zero".to_string(),
            ));
        }
        self.renderer.render(&FrameRequest {
            scene: self.displayed_scene(),
            stage: &self.stage,
            camera: &self.camera,
            width: command.width,
            height: command.height,
        })
    }

    pub fn renderer_backend(&self) -> &'static str {
        self.renderer.backend_name()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.viewer.selection().map(|selection| selection.catalog())
    }

    pub fn displayed_scene(&self) -> Option<&SceneRoot> {
        self.displayed.as_ref().map(|displayed| &displayed.scene)
    }

    pub fn displayed_index(&self) -> Option<usize> {
        self.displayed.as_ref().map(|displayed| displayed.index)
    }

    pub fn displayed_report(&self) -> Option<NormalizationReport> {
        self.displayed.as_ref().map(|displayed| displayed.report)
    }

    fn settle_catalog(
        &mut self,
        outcome: Result<Catalog, ApplicationError>,
    ) -> Result<(), ApplicationError> {
        let outcome = outcome.map_err(|error| error.to_string());
        if let Err(reason) = &outcome {
            warn!("template catalog unavailable: {reason}");
        }
        self.viewer.finish_loading(outcome);

        match &self.viewer {
            ViewerState::Ready(selection) => {
                info!("template catalog loaded with {} entries", selection.catalog().len());
                self.request_current_asset()
            }
            ViewerState::Empty => {
                info!("template catalog is empty");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn after_cursor_change(&mut self, moved: bool) -> Result<bool, ApplicationError> {
        if moved {
            self.request_current_asset()?;
        }
        Ok(moved)
    }

    fn request_current_asset(&mut self) -> Result<(), ApplicationError> {
        let Some(selection) = self.viewer.selection() else {
            return Ok(());
        };
        let index = selection.cursor();
        let template = selection.current().clone();

        let sequence = self.assets.submit_asset(AssetRequest {
            index,
            url: template.url.clone(),
        })?;
        debug!(
            "requested template {} ({}) as asset #{sequence}",
            index, template.url
        );
        self.pending = Some(PendingAsset {
            sequence,
            index,
            name: template.name,
        });
        Ok(())
    }

    fn apply_asset_event(&mut self, event: AssetEvent) -> AssetEventOutcome {
        let is_latest = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.sequence == event.sequence);
        if !is_latest {
            debug!(
                "dropping stale asset #{} for {}",
                event.sequence, event.request.url
            );
            return AssetEventOutcome::Stale;
        }
        let Some(pending) = self.pending.take() else {
            return AssetEventOutcome::Stale;
        };

        match event.outcome {
            Ok(shared) => {
                // The loader may hand the same scene to other callers; tune a private copy.
                let (scene, report) = normalize_materials(shared.as_ref().clone());
                info!(
                    "showing template {} ({}) in {}ms: meshes={} tuned_materials={}",
                    pending.name,
                    event.request.url,
                    event.load_time_ms,
                    report.meshes,
                    report.standard_materials
                );
                self.displayed = Some(DisplayedAsset {
                    index: pending.index,
                    name: pending.name,
                    scene,
                    report,
                });
                self.failure = None;
                AssetEventOutcome::Swapped
            }
            Err(error) => {
                warn!(
                    "failed to load template {} from {}: {error}",
                    pending.name, event.request.url
                );
                self.displayed = None;
                self.failure = Some(AssetFailure {
                    name: pending.name,
                    reason: error.to_string(),
                });
                AssetEventOutcome::Failed
            }
        }
    }
}
