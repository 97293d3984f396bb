//! Native host: replays a scripted lifecycle against a headless embedded view.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use super::cli::parse_args;
use super::metadata::log_version_info;
use crate::settings::Settings;
use crate::{
    BridgeState, ExecutionContext, FrameInfo, FrameLoopConfig, FrameLoopView, Game, GameError,
    LifecycleBridge, LifecycleEvent, Result, RuntimeContextRegistry, SignalCounts, ViewTree,
};

/// Outcome of a replayed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostReport {
    pub final_state: BridgeState,
    pub signals: SignalCounts,
    /// Frames run by every embedded view the host created.
    pub frames: u64,
    pub views_created: u32,
}

/// Minimal embedded game: reads the execution context and logs once per second of frames.
pub(crate) struct Heartbeat {
    registry: Arc<RuntimeContextRegistry>,
    ticks_per_beat: u64,
}

impl Heartbeat {
    pub(crate) fn new(registry: Arc<RuntimeContextRegistry>, config: &FrameLoopConfig) -> Self {
        Self {
            registry,
            ticks_per_beat: u64::from(config.tick_rate.max(1)),
        }
    }
}

impl Game for Heartbeat {
    fn update(&mut self, frame: &FrameInfo) -> std::result::Result<(), GameError> {
        let context = self
            .registry
            .get()
            .ok_or_else(|| GameError::Failed("execution context is not registered".into()))?;
        if frame.frame % self.ticks_per_beat == 0 {
            tracing::debug!(
                frame = frame.frame,
                delta_ms = frame.delta.as_secs_f64() * 1000.0,
                data_dir = %context.data_dir().display(),
                "Heartbeat"
            );
        }
        Ok(())
    }
}

fn host_context(settings: &Settings) -> ExecutionContext {
    let data_dir = settings
        .data_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(env!("CARGO_PKG_NAME")));
    ExecutionContext::builder(std::env::consts::OS, data_dir)
        .cache_dir(std::env::temp_dir())
        .build()
}

fn spawn_view(
    settings: &Settings,
    registry: &Arc<RuntimeContextRegistry>,
    runtime: &tokio::runtime::Handle,
) -> Arc<FrameLoopView> {
    let config = FrameLoopConfig {
        tick_rate: settings.tick_rate,
    };
    let game = Heartbeat::new(Arc::clone(registry), &config);
    FrameLoopView::spawn(settings.view_id.as_str(), config, game, runtime)
}

/// Runs the host page: creation, context registration, then every scripted event.
///
/// Stops at the first failed transition and returns its error.
pub async fn run_host(settings: &Settings, runtime: &tokio::runtime::Handle) -> Result<HostReport> {
    let registry = Arc::new(RuntimeContextRegistry::new());
    if settings.skip_registration {
        tracing::warn!("Skipping execution context registration");
    } else {
        registry.register(host_context(settings))?;
    }

    let tree = ViewTree::new();
    let mut view = spawn_view(settings, &registry, runtime);
    let mut views_created = 1;
    let mut frames = 0;
    tree.attach(view.clone());

    let mut bridge = LifecycleBridge::new(Arc::clone(&registry), tree.locator(settings.view_id.as_str()));
    let dwell = Duration::from_millis(settings.dwell_ms);

    for &event in &settings.events {
        tracing::info!(?event, state = %bridge.state(), "Host lifecycle event");
        bridge.dispatch(event)?;

        if event == LifecycleEvent::Background && settings.rebuild_on_background {
            frames += view.frames();
            tree.clear();
            view = spawn_view(settings, &registry, runtime);
            views_created += 1;
            tree.attach(view.clone());
        }

        tokio::time::sleep(dwell).await;
    }
    frames += view.frames();

    Ok(HostReport {
        final_state: bridge.state(),
        signals: bridge.signals(),
        frames,
        views_created,
    })
}

fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    #[cfg(feature = "native")]
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    #[cfg(not(feature = "native"))]
    let mut builder = tokio::runtime::Builder::new_current_thread();
    builder.enable_all().build()
}

/// Native entry point
pub fn native_main() -> ExitCode {
    super::logging::setup_logging();
    log_version_info();

    let settings = match parse_args::<Settings>() {
        Ok(settings) => settings,
        Err(e) => e.exit(),
    };

    let rt = match build_runtime() {
        Ok(rt) => rt,
        Err(err) => {
            tracing::error!("Failed to create Tokio runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_host(&settings, rt.handle())) {
        Ok(report) => {
            tracing::info!(
                state = %report.final_state,
                resumes = report.signals.resumes,
                suspends = report.signals.suspends,
                frames = report.frames,
                views = report.views_created,
                "Host lifecycle replayed"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Host lifecycle failed: {err}");
            ExitCode::FAILURE
        }
    }
}
