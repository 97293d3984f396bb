// === Entry point for android ===
use std::path::PathBuf;
use std::time::Duration;

use winit::platform::android::activity::{AndroidApp, MainEvent, PollEvent};

use super::metadata::log_version_info;
use super::run::Heartbeat;
use crate::{
    ExecutionContext, FrameLoopConfig, FrameLoopView, LifecycleBridge, LifecycleEvent,
    RuntimeContextRegistry, ViewTree,
};

const VIEW_ID: &str = "game_view";

fn activity_context(app: &AndroidApp) -> ExecutionContext {
    let data_dir = app
        .internal_data_path()
        .unwrap_or_else(|| PathBuf::from("."));
    let mut builder = ExecutionContext::builder("android", data_dir);
    if let Some(external) = app.external_data_path() {
        builder = builder.cache_dir(external);
    }
    builder.build()
}

fn lifecycle_event(event: &MainEvent<'_>) -> Option<LifecycleEvent> {
    match event {
        MainEvent::Resume { .. } => Some(LifecycleEvent::Foreground),
        MainEvent::Pause => Some(LifecycleEvent::Background),
        MainEvent::Destroy => Some(LifecycleEvent::Teardown),
        _ => None,
    }
}

pub fn android_main(app: AndroidApp) {
    android_logger::init_once(
        android_logger::Config::default().with_max_level(log::LevelFilter::Info),
    );
    log::info!("Starting Embedded View Bridge on Android");
    log_version_info();

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            log::error!("Failed to create Tokio runtime: {err}");
            return;
        }
    };

    // Page creation: publish the context, then build the view tree. The context
    // lives as long as the process, so a recreated activity reuses it.
    let registry = RuntimeContextRegistry::global();
    if registry.is_registered() {
        log::info!("Reusing execution context from a previous activity");
    } else if let Err(err) = registry.register(activity_context(&app)) {
        log::error!("Startup aborted: {err}");
        return;
    }

    let config = FrameLoopConfig::default();
    let game = Heartbeat::new(registry.clone(), &config);
    let tree = ViewTree::new();
    tree.attach(FrameLoopView::spawn(VIEW_ID, config, game, rt.handle()));
    let mut bridge = LifecycleBridge::new(registry, tree.locator(VIEW_ID));

    let mut quit = false;
    while !quit {
        app.poll_events(Some(Duration::from_millis(500)), |event| {
            let PollEvent::Main(main_event) = event else {
                return;
            };
            let Some(lifecycle) = lifecycle_event(&main_event) else {
                return;
            };
            if lifecycle == LifecycleEvent::Teardown {
                quit = true;
            }
            if let Err(err) = bridge.dispatch(lifecycle) {
                log::error!("Lifecycle transition {lifecycle:?} failed: {err}");
                quit = true;
            }
        });
    }

    tree.clear();
    log::info!("Activity destroyed");
}
