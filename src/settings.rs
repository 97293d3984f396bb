use std::path::PathBuf;

use clap::Parser;

use crate::{FrameLoopConfig, LifecycleEvent};

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Embedded View Bridge - replays a host lifecycle against a headless embedded game view
pub struct Settings {
    /// Lifecycle events to replay, in order (fg, bg, destroy)
    #[arg(long, value_delimiter = ',', default_value = "fg,bg,fg,destroy")]
    pub events: Vec<LifecycleEvent>,

    /// Time spent in each lifecycle state, in milliseconds
    #[arg(long, default_value_t = 250)]
    pub dwell_ms: u64,

    /// Embedded frame loop ticks per second (1 to 1000)
    #[arg(
        long,
        default_value_t = 60,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(FrameLoopConfig::MAX_TICK_RATE))
    )]
    pub tick_rate: u32,

    /// Id of the embedded view in the host view tree
    #[arg(long, default_value = "game_view")]
    pub view_id: String,

    /// Tear down and rebuild the host view tree after every background event
    #[arg(long)]
    pub rebuild_on_background: bool,

    /// Do not register the execution context (reproduces a host startup-order bug)
    #[arg(long)]
    pub skip_registration: bool,

    /// Data directory exposed to the embedded runtime (defaults to a temp directory)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}
