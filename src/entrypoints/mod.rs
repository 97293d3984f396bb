// Shared modules
pub(crate) mod cli;
pub(crate) mod logging;
mod metadata;
pub(crate) mod run;

// Entry points
#[cfg(target_os = "android")]
pub mod android;
