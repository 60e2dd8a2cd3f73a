//! Development server module.
//!
//! Provides the live-reload development loop:
//! - File watching with change filtering and debouncing
//! - At most one rebuild at a time, dropped triggers while busy
//! - Live reload over WebSocket, with in-place stylesheet swaps

pub mod cache;
pub mod clients;
pub mod config;
pub mod debounce;
pub mod executor;
pub mod filter;
pub mod message;
pub mod server;
pub mod state;
pub mod trigger;
pub mod watcher;

// Re-exports
pub use cache::{CacheError, FileCache};
pub use clients::{ClientId, ClientRegistry};
pub use config::DevConfig;
pub use debounce::Debouncer;
pub use executor::{
    BuildExecutor, BuildOutcome, OutcomeKind, PipelineBuilder, RunStatus, SiteBuilder,
};
pub use filter::{ChangeEvent, ChangeFilter, ChangeKind};
pub use message::Notification;
pub use server::{ServerState, LIVE_RELOAD_PATH};
pub use state::{BuildGate, BuildPermit, BuildStatus};
pub use trigger::{BuildTrigger, TriggerDecision};
pub use watcher::FileWatcher;
