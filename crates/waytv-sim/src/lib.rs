//! waytv simulation library
//!
//! Stand-ins for the collaborators that reach the Android container, used by
//! the integration tests and by `waytv --dry-run`:
//!
//! - **RecordingBridge**: records every key, launch and force-stop and can be
//!   told to fail them
//! - **ScriptedSession**: a session manager whose state is toggled in memory
//!
//! Both are cheap to clone and every clone shares the same state, so a test
//! can hand one clone to the dispatcher and inspect the other.
//!
//! # Example
//!
//! ```rust
//! use waytv_control::{DriverConfig, Switchboard};
//! use waytv_core::LogicalChannel;
//! use waytv_sim::RecordingBridge;
//!
//! # tokio_test_block(async {
//! let bridge = RecordingBridge::new();
//! let mut switchboard = Switchboard::new(bridge.clone(), DriverConfig::instant());
//! switchboard.set_channel(LogicalChannel::Svt2).await.unwrap();
//! assert_eq!(bridge.launches().len(), 1);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

pub mod bridge;
pub mod session;

pub use bridge::{BridgeCall, RecordingBridge};
pub use session::ScriptedSession;
