//! waytv control layer
//!
//! This crate turns symbolic commands into actions on the Android container:
//!
//! - **Collaborators**: [`KeyTransport`], [`AppLauncher`] and
//!   [`SessionManager`] are the seams to the outside world, with adb and
//!   Waydroid implementations
//! - **Application Driver**: one [`AppDriver`] per family that launches the
//!   app and walks its channel list with d-pad events
//! - **Switchboard**: keeps at most one driver alive and handles family
//!   switches
//! - **Dispatcher**: the actor that owns the switchboard and consumes
//!   commands from every input path
//!
//! # Architecture
//!
//! All channel state lives in the [`run_dispatcher`] actor. Input loops only
//! send [`waytv_core::Command`] values into its queue and the operator
//! surface only reads [`ControlEvent`]s back, so there is exactly one writer.
//!
//! # Example
//!
//! ```rust,no_run
//! use waytv_control::{AdbBridge, DriverConfig, Switchboard};
//! use waytv_core::LogicalChannel;
//!
//! # async fn demo() -> Result<(), waytv_control::ControlError> {
//! let mut switchboard = Switchboard::new(AdbBridge::default(), DriverConfig::default());
//! switchboard.set_channel(LogicalChannel::Svt24).await?;
//! assert_eq!(switchboard.get_channel(), Some(LogicalChannel::Svt24));
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod events;
pub mod process;
pub mod profile;
pub mod session;
pub mod switchboard;
pub mod timing;

// Re-export collaborator types
pub use bridge::{AdbBridge, AppLauncher, Bridge, KeyTransport};
pub use session::{SessionConfig, SessionManager, SessionStatus, WaydroidSession};

// Re-export driver and switchboard types
pub use driver::{plan_navigation, AppDriver, DriverState, Navigation, NavigationPlan};
pub use profile::{FamilyProfile, MacroStep};
pub use switchboard::{OwnerFn, Switchboard};
pub use timing::{DriverConfig, KeyFailurePolicy, Timing};

// Re-export dispatcher types
pub use dispatcher::{run_dispatcher, Dispatcher, Flow};
pub use events::ControlEvent;

pub use error::{ControlError, ToolError, UnknownReason};
