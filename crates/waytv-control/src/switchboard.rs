//! Active-application switchboard
//!
//! Holds at most one [`AppDriver`]. A channel request is routed to the
//! family that owns it; when that family differs from the one in the slot,
//! the occupant is shut down before the replacement is created. This is the
//! only place where family switches happen.

use tracing::{info, warn};
use waytv_core::{AppFamily, KeyCode, LogicalChannel};

use crate::bridge::{Bridge, KeyTransport};
use crate::driver::{AppDriver, Navigation};
use crate::error::{ControlError, UnknownReason};
use crate::timing::DriverConfig;

/// Channel to family lookup used for routing
pub type OwnerFn = fn(LogicalChannel) -> AppFamily;

/// Routes channel requests to the right application driver
#[derive(Debug)]
pub struct Switchboard<B> {
    bridge: B,
    config: DriverConfig,
    owner: OwnerFn,
    active: Option<AppDriver>,
    last_requested: Option<LogicalChannel>,
}

impl<B: Bridge> Switchboard<B> {
    /// Create an empty switchboard routing by [`AppFamily::owner_of`]
    pub fn new(bridge: B, config: DriverConfig) -> Self {
        Self::with_owner(bridge, config, AppFamily::owner_of)
    }

    /// Create an empty switchboard with a custom channel owner lookup
    pub fn with_owner(bridge: B, config: DriverConfig, owner: OwnerFn) -> Self {
        Self {
            bridge,
            config,
            owner,
            active: None,
            last_requested: None,
        }
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Family of the driver in the slot, running or not
    pub fn active_family(&self) -> Option<AppFamily> {
        self.active.as_ref().map(|driver| driver.family())
    }

    pub fn active_driver(&self) -> Option<&AppDriver> {
        self.active.as_ref()
    }

    /// Select `channel`, switching application when needed
    ///
    /// A channel no family owns empties the slot and is refused.
    pub async fn set_channel(&mut self, channel: LogicalChannel) -> Result<Navigation, ControlError> {
        let family = (self.owner)(channel);
        self.last_requested = Some(channel);

        if self.active_family() != Some(family) {
            self.retire().await;
        }

        if family == AppFamily::Unknown {
            return Err(ControlError::UnknownChannel {
                channel,
                reason: UnknownReason::Unowned,
            });
        }

        let driver = match self.active.take() {
            Some(driver) => driver,
            None => {
                let driver = AppDriver::new(family, self.config.clone()).ok_or(
                    ControlError::UnknownChannel {
                        channel,
                        reason: UnknownReason::Unowned,
                    },
                )?;
                info!("Active application is now {}", family);
                driver
            }
        };
        let driver = self.active.insert(driver);

        driver.launch(&self.bridge).await?;
        driver.navigate_to(&self.bridge, channel).await
    }

    /// Current channel of the running driver, else the last requested one
    ///
    /// The fallback is best effort: the last request may have failed.
    pub fn get_channel(&self) -> Option<LogicalChannel> {
        self.active
            .as_ref()
            .filter(|driver| driver.is_running())
            .and_then(|driver| driver.current_channel())
            .or(self.last_requested)
    }

    /// Send one raw key to whatever is on screen
    pub async fn nudge(&self, key: KeyCode) -> Result<(), ControlError> {
        match &self.active {
            Some(driver) => driver.nudge(&self.bridge, key).await,
            None => {
                self.bridge.send_key(key).await?;
                Ok(())
            }
        }
    }

    /// Shut down and discard the active driver, if any
    pub async fn shutdown(&mut self) {
        self.retire().await;
    }

    async fn retire(&mut self) {
        let Some(mut driver) = self.active.take() else {
            return;
        };
        if let Err(e) = driver.shutdown(&self.bridge).await {
            warn!("Failed to stop {}: {}", driver.family(), e);
        }
    }
}
