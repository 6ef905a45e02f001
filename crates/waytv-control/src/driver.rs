//! Application driver
//!
//! One [`AppDriver`] controls one application family. It launches and
//! force-stops the application and turns a channel request into d-pad
//! events using the delta model: the number of list steps is the difference
//! between the target and current position codes, the direction is its sign.
//! Nothing is read back from the screen, so the driver's idea of the current
//! channel is only as good as the key deliveries it issued.

use tracing::{debug, info, warn};
use waytv_core::{AppFamily, KeyCode, LogicalChannel, PositionCode, PositionTable};

use crate::bridge::{AppLauncher, Bridge, KeyTransport};
use crate::error::{ControlError, UnknownReason};
use crate::profile::FamilyProfile;
use crate::timing::{DriverConfig, KeyFailurePolicy};

/// Lifecycle state of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
}

/// Key sequence that moves the list focus from one position to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationPlan {
    /// Position the focus starts on
    pub from: PositionCode,
    /// Position the focus ends on
    pub to: PositionCode,
    /// Advance key, `None` when already on target
    pub key: Option<KeyCode>,
    /// Number of advance key presses
    pub steps: u32,
}

impl NavigationPlan {
    /// Whether no key needs to be sent
    pub fn is_noop(&self) -> bool {
        self.steps == 0
    }
}

/// Result of a successful navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Target was already selected; nothing was sent
    AlreadyThere,
    /// `steps` advance keys and one confirm were sent
    Moved { key: KeyCode, steps: u32 },
}

/// Compute the key sequence from `current` to `target` within one family
///
/// Refuses to guess: an unresolvable position on either side is an
/// [`ControlError::UnknownChannel`].
pub fn plan_navigation(
    profile: &FamilyProfile,
    positions: &PositionTable,
    current: Option<LogicalChannel>,
    target: LogicalChannel,
) -> Result<NavigationPlan, ControlError> {
    let family = profile.family;
    let to = positions
        .position_of(family, target)
        .ok_or(ControlError::UnknownChannel {
            channel: target,
            reason: UnknownReason::NoTargetPosition(family),
        })?;
    let from = current
        .and_then(|ch| positions.position_of(family, ch))
        .ok_or(ControlError::UnknownChannel {
            channel: target,
            reason: UnknownReason::NoCurrentPosition(family),
        })?;

    let delta = to.delta_from(from);
    Ok(NavigationPlan {
        from,
        to,
        key: profile.advance_key(delta),
        steps: delta.unsigned_abs(),
    })
}

/// Controller for one running (or stopped) application
#[derive(Debug)]
pub struct AppDriver {
    profile: &'static FamilyProfile,
    config: DriverConfig,
    state: DriverState,
    // Launched and not force-stopped since, even if never fully running
    launched: bool,
    current_channel: Option<LogicalChannel>,
    current_position: Option<PositionCode>,
}

impl AppDriver {
    /// Create a stopped driver; `None` for [`AppFamily::Unknown`]
    pub fn new(family: AppFamily, config: DriverConfig) -> Option<Self> {
        FamilyProfile::for_family(family).map(|profile| Self::with_profile(profile, config))
    }

    /// Create a stopped driver for an explicit profile
    pub fn with_profile(profile: &'static FamilyProfile, config: DriverConfig) -> Self {
        Self {
            profile,
            config,
            state: DriverState::Stopped,
            launched: false,
            current_channel: None,
            current_position: None,
        }
    }

    pub fn family(&self) -> AppFamily {
        self.profile.family
    }

    pub fn profile(&self) -> &'static FamilyProfile {
        self.profile
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Whether the application may still be up and needs a force-stop
    ///
    /// True while running, and also after a launch whose entry macro failed
    /// and whose cleanup force-stop failed too.
    pub fn needs_shutdown(&self) -> bool {
        self.launched
    }

    /// Last channel navigated to; `None` unless running
    pub fn current_channel(&self) -> Option<LogicalChannel> {
        self.current_channel
    }

    /// Cached position of [`Self::current_channel`]
    pub fn current_position(&self) -> Option<PositionCode> {
        self.current_position
    }

    /// Plan a navigation from the current channel without sending anything
    pub fn plan(&self, channel: LogicalChannel) -> Result<NavigationPlan, ControlError> {
        plan_navigation(self.profile, &self.config.positions, self.current_channel, channel)
    }

    /// Start the application and enter its live view
    ///
    /// No-op when already running. If the launch command fails the driver
    /// stays stopped so a later call retries. If the entry macro is aborted
    /// the half-entered application is force-stopped before the error is
    /// returned.
    pub async fn launch<B: Bridge>(&mut self, bridge: &B) -> Result<(), ControlError> {
        if self.is_running() {
            return Ok(());
        }

        info!("Launching {}", self.profile.family);
        bridge.launch(self.profile.component).await?;
        self.launched = true;
        self.config.timing.pause(self.profile.launch_settle_ms).await;

        for step in self.profile.entry_macro {
            if let Err(e) = self.press(bridge, step.key, step.settle_ms).await {
                warn!("{} entry aborted at {}", self.profile.family, step.key);
                self.abandon(bridge).await;
                return Err(e);
            }
        }

        let home = self.profile.family.home_channel();
        self.set_current(home);
        self.state = DriverState::Running;
        info!(
            "{} running, focus on {}",
            self.profile.family,
            home.map_or("?", |ch| ch.display_name())
        );
        Ok(())
    }

    /// Force-stop the application
    ///
    /// No-op when nothing was launched. On failure the driver keeps its
    /// state so a later call retries.
    pub async fn shutdown<B: Bridge>(&mut self, bridge: &B) -> Result<(), ControlError> {
        if !self.needs_shutdown() {
            return Ok(());
        }

        info!("Stopping {}", self.profile.family);
        bridge.force_stop(self.profile.package).await?;
        self.launched = false;
        self.state = DriverState::Stopped;
        self.set_current(None);
        Ok(())
    }

    /// Force-stop after a failed entry macro; a failure leaves
    /// [`Self::needs_shutdown`] set
    async fn abandon<B: Bridge>(&mut self, bridge: &B) {
        match bridge.force_stop(self.profile.package).await {
            Ok(()) => self.launched = false,
            Err(e) => warn!("Failed to stop {}: {}", self.profile.family, e),
        }
    }

    /// Move the list focus to `channel` and select it
    pub async fn navigate_to<B: Bridge>(
        &mut self,
        bridge: &B,
        channel: LogicalChannel,
    ) -> Result<Navigation, ControlError> {
        let plan = self.plan(channel)?;
        let Some(key) = plan.key else {
            debug!("Already on {}", channel);
            return Ok(Navigation::AlreadyThere);
        };

        debug!(
            "Navigating {} -> {} ({} x {})",
            plan.from, plan.to, plan.steps, key
        );
        for _ in 0..plan.steps {
            self.press(bridge, key, self.profile.step_settle_ms).await?;
        }
        self.press(bridge, self.profile.confirm, self.profile.confirm_settle_ms)
            .await?;

        self.current_channel = Some(channel);
        self.current_position = Some(plan.to);
        info!("Now on {} ({})", channel, plan.to);
        Ok(Navigation::Moved {
            key,
            steps: plan.steps,
        })
    }

    /// Send one raw key, bypassing the delta model
    ///
    /// The tracked channel is left untouched.
    pub async fn nudge<B: Bridge>(&self, bridge: &B, key: KeyCode) -> Result<(), ControlError> {
        bridge.send_key(key).await?;
        Ok(())
    }

    fn set_current(&mut self, channel: Option<LogicalChannel>) {
        self.current_channel = channel;
        self.current_position = channel.and_then(|ch| {
            self.config
                .positions
                .position_of(self.profile.family, ch)
        });
    }

    async fn press<B: KeyTransport>(
        &self,
        bridge: &B,
        key: KeyCode,
        settle_ms: u64,
    ) -> Result<(), ControlError> {
        if let Err(e) = bridge.send_key(key).await {
            match self.config.key_failure_policy {
                KeyFailurePolicy::Continue => warn!("Key {} not delivered: {}", key, e),
                KeyFailurePolicy::Abort => return Err(e.into()),
            }
        }
        self.config.timing.pause(settle_ms).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{EON, SVT};

    fn built_in() -> PositionTable {
        PositionTable::new()
    }

    #[test]
    fn test_plan_forward() {
        let plan =
            plan_navigation(&SVT, &built_in(), Some(LogicalChannel::Svt1), LogicalChannel::Svt24)
                .unwrap();
        assert_eq!(plan.key, Some(KeyCode::DpadRight));
        assert_eq!(plan.steps, 4);
        assert_eq!(plan.from, PositionCode(1));
        assert_eq!(plan.to, PositionCode(5));
    }

    #[test]
    fn test_plan_backward_counts_unlisted_slots() {
        let plan =
            plan_navigation(&SVT, &built_in(), Some(LogicalChannel::Svt24), LogicalChannel::Svt2)
                .unwrap();
        assert_eq!(plan.key, Some(KeyCode::DpadLeft));
        assert_eq!(plan.steps, 3);
    }

    #[test]
    fn test_plan_uses_supplied_positions() {
        let positions: PositionTable = [
            (LogicalChannel::EonRts1, 1),
            (LogicalChannel::EonBnMuzika, 9),
        ]
        .into_iter()
        .collect();
        let plan = plan_navigation(
            &EON,
            &positions,
            Some(LogicalChannel::EonBnMuzika),
            LogicalChannel::EonRts1,
        )
        .unwrap();
        assert_eq!(plan.key, Some(KeyCode::DpadUp));
        assert_eq!(plan.steps, 8);
    }

    #[test]
    fn test_plan_same_channel_is_noop() {
        let plan =
            plan_navigation(&SVT, &built_in(), Some(LogicalChannel::Svt2), LogicalChannel::Svt2)
                .unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.key, None);
    }

    #[test]
    fn test_plan_refuses_unpositioned_target() {
        let err = plan_navigation(
            &SVT,
            &built_in(),
            Some(LogicalChannel::Svt1),
            LogicalChannel::Kunskapskanalen,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownChannel {
                channel: LogicalChannel::Kunskapskanalen,
                reason: UnknownReason::NoTargetPosition(AppFamily::Svt),
            }
        );

        let err =
            plan_navigation(&EON, &built_in(), Some(LogicalChannel::EonRts1), LogicalChannel::EonPink)
                .unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownChannel {
                channel: LogicalChannel::EonPink,
                reason: UnknownReason::NoTargetPosition(AppFamily::Eon),
            }
        );
    }

    #[test]
    fn test_plan_refuses_unknown_current() {
        let err = plan_navigation(&SVT, &built_in(), None, LogicalChannel::Svt2).unwrap_err();
        assert_eq!(
            err,
            ControlError::UnknownChannel {
                channel: LogicalChannel::Svt2,
                reason: UnknownReason::NoCurrentPosition(AppFamily::Svt),
            }
        );

        // A channel from another family never resolves as current position
        let err =
            plan_navigation(&SVT, &built_in(), Some(LogicalChannel::EonPink), LogicalChannel::Svt2)
                .unwrap_err();
        assert!(err.is_unknown_channel());
    }

    #[test]
    fn test_new_driver_is_stopped_without_channel() {
        let driver = AppDriver::new(AppFamily::Eon, DriverConfig::instant()).unwrap();
        assert_eq!(driver.state(), DriverState::Stopped);
        assert!(!driver.needs_shutdown());
        assert_eq!(driver.current_channel(), None);
        assert_eq!(driver.current_position(), None);
        assert!(AppDriver::new(AppFamily::Unknown, DriverConfig::instant()).is_none());
    }
}
