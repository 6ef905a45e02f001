//! Per-family application profiles
//!
//! Everything that differs between streaming applications lives here:
//! which activity to start, how to reach the live view after launch, which
//! d-pad keys move through the channel list and how long the UI needs to
//! settle after each key.

use waytv_core::{AppFamily, KeyCode};

/// One key of a fixed navigation macro
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroStep {
    /// Key to send
    pub key: KeyCode,
    /// Settle delay after the key (ms)
    pub settle_ms: u64,
}

const fn step(key: KeyCode, settle_ms: u64) -> MacroStep {
    MacroStep { key, settle_ms }
}

/// Static description of one application family
#[derive(Debug, PartialEq, Eq)]
pub struct FamilyProfile {
    /// Family this profile drives
    pub family: AppFamily,
    /// Android package, used for force-stop
    pub package: &'static str,
    /// Activity component, used for launch
    pub component: &'static str,
    /// Wait after the launch command before the entry macro (ms)
    pub launch_settle_ms: u64,
    /// Keys that bring the app from launch to the live channel list
    pub entry_macro: &'static [MacroStep],
    /// Key that moves towards higher positions
    pub forward: KeyCode,
    /// Key that moves towards lower positions
    pub backward: KeyCode,
    /// Settle delay after each list step (ms)
    pub step_settle_ms: u64,
    /// Key that commits the highlighted entry
    pub confirm: KeyCode,
    /// Settle delay after confirm; channel changes are slower than cursor moves (ms)
    pub confirm_settle_ms: u64,
}

/// SVT Play: profile picker, then the horizontal live row
pub static SVT: FamilyProfile = FamilyProfile {
    family: AppFamily::Svt,
    package: "se.svt.android.svtplay",
    component: "se.svt.android.svtplay/se.svt.svtplay.ui.tv.profile.ProfilePickerActivity",
    launch_settle_ms: 3_000,
    entry_macro: &[
        step(KeyCode::DpadUp, 1_000),
        step(KeyCode::DpadCenter, 5_000),
        step(KeyCode::DpadLeft, 1_000),
        step(KeyCode::DpadDown, 1_000),
        step(KeyCode::DpadDown, 1_000),
        step(KeyCode::DpadDown, 1_000),
        step(KeyCode::DpadCenter, 5_000),
    ],
    forward: KeyCode::DpadRight,
    backward: KeyCode::DpadLeft,
    step_settle_ms: 1_000,
    confirm: KeyCode::DpadCenter,
    confirm_settle_ms: 2_000,
};

/// EON: TV activity opens on live TV; center opens the vertical channel list
pub static EON: FamilyProfile = FamilyProfile {
    family: AppFamily::Eon,
    package: "com.ug.eon.android.tv",
    component: "com.ug.eon.android.tv/.TvActivity",
    launch_settle_ms: 3_000,
    entry_macro: &[step(KeyCode::DpadCenter, 2_000)],
    forward: KeyCode::DpadDown,
    backward: KeyCode::DpadUp,
    step_settle_ms: 500,
    confirm: KeyCode::DpadCenter,
    confirm_settle_ms: 1_000,
};

impl FamilyProfile {
    /// Profile for a family; `None` for [`AppFamily::Unknown`]
    pub fn for_family(family: AppFamily) -> Option<&'static FamilyProfile> {
        match family {
            AppFamily::Svt => Some(&SVT),
            AppFamily::Eon => Some(&EON),
            AppFamily::Unknown => None,
        }
    }

    /// Key that moves `delta` positions in the right direction, `None` for zero
    pub fn advance_key(&self, delta: i32) -> Option<KeyCode> {
        match delta.signum() {
            1 => Some(self.forward),
            -1 => Some(self.backward),
            _ => None,
        }
    }
}
