//! Backlight policy
//!
//! ```text
//!            autodim timeout              sleep timeout
//!  Active ─────────────────► Dimmed ─────────────────► Asleep
//!    ▲                          │                         │
//!    └──────── activity ────────┴─────────────────────────┘
//! ```
//!
//! Commands are produced only when the state changes, so the panel is not
//! written every tick.

use heapless::Vec;
use htp1_core::config::{BacklightSettings, BRIGHTNESS_LEVELS};

/// Raw brightness of each preset level
pub const BRIGHTNESS_PRESETS: [u8; BRIGHTNESS_LEVELS as usize] = [7, 20, 25, 30, 50, 55, 60];

/// Raw brightness of a preset level, clamped into range
pub fn preset(level: u8) -> u8 {
    BRIGHTNESS_PRESETS[usize::from(level).min(BRIGHTNESS_PRESETS.len() - 1)]
}

/// Backlight states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BacklightState {
    /// Preset brightness
    Active,
    /// Reduced brightness after inactivity
    Dimmed,
    /// Panel off
    Asleep,
}

/// Panel control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelCommand {
    Brightness(u8),
    Power(bool),
}

/// Commands produced by one update
pub type PanelCommands = Vec<PanelCommand, 2>;

/// Inactivity timer driving the panel brightness
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Backlight {
    state: BacklightState,
    last_activity_ms: u32,
}

impl Backlight {
    /// Start active at `now_ms`
    pub const fn new(now_ms: u32) -> Self {
        Self {
            state: BacklightState::Active,
            last_activity_ms: now_ms,
        }
    }

    /// Get the current state
    pub fn state(&self) -> BacklightState {
        self.state
    }

    /// Record activity and wake the panel if needed
    pub fn activity(&mut self, now_ms: u32, settings: &BacklightSettings) -> PanelCommands {
        self.last_activity_ms = now_ms;
        self.update(now_ms, settings)
    }

    /// Advance the inactivity timer
    pub fn update(&mut self, now_ms: u32, settings: &BacklightSettings) -> PanelCommands {
        let idle = now_ms.wrapping_sub(self.last_activity_ms);
        let target = if settings.sleep_enabled && idle >= settings.sleep_timeout_ms {
            BacklightState::Asleep
        } else if settings.autodim_timeout_ms > 0 && idle >= settings.autodim_timeout_ms {
            BacklightState::Dimmed
        } else {
            BacklightState::Active
        };

        if target == self.state {
            return PanelCommands::new();
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("backlight {} -> {}", self.state, target);

        let from = self.state;
        self.state = target;
        commands_for(from, target, settings)
    }

    /// Commands restoring the current state after a settings change
    pub fn reapply(&self, settings: &BacklightSettings) -> PanelCommands {
        match self.state {
            BacklightState::Asleep => PanelCommands::new(),
            state => commands_for(BacklightState::Active, state, settings),
        }
    }
}

fn commands_for(
    from: BacklightState,
    to: BacklightState,
    settings: &BacklightSettings,
) -> PanelCommands {
    let mut commands = PanelCommands::new();
    match to {
        BacklightState::Asleep => {
            let _ = commands.push(PanelCommand::Power(false));
        }
        BacklightState::Active | BacklightState::Dimmed => {
            if from == BacklightState::Asleep {
                let _ = commands.push(PanelCommand::Power(true));
            }
            let level = if to == BacklightState::Dimmed {
                settings.dim_brightness
            } else {
                preset(settings.brightness_level)
            };
            let _ = commands.push(PanelCommand::Brightness(level));
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BacklightSettings {
        BacklightSettings::default()
    }

    #[test]
    fn test_presets() {
        assert_eq!(preset(0), 7);
        assert_eq!(preset(3), 30);
        assert_eq!(preset(6), 60);
        assert_eq!(preset(200), 60);
    }

    #[test]
    fn test_dims_once_after_timeout() {
        let mut light = Backlight::new(0);
        assert!(light.update(2999, &settings()).is_empty());

        let commands = light.update(3000, &settings());
        assert_eq!(commands.as_slice(), &[PanelCommand::Brightness(7)]);
        assert_eq!(light.state(), BacklightState::Dimmed);

        assert!(light.update(4000, &settings()).is_empty());
    }

    #[test]
    fn test_activity_restores_preset() {
        let mut light = Backlight::new(0);
        light.update(5000, &settings());

        let commands = light.activity(5100, &settings());
        assert_eq!(commands.as_slice(), &[PanelCommand::Brightness(30)]);
        assert_eq!(light.state(), BacklightState::Active);
        assert!(light.activity(5200, &settings()).is_empty());
    }

    #[test]
    fn test_zero_timeout_disables_dimming() {
        let mut s = settings();
        s.autodim_timeout_ms = 0;
        let mut light = Backlight::new(0);
        assert!(light.update(1_000_000, &s).is_empty());
        assert_eq!(light.state(), BacklightState::Active);
    }

    #[test]
    fn test_sleep_and_wake() {
        let mut s = settings();
        s.sleep_enabled = true;
        let mut light = Backlight::new(0);
        light.update(3000, &s);

        let commands = light.update(60_000, &s);
        assert_eq!(commands.as_slice(), &[PanelCommand::Power(false)]);
        assert_eq!(light.state(), BacklightState::Asleep);

        let commands = light.activity(61_000, &s);
        assert_eq!(
            commands.as_slice(),
            &[PanelCommand::Power(true), PanelCommand::Brightness(30)]
        );
    }

    #[test]
    fn test_sleep_disabled_stays_dimmed() {
        let mut light = Backlight::new(0);
        light.update(3000, &settings());
        assert!(light.update(10_000_000, &settings()).is_empty());
        assert_eq!(light.state(), BacklightState::Dimmed);
    }

    #[test]
    fn test_reapply_uses_new_level() {
        let mut s = settings();
        let light = Backlight::new(0);
        s.brightness_level = 6;
        assert_eq!(light.reapply(&s).as_slice(), &[PanelCommand::Brightness(60)]);
    }

    #[test]
    fn test_timer_survives_clock_wrap() {
        let mut light = Backlight::new(u32::MAX - 1000);
        assert!(light.update(1000, &settings()).is_empty());
        assert!(!light.update(2000, &settings()).is_empty());
    }
}
