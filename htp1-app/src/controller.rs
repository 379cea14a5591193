//! Main controller coordinating sync, rendering and the backlight

use heapless::String;
use htp1_core::config::{apply_json, AppSettings, SettingsChange, SettingsDocument, SettingsError};
use htp1_core::status::{bounded, StatusReport};
use htp1_core::sync::SyncEngine;
use htp1_core::traits::{StateFetcher, StreamTransport};
use htp1_render::backlight::{preset, Backlight, PanelCommand, PanelCommands, BRIGHTNESS_PRESETS};
use htp1_render::{palette, DisplayDriver, DisplayError, Renderer};

/// Maximum time between two renders (ms)
pub const REDRAW_INTERVAL_MS: u32 = 1000;

/// Splash screen title
pub const SPLASH_TITLE: &str = "HTP-1 Display";

/// Splash detail shown when no processor address is set
pub const SETUP_HINT: &str = "Open settings to set HTP-1 IP";

/// Errors surfaced to the driving loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AppError {
    Display(DisplayError),
    Settings(SettingsError),
}

impl From<DisplayError> for AppError {
    fn from(e: DisplayError) -> Self {
        AppError::Display(e)
    }
}

impl From<SettingsError> for AppError {
    fn from(e: SettingsError) -> Self {
        AppError::Settings(e)
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Mirrored status changed since the last tick
    pub changed: bool,
    /// A frame was pushed to the panel
    pub rendered: bool,
}

/// Front-panel button actions
///
/// Debouncing and long-press detection happen in the board code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Step to the next brightness preset, wrapping
    CycleBrightness,
    /// Step to the next display mode, wrapping
    CycleMode,
    /// Toggle the sleep timer
    ToggleSleep,
}

/// Controller state for coordinating subsystems
pub struct Controller<'a, F, T, D> {
    engine: SyncEngine<F, T>,
    renderer: Renderer<'a, D>,
    settings: AppSettings,
    backlight: Backlight,
    /// Last render timestamp (ms)
    last_render_ms: Option<u32>,
    /// Settings changed the picture; render on the next tick
    redraw_pending: bool,
}

impl<'a, F, T, D> Controller<'a, F, T, D>
where
    F: StateFetcher,
    T: StreamTransport,
    D: DisplayDriver,
{
    /// Create a controller
    ///
    /// The engine is retargeted to `settings` so both start out agreeing.
    pub fn new(
        mut engine: SyncEngine<F, T>,
        renderer: Renderer<'a, D>,
        settings: AppSettings,
    ) -> Self {
        let target = &settings.target;
        engine.set_target(target.host.as_str(), target.port, target.volume_offset);
        engine.take_dirty();

        Self {
            engine,
            renderer,
            settings,
            backlight: Backlight::new(0),
            last_render_ms: None,
            redraw_pending: true,
        }
    }

    /// Power the panel up and show the splash screen
    pub fn boot(&mut self, now_ms: u32) -> Result<(), DisplayError> {
        self.backlight = Backlight::new(now_ms);

        let driver = self.renderer.driver_mut();
        driver.set_power(true)?;
        driver.set_brightness(preset(self.settings.backlight.brightness_level))?;

        let color = palette(self.settings.layout.theme).accent;
        let detail: String<64> = if self.settings.target.is_configured() {
            let mut line = String::new();
            let _ = line.push_str("Connecting to ");
            let _ = line.push_str(self.settings.target.host.as_str());
            line
        } else {
            bounded(SETUP_HINT)
        };
        self.renderer
            .render_message(SPLASH_TITLE, Some(detail.as_str()), color)?;

        #[cfg(feature = "defmt")]
        defmt::info!("display up, target '{}'", self.settings.target.host.as_str());

        Ok(())
    }

    /// Run one iteration of the driving loop
    ///
    /// Polls the engine once, then renders if the status changed, the
    /// settings changed, or [`REDRAW_INTERVAL_MS`] passed since the last
    /// render. Network failures never surface here; only the panel can
    /// fail a tick.
    pub fn tick(&mut self, now_ms: u32) -> Result<TickOutcome, DisplayError> {
        self.engine.poll(now_ms);
        let changed = self.engine.take_dirty();

        let commands = if changed {
            self.backlight.activity(now_ms, &self.settings.backlight)
        } else {
            self.backlight.update(now_ms, &self.settings.backlight)
        };
        self.send(&commands)?;

        let rendered = self.redraw_pending || changed || self.redraw_due(now_ms);
        if rendered {
            self.renderer
                .render(self.engine.status(), &self.settings.layout)?;
            self.last_render_ms = Some(now_ms);
            self.redraw_pending = false;
        }

        Ok(TickOutcome { changed, rendered })
    }

    fn redraw_due(&self, now_ms: u32) -> bool {
        match self.last_render_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= REDRAW_INTERVAL_MS,
        }
    }

    fn send(&mut self, commands: &PanelCommands) -> Result<(), DisplayError> {
        let driver = self.renderer.driver_mut();
        for command in commands {
            match *command {
                PanelCommand::Brightness(level) => driver.set_brightness(level)?,
                PanelCommand::Power(on) => driver.set_power(on)?,
            }
        }
        Ok(())
    }

    /// Replace the settings record
    ///
    /// This is the change notification from the settings collaborator. A
    /// new connection target is handed to the engine, any change forces a
    /// redraw, and backlight changes are applied right away.
    pub fn apply_settings(
        &mut self,
        settings: AppSettings,
    ) -> Result<SettingsChange, DisplayError> {
        let change = SettingsChange::between(&self.settings, &settings);
        self.settings = settings;
        self.notify(change)?;
        Ok(change)
    }

    /// Apply a settings form posted by the configuration page
    pub fn update_settings(&mut self, body: &[u8]) -> Result<SettingsChange, AppError> {
        let change = apply_json(&mut self.settings, body)?;
        self.notify(change)?;
        Ok(change)
    }

    fn notify(&mut self, change: SettingsChange) -> Result<(), DisplayError> {
        if change.target {
            let target = &self.settings.target;
            self.engine
                .set_target(target.host.as_str(), target.port, target.volume_offset);

            #[cfg(feature = "defmt")]
            defmt::info!("target now {}:{}", target.host.as_str(), target.port);
        }
        if change.any() {
            self.redraw_pending = true;
        }
        if change.backlight {
            let commands = self.backlight.reapply(&self.settings.backlight);
            self.send(&commands)?;
        }
        Ok(())
    }

    /// Handle a front-panel button
    ///
    /// Any press counts as activity and wakes the panel. Returns the
    /// resulting settings change so the caller can persist it.
    pub fn handle_button(
        &mut self,
        action: ButtonAction,
        now_ms: u32,
    ) -> Result<SettingsChange, DisplayError> {
        let commands = self.backlight.activity(now_ms, &self.settings.backlight);
        self.send(&commands)?;

        let mut settings = self.settings.clone();
        match action {
            ButtonAction::CycleBrightness => {
                let levels = BRIGHTNESS_PRESETS.len() as u8;
                let current = settings.backlight.brightness_level.min(levels - 1);
                settings.backlight.brightness_level = (current + 1) % levels;
            }
            ButtonAction::CycleMode => {
                settings.layout.mode = settings.layout.mode.next();
            }
            ButtonAction::ToggleSleep => {
                settings.backlight.sleep_enabled = !settings.backlight.sleep_enabled;
            }
        }
        self.apply_settings(settings)
    }

    /// Record user activity without changing anything
    pub fn wake(&mut self, now_ms: u32) -> Result<(), DisplayError> {
        let commands = self.backlight.activity(now_ms, &self.settings.backlight);
        self.send(&commands)
    }

    /// Status snapshot for the reporting surface
    pub fn status_report(&self) -> StatusReport<'_> {
        StatusReport::capture(self.engine.status(), self.engine.connectivity())
    }

    /// Settings as served to the configuration page
    pub fn settings_document(&self) -> SettingsDocument<'_> {
        SettingsDocument::from(&self.settings)
    }

    /// Get current settings
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Get access to the sync engine
    pub fn engine(&self) -> &SyncEngine<F, T> {
        &self.engine
    }

    /// Get access to the renderer
    pub fn renderer(&self) -> &Renderer<'a, D> {
        &self.renderer
    }

    /// Get the backlight state machine
    pub fn backlight(&self) -> &Backlight {
        &self.backlight
    }
}
