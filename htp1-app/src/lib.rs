//! Driving loop for the HTP-1 companion display
//!
//! [`Controller`] ties the pieces together. Once per tick it polls the
//! sync engine, redraws when something changed (or the redraw cadence
//! expires) and keeps the backlight policy applied to the panel.
//!
//! Everything board-specific plugs in through traits:
//!
//! - [`StateFetcher`](htp1_core::StateFetcher) and
//!   [`StreamTransport`](htp1_core::StreamTransport) for the network
//! - [`DisplayDriver`](htp1_render::DisplayDriver) for the panel
//!
//! Settings storage and the configuration page stay outside; they hand
//! new settings to [`Controller::apply_settings`] or
//! [`Controller::update_settings`].

#![no_std]
#![deny(unsafe_code)]

pub mod controller;

pub use controller::{AppError, ButtonAction, Controller, TickOutcome, REDRAW_INTERVAL_MS};
