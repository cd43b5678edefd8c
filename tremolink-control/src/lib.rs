//! Controller core for the tremolink footswitch bridge.
//!
//! The embedding loop (firmware or the host simulator) feeds decoded CC
//! events into a [`Controller`] and calls [`Controller::tick`] once per
//! iteration; both return batches of outgoing CC messages for the transport
//! to write. All device-specific numbers live in a [`Profile`].
#![no_std]

pub mod controller;
pub mod generators;
pub mod params;
pub mod profile;
pub mod sampler;
pub mod status_led;

pub use controller::Controller;
pub use profile::{Mode, Profile};
pub use status_led::StatusLed;
