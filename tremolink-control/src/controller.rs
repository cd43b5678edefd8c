use heapless::Vec;
use log::{info, trace};
use rand::RngCore;
use tremolink_midi::{CcEvent, CcMessage};

use crate::generators::broken_cable::BrokenCable;
use crate::generators::lfo::{LfoWaveform, StereoLfo};
use crate::generators::{ab_balance, volume_pass_through};
use crate::params::ParamStore;
use crate::profile::{Mode, Profile};

/// The per-device controller: current mode, active flag, parameter store,
/// and the generator state for every mode the profile can reach. Owned by
/// the embedding loop and threaded through it explicitly; there is exactly
/// one instance per device, so nothing here is global.
#[derive(Debug)]
pub struct Controller {
    profile: Profile,
    params: ParamStore,
    mode: Mode,
    active: bool,
    lfo: StereoLfo,
    stutter: BrokenCable,
    last_input_us: u64,
}

impl Controller {
    pub fn new(profile: Profile) -> Self {
        // Idle in whatever the first footswitch selects; with no switches
        // mapped the controller can still be driven by the sustain gate.
        let mode = profile
            .input
            .footswitches
            .iter()
            .flatten()
            .next()
            .map(|fs| fs.mode)
            .unwrap_or(Mode::VolumeControl);
        Self {
            params: ParamStore::new(profile.expression_floor),
            mode,
            active: false,
            lfo: StereoLfo::new(),
            stutter: BrokenCable::new(&profile),
            profile,
            last_input_us: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target_volume(&self) -> u8 {
        self.params.target_volume()
    }

    /// When the controller last saw input activity, for the status
    /// indicator's idle detection.
    pub fn last_input_us(&self) -> u64 {
        self.last_input_us
    }

    /// Records raw wire activity that did not decode to an event yet.
    pub fn note_activity(&mut self, now_us: u64) {
        self.last_input_us = now_us;
    }

    /// Routes one decoded event. Footswitch events may emit mode-stop or
    /// reset output; expression events only update the parameter store.
    pub fn handle_event(&mut self, event: CcEvent, now_us: u64) -> Vec<CcMessage, 4> {
        self.last_input_us = now_us;
        let mut out = Vec::new();

        if event.controller == self.profile.input.expression {
            self.params.set_expression(event.value);
            trace!("expression {} -> target {}", event.value, self.params.target_volume());
        } else if let Some(mode) = self.profile.input.mode_for(event.controller) {
            self.press(mode, &mut out);
        } else if Some(event.controller) == self.profile.input.sus_down {
            if !self.active {
                self.active = true;
                self.reset_generators();
                info!("{:?} active (sustain down)", self.mode);
            }
        } else if Some(event.controller) == self.profile.input.sus_up {
            if self.active {
                self.deactivate(&mut out);
            }
        } else {
            trace!("ignoring CC {} value {}", event.controller, event.value);
        }

        out
    }

    /// Runs the active mode's generator once. Call exactly once per loop
    /// iteration with monotonic microseconds.
    pub fn tick(&mut self, now_us: u64, rng: &mut impl RngCore) -> Vec<CcMessage, 4> {
        let mut out = Vec::new();
        if !self.active {
            return out;
        }
        // A running mode counts as activity; the indicator must not start
        // blinking mid-performance.
        self.last_input_us = now_us;

        let target = self.params.target_volume();
        match self.mode {
            Mode::VolumeControl => volume_pass_through(target, &self.profile, &mut out),
            Mode::AbControl => ab_balance(target, &self.profile, &mut out),
            Mode::SineLfo => self
                .lfo
                .tick(LfoWaveform::Sine, target, &self.profile, &mut out),
            Mode::RampLfo => self
                .lfo
                .tick(LfoWaveform::Ramp, target, &self.profile, &mut out),
            Mode::BrokenCable => {
                self.stutter
                    .tick(now_us, target, &self.profile, rng, &mut out)
            }
        }
        out
    }

    fn press(&mut self, mode: Mode, out: &mut Vec<CcMessage, 4>) {
        if self.active && self.mode == mode {
            self.deactivate(out);
        } else {
            if self.active {
                self.stop_current(out);
            }
            self.mode = mode;
            self.active = true;
            self.reset_generators();
            info!("{mode:?} active");
        }
    }

    /// Leaves the active flag alone but silences anything the current mode
    /// left running on the device, so a new mode starts clean.
    fn stop_current(&mut self, out: &mut Vec<CcMessage, 4>) {
        if self.lfo.started() {
            let waveform = match self.mode {
                Mode::SineLfo => LfoWaveform::Sine,
                Mode::RampLfo => LfoWaveform::Ramp,
                _ => return,
            };
            self.lfo.stop(waveform, &self.profile, out);
        }
    }

    /// The canonical reset: full joint volume, oscillator stopped. Emitted
    /// exactly once per deactivation.
    fn deactivate(&mut self, out: &mut Vec<CcMessage, 4>) {
        let ch = self.profile.channel;
        out.push(CcMessage::new(ch, self.profile.out.ab_volume, 127))
            .unwrap();
        out.push(CcMessage::new(ch, self.profile.out.lfo_speed, 0))
            .unwrap();
        if self.mode == Mode::RampLfo {
            out.push(CcMessage::new(ch, self.profile.out.lfo_ramp_depth, 0))
                .unwrap();
        }
        self.active = false;
        self.reset_generators();
        info!("deactivated");
    }

    fn reset_generators(&mut self) {
        self.lfo.reset();
        self.stutter.reset();
    }
}
