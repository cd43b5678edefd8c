use heapless::Vec;
use log::debug;
use tremolink_midi::CcMessage;

use crate::profile::{LfoParams, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LfoWaveform {
    Sine,
    Ramp,
}

/// Drives the effects unit's stereo LFO.
///
/// The first active iteration sends the full initialization burst: speed,
/// waveform depth, and the B-channel delay. Depth and delay are sticky on
/// the device, so afterwards only the speed message is re-sent, and only
/// when the target volume it is derived from has changed.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StereoLfo {
    started: bool,
    last_speed_target: u8,
}

fn speed_for(target: u8, lfo: &LfoParams) -> u8 {
    let span = (lfo.speed_ceil - lfo.speed_floor) as u32;
    lfo.speed_floor + (target as u32 * span / 127) as u8
}

impl StereoLfo {
    pub const fn new() -> Self {
        Self {
            started: false,
            last_speed_target: 0,
        }
    }

    pub fn reset(&mut self) {
        self.started = false;
    }

    /// Whether the initialization burst has been sent for the current
    /// activation.
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn tick(
        &mut self,
        waveform: LfoWaveform,
        target: u8,
        profile: &Profile,
        out: &mut Vec<CcMessage, 4>,
    ) {
        let ch = profile.channel;
        let speed = speed_for(target, &profile.lfo);

        if !self.started {
            let depth_cc = match waveform {
                LfoWaveform::Sine => profile.out.lfo_sine_depth,
                LfoWaveform::Ramp => profile.out.lfo_ramp_depth,
            };
            out.push(CcMessage::new(ch, profile.out.lfo_speed, speed))
                .unwrap();
            out.push(CcMessage::new(ch, depth_cc, profile.lfo.depth))
                .unwrap();
            out.push(CcMessage::new(ch, profile.out.b_lfo_delay, profile.lfo.delay))
                .unwrap();
            self.started = true;
            self.last_speed_target = target;
            debug!("lfo {waveform:?} started at speed {speed}");
        } else if target != self.last_speed_target {
            out.push(CcMessage::new(ch, profile.out.lfo_speed, speed))
                .unwrap();
            self.last_speed_target = target;
        }
    }

    /// Silences the oscillator. Zeroing the speed stops it; the ramp depth
    /// additionally has to be cleared or the device snaps the volume on the
    /// next start.
    pub fn stop(
        &mut self,
        waveform: LfoWaveform,
        profile: &Profile,
        out: &mut Vec<CcMessage, 4>,
    ) {
        out.push(CcMessage::new(profile.channel, profile.out.lfo_speed, 0))
            .unwrap();
        if waveform == LfoWaveform::Ramp {
            out.push(CcMessage::new(profile.channel, profile.out.lfo_ramp_depth, 0))
                .unwrap();
        }
        self.started = false;
    }
}

impl Default for StereoLfo {
    fn default() -> Self {
        Self::new()
    }
}
