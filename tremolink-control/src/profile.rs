use fixed::types::U0F8;

use crate::sampler::HoldRange;

/// Effect modes selectable from the foot controller. Which of these a device
/// build actually offers, and on which footswitch, is profile data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    BrokenCable,
    AbControl,
    SineLfo,
    RampLfo,
    VolumeControl,
}

/// Controller numbers understood by the downstream effects unit.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputCcs {
    pub a_volume: u8,
    pub b_volume: u8,
    pub ab_volume: u8,
    pub lfo_speed: u8,
    pub lfo_sine_depth: u8,
    pub lfo_ramp_depth: u8,
    pub b_lfo_delay: u8,
}

impl Default for OutputCcs {
    fn default() -> Self {
        Self {
            a_volume: 29,
            b_volume: 40,
            ab_volume: 69,
            lfo_speed: 70,
            lfo_sine_depth: 61,
            lfo_ramp_depth: 65,
            b_lfo_delay: 51,
        }
    }
}

/// One footswitch: the CC number the pedal sends and the mode it selects.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FootswitchMap {
    pub cc: u8,
    pub mode: Mode,
}

/// Controller numbers sent by the foot controller.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputCcs {
    pub footswitches: [Option<FootswitchMap>; 4],
    pub expression: u8,
    /// Sustain-style gate: activates the current mode without changing it.
    pub sus_down: Option<u8>,
    /// Sustain-style gate: deactivates with the canonical reset output.
    pub sus_up: Option<u8>,
}

impl InputCcs {
    pub fn mode_for(&self, controller: u8) -> Option<Mode> {
        self.footswitches
            .iter()
            .flatten()
            .find(|fs| fs.cc == controller)
            .map(|fs| fs.mode)
    }
}

/// Parameters of the initialization burst and speed updates for the LFO
/// modes. Speed is remapped from the target volume into `[speed_floor,
/// speed_ceil]`; depth and delay are sticky on the device and sent once.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LfoParams {
    pub speed_floor: u8,
    pub speed_ceil: u8,
    pub depth: u8,
    pub delay: u8,
}

impl Default for LfoParams {
    fn default() -> Self {
        Self {
            speed_floor: 10,
            speed_ceil: 127,
            depth: 127,
            delay: 12,
        }
    }
}

/// How the broken-cable gate draws its hold times and volumes.
#[derive(Debug, Clone, Copy)]
pub enum StutterLaw {
    /// Weighted coin per expiry: drop to 0 with `drop_chance`, otherwise pass
    /// the full target volume. The current value is re-sent every iteration.
    CoinFlip {
        drop_chance: U0F8,
        pass_hold: HoldRange,
        drop_hold: HoldRange,
    },
    /// Skewed hold per state: short holds are frequent, long ones rare. On
    /// entering the passing state the volume is drawn from
    /// `[min_gain * target, target]`; messages go out on
    /// transitions only.
    BiasedHold {
        on: HoldRange,
        off: HoldRange,
        min_gain: U0F8,
    },
}

/// Which output controllers the stutter gate drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LaneLayout {
    /// One gate on the joint A+B volume.
    MonoAb,
    /// Two independently timed gates on the A and B volumes, desynchronizing
    /// the channels.
    StereoAb,
}

#[derive(Debug, Clone, Copy)]
pub struct StutterParams {
    pub law: StutterLaw,
    pub lanes: LaneLayout,
}

/// Everything device-specific in one place. The named constructors preserve
/// the behavior of the hardware builds this controller has been deployed as.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    /// MIDI channel for outgoing messages.
    pub channel: u8,
    pub out: OutputCcs,
    pub input: InputCcs,
    pub lfo: LfoParams,
    pub stutter: StutterParams,
    /// B-side of the balance law: `B = balance_offset - target`, saturating
    /// at zero.
    pub balance_offset: u8,
    /// Lowest raw value the expression pedal reports; raw values below it
    /// clamp to it.
    pub expression_floor: u8,
}

impl Profile {
    /// The two-mode build: broken cable and sine LFO on the first two
    /// footswitches, gated by the sustain pedal, coin-flip stutter with
    /// millisecond holds.
    pub fn duo() -> Self {
        Self {
            channel: 0,
            out: OutputCcs::default(),
            input: InputCcs {
                footswitches: [
                    Some(FootswitchMap {
                        cc: 27,
                        mode: Mode::BrokenCable,
                    }),
                    Some(FootswitchMap {
                        cc: 28,
                        mode: Mode::SineLfo,
                    }),
                    None,
                    None,
                ],
                expression: 31,
                sus_down: Some(32),
                sus_up: Some(33),
            },
            lfo: LfoParams::default(),
            stutter: StutterParams {
                law: StutterLaw::CoinFlip {
                    drop_chance: U0F8::from_num(0.5),
                    pass_hold: HoldRange::uniform(1_000, 300_000),
                    drop_hold: HoldRange::uniform(1_000, 50_000),
                },
                lanes: LaneLayout::MonoAb,
            },
            balance_offset: 121,
            expression_floor: 31,
        }
    }

    /// The four-switch build: footswitch toggles, skewed stutter holds, and
    /// the A/B balance mode.
    pub fn quartet() -> Self {
        Self {
            channel: 0,
            out: OutputCcs::default(),
            input: InputCcs {
                footswitches: [
                    Some(FootswitchMap {
                        cc: 27,
                        mode: Mode::BrokenCable,
                    }),
                    Some(FootswitchMap {
                        cc: 28,
                        mode: Mode::AbControl,
                    }),
                    Some(FootswitchMap {
                        cc: 29,
                        mode: Mode::SineLfo,
                    }),
                    Some(FootswitchMap {
                        cc: 30,
                        mode: Mode::VolumeControl,
                    }),
                ],
                expression: 31,
                sus_down: Some(32),
                sus_up: Some(33),
            },
            lfo: LfoParams::default(),
            stutter: StutterParams {
                law: StutterLaw::BiasedHold {
                    on: HoldRange::squared(10, 600_000),
                    off: HoldRange::squared(10, 80_000),
                    min_gain: U0F8::from_num(0.4),
                },
                lanes: LaneLayout::MonoAb,
            },
            balance_offset: 121,
            expression_floor: 31,
        }
    }

    /// The stereo build: ramp LFO instead of balance, and two desynchronized
    /// stutter gates on the A and B volumes.
    pub fn stereo_stutter() -> Self {
        Self {
            channel: 0,
            out: OutputCcs::default(),
            input: InputCcs {
                footswitches: [
                    Some(FootswitchMap {
                        cc: 27,
                        mode: Mode::BrokenCable,
                    }),
                    Some(FootswitchMap {
                        cc: 28,
                        mode: Mode::SineLfo,
                    }),
                    Some(FootswitchMap {
                        cc: 29,
                        mode: Mode::RampLfo,
                    }),
                    Some(FootswitchMap {
                        cc: 30,
                        mode: Mode::VolumeControl,
                    }),
                ],
                expression: 31,
                sus_down: None,
                sus_up: None,
            },
            lfo: LfoParams::default(),
            stutter: StutterParams {
                law: StutterLaw::BiasedHold {
                    on: HoldRange::squared(10, 600_000),
                    off: HoldRange::squared(10, 80_000),
                    min_gain: U0F8::from_num(0.4),
                },
                lanes: LaneLayout::StereoAb,
            },
            balance_offset: 121,
            expression_floor: 31,
        }
    }
}
