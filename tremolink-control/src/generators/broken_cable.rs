use heapless::Vec;
use log::trace;
use rand::{Rng, RngCore};
use tremolink_midi::CcMessage;

use crate::profile::{LaneLayout, Profile, StutterLaw};

/// One independently timed gate: the output controller it drives, whether it
/// is currently passing, the value it last settled on, and when it next
/// re-evaluates.
#[derive(Debug, Clone, Copy)]
struct Lane {
    cc: u8,
    on: bool,
    value: u8,
    deadline_us: u64,
}

impl Lane {
    const fn new(cc: u8) -> Self {
        Self {
            cc,
            on: false,
            value: 0,
            deadline_us: 0,
        }
    }
}

/// Simulates an intermittent cable by gating the output volume on and off
/// with randomized hold times. The hold distribution and the lane layout
/// (one joint gate, or two desynchronized per-channel gates) come from the
/// profile's stutter parameters.
#[derive(Debug)]
pub struct BrokenCable {
    lanes: Vec<Lane, 2>,
}

impl BrokenCable {
    pub fn new(profile: &Profile) -> Self {
        let mut lanes = Vec::new();
        match profile.stutter.lanes {
            LaneLayout::MonoAb => {
                lanes.push(Lane::new(profile.out.ab_volume)).unwrap();
            }
            LaneLayout::StereoAb => {
                lanes.push(Lane::new(profile.out.a_volume)).unwrap();
                lanes.push(Lane::new(profile.out.b_volume)).unwrap();
            }
        }
        Self { lanes }
    }

    /// Back to all-off with expired deadlines, so the next tick re-seeds and
    /// the gate opens immediately.
    pub fn reset(&mut self) {
        for lane in self.lanes.iter_mut() {
            lane.on = false;
            lane.value = 0;
            lane.deadline_us = 0;
        }
    }

    pub fn tick(
        &mut self,
        now_us: u64,
        target: u8,
        profile: &Profile,
        rng: &mut impl RngCore,
        out: &mut Vec<CcMessage, 4>,
    ) {
        let law = profile.stutter.law;
        let ch = profile.channel;

        for lane in self.lanes.iter_mut() {
            match law {
                StutterLaw::BiasedHold { on, off, min_gain } => {
                    if now_us >= lane.deadline_us {
                        lane.on = !lane.on;
                        let range = if lane.on { on } else { off };
                        lane.deadline_us = now_us + range.sample(rng);
                        lane.value = if lane.on {
                            let lo = (min_gain.to_num::<f32>() * target as f32) as u8;
                            rng.gen_range(lo..=target)
                        } else {
                            0
                        };
                        trace!(
                            "stutter cc {} -> {} for {}us",
                            lane.cc,
                            lane.value,
                            lane.deadline_us - now_us
                        );
                        out.push(CcMessage::new(ch, lane.cc, lane.value)).unwrap();
                    }
                }
                StutterLaw::CoinFlip {
                    drop_chance,
                    pass_hold,
                    drop_hold,
                } => {
                    if now_us >= lane.deadline_us {
                        let threshold = (drop_chance.to_num::<f32>() * 1000.0) as u32;
                        let pass = rng.gen_range(0..1000u32) >= threshold;
                        lane.on = pass;
                        lane.value = if pass { target } else { 0 };
                        let range = if pass { pass_hold } else { drop_hold };
                        lane.deadline_us = now_us + range.sample(rng);
                    }
                    // The earliest build re-sent the current value every
                    // iteration rather than on transitions.
                    out.push(CcMessage::new(ch, lane.cc, lane.value)).unwrap();
                }
            }
        }
    }
}
