use heapless::Vec;
use tremolink_midi::CcMessage;

use crate::profile::Profile;

pub mod broken_cable;
pub mod lfo;

/// Joint A+B volume follows the target directly, every iteration.
pub fn volume_pass_through(target: u8, profile: &Profile, out: &mut Vec<CcMessage, 4>) {
    out.push(CcMessage::new(
        profile.channel,
        profile.out.ab_volume,
        target,
    ))
    .unwrap();
}

/// Complementary A/B volumes: A follows the target, B runs against it with
/// the profile's offset correction. Not a linear split; the offset matches
/// the device's measured balance law.
pub fn ab_balance(target: u8, profile: &Profile, out: &mut Vec<CcMessage, 4>) {
    out.push(CcMessage::new(profile.channel, profile.out.a_volume, target))
        .unwrap();
    out.push(CcMessage::new(
        profile.channel,
        profile.out.b_volume,
        profile.balance_offset.saturating_sub(target),
    ))
    .unwrap();
}
