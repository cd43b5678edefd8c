use std::env;

use env_logger::{Builder, Env};
use log::{debug, info, LevelFilter};
use rand::{rngs::SmallRng, SeedableRng};
use tremolink_control::{Controller, Profile, StatusLed};
use tremolink_midi::{CcDecoder, CcMessage};

const TICK_US: u64 = 1_000;
const RUN_US: u64 = 16_000_000;

/// Wire bytes scheduled on the virtual timeline, as the foot controller
/// would send them.
struct TapeEntry {
    at_us: u64,
    bytes: [u8; 3],
}

fn cc(at_us: u64, controller: u8, value: u8) -> TapeEntry {
    TapeEntry {
        at_us,
        bytes: [0xB0, controller, value],
    }
}

/// A short performance on the quartet profile: stutter, a balance sweep, an
/// LFO with expression-driven speed, then silence long enough for the idle
/// blink to show.
fn tape() -> Vec<TapeEntry> {
    let mut tape = vec![
        cc(500_000, 27, 1),   // broken cable on
        cc(3_000_000, 27, 1), // broken cable off again
        cc(3_500_000, 28, 1), // A/B balance
        cc(5_500_000, 29, 1), // sine LFO
    ];
    // Expression sweep while the LFO runs: toe down over half a second.
    for (i, raw) in (31..=127).step_by(8).enumerate() {
        tape.push(cc(6_000_000 + i as u64 * 40_000, 31, raw));
    }
    tape.push(cc(8_000_000, 29, 1)); // LFO off, device reset
    tape
}

fn write_out(now_us: u64, messages: &[CcMessage], sent: &mut usize) {
    for message in messages {
        debug!("{:>9}us tx {:02X?}", now_us, message.to_bytes());
        *sent += 1;
    }
}

fn main() {
    Builder::from_env(Env::default().default_filter_or(LevelFilter::Info.to_string())).init();

    let seed = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x7EA0);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut decoder = CcDecoder::new();
    let mut controller = Controller::new(Profile::quartet());
    let mut led = StatusLed::new();

    let tape = tape();
    let mut next_entry = 0;
    let mut led_level = false;
    let mut sent = 0;

    let mut now_us = 0;
    while now_us < RUN_US {
        while next_entry < tape.len() && tape[next_entry].at_us <= now_us {
            for &byte in &tape[next_entry].bytes {
                controller.note_activity(now_us);
                if let Some(event) = decoder.feed(byte) {
                    info!(
                        "{:>9}us rx CC {} = {}",
                        now_us, event.controller, event.value
                    );
                    let out = controller.handle_event(event, now_us);
                    write_out(now_us, &out, &mut sent);
                }
            }
            next_entry += 1;
        }

        let out = controller.tick(now_us, &mut rng);
        write_out(now_us, &out, &mut sent);

        let level = led.poll(
            controller.is_active(),
            controller.last_input_us(),
            now_us,
        );
        if level != led_level {
            info!("{:>9}us led {}", now_us, if level { "on" } else { "off" });
            led_level = level;
        }

        now_us += TICK_US;
    }

    println!(
        "simulated {}s, sent {} CC messages (seed {seed})",
        RUN_US / 1_000_000,
        sent
    );
}
