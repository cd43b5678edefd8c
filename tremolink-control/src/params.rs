/// Remaps a raw expression-pedal value to a target volume.
///
/// The pedal's usable travel starts at `floor` (a Hotone-style pedal never
/// reports below ~31), and the mapping is inverted: heel down (raw = floor)
/// means full volume, toe down (raw = 127) means silence. Raw values below
/// the floor clamp to the floor so the map never extrapolates.
pub fn expression_to_target(raw: u8, floor: u8) -> u8 {
    let r = raw.clamp(floor, 127) as i32;
    let mapped = (r - floor as i32) * 127 / (127 - floor as i32);
    (127 - mapped) as u8
}

/// The most recent expression-derived target volume, read by every
/// generator.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamStore {
    target_volume: u8,
    floor: u8,
}

impl ParamStore {
    /// Starts at full volume so the pass-through modes are audible before
    /// the pedal first moves.
    pub fn new(expression_floor: u8) -> Self {
        Self {
            target_volume: 127,
            floor: expression_floor,
        }
    }

    pub fn set_expression(&mut self, raw: u8) {
        self.target_volume = expression_to_target(raw, self.floor);
    }

    pub fn target_volume(&self) -> u8 {
        self.target_volume
    }
}
