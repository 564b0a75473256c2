/// Per-tick deltas for the two queues.
///
/// The main ("game") queue and the paused ("menu") queue run on separate
/// clocks so the menu can keep animating while the game is frozen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clocks {
    pub game_dt: f32,
    pub pause_dt: f32,
    frozen: bool,
}

impl Clocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive both deltas from the raw frame delta.
    ///
    /// `speed` is the auto-mode multiplier, `None` when auto mode is off.
    pub fn update(&mut self, raw_dt: f32, paused: bool, speed: Option<f32>) {
        let raw_dt = if raw_dt.is_finite() { raw_dt.max(0.0) } else { 0.0 };
        if self.frozen {
            self.game_dt = 0.0;
            self.pause_dt = 0.0;
        } else if paused {
            self.game_dt = 0.0;
            self.pause_dt = raw_dt;
        } else {
            let scaled = speed.map_or(raw_dt, |speed| raw_dt * speed);
            self.game_dt = scaled;
            self.pause_dt = scaled;
        }
    }

    /// Stop both clocks for good.
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.game_dt = 0.0;
        self.pause_dt = 0.0;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_clocks_match_raw_delta() {
        let mut clocks = Clocks::new();
        clocks.update(0.016, false, None);
        assert_eq!(clocks.game_dt, 0.016);
        assert_eq!(clocks.pause_dt, 0.016);
    }

    #[test]
    fn test_paused_zeroes_game_clock_only() {
        let mut clocks = Clocks::new();
        clocks.update(0.02, true, Some(4.0));
        assert_eq!(clocks.game_dt, 0.0);
        assert_eq!(clocks.pause_dt, 0.02);
    }

    #[test]
    fn test_auto_mode_scales_both_clocks() {
        let mut clocks = Clocks::new();
        clocks.update(0.5, false, Some(4.0));
        assert_eq!(clocks.game_dt, 2.0);
        assert_eq!(clocks.pause_dt, 2.0);
    }

    #[test]
    fn test_frozen_clocks_stay_zero() {
        let mut clocks = Clocks::new();
        clocks.freeze();
        clocks.update(1.0, false, None);
        assert!(clocks.is_frozen());
        assert_eq!(clocks.game_dt, 0.0);
        assert_eq!(clocks.pause_dt, 0.0);
    }

    #[test]
    fn test_negative_raw_delta_is_clamped() {
        let mut clocks = Clocks::new();
        clocks.update(-1.0, false, None);
        assert_eq!(clocks.game_dt, 0.0);
    }
}
