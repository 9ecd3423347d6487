//! Fixed-timestep clock.
//!
//! `draw_web()` fires once per animation frame with a variable gap between
//! frames. The clock turns wall-clock timestamps into a whole number of game
//! ticks so counting playback advances at the same pace on every device.

/// Frame gaps longer than this (a backgrounded tab) are clamped.
const MAX_FRAME_GAP_MS: f64 = 500.0;

pub struct TickClock {
    ms_per_tick: f64,
    /// Milliseconds not yet consumed as ticks.
    carry_ms: f64,
    last_ms: Option<f64>,
    pub total_ticks: u64,
}

impl TickClock {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            carry_ms: 0.0,
            last_ms: None,
            total_ticks: 0,
        }
    }

    /// Feed the current timestamp; returns the ticks that elapsed since the
    /// previous call. The first call only records the timestamp.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let gap = self
            .last_ms
            .map_or(0.0, |prev| (now_ms - prev).clamp(0.0, MAX_FRAME_GAP_MS));
        self.last_ms = Some(now_ms);

        self.carry_ms += gap;
        let ticks = (self.carry_ms / self.ms_per_tick) as u32;
        self.carry_ms -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_yields_nothing() {
        let mut clock = TickClock::new(10);
        assert_eq!(clock.advance(1234.0), 0);
    }

    #[test]
    fn whole_ticks_and_remainder() {
        let mut clock = TickClock::new(10);
        clock.advance(0.0);
        assert_eq!(clock.advance(250.0), 2);
        // 50ms carried + 50ms gap = one more tick
        assert_eq!(clock.advance(300.0), 1);
        assert_eq!(clock.total_ticks, 3);
    }

    #[test]
    fn backgrounded_tab_is_clamped() {
        let mut clock = TickClock::new(10);
        clock.advance(0.0);
        assert_eq!(clock.advance(60_000.0), 5);
    }

    #[test]
    fn time_going_backwards_is_ignored() {
        let mut clock = TickClock::new(10);
        clock.advance(1000.0);
        assert_eq!(clock.advance(900.0), 0);
        assert_eq!(clock.advance(1000.0), 1);
    }

    #[test]
    fn sixty_fps_for_one_second() {
        let mut clock = TickClock::new(10);
        clock.advance(0.0);
        let total: u32 = (1..=60).map(|i| clock.advance(i as f64 * 16.667)).sum();
        assert!((9..=11).contains(&total), "got {total}");
    }
}
