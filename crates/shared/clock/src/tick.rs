use efm_core::Tick;

/// Fixed-length discrete simulation clock
///
/// Counts ticks `0 .. tmax`. Time only moves when the runner asks for the
/// next tick; there is no wall-clock coupling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    /// Next tick to hand out
    next: Tick,
    /// Number of ticks in the run
    tmax: Tick,
}

impl TickClock {
    pub fn new(tmax: Tick) -> Self {
        Self { next: 0, tmax }
    }

    /// Advance to the next tick, or `None` once the run is over
    pub fn next_tick(&mut self) -> Option<Tick> {
        if self.next >= self.tmax {
            return None;
        }
        let tick = self.next;
        self.next += 1;
        Some(tick)
    }

    /// Number of ticks already handed out
    pub fn elapsed(&self) -> Tick {
        self.next
    }

    pub fn remaining(&self) -> Tick {
        self.tmax - self.next
    }

    pub fn tmax(&self) -> Tick {
        self.tmax
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.tmax
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hands_out_every_tick_once() {
        let mut clock = TickClock::new(3);
        assert_eq!(clock.next_tick(), Some(0));
        assert_eq!(clock.next_tick(), Some(1));
        assert_eq!(clock.remaining(), 1);
        assert_eq!(clock.next_tick(), Some(2));
        assert_eq!(clock.next_tick(), None);
        assert!(clock.is_finished());
        assert_eq!(clock.elapsed(), 3);
        assert_eq!(clock.tmax(), 3);
    }

    #[test]
    fn test_zero_length_run() {
        let mut clock = TickClock::new(0);
        assert!(clock.is_finished());
        assert_eq!(clock.next_tick(), None);
    }
}
