use std::time::Instant;

/// Maps wall-clock instants to logical media time.
///
/// The origin is pinned lazily at the first query. With a duration set, the
/// clock restarts from zero once media time reaches it, so playback loops
/// instead of running off the end.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    origin: Option<Instant>,
    duration: Option<f64>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock looping over `duration` seconds.
    pub fn with_duration(duration: f64) -> Self {
        Self {
            origin: None,
            duration: Some(duration),
        }
    }

    /// Re-pins the origin at the next query.
    pub fn reset(&mut self) {
        self.origin = None;
    }

    /// Current media time in seconds.
    pub fn media_time(&mut self) -> f64 {
        self.media_time_at(Instant::now())
    }

    fn media_time_at(&mut self, now: Instant) -> f64 {
        let origin = *self.origin.get_or_insert(now);
        let t = now.saturating_duration_since(origin).as_secs_f64();
        match self.duration {
            Some(d) if d > 0.0 && t >= d => {
                self.origin = Some(now);
                0.0
            }
            _ => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn origin_pins_at_first_query() {
        let mut clock = PlaybackClock::new();
        let t0 = Instant::now();
        assert_eq!(clock.media_time_at(t0), 0.0);
        let t = clock.media_time_at(t0 + Duration::from_millis(500));
        assert!((t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn loops_over_duration() {
        let mut clock = PlaybackClock::with_duration(2.0);
        let t0 = Instant::now();
        clock.media_time_at(t0);

        assert_eq!(clock.media_time_at(t0 + Duration::from_secs(2)), 0.0);
        // Origin moved to the restart point.
        let t = clock.media_time_at(t0 + Duration::from_millis(2500));
        assert!((t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn reset_repins_origin() {
        let mut clock = PlaybackClock::new();
        let t0 = Instant::now();
        clock.media_time_at(t0);
        clock.reset();
        assert_eq!(clock.media_time_at(t0 + Duration::from_secs(5)), 0.0);
    }
}
