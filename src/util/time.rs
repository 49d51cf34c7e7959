/// Get the current time in seconds since the UNIX epoch
pub fn current_time_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}

/// Milliseconds since the UNIX epoch; used for export names
pub fn now_millis() -> u64 {
    (current_time_secs() * 1000.0) as u64
}

/// Monotonic milliseconds since the session started. Drives stroke
/// timestamps and the replay clock, so wall-clock jumps cannot reorder them.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: std::time::Instant,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock {
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Split a duration into whole minutes and remaining whole seconds
pub fn minutes_seconds(duration_ms: u64) -> (u64, u64) {
    let total_secs = duration_ms / 1000;
    (total_secs / 60, total_secs % 60)
}

/// `"3M 07S"` style label for the export footer
pub fn duration_label(duration_ms: u64) -> String {
    let (minutes, seconds) = minutes_seconds(duration_ms);
    format!("{minutes}M {seconds:02}S")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_to_whole_seconds() {
        assert_eq!(minutes_seconds(0), (0, 0));
        assert_eq!(minutes_seconds(59_999), (0, 59));
        assert_eq!(minutes_seconds(125_400), (2, 5));
        assert_eq!(duration_label(125_400), "2M 05S");
    }

    #[test]
    fn session_clock_never_runs_backwards() {
        let clock = SessionClock::new();
        let mut last = clock.elapsed_ms();
        for _ in 0..1000 {
            let now = clock.elapsed_ms();
            assert!(now >= last);
            last = now;
        }
    }
}
