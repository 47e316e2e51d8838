//! User presence heuristics: idle-time status line and greeting.

/// Idle time after which the system counts as unattended.
pub const IDLE_THRESHOLD_SECS: u64 = 3600;

/// Idle time below which the user counts as active.
pub const ACTIVE_THRESHOLD_SECS: u64 = 300;

/// Status sentence injected into the prompt for a given idle time.
#[must_use]
pub const fn idle_status(idle_secs: u64) -> &'static str {
    if idle_secs >= IDLE_THRESHOLD_SECS {
        "The system has been idle for a long time."
    } else if idle_secs < ACTIVE_THRESHOLD_SECS {
        "The user has been actively using the system."
    } else {
        "The user might be away or taking a short break."
    }
}

/// Time-of-day greeting for a local hour (0-23).
#[must_use]
pub const fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_status_thresholds() {
        assert_eq!(idle_status(0), "The user has been actively using the system.");
        assert_eq!(idle_status(299), "The user has been actively using the system.");
        assert_eq!(idle_status(300), "The user might be away or taking a short break.");
        assert_eq!(idle_status(3599), "The user might be away or taking a short break.");
        assert_eq!(idle_status(3600), "The system has been idle for a long time.");
    }

    #[test]
    fn test_greeting_for_hour() {
        assert_eq!(greeting_for_hour(4), "Good evening");
        assert_eq!(greeting_for_hour(5), "Good morning");
        assert_eq!(greeting_for_hour(11), "Good morning");
        assert_eq!(greeting_for_hour(12), "Good afternoon");
        assert_eq!(greeting_for_hour(17), "Good afternoon");
        assert_eq!(greeting_for_hour(18), "Good evening");
        assert_eq!(greeting_for_hour(23), "Good evening");
    }
}
