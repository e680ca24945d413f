use std::time::{Duration, Instant};

/// 啟動後這段時間內就執行到的指令，視為沒有人在操作
pub const NON_INTERACTIVE_THRESHOLD: Duration = Duration::from_secs(1);

/// Guesses whether the command runs unattended, from how quickly it got here
/// after `started_at`. Piped or scripted runs reach this point almost
/// immediately, a person answering prompts does not.
pub fn non_interactive_since(started_at: Instant, now: Instant) -> bool {
    now.saturating_duration_since(started_at) < NON_INTERACTIVE_THRESHOLD
}

pub fn non_interactive_check(started_at: Instant) -> bool {
    non_interactive_since(started_at, Instant::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_start_is_non_interactive() {
        assert!(non_interactive_check(Instant::now()));
    }

    #[test]
    fn threshold_is_exclusive() {
        let start = Instant::now();
        assert!(non_interactive_since(start, start + Duration::from_millis(999)));
        assert!(!non_interactive_since(start, start + NON_INTERACTIVE_THRESHOLD));
        assert!(!non_interactive_since(start, start + Duration::from_secs(5)));
    }

    #[test]
    fn clock_before_start_counts_as_immediate() {
        let now = Instant::now();
        let start = now + Duration::from_millis(10);
        assert!(non_interactive_since(start, now));
    }
}
