//! Per-turn timing and usage statistics.

use std::fmt;
use std::time::Duration;

/// Counters accumulated while a single user turn is processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnStats {
    pub tool_calls: usize,
    pub tool_time: Duration,
    pub llm_calls: usize,
    pub llm_time: Duration,
    pub tokens: u64,
}

impl TurnStats {
    pub fn record_llm_call(&mut self, elapsed: Duration, total_tokens: u32) {
        self.llm_calls += 1;
        self.llm_time += elapsed;
        self.tokens += u64::from(total_tokens);
    }

    pub fn record_tool_call(&mut self, elapsed: Duration) {
        self.tool_calls += 1;
        self.tool_time += elapsed;
    }

    /// Pair these stats with the wall time of the whole turn for display.
    pub fn report(&self, total: Duration) -> TurnReport<'_> {
        TurnReport { stats: self, total }
    }
}

/// Stats line printed after every turn.
pub struct TurnReport<'a> {
    stats: &'a TurnStats,
    total: Duration,
}

impl fmt::Display for TurnReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waiting for: tools: {:.2?} ({:.0}%), LLM: {:.2?} ({:.0}%), total: {:.2?}. \
             Total calls: LLM {}, tools: {} tokens: {}",
            self.stats.tool_time,
            percent(self.stats.tool_time, self.total),
            self.stats.llm_time,
            percent(self.stats.llm_time, self.total),
            self.total,
            self.stats.llm_calls,
            self.stats.tool_calls,
            self.stats.tokens,
        )
    }
}

fn percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        return 0.0;
    }
    part.as_secs_f64() / total.as_secs_f64() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_accumulate() {
        let mut stats = TurnStats::default();
        stats.record_llm_call(Duration::from_millis(300), 120);
        stats.record_llm_call(Duration::from_millis(200), 80);
        stats.record_tool_call(Duration::from_millis(50));

        assert_eq!(stats.llm_calls, 2);
        assert_eq!(stats.llm_time, Duration::from_millis(500));
        assert_eq!(stats.tokens, 200);
        assert_eq!(stats.tool_calls, 1);
        assert_eq!(stats.tool_time, Duration::from_millis(50));
    }

    #[test]
    fn test_report_line() {
        let stats = TurnStats {
            tool_calls: 3,
            tool_time: Duration::from_secs(1),
            llm_calls: 2,
            llm_time: Duration::from_secs(3),
            tokens: 1500,
        };
        let line = stats.report(Duration::from_secs(4)).to_string();

        assert!(line.starts_with("waiting for: tools: 1.00s (25%), LLM: 3.00s (75%), total: 4.00s."));
        assert!(line.ends_with("Total calls: LLM 2, tools: 3 tokens: 1500"));
    }

    #[test]
    fn test_report_with_zero_total() {
        let line = TurnStats::default().report(Duration::ZERO).to_string();
        assert!(line.contains("(0%)"));
    }
}
