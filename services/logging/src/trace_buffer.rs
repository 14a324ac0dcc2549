//! Bounded, append-only trace log with soft/hard render limits
//!
//! spec.md §4.1. Rendering cannot be a simple prefix slice: when the soft
//! limit lands inside a WARN/ERROR line, rendering must extend to the end of
//! that line before truncating. We therefore record each event's rendered
//! text up front and locate the crossing point by walking cumulative offsets
//! at render time (spec.md §9's "per-event offsets" note).

use chrono::{DateTime, Utc};
use tracing::Level;

const SOFT_SUFFIX: &str = "...(soft trace limit reached)\n";
const HARD_SUFFIX: &str = "...(hard trace limit reached)";

/// Largest prefix of `s` that is at most `max_bytes` long and ends on a
/// UTF-8 character boundary.
fn safe_prefix(s: &str, max_bytes: usize) -> &str {
    let mut cut = max_bytes.min(s.len());
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    &s[..cut]
}

struct TraceEvent {
    level: Level,
    text: String,
}

/// Append-only buffer of rendered trace lines for one action.
#[derive(Default)]
pub struct TraceBuffer {
    events: Vec<TraceEvent>,
}

impl TraceBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one logging event. `throwable`, if present, is rendered on
    /// the lines following the message (already formatted by the caller).
    pub fn append(
        &mut self,
        timestamp: DateTime<Utc>,
        level: Level,
        logger: &str,
        message: &str,
        throwable: Option<&str>,
    ) {
        let mut text = format!("{} {level} {logger} - {message}\n", timestamp.format("%H:%M:%S%.3f"));
        if let Some(tb) = throwable {
            for line in tb.lines() {
                text.push_str(line);
                text.push('\n');
            }
        }
        self.events.push(TraceEvent { level, text });
    }

    /// `true` if any appended event was at `WARN` severity or worse.
    /// `tracing::Level`'s ordering puts `ERROR` below `WARN`, so "at least as
    /// severe as WARN" is `level <= Level::WARN`.
    #[must_use]
    pub fn has_warning(&self) -> bool {
        self.events.iter().any(|e| e.level <= Level::WARN)
    }

    /// Renders the buffer per the soft/hard limit rules in spec.md §4.1.
    #[must_use]
    pub fn render(&self, soft_limit: usize, hard_limit: usize) -> String {
        let total_len: usize = self.events.iter().map(|e| e.text.len()).sum();
        if total_len <= soft_limit {
            let mut out = String::with_capacity(total_len);
            for e in &self.events {
                out.push_str(&e.text);
            }
            return out;
        }

        let mut out = String::new();
        let mut offset = 0usize;
        for e in &self.events {
            let event_end = offset + e.text.len();
            if offset >= soft_limit {
                // Already past the soft limit before this event started;
                // nothing from here on can matter.
                break;
            }
            if event_end <= soft_limit {
                out.push_str(&e.text);
                offset = event_end;
                continue;
            }

            // The soft limit falls inside this event's text.
            if e.level <= Level::WARN {
                // Extend through the full warning/error line.
                if event_end > hard_limit {
                    let take = hard_limit.saturating_sub(offset);
                    out.push_str(safe_prefix(&e.text, take));
                    out.push_str(HARD_SUFFIX);
                } else {
                    out.push_str(&e.text);
                    out.push_str(SOFT_SUFFIX);
                }
            } else {
                let take = soft_limit - offset;
                out.push_str(safe_prefix(&e.text, take));
                out.push_str(SOFT_SUFFIX);
            }
            return out;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn renders_everything_under_soft_limit() {
        let mut buf = TraceBuffer::new();
        buf.append(ts(), Level::INFO, "app", "hello", None);
        let rendered = buf.render(10_000, 1_000_000);
        assert!(rendered.contains("hello"));
        assert!(!rendered.contains("soft trace limit"));
    }

    #[test]
    fn truncates_exactly_at_soft_limit_without_warning() {
        let mut buf = TraceBuffer::new();
        for _ in 0..50 {
            buf.append(ts(), Level::INFO, "app", "0123456789", None);
        }
        let rendered = buf.render(100, 1_000_000);
        assert_eq!(rendered.len(), 100 + "...(soft trace limit reached)\n".len());
    }

    #[test]
    fn extends_through_warning_line_before_soft_suffix() {
        let mut buf = TraceBuffer::new();
        buf.append(ts(), Level::INFO, "app", "0123456789", None);
        buf.append(ts(), Level::WARN, "app", "0123456789", None);
        let rendered = buf.render(5, 1_000_000);
        // Must contain the full warning line, not a mid-line cut.
        assert!(rendered.contains("WARN app - 0123456789\n"));
        assert!(rendered.ends_with("...(soft trace limit reached)\n"));
    }

    #[test]
    fn falls_back_to_hard_suffix_when_warning_extension_exceeds_hard_limit() {
        let mut buf = TraceBuffer::new();
        buf.append(ts(), Level::WARN, "app", "0123456789012345678901234567890", None);
        let rendered = buf.render(2, 10);
        assert!(rendered.ends_with(HARD_SUFFIX));
        assert_eq!(rendered.len(), 10 + HARD_SUFFIX.len());
    }

    #[test]
    fn has_warning_detects_error_too() {
        let mut buf = TraceBuffer::new();
        assert!(!buf.has_warning());
        buf.append(ts(), Level::ERROR, "app", "boom", None);
        assert!(buf.has_warning());
    }
}
