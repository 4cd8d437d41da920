//! Line protocol
//!
//! One command per line on stdin, one reply line on stdout:
//!
//! ```text
//! check <username>      → available | invalid: <reason> | taken: a, b, c | error: <msg>
//! register <username>   → same replies as check
//! stats                 → filter and metrics summary
//! quit                  → persist and exit
//! ```

use thiserror::Error;
use username_filter::{AcceptedVia, AvailabilityResult, MetricsSnapshot};

/// A parsed protocol line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Check(String),
    Register(String),
    Stats,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("{0} needs a username")]
    MissingUsername(&'static str),
}

impl Command {
    /// Parse one line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "check" => Self::Check(username_arg("check", rest)?),
            "register" => Self::Register(username_arg("register", rest)?),
            "stats" => Self::Stats,
            "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(Some(command))
    }
}

// The rest of the line is the username, so embedded spaces reach the
// format rules and get reported there.
fn username_arg(verb: &'static str, rest: &str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingUsername(verb));
    }
    Ok(rest.to_string())
}

/// Reply line for a check or registration
pub fn render_result(result: &AvailabilityResult) -> String {
    match result {
        AvailabilityResult::Available(AcceptedVia::FilterMiss) => "available".to_string(),
        AvailabilityResult::Available(AcceptedVia::LookupConfirmed) => {
            "available (confirmed)".to_string()
        }
        AvailabilityResult::InvalidFormat(violation) => format!("invalid: {}", violation),
        AvailabilityResult::Unavailable { suggestions } => {
            format!("taken: {}", suggestions.join(", "))
        }
        AvailabilityResult::CheckFailed(message) => format!("error: {}", message),
    }
}

/// Filter occupancy as reported by `stats`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterStats {
    pub size_bits: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub false_positive_probability: f64,
}

/// Reply line for `stats`
pub fn render_stats(filter: &FilterStats, metrics: &MetricsSnapshot) -> String {
    format!(
        "m={} k={} bits_set={} est_fpr={:.6} probes={} fast_path={} lookups={} taken={} false_positives={} failures={} registrations={}",
        filter.size_bits,
        filter.hash_count,
        filter.bits_set,
        filter.false_positive_probability,
        metrics.probes,
        metrics.filter_negatives,
        metrics.lookups,
        metrics.confirmed_taken,
        metrics.false_positives,
        metrics.lookup_failures,
        metrics.registrations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use username_filter::FormatViolation;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("check johndoe"),
            Ok(Some(Command::Check("johndoe".to_string())))
        );
        assert_eq!(
            Command::parse("  REGISTER   night_owl  "),
            Ok(Some(Command::Register("night_owl".to_string())))
        );
        assert_eq!(Command::parse("stats"), Ok(Some(Command::Stats)));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn test_parse_keeps_inner_spaces_for_validation() {
        assert_eq!(
            Command::parse("check john doe"),
            Ok(Some(Command::Check("john doe".to_string())))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("check"),
            Err(CommandError::MissingUsername("check"))
        );
        assert_eq!(
            Command::parse("delete johndoe"),
            Err(CommandError::Unknown("delete".to_string()))
        );
    }

    #[test]
    fn test_render_results() {
        assert_eq!(
            render_result(&AvailabilityResult::Available(AcceptedVia::FilterMiss)),
            "available"
        );
        assert_eq!(
            render_result(&AvailabilityResult::InvalidFormat(FormatViolation::Reserved)),
            "invalid: This username is reserved and cannot be used"
        );
        assert_eq!(
            render_result(&AvailabilityResult::Unavailable {
                suggestions: vec!["johndoe1".to_string(), "johndoe2".to_string()]
            }),
            "taken: johndoe1, johndoe2"
        );
        assert_eq!(
            render_result(&AvailabilityResult::CheckFailed("timed out".to_string())),
            "error: timed out"
        );
    }

    #[test]
    fn test_render_stats() {
        let filter = FilterStats {
            size_bits: 959,
            hash_count: 7,
            bits_set: 14,
            false_positive_probability: 0.0,
        };
        let metrics = MetricsSnapshot {
            probes: 3,
            filter_negatives: 2,
            ..Default::default()
        };

        let line = render_stats(&filter, &metrics);
        assert!(line.starts_with("m=959 k=7 bits_set=14"));
        assert!(line.contains("probes=3 fast_path=2"));
    }
}
