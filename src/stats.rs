use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use itertools::Itertools;

use crate::error::{TypingError, TypingResult};
use crate::typing_policy::Outcome;

/// Running counters for one session.
///
/// Mistakes are attributed to the character that was expected, and the
/// per-character counts keep the order in which each character was first
/// missed so ties resolve deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    total_chars: usize,
    errors: usize,
    error_counts: Vec<(char, usize)>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, expected: char, outcome: Outcome) {
        self.total_chars += 1;
        if outcome == Outcome::Incorrect {
            self.errors += 1;
            match self.error_counts.iter_mut().find(|(c, _)| *c == expected) {
                Some((_, count)) => *count += 1,
                None => self.error_counts.push((expected, 1)),
            }
        }
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn correct(&self) -> usize {
        self.total_chars - self.errors
    }

    pub fn error_count(&self, c: char) -> usize {
        self.error_counts
            .iter()
            .find(|(e, _)| *e == c)
            .map_or(0, |(_, n)| *n)
    }

    /// Highest mistake count; on a tie the character missed first wins.
    pub fn most_common_error(&self) -> Option<(char, usize)> {
        self.error_counts
            .iter()
            .fold(None, |best: Option<(char, usize)>, &(c, n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((c, n)),
            })
    }

    /// Every mistyped character, most frequent first.
    pub fn error_breakdown(&self) -> Vec<(char, usize)> {
        self.error_counts
            .iter()
            .copied()
            .sorted_by(|a, b| b.1.cmp(&a.1))
            .collect()
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_chars == 0 {
            return 0.0;
        }
        (self.correct() as f64 / self.total_chars as f64) * 100.0
    }

    pub fn summary(&self, elapsed: Duration) -> StatsSummary {
        let most_common = self.most_common_error();
        StatsSummary {
            total_chars: self.total_chars,
            errors: self.errors,
            most_common_error: most_common.map(|(c, _)| c),
            most_common_error_count: most_common.map_or(0, |(_, n)| n),
            keystrokes_per_second: keystrokes_per_second(self.total_chars, elapsed),
            accuracy: self.accuracy(),
            elapsed,
            error_breakdown: self.error_breakdown(),
        }
    }
}

/// Judged keystrokes per second of active time; zero when no time has passed.
pub fn keystrokes_per_second(total_chars: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        total_chars as f64 / secs
    } else {
        0.0
    }
}

/// Readable label for characters that would otherwise be invisible.
pub fn char_label(c: char) -> String {
    match c {
        ' ' => "SPACE".to_string(),
        '\n' => "NEWLINE".to_string(),
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

/// Frozen view of the statistics at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSummary {
    pub total_chars: usize,
    pub errors: usize,
    pub most_common_error: Option<char>,
    pub most_common_error_count: usize,
    pub keystrokes_per_second: f64,
    pub accuracy: f64,
    pub elapsed: Duration,
    pub error_breakdown: Vec<(char, usize)>,
}

impl StatsSummary {
    /// The `Label: value` pairs that make up the saved report.
    pub fn report_lines(&self) -> [(&'static str, String); 4] {
        [
            ("Total Chars", self.total_chars.to_string()),
            ("Errors", self.errors.to_string()),
            (
                "Most Common Error",
                self.most_common_error
                    .map_or_else(|| "None".to_string(), char_label),
            ),
            (
                "Keystrokes per Second",
                format!("{:.2}", self.keystrokes_per_second),
            ),
        ]
    }

    /// Write the report, replacing whatever was at `path`.
    pub fn write_to(&self, path: &Path) -> TypingResult<()> {
        fs::write(path, self.to_string()).map_err(|source| TypingError::PersistenceFailure {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("saved session statistics to {}", path.display());
        Ok(())
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.report_lines() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}
