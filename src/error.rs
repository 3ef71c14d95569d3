use std::io;
use std::path::PathBuf;

use crate::session::{Action, Phase};

/// Failures surfaced to the user while loading texts or finishing a session.
#[derive(Debug, thiserror::Error)]
pub enum TypingError {
    #[error("no .txt files found in {}", .dir.display())]
    NoSourceAvailable { dir: PathBuf },

    #[error("could not read {}: {source}", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not save statistics to {}: {source}", .path.display())]
    PersistenceFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot {action} while {from}")]
    InvalidTransition { from: Phase, action: Action },
}

pub type TypingResult<T> = Result<T, TypingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_path() {
        let err = TypingError::NoSourceAvailable {
            dir: PathBuf::from("/tmp/texts"),
        };
        assert_eq!(err.to_string(), "no .txt files found in /tmp/texts");

        let err = TypingError::PersistenceFailure {
            path: PathBuf::from("statistics.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "could not save statistics to statistics.txt: denied"
        );
    }

    #[test]
    fn invalid_transition_reads_naturally() {
        let err = TypingError::InvalidTransition {
            from: Phase::NotStarted,
            action: Action::Complete,
        };
        assert_eq!(err.to_string(), "cannot complete while not started");
    }
}
