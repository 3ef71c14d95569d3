use std::fs;
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use typedrill::session::{Keystroke, Session};
use typedrill::source::{DirectorySource, SourceProvider, SourceText};
use typedrill::typing_policy::Outcome;
use typedrill::{Phase, TypingError};

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn zero_mistake_run_over_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let text = "The quick brown fox\njumps over the lazy dog.\n";
    fs::write(dir.path().join("fox.txt"), text).unwrap();

    let mut provider = DirectorySource::scan(dir.path(), None).unwrap();
    let mut session = Session::reload(&mut provider).unwrap();
    for c in text.chars() {
        assert_matches!(
            session.judge_keystroke(c),
            Keystroke::Judged {
                outcome: Outcome::Correct,
                ..
            }
        );
    }

    let n = text.chars().count();
    let stats = session.statistics();
    assert_eq!(stats.total_chars(), n);
    assert_eq!(session.cursor(), n);
    assert_eq!(stats.errors(), 0);
    assert_eq!(stats.most_common_error(), None);
    assert_eq!(session.snapshot().source_name.as_deref(), Some("fox.txt"));
}

#[test]
fn pause_gap_is_not_counted() {
    let t0 = Instant::now();
    let mut session = Session::new(SourceText::new("some text"));

    session.start_at(t0).unwrap();
    session.pause_at(t0 + secs(5)).unwrap();
    session.resume_at(t0 + secs(15)).unwrap();

    assert_eq!(session.elapsed_at(t0 + secs(15)), secs(5));
}

#[test]
fn rate_is_total_over_active_time() {
    let t0 = Instant::now();
    let text: String = "a".repeat(100);
    let mut session = Session::new(SourceText::new(&text));
    let dir = tempfile::tempdir().unwrap();

    session.start_at(t0).unwrap();
    for _ in 0..100 {
        session.judge_keystroke_at('a', t0 + secs(10));
    }
    session.pause_at(t0 + secs(20)).unwrap();
    session.resume_at(t0 + secs(80)).unwrap();
    let summary = session
        .complete_at(&dir.path().join("statistics.txt"), t0 + secs(110))
        .unwrap();

    assert_eq!(summary.elapsed, secs(50));
    assert_eq!(summary.keystrokes_per_second, 2.0);
}

#[test]
fn completion_overwrites_previous_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("statistics.txt");
    fs::write(dir.path().join("a.txt"), "ab").unwrap();
    let mut provider = DirectorySource::scan(dir.path(), Some(&out)).unwrap();

    let mut first = Session::reload(&mut provider).unwrap();
    for c in "xxab".chars() {
        first.judge_keystroke(c);
    }
    first.complete(&out).unwrap();
    assert!(fs::read_to_string(&out).unwrap().contains("Errors: 2"));

    let mut second = Session::reload(&mut provider).unwrap();
    for c in "ab".chars() {
        second.judge_keystroke(c);
    }
    second.complete(&out).unwrap();

    let report = fs::read_to_string(&out).unwrap();
    assert_eq!(report.lines().count(), 4);
    assert!(report.contains("Total Chars: 2\n"));
    assert!(report.contains("Errors: 0\n"));
    assert!(report.contains("Most Common Error: None\n"));
}

#[test]
fn report_file_is_never_offered_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("statistics.txt");
    fs::write(&out, "Total Chars: 3\n").unwrap();

    let mut provider = DirectorySource::scan(dir.path(), Some(&out)).unwrap();
    assert_matches!(
        provider.load_random(),
        Err(TypingError::NoSourceAvailable { .. })
    );
}

#[test]
fn reload_discards_progress() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("one.txt"), "one").unwrap();
    let mut provider = DirectorySource::scan(dir.path(), None).unwrap();

    let mut session = Session::reload(&mut provider).unwrap();
    session.judge_keystroke('o');
    session.judge_keystroke('x');
    session.pause().unwrap();

    let session = Session::reload(&mut provider).unwrap();
    assert_eq!(session.phase(), Phase::NotStarted);
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.statistics().total_chars(), 0);
    assert!(!session.timer().has_started());
}
