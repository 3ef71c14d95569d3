use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typedrill::app::{App, Control, COMPLETE_KEY, PAUSE_KEY, RESUME_KEY};
use typedrill::config::Config;
use typedrill::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use typedrill::source::FixedSource;
use typedrill::Phase;

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless integration using the internal runtime + App without a TTY
// Verifies that a typing flow completes via Runner/TestEventSource.
#[test]
fn headless_typing_flow_completes() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        output_file: dir.path().join("statistics.txt"),
        ..Config::default()
    };
    let mut app = App::new(config, Box::new(FixedSource::new("abc")));

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    // Producer: start, type with one mistake, save, close the popup, leave
    for ev in [
        key(KeyCode::Enter),
        key(KeyCode::Char('a')),
        key(KeyCode::Char('x')),
        key(KeyCode::Char('b')),
        key(KeyCode::Char('c')),
        key(COMPLETE_KEY),
        key(KeyCode::Enter),
        key(KeyCode::Esc),
    ] {
        tx.send(ev).unwrap();
    }

    let mut quit = false;
    for _ in 0..100u32 {
        let (control, _) = app.on_event(runner.step());
        if control == Control::Quit {
            quit = true;
            break;
        }
    }

    assert!(quit, "app should have quit on escape");
    let snap = app.snapshot().unwrap();
    assert_eq!(snap.phase, Phase::Completed);
    assert_eq!(snap.cursor, 3);
    assert_eq!(snap.stats.total_chars, 4);
    assert_eq!(snap.stats.errors, 1);
    assert_eq!(snap.stats.most_common_error, Some('b'));

    let report = std::fs::read_to_string(dir.path().join("statistics.txt")).unwrap();
    let labels: Vec<&str> = report
        .lines()
        .map(|l| l.split(": ").next().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec!["Total Chars", "Errors", "Most Common Error", "Keystrokes per Second"]
    );
}

#[test]
fn headless_pause_stops_clock_and_input() {
    let mut app = App::new(Config::default(), Box::new(FixedSource::new("hello")));

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Char('h'))).unwrap();
    tx.send(key(PAUSE_KEY)).unwrap();
    tx.send(key(KeyCode::Char('e'))).unwrap();

    for _ in 0..4 {
        app.on_event(runner.step());
    }
    assert_eq!(app.snapshot().unwrap().phase, Phase::Paused);

    // Ticks while paused do not ask for redraws and do not move the clock
    let frozen = app.snapshot().unwrap().stats.elapsed;
    for _ in 0..5 {
        let (_, redraw) = app.on_event(runner.step());
        assert!(!redraw);
    }
    let snap = app.snapshot().unwrap();
    assert_eq!(snap.stats.elapsed, frozen);
    assert_eq!(snap.cursor, 1);
    assert_eq!(snap.stats.total_chars, 1);

    tx.send(key(RESUME_KEY)).unwrap();
    tx.send(key(KeyCode::Char('e'))).unwrap();
    app.on_event(runner.step());
    app.on_event(runner.step());

    let snap = app.snapshot().unwrap();
    assert_eq!(snap.phase, Phase::Running);
    assert_eq!(snap.cursor, 2);
    let (_, redraw) = app.on_event(AppEvent::Tick);
    assert!(redraw);
}
