use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::LevelFilter;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use typedrill::{
    app::{App, Control},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    logging::{init_logging, set_log_level},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    source::DirectorySource,
};

/// typing practice on random text files from the current directory
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Picks a random .txt file from the working directory and scores your keystrokes against it. Finished sessions are summarized in statistics.txt."
)]
pub struct Cli {}

fn main() -> Result<(), Box<dyn Error>> {
    let _cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // Logging comes up before the config is read so config problems are logged.
    if let Some(log_path) = AppDirs::log_path() {
        if let Err(e) = init_logging(&log_path, LevelFilter::Info) {
            eprintln!("logging disabled: {e}");
        }
    }
    let store = FileConfigStore::new();
    let config = store.load();
    set_log_level(config.log_level_filter());
    log::info!("using config from {}", store.path().display());

    let provider = DirectorySource::scan(&config.source_dir, Some(&config.output_file))?;
    let ticker = FixedTicker::new(Duration::from_millis(config.tick_rate_ms.max(1)));
    let mut app = App::new(config, Box::new(provider));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), ticker);
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("exiting after error: {e}");
    }
    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        let (control, redraw) = app.on_event(runner.step());
        if control == Control::Quit {
            log::info!("quit requested");
            break;
        }
        if redraw {
            terminal.draw(|f| f.render_widget(&*app, f.area()))?;
        }
    }

    Ok(())
}
