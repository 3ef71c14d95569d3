use std::fs;
use std::path::Path;

use log::LevelFilter;

/// Route `log` records to `path`.
///
/// The terminal belongs to the UI, so nothing is ever written to stdout or
/// stderr from here. The dispatch itself passes everything; `level` only sets
/// the global maximum, which [`set_log_level`] can move later.
pub fn init_logging(path: &Path, level: LevelFilter) -> Result<(), fern::InitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Trace)
        .chain(fern::log_file(path)?)
        .apply()?;
    set_log_level(level);

    log::debug!("logging to {}", path.display());
    Ok(())
}

/// Adjust verbosity once the configured level is known.
pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigStore, FileConfigStore};
    use tempfile::tempdir;

    // The global logger can only be installed once per process, so every
    // logging assertion lives in this one test.
    #[test]
    fn writes_records_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("typedrill.log");

        init_logging(&path, LevelFilter::Info).unwrap();
        log::info!("hello from the log test");
        log::debug!("debug before the level change");

        let config_path = dir.path().join("config.json");
        fs::write(&config_path, "{ not json").unwrap();
        let config = FileConfigStore::with_path(&config_path).load();
        assert_eq!(config, Config::default());

        set_log_level(LevelFilter::Debug);
        log::debug!("debug after the level change");
        log::logger().flush();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("hello from the log test"));
        assert!(contents.contains("INFO"));
        assert!(contents.contains("ignoring invalid config"));
        assert!(!contents.contains("debug before the level change"));
        assert!(contents.contains("debug after the level change"));
    }
}
