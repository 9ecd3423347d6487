//! `log` backend for the browser console.
//!
//! Records go to `console.log` / `console.warn` / `console.error` by level.
//! Native builds (tests) print to stderr instead. Debug builds also emit
//! `debug!` records; release builds stop at `info!`.

use log::{Level, Log, Metadata, Record};

struct ConsoleLogger {
    level: Level,
}

static LOGGER: ConsoleLogger = ConsoleLogger {
    level: if cfg!(debug_assertions) {
        Level::Debug
    } else {
        Level::Info
    },
};

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record);
        emit(record.level(), &line);
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = line.into();
    match level {
        Level::Error => web_sys::console::error_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Install the console logger. Safe to call more than once.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOGGER.level.to_level_filter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn level_follows_build_profile() {
        let trace = Metadata::builder().level(Level::Trace).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!LOGGER.enabled(&trace));
        assert_eq!(LOGGER.enabled(&debug), cfg!(debug_assertions));
        assert!(LOGGER.enabled(&warn));
    }

    #[test]
    fn record_includes_level_and_target() {
        let line = format_record(
            &Record::builder()
                .level(Level::Info)
                .target("mash")
                .args(format_args!("saved {} entries", 3))
                .build(),
        );
        assert_eq!(line, "[INFO] mash: saved 3 entries");
    }

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        let expected = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        assert_eq!(log::max_level(), expected);
    }
}
