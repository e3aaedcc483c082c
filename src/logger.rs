//! JSON structured logging implementation for embedgen

use chrono::{Local, Utc};
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable selecting the log level (e.g. "debug", "json:trace")
pub const LOG_LEVEL_ENV: &str = "EMBEDGEN_LOG_LEVEL";

/// Environment variable redirecting JSON records to a file
pub const LOG_PATH_ENV: &str = "EMBEDGEN_LOG_PATH";

/// Level used when nothing is configured
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: LevelFilter,
    target_file: Mutex<Option<std::fs::File>>,
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: LevelFilter, log_path: Option<String>) -> Self {
        let target_file = if let Some(path) = log_path {
            OpenOptions::new().create(true).append(true).open(path).ok()
        } else {
            None
        };

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Initialize the logger with specified level and source
    pub fn init_with_level(level_str: &str, source: &str) -> (String, String) {
        let log_path = env::var(LOG_PATH_ENV).ok();
        let (use_json, actual_level) = split_level(level_str);

        if !use_json {
            // Use standard env_logger with a timestamped prefix
            env_logger::Builder::new()
                .filter_level(parse_level_filter(actual_level))
                .format(|buf, record| {
                    use std::io::Write;

                    write!(
                        buf,
                        "[{} {} {}] ",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target()
                    )?;
                    writeln!(buf, "{}", record.args())
                })
                .init();
            return (actual_level.to_string(), source.to_string());
        }

        let level = parse_level_filter(actual_level);
        if level == LevelFilter::Off {
            log::set_max_level(LevelFilter::Off);
            return (actual_level.to_string(), source.to_string());
        }
        let logger = Box::new(JsonLogger::new(level, log_path));

        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return (actual_level.to_string(), source.to_string());
        }

        log::set_max_level(level);
        (actual_level.to_string(), source.to_string())
    }

    /// Initialize from EMBEDGEN_LOG_LEVEL, defaulting to warnings only
    pub fn init() {
        let log_level = env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
        Self::init_with_level(&log_level, LOG_LEVEL_ENV);
    }
}

/// Split "json:debug" style level strings into (json?, level)
fn split_level(level_str: &str) -> (bool, &str) {
    if let Some(stripped) = level_str.strip_prefix("json:") {
        (true, stripped)
    } else if level_str == "json" {
        (true, "info")
    } else {
        (false, level_str)
    }
}

fn parse_level_filter(level: &str) -> LevelFilter {
    match level {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.write_line(&format_record(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut guard) = self.target_file.lock() {
            if let Some(file) = guard.as_mut() {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

impl JsonLogger {
    /// Append one line to the log file, or stderr when there is none
    fn write_line(&self, line: &str) {
        let mut guard = self.target_file.lock().ok();
        match guard.as_mut().and_then(|g| g.as_mut()) {
            Some(file) => {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
            }
            None => {
                let mut stderr = io::stderr().lock();
                let _ = stderr.write_all(line.as_bytes());
                let _ = stderr.flush();
            }
        }
    }
}

/// One JSON object per record, newline terminated
fn format_record(record: &Record<'_>) -> String {
    let entry = json!({
        "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
        "@level": record.level().as_str().to_lowercase(),
        "@message": record.args().to_string(),
        "@module": record.target(),
        "@tool": "embedgen",
        "@pid": std::process::id(),
        "@file": record.file().unwrap_or("unknown"),
        "@line": record.line().unwrap_or(0),
    });
    let mut line = serde_json::to_string(&entry).unwrap_or_default();
    line.push('\n');
    line
}
