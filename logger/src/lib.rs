use chrono::Utc;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Severity of a log line. Ordered from least to most severe so a
/// logger can drop everything below its minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Blue => "\x1b[34m",
            Color::Yellow => "\x1b[33m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
            Color::White => "\x1b[37m",
        }
    }
}

/// Session logger for the tour.
///
/// Every line goes to the session log file (when there is one) and,
/// if the caller asks for it, to the console with ANSI colors. Cloning
/// is cheap: clones share the same file path.
#[derive(Debug, Clone)]
pub struct Logger {
    log_file: Option<PathBuf>,
    min_level: Level,
    console_enabled: bool,
}

impl Logger {
    /// Creates a file-backed logger.
    ///
    /// # Parameters
    /// - `log_dir`: Existing directory where the log file is created.
    /// - `session`: Name of the session, used as the log file stem.
    ///
    /// # Returns
    /// A new `Logger` writing to `<log_dir>/<session>.log`. The file is
    /// truncated if it already exists.
    pub fn new(log_dir: &Path, session: &str) -> Result<Self, LoggerError> {
        if !log_dir.is_dir() {
            return Err(LoggerError::InvalidPath(format!(
                "{} is not a directory",
                log_dir.display()
            )));
        }

        let log_file = log_dir.join(format!("{}.log", sanitize(session)));

        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&log_file)
            .map_err(LoggerError::from)?;

        Ok(Logger {
            log_file: Some(log_file),
            min_level: Level::Info,
            console_enabled: true,
        })
    }

    /// A logger without a backing file; lines only reach the console.
    pub fn console() -> Self {
        Logger {
            log_file: None,
            min_level: Level::Info,
            console_enabled: true,
        }
    }

    /// A logger that drops everything.
    pub fn silent() -> Self {
        Logger {
            log_file: None,
            min_level: Level::Error,
            console_enabled: false,
        }
    }

    /// Returns the same logger with a different minimum level.
    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level && (self.console_enabled || self.log_file.is_some())
    }

    fn log(
        &self,
        level: Level,
        color: Option<Color>,
        message: &str,
        to_console: bool,
    ) -> Result<(), LoggerError> {
        if !self.enabled(level) {
            return Ok(());
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let log_message = format!("[{}] [{}]: {}\n", level.tag(), timestamp, message);

        if to_console && self.console_enabled {
            let ansi = match (level, color) {
                (Level::Info, Some(color)) => color.to_ansi_code(),
                (Level::Debug, _) => "\x1b[90m", // Grey
                (Level::Warn, _) => "\x1b[93m",  // Bright Yellow
                (Level::Error, _) => "\x1b[91m", // Bright Red
                (Level::Info, None) => Color::White.to_ansi_code(),
            };
            print!("{}{}\x1b[0m", ansi, log_message);
            io::stdout().flush().map_err(LoggerError::from)?;
        }

        if let Some(path) = &self.log_file {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(LoggerError::from)?;
            file.write_all(log_message.as_bytes())
                .map_err(LoggerError::from)?;
            file.flush().map_err(LoggerError::from)?;
        }

        Ok(())
    }

    /// Logs a diagnostic message. Dropped unless the minimum level is `Debug`.
    pub fn debug(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(Level::Debug, None, message, to_console)
    }

    /// Logs an informational message.
    ///
    /// # Parameters
    /// - `message`: The informational message to log.
    /// - `color`: The color to use for the console output.
    /// - `to_console`: Whether to log the message to the console as well.
    pub fn info(&self, message: &str, color: Color, to_console: bool) -> Result<(), LoggerError> {
        self.log(Level::Info, Some(color), message, to_console)
    }

    /// Logs a warning message.
    pub fn warn(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(Level::Warn, None, message, to_console)
    }

    /// Logs an error message.
    pub fn error(&self, message: &str, to_console: bool) -> Result<(), LoggerError> {
        self.log(Level::Error, None, message, to_console)
    }
}

fn sanitize(session: &str) -> String {
    session
        .chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' => '_',
            c => c,
        })
        .collect()
}

#[derive(Debug)]
pub enum LoggerError {
    IoError(std::io::Error),
    InvalidPath(String),
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::IoError(e) => write!(f, "I/O Error: {}", e),
            LoggerError::InvalidPath(msg) => write!(f, "Invalid Path: {}", msg),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(e) => Some(e),
            LoggerError::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    #[test]
    fn test_logger_creation_and_logging() {
        let log_dir = Path::new("/tmp/test_tour_logs");
        fs::create_dir_all(log_dir).expect("Failed to create test directory");

        let logger = Logger::new(log_dir, "bakery crawl").expect("Failed to create logger");

        let message = "Hackney boundary layer created";
        logger
            .info(message, Color::Green, false)
            .expect("Failed to log message");

        let log_file_path = log_dir.join("bakery_crawl.log");
        assert_eq!(logger.log_file(), Some(log_file_path.as_path()));
        let log_contents = fs::read_to_string(&log_file_path).expect("Failed to read log file");

        assert!(log_contents.contains("[INFO]"), "INFO level missing in log");
        assert!(log_contents.contains(message), "Logged message missing");

        fs::remove_dir_all(log_dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_debug_lines_filtered_by_min_level() {
        let log_dir = Path::new("/tmp/test_tour_logs_debug");
        fs::create_dir_all(log_dir).expect("Failed to create test directory");

        let logger = Logger::new(log_dir, "session").expect("Failed to create logger");
        logger.debug("hidden", false).expect("Failed to log");

        let verbose = logger.clone().with_min_level(Level::Debug);
        verbose.debug("scroll 42%", false).expect("Failed to log");

        let contents =
            fs::read_to_string(log_dir.join("session.log")).expect("Failed to read log file");
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("[DEBUG]"));
        assert!(contents.contains("scroll 42%"));

        fs::remove_dir_all(log_dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_invalid_path() {
        let invalid_path = Path::new("/invalid/path");
        let result = Logger::new(invalid_path, "session");
        assert!(result.is_err(), "Logger should fail with an invalid path");
    }

    #[test]
    fn test_silent_logger_accepts_everything() {
        let logger = Logger::silent();
        assert!(!logger.enabled(Level::Error));
        assert!(logger.error("nothing happens", true).is_ok());
    }
}
