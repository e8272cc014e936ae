//! Error handling for hstats

use thiserror::Error;

/// Custom error types for hstats
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Host list problems (empty input, unusable tokens)
    #[error("Input error: {0}")]
    Input(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// The probe executable could not be located
    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    /// A single probe invocation failed
    #[error("Probe error: {0}")]
    Probe(String),

    /// Parsing errors (numbers, probe output, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The run was interrupted
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new input error
    pub fn input<S: Into<String>>(message: S) -> Self {
        Self::Input(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new probe-unavailable error
    pub fn probe_unavailable<S: Into<String>>(message: S) -> Self {
        Self::ProbeUnavailable(message.into())
    }

    /// Create a new probe error
    pub fn probe<S: Into<String>>(message: S) -> Self {
        Self::Probe(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new cancellation error
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Input(_) => "INPUT",
            Self::Io(_) => "IO",
            Self::ProbeUnavailable(_) => "PROBE_SETUP",
            Self::Probe(_) => "PROBE",
            Self::Parse(_) => "PARSE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Per-host failures are contained and degrade to a sentinel row;
    /// everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Probe(_) | Self::Parse(_) | Self::Timeout(_) => true,
            Self::Config(_) | Self::Validation(_) | Self::Input(_) | Self::Io(_) => false,
            Self::ProbeUnavailable(_) | Self::Cancelled(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) | Self::Validation(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file, HSTATS_* variables or command line arguments.", msg)
            }
            Self::Input(msg) => {
                format!("No usable input: {}\n\nSuggestion: Pass whitespace-separated host names on stdin or with --infile.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check that the input file exists and is readable.", msg)
            }
            Self::ProbeUnavailable(msg) => {
                format!("Cannot run the probe utility: {}\n\nSuggestion: Install ping or point --ping at its full path.", msg)
            }
            Self::Probe(msg) => {
                format!("Probe failed: {}\n\nSuggestion: The host may be unreachable or filtering ICMP.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Try --platform if ping prints an unexpected summary format.", msg)
            }
            Self::Timeout(msg) => {
                format!("Probe timed out: {}\n\nSuggestion: Increase the limit with --timeout or lower --count.", msg)
            }
            Self::Cancelled(msg) => {
                format!("Run interrupted: {}", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,  // Invalid configuration/usage
            Self::ProbeUnavailable(_) => 2,  // Probe executable missing
            Self::Timeout(_) => 3,
            Self::Input(_) | Self::Io(_) => 5,  // Unreadable or empty host list
            Self::Probe(_) => 6,
            Self::Cancelled(_) => 130,  // Conventional SIGINT status
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Probe(_) | Self::ProbeUnavailable(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) | Self::Cancelled(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::Input(_) | Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<regex::Error> for AppError {
    fn from(error: regex::Error) -> Self {
        Self::internal(format!("Invalid pattern: {}", error))
    }
}

impl From<which::Error> for AppError {
    fn from(error: which::Error) -> Self {
        Self::probe_unavailable(error.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(error: tokio::task::JoinError) -> Self {
        if error.is_cancelled() {
            Self::cancelled(error.to_string())
        } else {
            Self::internal(format!("Worker task failed: {}", error))
        }
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        // Variant is preserved; only the message gains a prefix
        self.map_err(|e| {
            let original_error: AppError = e.into();
            let context = f();
            match original_error {
                AppError::Config(msg) => AppError::Config(format!("{}: {}", context, msg)),
                AppError::Validation(msg) => AppError::Validation(format!("{}: {}", context, msg)),
                AppError::Input(msg) => AppError::Input(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::ProbeUnavailable(msg) => AppError::ProbeUnavailable(format!("{}: {}", context, msg)),
                AppError::Probe(msg) => AppError::Probe(format!("{}: {}", context, msg)),
                AppError::Parse(msg) => AppError::Parse(format!("{}: {}", context, msg)),
                AppError::Timeout(msg) => AppError::Timeout(format!("{}: {}", context, msg)),
                AppError::Cancelled(msg) => AppError::Cancelled(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for fatal errors and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report a fatal error on stderr
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());
        } else if let Some(hint) = self.suggestion(error) {
            eprintln!("{}", hint);
        }
    }

    /// One-line hint for the common setup failures
    pub fn suggestion(&self, error: &AppError) -> Option<&'static str> {
        match error {
            AppError::ProbeUnavailable(_) => Some("hint: install ping or pass --ping /path/to/ping"),
            AppError::Input(_) => Some("hint: echo \"example.com 1.1.1.1\" | hstats"),
            AppError::Config(_) | AppError::Validation(_) => Some("hint: run with --help to see accepted ranges"),
            _ => None,
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

/// Report panics with the application prefix, then defer to the previous hook
///
/// The process is left running so the dispatcher can turn a crashed worker
/// into a lost-host row.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        eprintln!("Application panic: {}", panic_info);
        previous(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::input("no hosts found");
        assert_eq!(error.to_string(), "Input error: no hosts found");
    }

    #[test]
    fn test_error_categories() {
        let errors = vec![
            AppError::config("config"),
            AppError::validation("validation"),
            AppError::input("input"),
            AppError::io("io"),
            AppError::probe_unavailable("missing"),
            AppError::probe("probe"),
            AppError::parse("parse"),
            AppError::timeout("timeout"),
            AppError::cancelled("cancelled"),
            AppError::internal("internal"),
        ];
        let expected = [
            "CONFIG", "VALIDATION", "INPUT", "IO", "PROBE_SETUP",
            "PROBE", "PARSE", "TIMEOUT", "CANCELLED", "INTERNAL",
        ];

        for (error, expected_category) in errors.iter().zip(expected.iter()) {
            assert_eq!(error.category(), *expected_category);
        }
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(AppError::probe("exit status 1").is_recoverable());
        assert!(AppError::parse("no summary line").is_recoverable());
        assert!(AppError::timeout("30s").is_recoverable());

        assert!(!AppError::probe_unavailable("ping").is_recoverable());
        assert!(!AppError::input("no hosts found").is_recoverable());
        assert!(!AppError::config("bad").is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::config("test").exit_code(), 1);
        assert_eq!(AppError::probe_unavailable("test").exit_code(), 2);
        assert_eq!(AppError::input("test").exit_code(), 5);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::cancelled("test").exit_code(), 130);
        assert_eq!(AppError::internal("test").exit_code(), 99);

        let all = [
            AppError::config(""), AppError::validation(""), AppError::input(""),
            AppError::io(""), AppError::probe_unavailable(""), AppError::probe(""),
            AppError::parse(""), AppError::timeout(""), AppError::cancelled(""),
            AppError::internal(""),
        ];
        assert!(all.iter().all(|e| e.exit_code() != 0));
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "hosts.txt");
        let app_error: AppError = io_error.into();
        assert_eq!(app_error.category(), "IO");

        let parse_error = "abc".parse::<u32>().unwrap_err();
        let app_error: AppError = parse_error.into();
        assert_eq!(app_error.category(), "PARSE");

        let float_error = "1.2.3".parse::<f64>().unwrap_err();
        let app_error: AppError = float_error.into();
        assert!(app_error.to_string().contains("Float parse error"));
    }

    #[test]
    fn test_which_error_is_setup_failure() {
        let app_error: AppError = which::Error::CannotFindBinaryPath.into();
        assert_eq!(app_error.category(), "PROBE_SETUP");
        assert_eq!(app_error.exit_code(), 2);
    }

    #[test]
    fn test_error_context_keeps_variant() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file",
        ));

        let error = result.with_context(|| "read \"hosts.txt\"".to_string()).unwrap_err();
        assert_eq!(error.category(), "IO");
        assert!(error.to_string().contains("read \"hosts.txt\""));
        assert!(error.to_string().contains("No such file"));
    }

    #[test]
    fn test_console_formatting() {
        let error = AppError::input("no hosts found");
        let plain = error.format_for_console(false);
        assert_eq!(plain, "[INPUT] Input error: no hosts found");

        colored::control::set_override(true);
        let colored_output = error.format_for_console(true);
        colored::control::unset_override();
        assert!(colored_output.contains("no hosts found"));
        assert!(colored_output.contains("\x1b["));
    }

    #[test]
    fn test_reporter_suggestions() {
        let reporter = ErrorReporter::new(false, false);
        assert!(reporter.suggestion(&AppError::probe_unavailable("ping")).is_some());
        assert!(reporter.suggestion(&AppError::internal("boom")).is_none());

        let reporter = ErrorReporter::default();
        assert!(reporter.use_color);
        assert!(!reporter.verbose);
    }

    #[test]
    fn test_panic_hook_keeps_process_alive() {
        install_panic_hook();

        let outcome = std::thread::spawn(|| panic!("worker blew up")).join();
        assert!(outcome.is_err());

        let outcome = std::thread::spawn(|| 42).join();
        assert_eq!(outcome.unwrap(), 42);
    }
}
