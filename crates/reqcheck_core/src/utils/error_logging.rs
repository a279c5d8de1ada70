//! Error logging utilities for better miette formatting in tracing

/// Log an error with miette's nice formatting
///
/// This macro logs errors at ERROR level with miette's debug formatting.
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let err = &$err;
        tracing::error!("{:?}", err);
    }};
    ($msg:expr, $err:expr) => {{
        let err = &$err;
        tracing::error!("{}: {:?}", $msg, err);
    }};
}

/// Log a recoverable error at WARN level with its cause chain flattened onto one line
#[macro_export]
macro_rules! log_warn {
    ($msg:expr, $err:expr) => {{
        use $crate::utils::error_logging::ErrorLogging;
        let err = &$err;
        tracing::warn!("{}: {}", $msg, err.log_format().replace('\n', " "));
    }};
}

/// Helper trait to format errors nicely for logging
pub trait ErrorLogging {
    /// Format the error with its full chain for logging
    fn log_format(&self) -> String;
}

impl<E: std::error::Error> ErrorLogging for E {
    fn log_format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{}", self);

        if let Some(source) = self.source() {
            let _ = write!(output, "\n\nCaused by:");
            let mut current = source;
            let mut depth = 1;
            loop {
                let _ = write!(output, "\n  {}: {}", depth, current);
                match current.source() {
                    Some(next) => {
                        current = next;
                        depth += 1;
                    }
                    None => break,
                }
            }
        }

        output
    }
}
