// Tracing log adapter - Structured logging using tracing crate

use crate::ports::*;
use async_trait::async_trait;
use tracing::{debug, error, info, warn};

/// Tracing log adapter
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter.
    ///
    /// The global subscriber is installed by `utils::logging`; this adapter
    /// only forwards to it.
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Trace,
        }
    }

    /// Drop events below `level` before they reach the subscriber
    pub fn with_min_level(level: LogLevel) -> Self {
        Self { min_level: level }
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn render_context(event: &LogEvent) -> String {
        let mut pairs: Vec<_> = event.context.iter().collect();
        pairs.sort();
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn info(&self, message: &str) {
        if self.should_log(LogLevel::Info) {
            info!("{}", message);
        }
    }

    async fn warn(&self, message: &str) {
        if self.should_log(LogLevel::Warn) {
            warn!("{}", message);
        }
    }

    async fn error(&self, message: &str) {
        if self.should_log(LogLevel::Error) {
            error!("{}", message);
        }
    }

    async fn debug(&self, message: &str) {
        if self.should_log(LogLevel::Debug) {
            debug!("{}", message);
        }
    }

    async fn log_event(&self, event: &LogEvent) {
        if !self.should_log(event.level) {
            return;
        }

        let context = Self::render_context(event);
        match event.level {
            LogLevel::Error => error!(message = %event.message, context = %context),
            LogLevel::Warn => warn!(message = %event.message, context = %context),
            LogLevel::Info => info!(message = %event.message, context = %context),
            LogLevel::Debug => debug!(message = %event.message, context = %context),
            LogLevel::Trace => tracing::trace!(message = %event.message, context = %context),
        }
    }
}
