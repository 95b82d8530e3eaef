//! Progress reporting for chunk extraction and part merging

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Progress callback trait
pub trait ProgressCallback: Send + Sync {
    /// Called when operation starts
    fn on_start(&self, operation: &str, total_work: Option<u64>);

    /// Called during operation progress
    fn on_progress(&self, completed: u64, total: Option<u64>, message: Option<String>);

    /// Called when operation completes successfully
    fn on_complete(&self, message: Option<String>);

    /// Called when operation fails
    fn on_error(&self, error: &str);
}

/// How progress is surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Through the tracing subscriber
    Log,
    /// One JSON object per line on stdout
    Json,
    /// Nothing
    None,
}

impl ProgressMode {
    pub fn parse(mode: &str) -> Result<Self, DomainError> {
        match mode.trim().to_lowercase().as_str() {
            "log" => Ok(ProgressMode::Log),
            "json" => Ok(ProgressMode::Json),
            "none" | "off" => Ok(ProgressMode::None),
            _ => Err(DomainError::Input(format!(
                "Invalid progress mode: {}. Valid modes: log, json, none",
                mode
            ))),
        }
    }

    /// Build the callback for this mode
    pub fn callback(&self) -> Arc<dyn ProgressCallback> {
        match self {
            ProgressMode::Log => Arc::new(LogProgressCallback::new()),
            ProgressMode::Json => Arc::new(JsonProgressCallback::new()),
            ProgressMode::None => Arc::new(SilentProgressCallback),
        }
    }
}

fn percent(completed: u64, total: Option<u64>) -> Option<f64> {
    match total {
        Some(total) if total > 0 => Some((completed as f64 / total as f64 * 100.0).min(100.0)),
        _ => None,
    }
}

/// Tracing-backed progress for interactive use
pub struct LogProgressCallback {
    state: Mutex<Option<(String, Instant)>>,
}

impl LogProgressCallback {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(None),
        }
    }

    fn eta_secs(&self, completed: u64, total: Option<u64>) -> Option<f64> {
        let fraction = percent(completed, total)? / 100.0;
        if fraction <= 0.0 {
            return None;
        }
        let guard = self.state.lock().ok()?;
        let (_, started) = guard.as_ref()?;
        let elapsed = started.elapsed().as_secs_f64();
        Some(elapsed / fraction - elapsed)
    }
}

impl Default for LogProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for LogProgressCallback {
    fn on_start(&self, operation: &str, total_work: Option<u64>) {
        if let Ok(mut state) = self.state.lock() {
            *state = Some((operation.to_string(), Instant::now()));
        }
        match total_work {
            Some(total) => tracing::info!("Starting: {} ({} steps)", operation, total),
            None => tracing::info!("Starting: {}", operation),
        }
    }

    fn on_progress(&self, completed: u64, total: Option<u64>, message: Option<String>) {
        let message = message.unwrap_or_else(|| "Processing...".to_string());
        let mut line = match (total, percent(completed, total)) {
            (Some(total), Some(pct)) => format!("[{}/{}] {:>3.0}% {}", completed, total, pct, message),
            _ => format!("[{}] {}", completed, message),
        };

        if let Some(eta) = self.eta_secs(completed, total).filter(|eta| *eta > 0.0) {
            line.push_str(&format!(" (ETA: {:.0}s)", eta));
        }

        tracing::info!("{}", line);
    }

    fn on_complete(&self, message: Option<String>) {
        let finished = self.state.lock().ok().and_then(|mut state| state.take());
        match (finished, message) {
            (Some((operation, started)), message) => tracing::info!(
                "{} completed in {:.2}s{}",
                operation,
                started.elapsed().as_secs_f64(),
                message.map(|m| format!(": {}", m)).unwrap_or_default()
            ),
            (None, Some(message)) => tracing::info!("Completed: {}", message),
            (None, None) => tracing::info!("Operation completed successfully"),
        }
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Error: {}", error);
    }
}

/// JSON progress callback for structured output.
///
/// Events go to stderr by default so stdout stays a single summary document.
pub struct JsonProgressCallback {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl JsonProgressCallback {
    pub fn new() -> Self {
        Self::with_writer(std::io::stderr())
    }

    /// Write one event per line to `writer`
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
        }
    }

    fn emit(&self, event: serde_json::Value) {
        if let Ok(mut sink) = self.sink.lock() {
            if let Err(e) = writeln!(sink, "{}", event) {
                tracing::debug!("Dropped progress event: {}", e);
            }
        }
    }

    /// Build one progress event
    pub fn event(kind: &str, fields: serde_json::Value) -> serde_json::Value {
        let mut event = serde_json::json!({
            "event": kind,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        if let (Some(target), serde_json::Value::Object(extra)) = (event.as_object_mut(), fields) {
            target.extend(extra);
        }
        event
    }
}

impl Default for JsonProgressCallback {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressCallback for JsonProgressCallback {
    fn on_start(&self, operation: &str, total_work: Option<u64>) {
        self.emit(Self::event(
            "start",
            serde_json::json!({ "operation": operation, "total_work": total_work }),
        ));
    }

    fn on_progress(&self, completed: u64, total: Option<u64>, message: Option<String>) {
        self.emit(Self::event(
            "progress",
            serde_json::json!({
                "completed": completed,
                "total": total,
                "percent": percent(completed, total),
                "message": message,
            }),
        ));
    }

    fn on_complete(&self, message: Option<String>) {
        self.emit(Self::event("complete", serde_json::json!({ "message": message })));
    }

    fn on_error(&self, error: &str) {
        self.emit(Self::event("error", serde_json::json!({ "error": error })));
    }
}

/// Discards all progress
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_start(&self, _operation: &str, _total_work: Option<u64>) {}
    fn on_progress(&self, _completed: u64, _total: Option<u64>, _message: Option<String>) {}
    fn on_complete(&self, _message: Option<String>) {}
    fn on_error(&self, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_mode_parsing() {
        assert_eq!(ProgressMode::parse("log").unwrap(), ProgressMode::Log);
        assert_eq!(ProgressMode::parse("JSON").unwrap(), ProgressMode::Json);
        assert_eq!(ProgressMode::parse("off").unwrap(), ProgressMode::None);
        assert!(ProgressMode::parse("bars").is_err());
    }

    #[test]
    fn test_percent_is_clamped() {
        assert_eq!(percent(1, Some(4)), Some(25.0));
        assert_eq!(percent(5, Some(4)), Some(100.0));
        assert_eq!(percent(1, Some(0)), None);
        assert_eq!(percent(1, None), None);
    }

    #[test]
    fn test_json_event_shape() {
        let event = JsonProgressCallback::event(
            "progress",
            serde_json::json!({ "completed": 2, "total": 4 }),
        );
        assert_eq!(event["event"], "progress");
        assert_eq!(event["completed"], 2);
        assert_eq!(event["total"], 4);
        assert!(event["timestamp"].as_str().is_some());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_progress_writes_one_event_per_line() {
        let buffer = SharedBuffer::default();
        let callback = JsonProgressCallback::with_writer(buffer.clone());
        callback.on_start("Splitting", Some(2));
        callback.on_progress(1, Some(2), Some("clip_chunk_000.mp4".to_string()));
        callback.on_complete(None);

        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[1]["percent"], 50.0);
        assert_eq!(events[2]["event"], "complete");
    }

    #[test]
    fn test_eta_requires_start() {
        let callback = LogProgressCallback::new();
        assert!(callback.eta_secs(1, Some(2)).is_none());
        callback.on_start("Splitting", Some(2));
        assert!(callback.eta_secs(1, Some(2)).is_some());
        callback.on_complete(None);
        assert!(callback.eta_secs(1, Some(2)).is_none());
    }
}
