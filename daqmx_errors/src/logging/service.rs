//! Logging service and logger backends

use super::codes::Code;
use super::config;
use super::events::{LogEvent, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};

/// Logger sink
pub trait Logger: Send + Sync {
    fn log(&self, event: &LogEvent);
}

/// Main logging service with configuration awareness
pub struct LoggingService {
    logger: Arc<dyn Logger>,
    min_level: LogLevel,
}

impl LoggingService {
    pub fn new(logger: Arc<dyn Logger>, min_level: LogLevel) -> Self {
        Self { logger, min_level }
    }

    /// Create service from the runtime logging preferences
    pub fn with_config() -> Self {
        let min_level = config::get_min_log_level();
        let logger: Arc<dyn Logger> = if !config::use_console_logging() {
            Arc::new(NullLogger)
        } else if config::use_structured_logging() {
            Arc::new(StructuredLogger::new(min_level))
        } else {
            Arc::new(ConsoleLogger::new(min_level))
        };

        Self::new(logger, min_level)
    }

    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Check if level should be logged
    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.min_level
    }

    pub fn log_event(&self, event: LogEvent) {
        if self.should_log(event.level) {
            self.logger.log(&event);
        }
    }

    pub fn log_error(&self, error_code: Code, message: &str) {
        self.log_event(LogEvent::error(error_code, message));
    }

    pub fn log_error_with_context(
        &self,
        error_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        self.log_event(apply_context(LogEvent::error(error_code, message), context));
    }

    pub fn log_success(&self, success_code: Code, message: &str) {
        self.log_event(LogEvent::success(success_code, message));
    }

    pub fn log_success_with_context(
        &self,
        success_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        self.log_event(apply_context(LogEvent::success(success_code, message), context));
    }

    pub fn log_info(&self, message: &str) {
        self.log_event(LogEvent::info(message));
    }

    pub fn log_warning(&self, message: &str) {
        self.log_event(LogEvent::warning(message));
    }

    pub fn log_warning_with_context(
        &self,
        warning_code: Code,
        message: &str,
        context: Vec<(&str, &str)>,
    ) {
        self.log_event(apply_context(
            LogEvent::warning_with_code(warning_code, message),
            context,
        ));
    }

    pub fn log_debug(&self, message: &str) {
        self.log_event(LogEvent::debug(message));
    }
}

fn apply_context(mut event: LogEvent, context: Vec<(&str, &str)>) -> LogEvent {
    for (key, value) in context {
        event = event.with_context(key, value);
    }
    event
}

/// Discards every event
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _event: &LogEvent) {}
}

/// Plain text console logger
pub struct ConsoleLogger {
    min_level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            // stdout carries command output, so diagnostics go to stderr
            eprintln!("{}", event.format());
        }
    }
}

/// JSON-lines logger for tooling integration
pub struct StructuredLogger {
    min_level: LogLevel,
}

impl StructuredLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Logger for StructuredLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            match event.format_json() {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", event.format()),
            }
        }
    }
}

/// Bounded in-memory logger; the CLI keeps one to report what a command logged
pub struct MemoryLogger {
    events: Mutex<Vec<LogEvent>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::with_capacity(config::get_log_buffer_size())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        // A poisoned buffer still holds valid events
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get_events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    pub fn get_errors(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_error()).cloned().collect()
    }

    pub fn get_warnings(&self) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.is_warning()).cloned().collect()
    }

    pub fn get_events_with_code(&self, code: Code) -> Vec<LogEvent> {
        self.lock().iter().filter(|e| e.code == code).cloned().collect()
    }

    pub fn get_events_for_status(&self, status: i32) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter(|e| e.status_code == Some(status))
            .cloned()
            .collect()
    }

    pub fn has_error_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_error() && e.code == code)
    }

    pub fn has_warning_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_warning() && e.code == code)
    }

    pub fn has_success_with_code(&self, code: Code) -> bool {
        self.lock().iter().any(|e| e.is_info() && e.code == code)
    }

    pub fn get_summary(&self) -> EventSummary {
        let events = self.lock();
        EventSummary {
            total_count: events.len(),
            error_count: events.iter().filter(|e| e.is_error()).count(),
            warning_count: events.iter().filter(|e| e.is_warning()).count(),
            info_count: events.iter().filter(|e| e.is_info()).count(),
            debug_count: events.iter().filter(|e| e.is_debug()).count(),
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, event: &LogEvent) {
        let mut events = self.lock();

        if events.len() >= self.capacity {
            let remove_count = events.len() - self.capacity + 1;
            events.drain(0..remove_count);
        }

        events.push(event.clone());
    }
}

/// Summary of events in memory logger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSummary {
    pub total_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub debug_count: usize,
}

impl EventSummary {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count > 0
    }
}

/// Appending file logger
pub struct FileLogger {
    file_path: std::path::PathBuf,
    min_level: LogLevel,
    structured: bool,
}

impl FileLogger {
    pub fn new<P: AsRef<std::path::Path>>(
        file_path: P,
        min_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let path = file_path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Fail early if the file cannot be opened for append
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            file_path: path,
            min_level,
            structured,
        })
    }
}

impl Logger for FileLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            let output = if self.structured {
                event.format_json().unwrap_or_else(|_| event.format())
            } else {
                event.format()
            };

            // Write errors are dropped; logging them would recurse
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)
            {
                use std::io::Write;
                let _ = writeln!(file, "{}", output);
            }
        }
    }
}

/// Forwards events into the `log` facade
#[cfg(feature = "log-bridge")]
pub struct LogCrateLogger;

#[cfg(feature = "log-bridge")]
impl Logger for LogCrateLogger {
    fn log(&self, event: &LogEvent) {
        let level = match event.level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        };
        log::log!(target: "daqmx_errors", level, "{}", event.format());
    }
}

/// Fan-out logger
pub struct MultiLogger {
    loggers: Vec<Arc<dyn Logger>>,
    min_level: LogLevel,
}

impl MultiLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            loggers: Vec::new(),
            min_level,
        }
    }

    pub fn add_logger(&mut self, logger: Arc<dyn Logger>) {
        self.loggers.push(logger);
    }

    pub fn with_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(ConsoleLogger::new(console_level)));
        self
    }

    pub fn with_structured_console(mut self, console_level: LogLevel) -> Self {
        self.add_logger(Arc::new(StructuredLogger::new(console_level)));
        self
    }

    pub fn with_file<P: AsRef<std::path::Path>>(
        mut self,
        file_path: P,
        file_level: LogLevel,
        structured: bool,
    ) -> Result<Self, std::io::Error> {
        let file_logger = FileLogger::new(file_path, file_level, structured)?;
        self.add_logger(Arc::new(file_logger));
        Ok(self)
    }

    pub fn with_memory(mut self) -> (Self, Arc<MemoryLogger>) {
        let memory_logger = Arc::new(MemoryLogger::new());
        self.add_logger(memory_logger.clone());
        (self, memory_logger)
    }
}

impl Logger for MultiLogger {
    fn log(&self, event: &LogEvent) {
        if event.level <= self.min_level {
            for logger in &self.loggers {
                logger.log(event);
            }
        }
    }
}

// ============================================================================
// CONFIGURATION-AWARE FACTORY FUNCTIONS
// ============================================================================

/// Multi-logger honoring the console and structured preferences
pub fn create_configured_multi_logger() -> MultiLogger {
    let min_level = config::get_min_log_level();
    let multi_logger = MultiLogger::new(min_level);

    if !config::use_console_logging() {
        return multi_logger;
    }
    if config::use_structured_logging() {
        multi_logger.with_structured_console(min_level)
    } else {
        multi_logger.with_console(min_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_memory_logger() {
        let logger = MemoryLogger::new();

        logger.log(&LogEvent::info("Registry ready"));
        logger.log(
            &LogEvent::error(codes::driver::DRIVER_ERROR, "Driver failed").with_status_code(-200170),
        );

        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.get_errors().len(), 1);
        assert!(logger.has_error_with_code(codes::driver::DRIVER_ERROR));
        assert_eq!(logger.get_events_for_status(-200170).len(), 1);

        let summary = logger.get_summary();
        assert_eq!(summary.total_count, 2);
        assert!(summary.has_errors());
        assert!(!summary.has_warnings());

        logger.clear();
        assert_eq!(logger.event_count(), 0);
    }

    #[test]
    fn test_memory_logger_drops_oldest_when_full() {
        let logger = MemoryLogger::with_capacity(3);
        for i in 0..5 {
            logger.log(&LogEvent::info(&format!("event {}", i)));
        }

        let events = logger.get_events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].message, "event 2");
        assert_eq!(events[2].message, "event 4");
    }

    #[test]
    fn test_multi_logger() {
        let multi = MultiLogger::new(LogLevel::Debug);
        let (multi, memory) = multi.with_memory();

        multi.log(&LogEvent::debug("lookup"));
        assert_eq!(memory.event_count(), 1);
    }

    #[test]
    fn test_service_level_filtering() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Warning);

        service.log_debug("Debug message");
        service.log_info("Info message");
        service.log_warning_with_context(
            codes::registry::UNKNOWN_STATUS_CODE,
            "Unknown code",
            vec![("code", "1")],
        );
        service.log_error(codes::system::INTERNAL_ERROR, "Error message");

        assert_eq!(logger.event_count(), 2);
        assert!(logger.has_warning_with_code(codes::registry::UNKNOWN_STATUS_CODE));
        assert!(logger.has_error_with_code(codes::system::INTERNAL_ERROR));
    }

    #[test]
    fn test_context_helpers() {
        let logger = Arc::new(MemoryLogger::new());
        let service = LoggingService::new(logger.clone(), LogLevel::Debug);

        service.log_error_with_context(
            codes::message::STATUS_CODE_MISSING,
            "No status",
            vec![("length", "12")],
        );
        service.log_success_with_context(
            codes::success::MESSAGE_PARSED,
            "Parsed",
            vec![("property", "max_val")],
        );

        let events = logger.get_events();
        assert!(events[0].context.contains_key("length"));
        assert!(events[1].context.contains_key("property"));
        assert_eq!(
            logger.get_events_with_code(codes::success::MESSAGE_PARSED).len(),
            1
        );
    }

    #[test]
    fn test_file_logger_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("daqmx.log");
        let logger = FileLogger::new(&path, LogLevel::Info, true).unwrap();

        logger.log(&LogEvent::info("first"));
        logger.log(&LogEvent::debug("filtered"));
        logger.log(&LogEvent::warning("second"));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["timestamp"].is_string());
        }
    }
}
