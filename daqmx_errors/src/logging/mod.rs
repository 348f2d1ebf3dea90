//! Global logging for the status registry
//!
//! A process-wide `LoggingService` behind a `OnceLock`, plus the helper
//! functions the `log_*!` macros expand to.

#[macro_use]
pub mod macros;

pub mod codes;
pub mod config;
pub mod events;
pub mod service;

use std::sync::{Arc, OnceLock};

pub use codes::Code;
pub use events::{LogEvent, LogLevel};
pub use service::{
    ConsoleLogger, EventSummary, FileLogger, Logger, LoggingService, MemoryLogger, MultiLogger,
    NullLogger, StructuredLogger,
};

#[cfg(feature = "log-bridge")]
pub use service::LogCrateLogger;

// ============================================================================
// GLOBAL STATE
// ============================================================================

static GLOBAL_LOGGER: OnceLock<Arc<LoggingService>> = OnceLock::new();

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize global logging from the runtime preferences
pub fn init_global_logging() -> Result<(), String> {
    config::validate_config().map_err(|e| format!("Configuration validation failed: {}", e))?;

    let min_level = config::get_min_log_level();
    let service = Arc::new(LoggingService::new(
        Arc::new(service::create_configured_multi_logger()),
        min_level,
    ));

    install(service)
}

/// Initialize with custom service (primarily for tests and embedding hosts)
pub fn init_global_logging_with_service(service: Arc<LoggingService>) -> Result<(), String> {
    install(service)
}

fn install(service: Arc<LoggingService>) -> Result<(), String> {
    GLOBAL_LOGGER
        .set(service.clone())
        .map_err(|_| "Global logger already initialized")?;

    for code in [
        codes::system::INTERNAL_ERROR,
        codes::registry::UNKNOWN_STATUS_CODE,
        codes::driver::DRIVER_ERROR,
        codes::message::STATUS_CODE_MISSING,
    ] {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Missing metadata for diagnostic code: {}", code));
        }
    }

    service.log_success(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Global logging system initialized",
    );

    Ok(())
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

/// Safe access to global logger
pub fn try_get_global_logger() -> Option<&'static LoggingService> {
    GLOBAL_LOGGER.get().map(|service| service.as_ref())
}

/// True when a debug event would actually be emitted
pub fn debug_enabled() -> bool {
    try_get_global_logger()
        .map(|logger| logger.should_log(LogLevel::Debug))
        .unwrap_or(false)
}

// ============================================================================
// MACRO SUPPORT FUNCTIONS
// ============================================================================

fn emit(mut event: LogEvent, context: Vec<(&str, &str)>) {
    let Some(logger) = try_get_global_logger() else {
        return;
    };
    if !logger.should_log(event.level) {
        return;
    }
    for (key, value) in context {
        // Status codes get a typed slot on the event
        if key == "status" {
            if let Ok(status) = value.parse::<i32>() {
                event = event.with_status_code(status);
                continue;
            }
        }
        event = event.with_context(key, value);
    }
    logger.log_event(event);
}

/// Used by `log_error!`
pub fn log_error_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::error(code, message), context);
}

/// Used by `log_warning!`
pub fn log_warning_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::warning_with_code(code, message), context);
}

/// Used by `log_success!`
pub fn log_success_with_context(code: Code, message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::success(code, message), context);
}

/// Used by `log_info!`
pub fn log_info_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::info(message), context);
}

/// Used by `log_debug!`
pub fn log_debug_with_context(message: &str, context: Vec<(&str, &str)>) {
    emit(LogEvent::debug(message), context);
}

// ============================================================================
// SAFE FALLBACK LOGGING
// ============================================================================

/// Error logging that falls back to stderr when uninitialized
pub fn safe_log_error(code: Code, message: &str) {
    if let Some(logger) = try_get_global_logger() {
        logger.log_error(code, message);
    } else {
        eprintln!("[ERROR] FALLBACK: [{}] {}", code.as_str(), message);
    }
}

/// Get system diagnostics
pub fn get_system_diagnostics() -> String {
    let mut diagnostics = String::new();

    diagnostics.push_str("=== Logging System Diagnostics ===\n");
    diagnostics.push_str(&format!("Initialized: {}\n", is_initialized()));
    if let Some(logger) = try_get_global_logger() {
        diagnostics.push_str(&format!("Active level: {:?}\n", logger.min_level()));
    }
    diagnostics.push('\n');
    diagnostics.push_str(&config::get_config_summary());

    diagnostics
}
