//! Runs in its own process so the global logger can be installed once.

use daqmx_errors::logging::{self, codes, LogLevel, LoggingService, MemoryLogger};
use daqmx_errors::{check, check_with_message, message, ErrorRegistry};
use std::sync::Arc;

#[test]
fn library_events_reach_the_global_logger() {
    let memory = Arc::new(MemoryLogger::new());
    let service = Arc::new(LoggingService::new(memory.clone(), LogLevel::Debug));
    logging::init_global_logging_with_service(service).unwrap();

    assert!(logging::is_initialized());
    assert!(logging::init_global_logging().is_err());
    assert!(memory.has_success_with_code(codes::success::SYSTEM_INITIALIZATION_COMPLETED));

    // Registry construction reports its size and the overridden codes
    let registry = ErrorRegistry::global();
    let loaded = memory.get_events_with_code(codes::success::REGISTRY_LOADED);
    assert_eq!(loaded.len(), 1);
    assert_eq!(
        loaded[0].context.get("entries"),
        Some(&registry.len().to_string())
    );
    assert!(memory.has_warning_with_code(codes::registry::DUPLICATE_CODE_OVERRIDDEN));

    // Driver errors carry their status code on the event
    let _ = check(-88710);
    let temporary = memory.get_events_for_status(-88710);
    assert_eq!(temporary.len(), 1);
    assert_eq!(temporary[0].code, codes::driver::TEMPORARY_DRIVER_ERROR);
    assert_eq!(temporary[0].context.get("kind").map(String::as_str), Some("temporary"));

    let _ = check(200079);
    assert!(memory.has_warning_with_code(codes::driver::DRIVER_WARNING));

    // The caller's status makes a missing status line unremarkable
    let _ = check_with_message(-50103, "The specified resource is reserved.");
    assert!(!memory.has_warning_with_code(codes::message::STATUS_CODE_MISSING));
    assert!(memory.has_error_with_code(codes::driver::DRIVER_ERROR));

    let parsed = message::parse("Bad value.\nProperty: DAQmx_AI_Max\nStatus Code: -200077");
    assert_eq!(parsed.status_code, Some(-200077));
    assert!(memory
        .get_events_for_status(-200077)
        .iter()
        .any(|e| e.code == codes::success::MESSAGE_PARSED));

    let parsed = message::parse("The specified resource is reserved.");
    assert_eq!(parsed.status_code, None);
    assert!(memory.has_warning_with_code(codes::message::STATUS_CODE_MISSING));

    let diagnostics = logging::get_system_diagnostics();
    assert!(diagnostics.contains("Initialized: true"));
}
