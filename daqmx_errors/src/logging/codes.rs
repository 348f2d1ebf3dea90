//! Diagnostic codes emitted by this crate's own logging
//!
//! These are distinct from driver status codes: a `Code` names an event the
//! registry, status checker or message parser reports about itself.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Code wrapper for both diagnostic and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

/// Diagnostic severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Metadata attached to a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// Library-level failures
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Registry lookups
pub mod registry {
    use super::Code;

    pub const UNKNOWN_STATUS_CODE: Code = Code::new("R001");
    pub const DUPLICATE_CODE_OVERRIDDEN: Code = Code::new("R002");
    pub const UNKNOWN_SYSCFG_STATUS: Code = Code::new("R003");
}

/// Driver status checks
pub mod driver {
    use super::Code;

    pub const DRIVER_ERROR: Code = Code::new("N001");
    pub const TEMPORARY_DRIVER_ERROR: Code = Code::new("N002");
    pub const DRIVER_WARNING: Code = Code::new("N003");
}

/// Driver message parsing
pub mod message {
    use super::Code;

    pub const MESSAGE_TRUNCATED: Code = Code::new("M001");
    pub const STATUS_CODE_MISSING: Code = Code::new("M002");
    pub const UNMAPPED_PROPERTY: Code = Code::new("M003");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const REGISTRY_LOADED: Code = Code::new("I010");
    pub const STATUS_RESOLVED: Code = Code::new("I011");
    pub const MESSAGE_PARSED: Code = Code::new("I020");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const METADATA: &[ErrorMetadata] = &[
    ErrorMetadata {
        code: "ERR001",
        category: "System",
        severity: Severity::Critical,
        recoverable: false,
        description: "Internal library error",
        recommended_action: "Report the failure with the logged context",
    },
    ErrorMetadata {
        code: "ERR002",
        category: "System",
        severity: Severity::Critical,
        recoverable: false,
        description: "Logging or registry initialization failed",
        recommended_action: "Check runtime configuration environment variables",
    },
    ErrorMetadata {
        code: "R001",
        category: "Registry",
        severity: Severity::Low,
        recoverable: true,
        description: "Status code is not present in the DAQmx table",
        recommended_action: "Consult the driver documentation for the raw code",
    },
    ErrorMetadata {
        code: "R002",
        category: "Registry",
        severity: Severity::Low,
        recoverable: true,
        description: "Status table declares a code more than once; the last entry wins",
        recommended_action: "Remove the stale entry from data/daqmx.toml",
    },
    ErrorMetadata {
        code: "R003",
        category: "Registry",
        severity: Severity::Low,
        recoverable: true,
        description: "Status code is not present in the System Configuration table",
        recommended_action: "Consult the System Configuration documentation for the raw code",
    },
    ErrorMetadata {
        code: "N001",
        category: "Driver",
        severity: Severity::High,
        recoverable: false,
        description: "Driver call returned an error status",
        recommended_action: "Inspect the formatted message and the reported path",
    },
    ErrorMetadata {
        code: "N002",
        category: "Driver",
        severity: Severity::Medium,
        recoverable: true,
        description: "Driver call returned a transient device or resource error",
        recommended_action: "Retry once the device or resource is available again",
    },
    ErrorMetadata {
        code: "N003",
        category: "Driver",
        severity: Severity::Low,
        recoverable: true,
        description: "Driver call completed with a warning status",
        recommended_action: "Review the warning; the operation itself succeeded",
    },
    ErrorMetadata {
        code: "M001",
        category: "Message",
        severity: Severity::Low,
        recoverable: true,
        description: "Driver message exceeded the configured length and was truncated",
        recommended_action: "Raise message.max_message_length in the build profile",
    },
    ErrorMetadata {
        code: "M002",
        category: "Message",
        severity: Severity::Medium,
        recoverable: true,
        description: "Driver message carried no Status Code line",
        recommended_action: "Pass the full extended error text to the parser",
    },
    ErrorMetadata {
        code: "M003",
        category: "Message",
        severity: Severity::Low,
        recoverable: true,
        description: "Driver property has no mapped field name",
        recommended_action: "Add the property to data/fields.toml",
    },
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific diagnostic code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

/// Get severity from diagnostic code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

/// Check if the diagnostic is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for diagnostic code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for diagnostic code
pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from diagnostic code
pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_constant_has_metadata() {
        let all = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            registry::UNKNOWN_STATUS_CODE,
            registry::DUPLICATE_CODE_OVERRIDDEN,
            registry::UNKNOWN_SYSCFG_STATUS,
            driver::DRIVER_ERROR,
            driver::TEMPORARY_DRIVER_ERROR,
            driver::DRIVER_WARNING,
            message::MESSAGE_TRUNCATED,
            message::STATUS_CODE_MISSING,
            message::UNMAPPED_PROPERTY,
        ];
        for code in all {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_description("X999"), "Unknown error");
        assert!(is_recoverable("X999"));
    }

    #[test]
    fn test_driver_error_classification() {
        assert_eq!(get_severity("N001"), Severity::High);
        assert!(!is_recoverable("N001"));
        assert!(is_recoverable("N002"));
        assert_eq!(get_category("N002"), "Driver");
    }
}
