//! Classification of raw DAQmx return values
//!
//! Zero is success, positive values are warnings and negative values are
//! errors. Errors carry their registry metadata and, when the extended
//! message is available, the config path of the offending field.

use crate::config::runtime::message_preferences;
use crate::logging::codes as log_codes;
use crate::message::{self, ParsedError};
use crate::registry::{self, ErrorInfo};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Well-known DAQmx status codes
pub mod codes {
    pub const ANALOG_WRITE_OUT_OF_BOUNDS: i32 = -200561;
    pub const APPLICATION_TOO_SLOW: i32 = -200729;
    pub const DEVICE_DISCONNECTED: i32 = -88710;
    pub const DEVICE_DISCONNECTED_2: i32 = -88709;
    pub const RESOURCE_NOT_AVAILABLE: i32 = -88708;
    pub const ADC_CONVERSION_ERROR: i32 = -200019;
    pub const RESOURCE_RESERVED: i32 = -201105;
    pub const ROUTING_ERROR: i32 = -89130;
    pub const INVALID_PHYSICAL_CHANNEL: i32 = -200170;
}

/// Codes after which the device is expected to come back
const TEMPORARY_CODES: [i32; 3] = [
    codes::DEVICE_DISCONNECTED,
    codes::DEVICE_DISCONNECTED_2,
    codes::RESOURCE_NOT_AVAILABLE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The task cannot continue
    Critical,
    /// The device or resource is temporarily unreachable
    Temporary,
    /// A configured property was rejected
    Field,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Critical => "critical",
            ErrorKind::Temporary => "temporary",
            ErrorKind::Field => "field",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A negative DAQmx status
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct DaqmxError {
    pub code: i32,
    pub kind: ErrorKind,
    pub message: String,
    pub info: Option<&'static ErrorInfo>,
    pub path: Option<String>,
}

impl DaqmxError {
    fn new(code: i32, parsed: Option<(&ParsedError, &str)>, channels: &HashMap<String, String>) -> Self {
        let info = registry::lookup(code);

        let kind = if TEMPORARY_CODES.contains(&code) {
            ErrorKind::Temporary
        } else if parsed.is_some_and(|(p, _)| p.property.is_some()) {
            ErrorKind::Field
        } else {
            ErrorKind::Critical
        };

        let (mut message, path) = match parsed {
            Some((parsed, original)) => {
                let formatted = message::format(parsed, original, channels);
                let path = Some(formatted.path).filter(|p| !p.is_empty());
                (formatted.message, path)
            }
            None => {
                let description = info
                    .map(|i| i.description)
                    .unwrap_or("Unknown DAQmx error");
                (format!("DAQmx error {}: {}", code, description), None)
            }
        };

        if parsed.is_some() && message_preferences().append_description {
            if let Some(info) = info {
                message.push_str(&format!("\nDescription: {}", info.description));
            }
        }

        Self {
            code,
            kind,
            message,
            info,
            path,
        }
    }

    pub fn is_temporary(&self) -> bool {
        self.kind == ErrorKind::Temporary
    }

    /// The task must be restarted to recover once the device returns
    pub fn requires_restart(&self) -> bool {
        self.is_temporary()
    }

    /// Operator-facing remediation for statuses whose description is unhelpful
    pub fn hint(&self) -> Option<&'static str> {
        match self.code {
            codes::APPLICATION_TOO_SLOW => Some(
                "The network cannot keep up with the stream rate specified. \
                 Try making the sample rate a higher multiple of the stream rate.",
            ),
            c if TEMPORARY_CODES.contains(&c) => {
                Some("The device is temporarily unreachable. Restart the task once it reconnects.")
            }
            _ => None,
        }
    }

    fn log(&self) {
        let code = if self.is_temporary() {
            log_codes::driver::TEMPORARY_DRIVER_ERROR
        } else {
            log_codes::driver::DRIVER_ERROR
        };
        log_error!(
            code,
            "DAQmx call failed",
            "status" => self.code,
            "kind" => self.kind,
            "path" => self.path.as_deref().unwrap_or("")
        );
    }
}

/// A positive DAQmx status; the call succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Warning {
    pub code: i32,
    pub info: Option<&'static ErrorInfo>,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info {
            Some(info) => write!(f, "DAQmx warning {}: {}", self.code, info.description),
            None => write!(f, "DAQmx warning {}", self.code),
        }
    }
}

fn warning(status: i32) -> Warning {
    let warning = Warning {
        code: status,
        info: registry::lookup(status),
    };
    log_warning!(
        log_codes::driver::DRIVER_WARNING,
        "DAQmx call completed with a warning",
        "status" => status
    );
    warning
}

/// Classify a raw DAQmx return value
pub fn check(status: i32) -> Result<Option<Warning>, DaqmxError> {
    match status {
        0 => Ok(None),
        s if s > 0 => Ok(Some(warning(s))),
        s => {
            let err = DaqmxError::new(s, None, &HashMap::new());
            err.log();
            Err(err)
        }
    }
}

/// Classify a raw return value, enriching errors with the extended message
pub fn check_with_message(status: i32, extended: &str) -> Result<Option<Warning>, DaqmxError> {
    check_with_channels(status, extended, &HashMap::new())
}

/// As `check_with_message`, translating driver channel names through `channels`
pub fn check_with_channels(
    status: i32,
    extended: &str,
    channels: &HashMap<String, String>,
) -> Result<Option<Warning>, DaqmxError> {
    if status >= 0 {
        return check(status);
    }

    // The return value is authoritative over whatever the text claims
    let parsed = message::parse_with_status(extended, status);

    let err = DaqmxError::new(status, Some((&parsed, extended)), channels);
    err.log();
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_success_and_warning() {
        assert_matches!(check(0), Ok(None));

        let warning = check(200079).unwrap().unwrap();
        assert_eq!(warning.code, 200079);
        assert!(warning.info.is_some());
        assert!(warning.to_string().starts_with("DAQmx warning 200079: "));

        let unknown = check(1).unwrap().unwrap();
        assert_eq!(unknown.info, None);
        assert_eq!(unknown.to_string(), "DAQmx warning 1");
    }

    #[test]
    fn test_temporary_errors() {
        for code in [
            codes::DEVICE_DISCONNECTED,
            codes::DEVICE_DISCONNECTED_2,
            codes::RESOURCE_NOT_AVAILABLE,
        ] {
            let err = check(code).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Temporary);
            assert!(err.is_temporary());
            assert!(err.requires_restart());
            assert!(err.hint().is_some());
        }
    }

    #[test]
    fn test_critical_error_message() {
        let err = check(-200501).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Critical);
        assert!(!err.requires_restart());
        assert!(err
            .to_string()
            .starts_with("DAQmx error -200501: EEPROM contains an invalid calibration date"));
        assert_eq!(err.path, None);
    }

    #[test]
    fn test_unknown_error_code() {
        let err = check(-1).unwrap_err();
        assert_eq!(err.info, None);
        assert_eq!(err.to_string(), "DAQmx error -1: Unknown DAQmx error");
    }

    #[test]
    fn test_application_too_slow_hint() {
        let err = check(codes::APPLICATION_TOO_SLOW).unwrap_err();
        assert_matches!(err.hint(), Some(h) if h.contains("stream rate"));
    }

    #[test]
    fn test_field_error_from_extended_message() {
        let extended = "Requested value is not supported.\n\
Property: DAQmx_AI_Max\n\
Maximum Value: 10.0\n\
Channel Name: Dev1/ai0\n\
Task Name: t\n\
Status Code: -200077";
        let mut channels = HashMap::new();
        channels.insert("Dev1/ai0".to_string(), "channels.2".to_string());

        let err = check_with_channels(-200077, extended, &channels).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Field);
        assert_eq!(err.path.as_deref(), Some("channels.2.max_val"));
        assert!(err.message.starts_with("NI Error -200077: "));
    }

    #[test]
    fn test_invalid_physical_channel_points_at_port() {
        let extended = "Physical channel does not exist.\nDevice: Dev3\nPhysical Channel Name: ai99";
        let err = check_with_message(codes::INVALID_PHYSICAL_CHANNEL, extended).unwrap_err();

        assert_eq!(err.kind, ErrorKind::Field);
        assert_eq!(err.path.as_deref(), Some("Dev3/ai99.port"));
    }

    #[test]
    fn test_non_negative_status_ignores_message() {
        assert_matches!(check_with_message(0, "Status Code: -200077"), Ok(None));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::Temporary.to_string(), "temporary");
        assert_eq!(ErrorKind::Field.as_str(), "field");
    }
}
