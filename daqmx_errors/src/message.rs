//! DAQmx extended error message parsing and formatting
//!
//! The driver's extended error text is a loose set of `Key: value` lines.
//! `parse` pulls out the fields needed to point a user at the offending
//! channel and property; `format` turns them into a config path plus an
//! enriched message.

use crate::config::compile_time::message::{MAX_FIELD_LENGTH, MAX_MESSAGE_LENGTH};
use crate::logging::codes;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

include!(concat!(env!("OUT_DIR"), "/fields_table.rs"));

/// Status for which the driver omits the property; the port is always at fault
const INVALID_PHYSICAL_CHANNEL: i32 = -200170;

/// Fields recovered from an extended error message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedError {
    pub status_code: Option<i32>,
    pub device: Option<String>,
    pub channel_name: Option<String>,
    pub property: Option<String>,
    pub possible_values: Option<String>,
    pub max_value: Option<String>,
    pub min_value: Option<String>,
}

/// Error payload handed back to whatever configured the task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedError {
    pub path: String,
    pub message: String,
    pub running: bool,
}

struct Patterns {
    status_code: Regex,
    channel: Regex,
    physical_channel: Regex,
    device: Regex,
    possible_values: Regex,
    max_value: Regex,
    min_value: Regex,
    property: Regex,
    task_name_line: Regex,
    status_code_line: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            status_code: Regex::new(r"Status Code:\s*(-?\d+)")?,
            channel: Regex::new(r"Channel Name:\s*(\S+)")?,
            physical_channel: Regex::new(r"Physical Channel Name:\s*(\S+)")?,
            device: Regex::new(r"Device:\s*(\S+)")?,
            possible_values: Regex::new(r"Possible Values:[ \t]*([\w \t,.\-]+)")?,
            max_value: Regex::new(r"Maximum Value:[ \t]*([\d.\t ,eE\-]+)")?,
            min_value: Regex::new(r"Minimum Value:[ \t]*([\d.\t ,eE\-]+)")?,
            property: Regex::new(r"Property:\s*(\S+)")?,
            task_name_line: Regex::new(r"\r?\nTask Name:[^\n]*")?,
            status_code_line: Regex::new(r"\r?\nStatus Code:[^\n]*$")?,
        })
    }
}

static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();

fn patterns() -> Option<&'static Patterns> {
    PATTERNS
        .get_or_init(|| match Patterns::compile() {
            Ok(patterns) => Some(patterns),
            Err(e) => {
                log_error!(
                    codes::system::INTERNAL_ERROR,
                    "Failed to compile message patterns",
                    "error" => e
                );
                None
            }
        })
        .as_ref()
}

static FIELD_INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

/// Map a DAQmx property to its configuration field name
pub fn field_name(property: &str) -> Option<&'static str> {
    FIELD_INDEX
        .get_or_init(|| FIELD_ENTRIES.iter().copied().collect())
        .get(property)
        .copied()
}

fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn extract(text: &str, regex: &Regex) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| truncate(m.as_str().trim(), MAX_FIELD_LENGTH).to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a DAQmx extended error message
pub fn parse(text: &str) -> ParsedError {
    parse_message(text, None)
}

/// Parse an extended message whose status code the caller already holds
///
/// `status` replaces any `Status Code:` line in the text.
pub fn parse_with_status(text: &str, status: i32) -> ParsedError {
    parse_message(text, Some(status))
}

fn parse_message(text: &str, known_status: Option<i32>) -> ParsedError {
    let text = if text.len() > MAX_MESSAGE_LENGTH {
        log_warning!(
            codes::message::MESSAGE_TRUNCATED,
            "Extended error message truncated",
            "length" => text.len(),
            "limit" => MAX_MESSAGE_LENGTH
        );
        truncate(text, MAX_MESSAGE_LENGTH)
    } else {
        text
    };

    let Some(p) = patterns() else {
        return ParsedError {
            status_code: known_status,
            ..ParsedError::default()
        };
    };

    // Status code comes from the full text; other fields ignore the task
    // name and trailing status lines
    let status_code = known_status.or_else(|| {
        p.status_code
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok())
    });
    let stripped = p.task_name_line.replace_all(text, "");
    let stripped = p.status_code_line.replace(&stripped, "");

    let device = extract(&stripped, &p.device);
    let channel_name = match extract(&stripped, &p.physical_channel) {
        Some(physical) => Some(match &device {
            Some(device) => format!("{}/{}", device, physical),
            None => physical,
        }),
        None => extract(&stripped, &p.channel),
    };

    let property = if status_code == Some(INVALID_PHYSICAL_CHANNEL) {
        Some("port".to_string())
    } else {
        extract(&stripped, &p.property)
    };

    let possible_values = extract(&stripped, &p.possible_values)
        .map(|values| values.replacen("Channel Name", "", 1).trim().to_string())
        .filter(|values| !values.is_empty());

    let parsed = ParsedError {
        status_code,
        device,
        channel_name,
        property,
        possible_values,
        max_value: extract(&stripped, &p.max_value),
        min_value: extract(&stripped, &p.min_value),
    };

    match parsed.status_code {
        Some(status) => {
            log_success!(
                codes::success::MESSAGE_PARSED,
                "Parsed extended error message",
                "status" => status,
                "property" => parsed.property.as_deref().unwrap_or("")
            );
        }
        None => {
            log_warning!(
                codes::message::STATUS_CODE_MISSING,
                "Extended error message has no status code",
                "length" => text.len()
            );
        }
    }

    parsed
}

/// Build the config path and user-facing message for a parsed error
///
/// `channel_map` translates driver channel names into config keys.
pub fn format(
    parsed: &ParsedError,
    original: &str,
    channel_map: &HashMap<String, String>,
) -> FormattedError {
    let mut path = match parsed.channel_name.as_deref() {
        Some(channel) => match channel_map.get(channel) {
            Some(mapped) => format!("{}.", mapped),
            None => format!("{}.", channel),
        },
        None => String::new(),
    };

    if let Some(property) = parsed.property.as_deref() {
        match field_name(property) {
            Some(field) => path.push_str(field),
            None => {
                if property != "port" {
                    log_warning!(
                        codes::message::UNMAPPED_PROPERTY,
                        "Property has no mapped field",
                        "property" => property
                    );
                }
                path.push_str(property);
            }
        }
    }

    let code = parsed
        .status_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let mut message = format!("NI Error {}: {}\nPath: {}", code, original, path);

    if let Some(channel) = &parsed.channel_name {
        message.push_str(&format!(" Channel: {}", channel));
    }
    if let Some(values) = &parsed.possible_values {
        message.push_str(&format!(" Possible Values: {}", values));
    }
    if let Some(max) = &parsed.max_value {
        message.push_str(&format!(" Maximum Value: {}", max));
    }
    if let Some(min) = &parsed.min_value {
        message.push_str(&format!(" Minimum Value: {}", min));
    }

    FormattedError {
        path,
        message,
        running: false,
    }
}
