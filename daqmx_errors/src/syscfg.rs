//! NI System Configuration status table
//!
//! Status values follow the HRESULT convention: non-negative is success,
//! negative is failure.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// One System Configuration status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusInfo {
    pub code: i32,
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
}

impl StatusInfo {
    pub fn is_error(&self) -> bool {
        failed(self.code)
    }
}

include!(concat!(env!("OUT_DIR"), "/syscfg_table.rs"));

static STATUS_INDEX: OnceLock<HashMap<i32, &'static StatusInfo>> = OnceLock::new();

fn index() -> &'static HashMap<i32, &'static StatusInfo> {
    // Later rows replace earlier ones, matching the DAQmx registry
    STATUS_INDEX.get_or_init(|| SYSCFG_ENTRIES.iter().map(|s| (s.code, s)).collect())
}

/// Look up a System Configuration status code
pub fn lookup_status(code: i32) -> Option<&'static StatusInfo> {
    index().get(&code).copied()
}

/// Look up a status by its symbolic name, e.g. `PropDoesNotExist`
pub fn lookup_by_name(name: &str) -> Option<&'static StatusInfo> {
    SYSCFG_ENTRIES.iter().rev().find(|s| s.name == name)
}

/// All statuses in declaration order
pub fn statuses() -> &'static [StatusInfo] {
    SYSCFG_ENTRIES
}

pub fn succeeded(status: i32) -> bool {
    status >= 0
}

pub fn failed(status: i32) -> bool {
    status < 0
}
