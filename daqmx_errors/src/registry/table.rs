//! Declared DAQmx status table, generated by build.rs from data/daqmx.toml

use super::types::{ActionRequired, Category, RawEntry};

include!(concat!(env!("OUT_DIR"), "/daqmx_table.rs"));

/// Every declared row in declaration order, duplicates included
pub fn declared_entries() -> &'static [RawEntry] {
    DAQMX_ENTRIES
}
