//! Configuration module for the DAQmx error registry
//! Uses constants generated from the TOML build profile

// Generated at compile time by build.rs from config/<profile>.toml
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("DAQMX_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("DAQMX_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns the data directory the status tables were generated from
    pub fn data_dir() -> &'static str {
        option_env!("DAQMX_DATA_DIR").unwrap_or("data")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!(
            "Generated from {}/{}.toml with tables from {}/",
            config_dir(),
            profile(),
            data_dir()
        )
    }
}
