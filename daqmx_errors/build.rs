// build.rs - TOML-driven constant and status table generation
use std::collections::HashSet;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const CATEGORIES: &[&str] = &[
    "Configuration",
    "Communication",
    "Hardware",
    "Software",
    "Other",
];
const ACTIONS: &[&str] = &["Warning", "ImmediateAction", "Stall"];

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    registry: RegistryLimits,
    message: MessageLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct RegistryLimits {
    max_description_length: usize,
    min_daqmx_entries: usize,
    min_syscfg_entries: usize,
}

#[derive(serde::Deserialize)]
struct MessageLimits {
    max_message_length: usize,
    max_field_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    default_min_log_level: u8,
}

#[derive(serde::Deserialize)]
struct DaqmxTable {
    entry: Vec<DaqmxEntry>,
}

#[derive(serde::Deserialize)]
struct DaqmxEntry {
    code: i32,
    category: String,
    action: String,
    description: String,
}

#[derive(serde::Deserialize)]
struct SysCfgTable {
    status: Vec<SysCfgEntry>,
}

#[derive(serde::Deserialize)]
struct SysCfgEntry {
    name: String,
    code: i32,
    group: String,
    description: String,
}

#[derive(serde::Deserialize)]
struct FieldTable {
    field: Vec<FieldEntry>,
}

#[derive(serde::Deserialize)]
struct FieldEntry {
    property: String,
    name: String,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DAQMX_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=DAQMX_CONFIG_DIR");
    println!("cargo:rerun-if-env-changed=DAQMX_DATA_DIR");

    let profile = env::var("DAQMX_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("DAQMX_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let data_dir = env::var("DAQMX_DATA_DIR").unwrap_or_else(|_| "data".to_string());

    // Find workspace root (parent of daqmx_errors directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));
    let config: CompileTimeConfig = read_toml(&config_path);

    validate_limits(&config, &profile);

    let data_root = workspace_root.join(&data_dir);
    let daqmx: DaqmxTable = read_toml(&data_root.join("daqmx.toml"));
    let syscfg: SysCfgTable = read_toml(&data_root.join("syscfg.toml"));
    let fields: FieldTable = read_toml(&data_root.join("fields.toml"));

    validate_daqmx(&daqmx, &config.registry);
    validate_syscfg(&syscfg, &config.registry);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    generate_constants(&config, &profile, &out_dir);
    generate_daqmx_table(&daqmx, &out_dir);
    generate_syscfg_table(&syscfg, &out_dir);
    generate_field_table(&fields, &out_dir);
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    println!("cargo:rerun-if-changed={}", path.display());

    if !path.exists() {
        panic!("Required build input not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));

    toml::from_str(&content).unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", path.display(), e))
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    if config.logging.default_min_log_level > 3 {
        panic!("LOGGING: default_min_log_level must be between 0 (error) and 3 (debug)");
    }

    if config.logging.log_buffer_size < 100 || config.logging.log_buffer_size > 100_000 {
        panic!("LOGGING: log_buffer_size must be between 100 and 100000");
    }

    if config.message.max_field_length > config.message.max_message_length {
        panic!("MESSAGE: max_field_length exceeds max_message_length");
    }

    if profile == "production" && config.message.max_message_length > 1_000_000 {
        panic!("PRODUCTION: max_message_length too high for production");
    }
}

fn validate_daqmx(table: &DaqmxTable, limits: &RegistryLimits) {
    let unique: HashSet<i32> = table.entry.iter().map(|e| e.code).collect();
    if unique.len() < limits.min_daqmx_entries {
        panic!(
            "DATA: daqmx.toml has {} unique codes, expected at least {}",
            unique.len(),
            limits.min_daqmx_entries
        );
    }

    for entry in &table.entry {
        if !CATEGORIES.contains(&entry.category.as_str()) {
            panic!("DATA: code {} has unknown category '{}'", entry.code, entry.category);
        }
        if !ACTIONS.contains(&entry.action.as_str()) {
            panic!("DATA: code {} has unknown action '{}'", entry.code, entry.action);
        }
        if entry.description.trim().is_empty() {
            panic!("DATA: code {} has an empty description", entry.code);
        }
        if entry.description.len() > limits.max_description_length {
            panic!(
                "DATA: code {} description exceeds {} bytes",
                entry.code, limits.max_description_length
            );
        }
    }
}

fn validate_syscfg(table: &SysCfgTable, limits: &RegistryLimits) {
    if table.status.len() < limits.min_syscfg_entries {
        panic!(
            "DATA: syscfg.toml has {} statuses, expected at least {}",
            table.status.len(),
            limits.min_syscfg_entries
        );
    }

    for status in &table.status {
        if status.name.is_empty() || status.description.trim().is_empty() {
            panic!("DATA: syscfg status {} is missing a name or description", status.code);
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str, out_dir: &Path) {
    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod registry {{
        pub const MAX_DESCRIPTION_LENGTH: usize = {};
        pub const MIN_DAQMX_ENTRIES: usize = {};
        pub const MIN_SYSCFG_ENTRIES: usize = {};
    }}

    pub mod message {{
        pub const MAX_MESSAGE_LENGTH: usize = {};
        pub const MAX_FIELD_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const DEFAULT_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Registry
        config.registry.max_description_length,
        config.registry.min_daqmx_entries,
        config.registry.min_syscfg_entries,
        // Message
        config.message.max_message_length,
        config.message.max_field_length,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.default_min_log_level,
    );

    fs::write(out_dir.join("constants.rs"), constants_code).unwrap();
}

fn generate_daqmx_table(table: &DaqmxTable, out_dir: &Path) {
    let mut code = String::from(
        "// Generated from data/daqmx.toml - DO NOT EDIT\n\
         // Entries keep their declaration order.\n\n\
         pub(crate) static DAQMX_ENTRIES: &[RawEntry] = &[\n",
    );

    for entry in &table.entry {
        writeln!(
            code,
            "    RawEntry {{ code: {}, category: Category::{}, action_required: ActionRequired::{}, description: {:?} }},",
            entry.code, entry.category, entry.action, entry.description
        )
        .unwrap();
    }
    code.push_str("];\n");

    fs::write(out_dir.join("daqmx_table.rs"), code).unwrap();
}

fn generate_syscfg_table(table: &SysCfgTable, out_dir: &Path) {
    let mut code = String::from(
        "// Generated from data/syscfg.toml - DO NOT EDIT\n\n\
         pub(crate) static SYSCFG_ENTRIES: &[StatusInfo] = &[\n",
    );

    for status in &table.status {
        writeln!(
            code,
            "    StatusInfo {{ code: {}, name: {:?}, group: {:?}, description: {:?} }},",
            status.code, status.name, status.group, status.description
        )
        .unwrap();
    }
    code.push_str("];\n");

    fs::write(out_dir.join("syscfg_table.rs"), code).unwrap();
}

fn generate_field_table(table: &FieldTable, out_dir: &Path) {
    let mut code = String::from(
        "// Generated from data/fields.toml - DO NOT EDIT\n\n\
         pub(crate) static FIELD_ENTRIES: &[(&str, &str)] = &[\n",
    );

    for field in &table.field {
        writeln!(code, "    ({:?}, {:?}),", field.property, field.name).unwrap();
    }
    code.push_str("];\n");

    fs::write(out_dir.join("fields_table.rs"), code).unwrap();
}
