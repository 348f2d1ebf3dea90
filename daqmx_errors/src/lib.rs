pub mod config;
#[macro_use]
pub mod logging;
pub mod message;
pub mod registry;
pub mod status;
pub mod syscfg;

// Re-export key types for library consumers
pub use message::{FormattedError, ParsedError};
pub use registry::{lookup, ActionRequired, Category, ErrorInfo, ErrorRegistry};
pub use status::{check, check_with_message, DaqmxError, ErrorKind, Warning};
pub use syscfg::{lookup_status, StatusInfo};
