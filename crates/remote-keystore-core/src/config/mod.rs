//! Property sources
//!
//! Sources the resolver can consult:
//! - In-memory pairs (host-provided project properties)
//! - `.properties` files (`local.properties`, `gradle.properties`)
//! - Command-line `key=value` overrides

mod traits;
mod properties;
mod source;

pub use traits::{ConfigError, ConfigResult};
pub use properties::parse_properties;
pub use source::PropertySource;
