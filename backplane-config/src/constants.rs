//! Fixed configuration file location.

/// Directory holding the configuration file, relative to the working
/// directory.
pub const CONFIG_DIR: &str = "./config";

/// File stem of the configuration file.
pub const CONFIG_NAME: &str = "config";

/// Accepted YAML extensions, in lookup order.
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];
