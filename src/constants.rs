// src/constants.rs

/// The key under which user-wide scripts are stored.
pub const GLOBAL_SCOPE_KEY: &str = "global";

/// The name of the application directory inside the system config directory.
pub const APP_DIR_NAME: &str = "cmdr";

/// The name of the store file holding every script definition.
pub const STORE_FILENAME: &str = "scripts.json";

/// The name of the directory holding the command template files.
pub const SCRIPTS_DIRNAME: &str = "scripts";

/// The name of the optional user configuration file (inside the app directory).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the application directory.
/// Only read once, while building the startup configuration.
pub const HOME_ENV_VAR: &str = "CMDR_HOME";

/// Extension given to newly created template files.
pub const TEMPLATE_EXTENSION: &str = "sh";
