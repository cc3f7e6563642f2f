// src/config/consts.rs

// Directories
pub const DEFAULT_SOURCE_DIR: &str = "data/new";
pub const DEFAULT_DEST_DIR: &str = "data";

// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "mister_sync.yaml";

// Environment overrides
pub const ENV_SOURCE_DIR: &str = "MISTER_SOURCE_DIR";
pub const ENV_DEST_DIR: &str = "MISTER_DEST_DIR";
pub const ENV_LOG_LEVEL: &str = "MISTER_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "MISTER_LOG_FILE";

// Date format accepted by --today
pub const DAY_FORMAT: &str = "%Y-%m-%d";
