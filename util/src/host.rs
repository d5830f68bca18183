//! Host platform utility functions

use std::path::PathBuf;

/// The environment variable pointing at the root of the software directory.
///
/// The `params` and `sessions` directories are resolved relative to this.
pub const SW_ROOT_ENV_VAR: &str = "PURSUIT_SW_ROOT";

/// Get the root directory of the software from the environment.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
