use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::Result;

pub const APP_QUALIFIER: &str = "com";
pub const APP_ORG: &str = "sentinel";
pub const APP_NAME: &str = "sentinel";

/// Default store root. `SENTINEL_DATA_DIR` overrides the platform
/// location, mainly for tests and portable installs.
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(override_path) = std::env::var("SENTINEL_DATA_DIR") {
        if !override_path.is_empty() {
            return Ok(PathBuf::from(override_path));
        }
    }
    let dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "cannot determine data directory")
    })?;
    Ok(dirs.data_dir().join("prefs"))
}
