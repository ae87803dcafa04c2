pub mod error;

pub use error::*;

use std::path::PathBuf;

/// Resolve the directory holding Stratus data files.
///
/// The `STRATUS_DATA_DIR` environment variable wins when set; otherwise
/// the platform data directory is used (e.g. `~/.local/share/stratus`).
/// The directory is created on first use.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STRATUS_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .ok_or(ConfigError::DataDirNotFound)?
            .join("stratus"),
    };

    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Where the append-only audit log lives.
pub fn audit_log_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("audit.jsonl"))
}

/// Where the infrastructure snapshot is written between invocations.
pub fn state_file_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_data_dir_env_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("stratus-data");

        unsafe {
            std::env::set_var("STRATUS_DATA_DIR", &custom);
        }

        let result = data_dir().unwrap();
        assert_eq!(result, custom);
        assert!(custom.exists());

        unsafe {
            std::env::remove_var("STRATUS_DATA_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_paths_live_inside_the_data_dir() {
        let temp_dir = tempfile::tempdir().unwrap();

        unsafe {
            std::env::set_var("STRATUS_DATA_DIR", temp_dir.path());
        }

        let audit = audit_log_path().unwrap();
        let state = state_file_path().unwrap();
        assert_eq!(audit, temp_dir.path().join("audit.jsonl"));
        assert_eq!(state, temp_dir.path().join("state.json"));

        unsafe {
            std::env::remove_var("STRATUS_DATA_DIR");
        }
    }

    #[test]
    #[serial]
    fn test_data_dir_without_override() {
        unsafe {
            std::env::remove_var("STRATUS_DATA_DIR");
        }

        let result = data_dir();
        assert!(result.is_ok());
        assert!(result.unwrap().ends_with("stratus"));
    }
}
