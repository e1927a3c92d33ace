use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "clawtcha")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("clawtcha_config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("clawtcha");
            Some(state_dir.join("clawtcha.log"))
        } else {
            ProjectDirs::from("", "", "clawtcha")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("clawtcha.log"))
        }
    }
}
