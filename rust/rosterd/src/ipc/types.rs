use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::roster::DataManager;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// The logged-in user. Present only between a successful `auth.login` and
/// the next logout, credential change, workspace switch or bundle import.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub roster: Option<DataManager>,
    pub session: Option<Session>,
}

impl AppState {
    /// Opens (and seeds, if needed) the data directory at `path`. Any previous
    /// session ends, since it belonged to the old workspace's credentials.
    pub fn open_workspace(&mut self, path: PathBuf) -> Result<(), crate::store::StoreError> {
        std::fs::create_dir_all(&path)?;
        let config = crate::config::RosterConfig::load_overrides(&path);
        let roster = DataManager::new(path.clone(), config);
        roster.ensure_initialized()?;

        log::info!("workspace selected: {}", path.to_string_lossy());
        self.workspace = Some(path);
        self.roster = Some(roster);
        self.session = None;
        Ok(())
    }
}
