use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

pub const OVERRIDES_FILE: &str = "rosterd.json";

/// File names, sheet names and seed values used inside a data directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterConfig {
    pub students_file: String,
    pub credentials_file: String,
    pub export_file: String,
    pub students_sheet: String,
    pub stats_sheet: String,
    pub default_username: String,
    pub default_password: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            students_file: "students.xlsx".to_string(),
            credentials_file: "credentials.json".to_string(),
            export_file: "gender_stats.xlsx".to_string(),
            students_sheet: "students".to_string(),
            stats_sheet: "gender_stats".to_string(),
            default_username: "zh".to_string(),
            default_password: "0240".to_string(),
        }
    }
}

impl RosterConfig {
    /// Defaults, overlaid with `rosterd.json` from the data directory when present.
    /// A broken overrides file must not keep the workspace from opening.
    pub fn load_overrides(data_dir: &Path) -> Self {
        match read_overrides(data_dir) {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("ignoring {}: {:#}", OVERRIDES_FILE, e);
                Self::default()
            }
        }
    }

    /// True for the files the workspace itself depends on; an export must
    /// never write over one of these.
    pub fn is_backing_file(&self, name: &str) -> bool {
        let name = name.trim();
        [
            self.students_file.as_str(),
            self.credentials_file.as_str(),
            OVERRIDES_FILE,
        ]
        .iter()
        .any(|f| f.eq_ignore_ascii_case(name))
    }
}

fn read_overrides(data_dir: &Path) -> anyhow::Result<Option<RosterConfig>> {
    let path = data_dir.join(OVERRIDES_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.to_string_lossy()))?;
    let cfg: RosterConfig = serde_json::from_str(&text)
        .with_context(|| format!("{} is invalid JSON", path.to_string_lossy()))?;
    for name in [&cfg.students_file, &cfg.credentials_file, &cfg.export_file] {
        if !is_bare_file_name(name) {
            anyhow::bail!("file names must not contain path separators: {}", name);
        }
    }
    if cfg.students_file.trim().eq_ignore_ascii_case(cfg.credentials_file.trim()) {
        anyhow::bail!("studentsFile and credentialsFile must differ");
    }
    if cfg.is_backing_file(&cfg.export_file) {
        anyhow::bail!("exportFile would overwrite {}", cfg.export_file);
    }
    Ok(Some(cfg))
}

pub fn is_bare_file_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_overrides_keep_other_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(OVERRIDES_FILE),
            r#"{ "exportFile": "stats-2024.xlsx" }"#,
        )
        .expect("write overrides");

        let cfg = RosterConfig::load_overrides(dir.path());
        assert_eq!(cfg.export_file, "stats-2024.xlsx");
        assert_eq!(cfg.students_file, "students.xlsx");
        assert_eq!(cfg.default_username, "zh");
    }

    #[test]
    fn broken_overrides_fall_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(OVERRIDES_FILE), "{").expect("write");
        assert_eq!(RosterConfig::load_overrides(dir.path()), RosterConfig::default());

        std::fs::write(
            dir.path().join(OVERRIDES_FILE),
            r#"{ "studentsFile": "../elsewhere.xlsx" }"#,
        )
        .expect("write");
        assert_eq!(RosterConfig::load_overrides(dir.path()), RosterConfig::default());
    }

    #[test]
    fn export_file_cannot_alias_a_backing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        for body in [
            r#"{ "exportFile": "students.xlsx" }"#,
            r#"{ "exportFile": "Credentials.json" }"#,
            r#"{ "exportFile": "rosterd.json" }"#,
            r#"{ "studentsFile": "roster.xlsx", "exportFile": "roster.xlsx" }"#,
            r#"{ "credentialsFile": "students.xlsx" }"#,
        ] {
            std::fs::write(dir.path().join(OVERRIDES_FILE), body).expect("write");
            assert_eq!(
                RosterConfig::load_overrides(dir.path()),
                RosterConfig::default(),
                "{body}"
            );
        }
    }

    #[test]
    fn sheet_names_can_be_overridden() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(OVERRIDES_FILE),
            r#"{ "statsSheet": "by_gender" }"#,
        )
        .expect("write overrides");

        let cfg = RosterConfig::load_overrides(dir.path());
        assert_eq!(cfg.stats_sheet, "by_gender");
        assert_eq!(cfg.students_sheet, "students");
    }

    #[test]
    fn backing_files() {
        let cfg = RosterConfig::default();
        assert!(cfg.is_backing_file("students.xlsx"));
        assert!(cfg.is_backing_file(" CREDENTIALS.JSON "));
        assert!(cfg.is_backing_file(OVERRIDES_FILE));
        assert!(!cfg.is_backing_file("gender_stats.xlsx"));
    }

    #[test]
    fn bare_file_names() {
        assert!(is_bare_file_name("gender_stats.xlsx"));
        assert!(!is_bare_file_name("../x.xlsx"));
        assert!(!is_bare_file_name("a\\b.xlsx"));
        assert!(!is_bare_file_name("  "));
    }
}
