use crate::calc::{self, StatsRow};
use crate::config::{is_bare_file_name, RosterConfig};
use crate::store::{CellValue, JsonFile, Store, StoreError, Table, XlsxTableFile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const COL_ID: &str = "学号";
pub const COL_NAME: &str = "姓名";
pub const COL_GENDER: &str = "性别";
pub const COL_CLASS: &str = "班级";
pub const STUDENT_HEADER: [&str; 4] = [COL_ID, COL_NAME, COL_GENDER, COL_CLASS];

pub const STATS_HEADER: [&str; 3] = ["性别", "人数", "比例"];

/// Filter value that disables the gender and class filters.
pub const ALL: &str = "全部";

const SEED_STUDENTS: [[&str; 4]; 4] = [
    ["2023001", "张三", "男", "一班"],
    ["2023002", "李四", "女", "一班"],
    ["2023003", "王五", "男", "二班"],
    ["2023004", "赵六", "女", "二班"],
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Optional lookup criteria; empty strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub class_name: Option<String>,
}

impl StudentFilter {
    pub fn matches(&self, s: &StudentRecord) -> bool {
        if let Some(id) = supplied(&self.id) {
            if s.id != id {
                return false;
            }
        }
        if let Some(name) = supplied(&self.name) {
            if !s.name.contains(name) {
                return false;
            }
        }
        if let Some(gender) = supplied(&self.gender) {
            if gender != ALL && s.gender != gender {
                return false;
            }
        }
        if let Some(class_name) = supplied(&self.class_name) {
            if class_name != ALL && s.class_name != class_name {
                return false;
            }
        }
        true
    }
}

fn supplied(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

/// Owns every read and write of the roster workbook and the credentials file
/// inside one data directory.
#[derive(Debug, Clone)]
pub struct DataManager {
    data_dir: PathBuf,
    config: RosterConfig,
    students: XlsxTableFile,
    credentials: JsonFile<Credentials>,
}

impl DataManager {
    pub fn new(data_dir: impl Into<PathBuf>, config: RosterConfig) -> Self {
        let data_dir = data_dir.into();
        let students = XlsxTableFile::new(data_dir.join(&config.students_file));
        let credentials = JsonFile::new(data_dir.join(&config.credentials_file));
        Self {
            data_dir,
            config,
            students,
            credentials,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn students_path(&self) -> &Path {
        self.students.path()
    }

    pub fn credentials_path(&self) -> &Path {
        self.credentials.path()
    }

    /// Creates the data directory and seeds whichever backing file is missing.
    /// Existing files are never touched.
    pub fn ensure_initialized(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.data_dir)?;

        if !self.students.exists() {
            let mut table = Table::new(&self.config.students_sheet, &STUDENT_HEADER);
            for row in SEED_STUDENTS {
                table
                    .rows
                    .push(row.iter().map(|v| CellValue::text(*v)).collect());
            }
            self.students.save(&table)?;
            log::info!(
                "seeded roster with {} students at {}",
                table.rows.len(),
                self.students_path().to_string_lossy()
            );
        }

        if !self.credentials.exists() {
            self.credentials.save(&Credentials {
                username: self.config.default_username.clone(),
                password: self.config.default_password.clone(),
            })?;
            log::info!(
                "wrote default credentials to {}",
                self.credentials_path().to_string_lossy()
            );
        }
        Ok(())
    }

    /// Exact match against the stored pair. Any failure to read the
    /// credentials is a rejection.
    pub fn validate_login(&self, username: &str, password: &str) -> bool {
        match self.credentials.load() {
            Ok(c) => c.username == username && c.password == password,
            Err(e) => {
                log::debug!("login rejected, credentials unavailable: {}", e);
                false
            }
        }
    }

    pub fn change_password(&self, new_username: &str, new_password: &str) -> Result<(), StoreError> {
        self.credentials.save(&Credentials {
            username: new_username.to_string(),
            password: new_password.to_string(),
        })
    }

    pub fn load_all_students(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let table = self.students.load()?;
        let id = table.column(COL_ID);
        let name = table.column(COL_NAME);
        let gender = table.column(COL_GENDER);
        let class_name = table.column(COL_CLASS);

        Ok((0..table.rows.len())
            .map(|i| StudentRecord {
                id: table.cell(i, id),
                name: table.cell(i, name),
                gender: table.cell(i, gender),
                class_name: table.cell(i, class_name),
            })
            .collect())
    }

    pub fn find_students(&self, filter: &StudentFilter) -> Result<Vec<StudentRecord>, StoreError> {
        Ok(self
            .load_all_students()?
            .into_iter()
            .filter(|s| filter.matches(s))
            .collect())
    }

    /// Sorted distinct class names, for building a class picker.
    pub fn class_names(&self) -> Result<Vec<String>, StoreError> {
        let names: BTreeSet<String> = self
            .load_all_students()?
            .into_iter()
            .map(|s| s.class_name)
            .filter(|c| !c.is_empty())
            .collect();
        Ok(names.into_iter().collect())
    }

    pub fn stats_by_gender(&self) -> Result<Vec<StatsRow>, StoreError> {
        Ok(calc::gender_stats(&self.load_all_students()?))
    }

    /// Writes `stats` to `<data_dir>/<filename>` (default from config),
    /// replacing any existing file, and returns the absolute path.
    /// The roster, credentials and overrides files are never valid targets.
    pub fn export_stats(&self, stats: &[StatsRow], filename: Option<&str>) -> Result<PathBuf, StoreError> {
        let filename = filename.unwrap_or(self.config.export_file.as_str());
        if !is_bare_file_name(filename) {
            return Err(StoreError::InvalidName(format!(
                "{filename} is not a bare file name"
            )));
        }
        if self.config.is_backing_file(filename) {
            return Err(StoreError::InvalidName(format!(
                "{filename} is a workspace file"
            )));
        }
        let path = std::path::absolute(self.data_dir.join(filename.trim()))?;

        let mut table = Table::new(&self.config.stats_sheet, &STATS_HEADER);
        for row in stats {
            table.rows.push(vec![
                CellValue::text(row.gender.as_str()),
                CellValue::Number(row.count as f64),
                CellValue::text(row.ratio.as_str()),
            ]);
        }
        XlsxTableFile::new(path.clone()).save(&table)?;
        log::info!("exported {} stats rows to {}", stats.len(), path.to_string_lossy());
        Ok(path)
    }
}
