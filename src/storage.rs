use crate::config::{load_settings, Settings};
use crate::dataset::Dataset;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DATA_DIR: &str = ".planboard";
const DATA_FILE: &str = "data.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetScope {
    Project,
    Global,
    Explicit,
}

#[derive(Debug, Clone)]
pub struct DatasetLocation {
    pub path: PathBuf,
    pub scope: DatasetScope,
}

impl DatasetLocation {
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        DatasetLocation {
            path: path.into(),
            scope: DatasetScope::Explicit,
        }
    }

    /// Directory that also holds `config.yml`.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn settings(&self) -> Result<Settings> {
        load_settings(self.dir())
    }
}

/// Create `.planboard/data.yml` in the current directory, seeded with the
/// sample dataset unless `empty` is set. An existing file is left alone.
pub fn init_project_dataset(name: Option<String>, empty: bool) -> Result<DatasetLocation> {
    let cwd = env::current_dir()?;
    let location = DatasetLocation {
        path: cwd.join(DATA_DIR).join(DATA_FILE),
        scope: DatasetScope::Project,
    };
    let name = name.or_else(|| {
        cwd.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
    });
    init_dataset_at(&location, name, empty)?;
    Ok(location)
}

pub fn init_dataset_at(location: &DatasetLocation, name: Option<String>, empty: bool) -> Result<()> {
    if location.path.exists() {
        debug!("dataset already present at {:?}", location.path);
        return Ok(());
    }
    let dataset = if empty {
        Dataset::empty(name.unwrap_or_else(|| "project".to_string()))
    } else {
        Dataset::sample(name)?
    };
    save_dataset(location, &dataset)?;
    info!("initialized dataset at {:?}", location.path);
    Ok(())
}

pub fn locate_dataset(start: &Path) -> Result<DatasetLocation> {
    if let Some(project_path) = find_project_dataset(start) {
        return Ok(DatasetLocation {
            path: project_path,
            scope: DatasetScope::Project,
        });
    }
    let global_path = global_dataset_path()?;
    Ok(DatasetLocation {
        path: global_path,
        scope: DatasetScope::Global,
    })
}

pub fn load_dataset(location: &DatasetLocation) -> Result<Dataset> {
    if location.path.exists() {
        let data = fs::read_to_string(&location.path)
            .with_context(|| format!("reading {:?}", location.path))?;
        let dataset: Dataset = serde_yaml::from_str(&data).context("parsing dataset file")?;
        debug!(
            projects = dataset.projects.len(),
            workplans = dataset.workplans.len(),
            tasks = dataset.tasks.len(),
            "loaded dataset"
        );
        Ok(dataset)
    } else {
        let fallback_name = match location.scope {
            DatasetScope::Project | DatasetScope::Explicit => location
                .dir()
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("project")
                .to_string(),
            DatasetScope::Global => "default".to_string(),
        };
        let dataset = Dataset::empty(fallback_name);
        save_dataset(location, &dataset)?;
        Ok(dataset)
    }
}

pub fn save_dataset(location: &DatasetLocation, dataset: &Dataset) -> Result<()> {
    if let Some(parent) = location.path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let serialized = serde_yaml::to_string(dataset).context("serializing dataset")?;
    fs::write(&location.path, serialized)
        .with_context(|| format!("writing {:?}", location.path))?;
    Ok(())
}

fn find_project_dataset(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(DATA_DIR).join(DATA_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}

fn global_dataset_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "planboard").context("locating data directory")?;
    Ok(dirs.data_dir().join(DATA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Status;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn project_dataset_is_found_from_a_subdirectory() {
        let root = TempDir::new().unwrap();
        let location = DatasetLocation {
            path: root.path().join(DATA_DIR).join(DATA_FILE),
            scope: DatasetScope::Project,
        };
        init_dataset_at(&location, Some("demo".into()), false).unwrap();
        let nested = root.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = locate_dataset(&nested).unwrap();
        assert_eq!(found.scope, DatasetScope::Project);
        assert_eq!(found.path, location.path);
        assert_eq!(load_dataset(&found).unwrap().name, "demo");
    }

    #[test]
    fn save_then_load_keeps_status_changes() {
        let root = TempDir::new().unwrap();
        let location = DatasetLocation::explicit(root.path().join("data.yml"));
        init_dataset_at(&location, None, false).unwrap();
        let mut dataset = load_dataset(&location).unwrap();
        dataset.set_status("task_5", Status::Submitted).unwrap();
        save_dataset(&location, &dataset).unwrap();

        let reloaded = load_dataset(&location).unwrap();
        assert_eq!(reloaded, dataset);
        assert_eq!(
            reloaded.find("task_5").unwrap().status(),
            Some(&Status::Submitted)
        );
    }

    #[test]
    fn init_leaves_existing_data_alone() {
        let root = TempDir::new().unwrap();
        let location = DatasetLocation::explicit(root.path().join("data.yml"));
        init_dataset_at(&location, Some("first".into()), true).unwrap();
        init_dataset_at(&location, Some("second".into()), false).unwrap();
        let dataset = load_dataset(&location).unwrap();
        assert_eq!(dataset.name, "first");
        assert!(dataset.tasks.is_empty());
    }

    #[test]
    fn missing_file_is_created_empty() {
        let root = TempDir::new().unwrap();
        let location = DatasetLocation::explicit(root.path().join("nested").join("data.yml"));
        let dataset = load_dataset(&location).unwrap();
        assert!(dataset.records(None).is_empty());
        assert!(location.path.exists());
        assert_eq!(location.settings().unwrap(), Settings::default());
    }
}
