use anyhow::{bail, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Env-var holding an explicit database file.
pub const DB_PATH_ENV: &str = "DOCKET_DB_PATH";
/// Env-var naming the project whose database is used.
pub const PROJECT_ENV: &str = "PROJECT_ID";

/// Runtime configuration: which document database to talk to.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub project_id: Option<String>,
}

impl Config {
    /// Resolve configuration from the environment alone.
    pub fn load() -> Result<Self> {
        Self::load_for(None)
    }

    /// Resolve configuration; `project` (the `--project` flag) beats
    /// `PROJECT_ID`.
    ///
    /// Priority:
    /// 1. `DOCKET_DB_PATH` env-var (explicit override, `~` expanded)
    /// 2. per-project file under the XDG data dir
    ///    (`~/.local/share/docket/<project>.db`)
    /// 3. `./<project>.db` when no XDG dir can be located
    pub fn load_for(project: Option<&str>) -> Result<Self> {
        let project_id = project
            .map(str::to_owned)
            .or_else(|| std::env::var(PROJECT_ENV).ok())
            .filter(|p| !p.is_empty());

        // 1) explicit override
        if let Some(val) = std::env::var_os(DB_PATH_ENV) {
            let raw = val.to_string_lossy();
            let p = PathBuf::from(shellexpand::tilde(&raw).into_owned());
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            return Ok(Self {
                db_path: p,
                project_id,
            });
        }

        let Some(project_id) = project_id else {
            bail!("Missing {PROJECT_ENV} env variable");
        };
        validate_project_id(&project_id)?;
        let file_name = format!("{project_id}.db");

        // 2) XDG data dir, only when HOME / XDG_DATA_HOME can be resolved
        if std::env::var_os("HOME").is_some() || std::env::var_os("XDG_DATA_HOME").is_some() {
            if let Some(dirs) = ProjectDirs::from("io", "Docket", "docket") {
                let dir = dirs.data_dir();
                std::fs::create_dir_all(dir)?;
                return Ok(Self {
                    db_path: dir.join(file_name),
                    project_id: Some(project_id),
                });
            }
        }

        // 3) very last resort – working-directory DB
        Ok(Self {
            db_path: Path::new(&file_name).to_path_buf(),
            project_id: Some(project_id),
        })
    }
}

fn validate_project_id(id: &str) -> Result<()> {
    let ok = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !id.starts_with('.');
    if !ok {
        bail!("invalid project id `{id}` (letters, digits, '-', '_' and '.' only)");
    }
    Ok(())
}
