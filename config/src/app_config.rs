use directories::ProjectDirs;
use std::path::PathBuf;

const QUALIFIER: &str = "io";
const ORGANIZATION: &str = "mongo-exporter";
const APPLICATION: &str = "mongo-exporter";

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory searched for an optional `config.yaml`. Falls back to `.config` in the working directory.
pub fn get_config_dir() -> PathBuf {
    project_directory()
        .map(|dirs| dirs.config_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(".config"))
}
