use std::path::{Path, PathBuf};

use anyhow::Context;
use toml::{map::Map, Value};

/// Root of the cargo workspace this crate is built in.
pub fn workspace_dir() -> anyhow::Result<PathBuf> {
    let output = std::process::Command::new(env!("CARGO"))
        .arg("locate-project")
        .arg("--workspace")
        .arg("--message-format=plain")
        .output()
        .context("failed to run cargo locate-project")?
        .stdout;
    let cargo_path = Path::new(
        std::str::from_utf8(&output)
            .context("failed to read cargo locate-project output")?
            .trim(),
    );

    cargo_path
        .parent()
        .map(Path::to_path_buf)
        .context("failed to find workspace dir")
}

pub fn load_config(config_name: &str) -> anyhow::Result<Map<String, Value>> {
    load_toml(config_name)
}

pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    load_toml("Secrets.toml")
}

fn load_toml(file_name: &str) -> anyhow::Result<Map<String, Value>> {
    let path = workspace_dir()?.join(file_name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", file_name))?;

    toml::from_str::<Map<String, Value>>(&text)
        .with_context(|| format!("failed to parse {}", file_name))
}
