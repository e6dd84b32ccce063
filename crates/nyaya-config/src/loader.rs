// SPDX-FileCopyrightText: 2026 Nyaya Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./nyaya.toml` > `~/.config/nyaya/nyaya.toml` > `/etc/nyaya/nyaya.toml`,
//! with `NYAYA_*` environment variables on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::NyayaConfig;

/// Config sections that an environment key may address.
const SECTIONS: &[&str] = &[
    "agent",
    "storage",
    "classifier",
    "learning",
    "feedback",
    "patterns",
    "conversation",
    "advice",
    "knowledge",
];

/// Candidate config files, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/nyaya/nyaya.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("nyaya").join("nyaya.toml"));
    }
    paths.push(PathBuf::from("nyaya.toml"));
    paths
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. Each file from [`config_file_candidates`] that exists
/// 3. `NYAYA_*` environment variables
pub fn load_config() -> Result<NyayaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<NyayaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NyayaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, still honouring env overrides.
pub fn load_config_from_path(path: &Path) -> Result<NyayaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NyayaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    config_file_candidates()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(NyayaConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Map `NYAYA_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `NYAYA_LEARNING_MAX_OFFSET` maps to `learning.max_offset`.
pub fn env_key_to_path(key: &str) -> String {
    let lower = key.to_lowercase();
    for section in SECTIONS {
        if let Some(rest) = lower.strip_prefix(section) {
            if let Some(field) = rest.strip_prefix('_') {
                return format!("{section}.{field}");
            }
        }
    }
    lower
}

fn env_provider() -> Env {
    Env::prefixed("NYAYA_").map(|key| env_key_to_path(key.as_str()).into())
}
