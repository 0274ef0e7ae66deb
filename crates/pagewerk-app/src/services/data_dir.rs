// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory resolution.

use std::path::{Path, PathBuf};

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = base_dir(
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
    .join("pagewerk");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Return a subdirectory inside the data dir (e.g. "export").
pub fn data_subdir(name: &str) -> PathBuf {
    data_dir().join(name)
}

/// `$XDG_DATA_HOME`, else `~/.local/share`, else the temp dir.
fn base_dir(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg.filter(|p| p.is_absolute()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".local").join("share");
    }
    std::env::temp_dir()
}

/// Default location of the settings file.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let dir = base_dir(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/xdg"));
    }

    #[test]
    fn relative_xdg_is_ignored() {
        let dir = base_dir(Some("rel".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.local/share"));
    }

    #[test]
    fn falls_back_to_temp() {
        assert_eq!(base_dir(None, None), std::env::temp_dir());
    }
}
