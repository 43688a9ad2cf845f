use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use path_clean::PathClean;

/// Expand `~`, make the path absolute against the current directory, and
/// clean it lexically (`.`/`..` removed, no symlink resolution).
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    if raw.is_empty() {
        bail!("path is empty");
    }

    let expanded = if raw == "~" {
        home()?
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    let abs = if expanded.is_absolute() {
        expanded
    } else {
        env::current_dir()
            .context("failed to read current directory")?
            .join(expanded)
    };
    Ok(abs.clean())
}

fn home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("cannot expand ~: home directory is unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_becomes_absolute() {
        let p = expand_path("ids.csv").unwrap();
        assert!(p.is_absolute());
        assert_eq!(p, env::current_dir().unwrap().join("ids.csv"));
    }

    #[test]
    fn dot_segments_cleaned() {
        let p = expand_path("/a/b/../c/./d.json").unwrap();
        assert_eq!(p, PathBuf::from("/a/c/d.json"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/keys/k.pem").unwrap(), home.join("keys/k.pem").clean());
            assert_eq!(expand_path("~").unwrap(), home.clean());
        }
    }

    #[test]
    fn tilde_user_form_is_not_expanded() {
        let p = expand_path("~other/x").unwrap();
        assert!(p.ends_with("~other/x"));
    }

    #[test]
    fn empty_rejected() {
        assert!(expand_path("").is_err());
    }
}
