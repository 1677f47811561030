//! Configuration module
//!
//! Each binary takes its directory and log/lock paths from the command line and
//! everything else from the environment. Values are resolved once at startup
//! and passed down explicitly; nothing here is global or mutable afterwards.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::{Captures, Regex};

use crate::constants::{
    ACCESS_TOKEN_ENV, CONVERSION_RETRY_DELAY_SECS, MAX_CONVERSION_ATTEMPTS, MAX_FILE_SIZE_MB,
    PREVIEW_OWNER,
};

const DEFAULT_API_URL: &str = "https://api.telegram.org";
const POLL_TIMEOUT_SECS: u64 = 30;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{(\w+)\}|(\w+))").expect("environment variable pattern is valid")
});

/// Intake service configuration
#[derive(Clone, Debug)]
pub struct IntakeConfig {
    /// Directory receiving the archived media. Absolute.
    pub save_dir: PathBuf,
    pub log_file: PathBuf,
    pub access_token: String,
    pub api_url: String,
    pub poll_timeout_secs: u64,
    pub max_file_size_bytes: u64,
}

impl IntakeConfig {
    /// Build the configuration from CLI values and the process environment.
    ///
    /// Fails when the access token variable is not set.
    pub fn from_env(save_dir: &str, log_file: PathBuf) -> anyhow::Result<Self> {
        Self::from_lookup(save_dir, log_file, |key| env::var(key).ok())
    }

    /// Same as [`IntakeConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(save_dir: &str, log_file: PathBuf, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ACCESS_TOKEN_ENV)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} must be set", ACCESS_TOKEN_ENV))?;

        let max_file_size_mb: u64 = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        Ok(IntakeConfig {
            save_dir: expand_path(save_dir),
            log_file,
            access_token,
            api_url: lookup("HERBIE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            poll_timeout_secs: lookup("HERBIE_POLL_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(POLL_TIMEOUT_SECS),
            max_file_size_bytes: max_file_size_mb.saturating_mul(1024 * 1024),
        })
    }
}

/// Preview scanner configuration
#[derive(Clone, Debug)]
pub struct PreviewConfig {
    /// Root of the tree to scan. Absolute.
    pub root_dir: PathBuf,
    pub log_file: PathBuf,
    pub lock_file: PathBuf,
    pub debug: bool,
    pub convert_path: String,
    pub chown_path: String,
    /// `user:group` applied to fresh previews; `None` skips the ownership step.
    pub owner: Option<String>,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl PreviewConfig {
    pub fn from_env(root_dir: &str, log_file: PathBuf, lock_file: PathBuf, debug: bool) -> Self {
        Self::from_lookup(root_dir, log_file, lock_file, debug, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(
        root_dir: &str,
        log_file: PathBuf,
        lock_file: PathBuf,
        debug: bool,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let owner = lookup("PREVIEW_OWNER").unwrap_or_else(|| PREVIEW_OWNER.to_string());

        PreviewConfig {
            root_dir: expand_path(root_dir),
            log_file,
            lock_file,
            debug,
            convert_path: lookup("CONVERT_PATH").unwrap_or_else(|| "convert".to_string()),
            chown_path: lookup("CHOWN_PATH").unwrap_or_else(|| "chown".to_string()),
            owner: if owner.trim().is_empty() {
                None
            } else {
                Some(owner)
            },
            max_attempts: lookup("PREVIEW_MAX_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(MAX_CONVERSION_ATTEMPTS),
            retry_delay: Duration::from_secs(
                lookup("PREVIEW_RETRY_DELAY_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(CONVERSION_RETRY_DELAY_SECS),
            ),
        }
    }
}

/// Expand `$VAR`/`${VAR}` references and a leading `~`, then make the path absolute.
///
/// Unset variables are left untouched.
pub fn expand_path(raw: &str) -> PathBuf {
    let with_vars = ENV_VAR_RE.replace_all(raw, |caps: &Captures| {
        let name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();
        env::var(name).unwrap_or_else(|_| caps[0].to_string())
    });
    let expanded = expand_home(&with_vars);
    std::path::absolute(&expanded).unwrap_or(expanded)
}

fn expand_home(path: &str) -> PathBuf {
    let home = match env::var("HOME") {
        Ok(home) if !home.is_empty() => home,
        _ => return PathBuf::from(path),
    };
    if path == "~" {
        PathBuf::from(home)
    } else if let Some(rest) = path.strip_prefix("~/") {
        Path::new(&home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_intake_config_requires_token() {
        let result = IntakeConfig::from_lookup("/srv/photos", "bot.log".into(), lookup_from(&[]));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("HERBIE_ACCESS_TOKEN"));
    }

    #[test]
    fn test_intake_config_defaults() {
        let config = IntakeConfig::from_lookup(
            "/srv/photos",
            "bot.log".into(),
            lookup_from(&[("HERBIE_ACCESS_TOKEN", "123:abc")]),
        )
        .unwrap();

        assert_eq!(config.save_dir, PathBuf::from("/srv/photos"));
        assert_eq!(config.access_token, "123:abc");
        assert_eq!(config.api_url, "https://api.telegram.org");
        assert_eq!(config.max_file_size_bytes, 20 * 1024 * 1024);
        assert_eq!(config.poll_timeout_secs, 30);
    }

    #[test]
    fn test_huge_file_size_limit_saturates() {
        let config = IntakeConfig::from_lookup(
            "/srv/photos",
            "bot.log".into(),
            lookup_from(&[
                ("HERBIE_ACCESS_TOKEN", "123:abc"),
                ("MAX_FILE_SIZE_MB", "18446744073709551615"),
            ]),
        )
        .unwrap();
        assert_eq!(config.max_file_size_bytes, u64::MAX);
    }

    #[test]
    fn test_preview_config_defaults() {
        let config = PreviewConfig::from_lookup(
            "/data/pictures",
            "image_preview.log".into(),
            "image_preview.lock".into(),
            false,
            lookup_from(&[]),
        );

        assert_eq!(config.root_dir, PathBuf::from("/data/pictures"));
        assert_eq!(config.convert_path, "convert");
        assert_eq!(config.owner.as_deref(), Some("nobody:nogroup"));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_preview_config_empty_owner_disables_chown() {
        let config = PreviewConfig::from_lookup(
            "/data",
            "a.log".into(),
            "a.lock".into(),
            true,
            lookup_from(&[("PREVIEW_OWNER", ""), ("PREVIEW_RETRY_DELAY_SECS", "0")]),
        );

        assert!(config.owner.is_none());
        assert!(config.debug);
        assert_eq!(config.retry_delay, Duration::ZERO);
    }

    #[test]
    fn test_expand_path_keeps_unset_variables() {
        let path = expand_path("/tmp/$HERBIE_SURELY_UNSET_VAR/x");
        assert_eq!(path, PathBuf::from("/tmp/$HERBIE_SURELY_UNSET_VAR/x"));
    }

    #[test]
    fn test_expand_path_makes_relative_absolute() {
        let path = expand_path("some/relative/dir");
        assert!(path.is_absolute());
        assert!(path.ends_with("some/relative/dir"));
    }
}
