use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const WORK_DIR_ENV_VAR: &str = "MC_ADMIN_PATH";
const DEFAULT_DIR_NAME: &str = "mcadmin";

/// Resolve the working directory root from the process environment.
///
/// Precedence: `explicit` (`--work-dir`), then `MC_ADMIN_PATH`, then
/// `~/mcadmin`.
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    resolve_root_from(
        explicit,
        std::env::var_os(WORK_DIR_ENV_VAR),
        dirs::home_dir(),
    )
}

pub(crate) fn resolve_root_from(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    home: Option<PathBuf>,
) -> PathBuf {
    let raw = match (explicit, env_value) {
        (Some(path), _) => path.to_path_buf(),
        (None, Some(value)) if !value.is_empty() => PathBuf::from(value),
        _ => {
            return home
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_DIR_NAME)
        }
    };

    expand_home(&raw, home.as_deref())
}

/// Expand a leading `~` component against `home`.
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return path.to_path_buf();
    };

    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}
