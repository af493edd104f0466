//! Native backend configuration
//!
//! # Environment Variables
//!
//! For a facade prefix `P` (`NETLIB_BLAS`, `NETLIB_ARPACK`):
//!
//! - `P_ALLOW_NATIVE` - `false`, `0` or `no` skips both native candidates
//! - `P_NATIVE_LIB` - library name opened by the alternate bridge
//! - `P_NATIVE_LIB_PATH` - explicit library path for the alternate bridge (wins over the name)
//! - `NETLIB_RESOURCES_DIR` - root of the bundled resource tree

use std::env;
use std::path::PathBuf;

use crate::error::CandidateError;

/// Environment variable locating the bundled resource tree
pub const RESOURCES_DIR_VAR: &str = "NETLIB_RESOURCES_DIR";

/// Where and whether to load native backends for one facade
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeConfig {
    /// Environment prefix this configuration was read with
    pub prefix: String,
    /// When false, native candidates fail immediately
    pub allow_native: bool,
    /// Library name handed to the dynamic loader by the alternate bridge
    pub library_name: String,
    /// Explicit library path for the alternate bridge
    pub library_path: Option<PathBuf>,
    /// Root of the bundled `native/<os>-<arch>/` tree
    pub resources_dir: PathBuf,
    /// File name of the bundled library, without platform decoration
    pub bundled_name: String,
}

impl NativeConfig {
    /// Defaults without consulting the environment
    pub fn new(prefix: &str, library_name: &str, bundled_name: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            allow_native: true,
            library_name: library_name.to_string(),
            library_path: None,
            resources_dir: default_resources_dir(),
            bundled_name: bundled_name.to_string(),
        }
    }

    /// Defaults overridden by `<prefix>_*` environment variables
    pub fn from_env(prefix: &str, library_name: &str, bundled_name: &str) -> Self {
        let mut config = Self::new(prefix, library_name, bundled_name);

        if let Ok(allow) = env::var(config.allow_variable()) {
            config.allow_native = !(allow.eq_ignore_ascii_case("false")
                || allow == "0"
                || allow.eq_ignore_ascii_case("no"));
        }

        if let Ok(name) = env::var(format!("{prefix}_NATIVE_LIB")) {
            if !name.trim().is_empty() {
                config.library_name = name;
            }
        }

        if let Ok(path) = env::var(format!("{prefix}_NATIVE_LIB_PATH")) {
            if !path.trim().is_empty() {
                config.library_path = Some(PathBuf::from(path));
            }
        }

        if let Ok(dir) = env::var(RESOURCES_DIR_VAR) {
            if !dir.trim().is_empty() {
                config.resources_dir = PathBuf::from(dir);
            }
        }

        config
    }

    pub fn allow_variable(&self) -> String {
        format!("{}_ALLOW_NATIVE", self.prefix)
    }

    /// Gate for native candidates
    pub fn ensure_native_allowed(&self) -> Result<(), CandidateError> {
        if self.allow_native {
            Ok(())
        } else {
            Err(CandidateError::NativeDisabled {
                variable: self.allow_variable(),
            })
        }
    }

    /// Platform file name of the bundled library, e.g. `libnetlib-blas.so`
    pub fn bundled_file_name(&self) -> String {
        format!("{}{}{}", env::consts::DLL_PREFIX, self.bundled_name, env::consts::DLL_SUFFIX)
    }

    /// What the alternate bridge hands to the dynamic loader
    pub fn system_library(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.library_name))
    }
}

fn default_resources_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
        .unwrap_or_else(|| PathBuf::from("resources"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const PREFIX: &str = "NETLIB_CONFIG_TEST";

    fn reset_env() {
        for key in ["ALLOW_NATIVE", "NATIVE_LIB", "NATIVE_LIB_PATH"] {
            env::remove_var(format!("{PREFIX}_{key}"));
        }
        env::remove_var(RESOURCES_DIR_VAR);
    }

    #[test]
    fn defaults_allow_native() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        let config = NativeConfig::from_env(PREFIX, "libblas.so.3", "netlib-blas");
        assert!(config.allow_native);
        assert_eq!(config.library_name, "libblas.so.3");
        assert_eq!(config.system_library(), PathBuf::from("libblas.so.3"));
        assert!(config.ensure_native_allowed().is_ok());
    }

    #[test]
    fn environment_overrides() {
        let _guard = ENV_LOCK.lock().unwrap();
        reset_env();
        env::set_var(format!("{PREFIX}_ALLOW_NATIVE"), "no");
        env::set_var(format!("{PREFIX}_NATIVE_LIB"), "libopenblas.so.0");
        env::set_var(format!("{PREFIX}_NATIVE_LIB_PATH"), "/opt/blas/libblas.so");
        env::set_var(RESOURCES_DIR_VAR, "/srv/netlib");

        let config = NativeConfig::from_env(PREFIX, "libblas.so.3", "netlib-blas");
        assert!(!config.allow_native);
        assert_eq!(config.library_name, "libopenblas.so.0");
        assert_eq!(config.system_library(), PathBuf::from("/opt/blas/libblas.so"));
        assert_eq!(config.resources_dir, PathBuf::from("/srv/netlib"));
        assert!(matches!(
            config.ensure_native_allowed(),
            Err(CandidateError::NativeDisabled { .. })
        ));
        reset_env();
    }

    #[test]
    fn bundled_file_name_is_decorated() {
        let config = NativeConfig::new(PREFIX, "libblas.so.3", "netlib-blas");
        let name = config.bundled_file_name();
        assert!(name.contains("netlib-blas"));
        assert!(name.ends_with(env::consts::DLL_SUFFIX));
    }
}
