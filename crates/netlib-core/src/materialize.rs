//! Native library materialization
//!
//! The bundled library lives at `<resources>/native/<os>-<arch>/<file>`. It is
//! copied to an executable temporary file and loaded from there. Any failure
//! along the way is reported as one [`CandidateError`]; the resolution chain
//! only needs to know that the candidate failed.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::error::CandidateError;
use crate::platform::Platform;

/// Address of a function the host process supplied
#[derive(Debug, Clone, Copy)]
struct Address(*const ());

// SAFETY: code addresses are immutable for the life of the process.
unsafe impl Send for Address {}
unsafe impl Sync for Address {}

#[derive(Debug)]
enum Handle {
    Loaded(libloading::Library),
    InProcess(HashMap<String, Address>),
}

/// A loaded shared library, kept alive for the rest of the process
#[derive(Debug)]
pub struct NativeLibrary {
    handle: Handle,
    origin: PathBuf,
    // Holds the materialized copy on disk while the library is mapped.
    _materialized: Option<TempPath>,
}

impl NativeLibrary {
    /// Copy the bundled library for `platform` out of `resources_dir` and load it
    #[tracing::instrument(skip(resources_dir), fields(resources = %resources_dir.display()))]
    pub fn materialize(resources_dir: &Path, platform: &Platform, file_name: &str) -> Result<Self, CandidateError> {
        let resource = bundled_path(resources_dir, platform, file_name);
        if !resource.is_file() {
            return Err(CandidateError::materialize(resource.display(), "resource not found"));
        }

        let temp = copy_executable(&resource, file_name)
            .map_err(|err| CandidateError::materialize(resource.display(), err))?;
        tracing::debug!("Materialized {} to {}", resource.display(), temp.display());

        // SAFETY: loading runs the library's initializers; the bundled library is
        // a plain BLAS/ARPACK build with no initialization side effects we rely on.
        let library = unsafe { libloading::Library::new(temp.as_os_str()) }
            .map_err(|err| CandidateError::materialize(resource.display(), err))?;

        Ok(Self {
            handle: Handle::Loaded(library),
            origin: resource,
            _materialized: Some(temp),
        })
    }

    /// Open a library through the system dynamic loader search path
    pub fn open_system(name: impl AsRef<OsStr>) -> Result<Self, CandidateError> {
        let name = name.as_ref();
        // SAFETY: as above; system BLAS/ARPACK builds are loaded the same way a
        // linker would load them.
        let library = unsafe { libloading::Library::new(name) }.map_err(|source| CandidateError::Link {
            library: name.to_string_lossy().into_owned(),
            source,
        })?;

        Ok(Self {
            handle: Handle::Loaded(library),
            origin: PathBuf::from(name),
            _materialized: None,
        })
    }

    /// Functions the process already holds, such as a BLAS linked statically
    /// into the binary, presented under their foreign symbol names.
    ///
    /// # Safety
    ///
    /// Every address must be a function with the foreign signature of the
    /// symbol it is registered under.
    pub unsafe fn in_process<'a>(
        origin: impl Into<PathBuf>,
        symbols: impl IntoIterator<Item = (&'a str, *const ())>,
    ) -> Self {
        let symbols = symbols
            .into_iter()
            .map(|(symbol, address)| (symbol.to_string(), Address(address)))
            .collect();
        Self {
            handle: Handle::InProcess(symbols),
            origin: origin.into(),
            _materialized: None,
        }
    }

    /// Where the library came from (the resource path, not the temporary copy)
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// Look up a function symbol.
    ///
    /// # Safety
    ///
    /// `F` must be the exact foreign signature of `symbol`.
    pub unsafe fn function<F: Copy>(&self, symbol: &str) -> Option<F> {
        match &self.handle {
            Handle::Loaded(library) => library.get::<F>(symbol.as_bytes()).ok().map(|function| *function),
            Handle::InProcess(symbols) => {
                let address = symbols.get(symbol)?;
                if std::mem::size_of::<F>() != std::mem::size_of::<*const ()>() {
                    return None;
                }
                Some(std::mem::transmute_copy::<*const (), F>(&address.0))
            }
        }
    }
}

/// Location of the bundled library for `platform`
pub fn bundled_path(resources_dir: &Path, platform: &Platform, file_name: &str) -> PathBuf {
    resources_dir
        .join("native")
        .join(platform.resource_key())
        .join(file_name)
}

fn copy_executable(resource: &Path, file_name: &str) -> io::Result<TempPath> {
    let mut temp = tempfile::Builder::new()
        .prefix("netlib-")
        .suffix(&format!("-{file_name}"))
        .tempfile()?;
    io::copy(&mut File::open(resource)?, temp.as_file_mut())?;
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o750))?;
    }

    Ok(temp.into_temp_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_path_is_platform_keyed() {
        let platform = Platform { os: "linux", arch: "amd64" };
        let path = bundled_path(Path::new("/res"), &platform, "libnetlib-blas.so");
        assert_eq!(path, PathBuf::from("/res/native/linux-amd64/libnetlib-blas.so"));
    }

    #[test]
    fn missing_resource_is_a_materialize_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = NativeLibrary::materialize(dir.path(), &Platform::current(), "libnetlib-blas.so").unwrap_err();
        assert!(matches!(err, CandidateError::Materialize { .. }));
        assert!(err.to_string().contains("resource not found"));
    }

    #[test]
    fn invalid_library_is_a_materialize_failure() {
        let dir = tempfile::tempdir().unwrap();
        let platform = Platform::current();
        let resource = bundled_path(dir.path(), &platform, "libbroken.so");
        std::fs::create_dir_all(resource.parent().unwrap()).unwrap();
        std::fs::write(&resource, b"not a shared object").unwrap();

        let err = NativeLibrary::materialize(dir.path(), &platform, "libbroken.so").unwrap_err();
        assert!(matches!(err, CandidateError::Materialize { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn copy_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("payload");
        std::fs::write(&source, b"payload").unwrap();

        let copy = copy_executable(&source, "payload").unwrap();
        let mode = std::fs::metadata(&copy).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o750);
        assert_eq!(std::fs::read(&copy).unwrap(), b"payload");
    }

    #[test]
    fn in_process_symbols_resolve_by_name() {
        extern "C" fn answer() -> i32 {
            42
        }
        type AnswerFn = extern "C" fn() -> i32;

        // SAFETY: `answer_` is registered with its own signature.
        let library = unsafe { NativeLibrary::in_process("host", [("answer_", answer as AnswerFn as *const ())]) };
        assert_eq!(library.origin(), Path::new("host"));

        let found = unsafe { library.function::<AnswerFn>("answer_") }.expect("registered symbol");
        assert_eq!(found(), 42);
        assert!(unsafe { library.function::<AnswerFn>("question_") }.is_none());
    }

    #[test]
    fn unknown_system_library_is_a_link_failure() {
        let err = NativeLibrary::open_system("libnetlib-does-not-exist.so.42").unwrap_err();
        assert!(matches!(err, CandidateError::Link { .. }));
    }
}
