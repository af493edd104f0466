//! Error types shared by every facade
//!
//! Validation failures ([`NetlibError::IllegalArgument`], [`NetlibError::IndexOutOfBounds`],
//! [`NetlibError::NullBuffer`]) are raised before any backend code runs. Resolution
//! failures of individual candidates are [`CandidateError`]s and never reach callers
//! of numeric routines; only an exhausted native-only chain surfaces, as
//! [`NetlibError::NativeUnavailable`].

use std::fmt;

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, NetlibError>;

/// Fortran-style routine identifier, e.g. `DGEMM`.
///
/// The precision prefix is kept separate from the base name so that generic
/// facade code can name the routine it validates without allocating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Routine {
    prefix: Option<char>,
    base: &'static str,
}

impl Routine {
    /// Routine with a precision prefix (`D`, `S`, `I`, ...)
    pub const fn new(prefix: char, base: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            base,
        }
    }

    /// Routine whose name carries no precision prefix (`ICNTEQ`, `ISWAP`)
    pub const fn plain(base: &'static str) -> Self {
        Self { prefix: None, base }
    }

    pub fn prefix(&self) -> Option<char> {
        self.prefix
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    /// Lower-case Fortran link symbol, e.g. `dgemm_`
    pub fn symbol(&self) -> String {
        let mut symbol = String::with_capacity(self.base.len() + 2);
        if let Some(prefix) = self.prefix {
            symbol.push(prefix.to_ascii_lowercase());
        }
        symbol.push_str(&self.base.to_ascii_lowercase());
        symbol.push('_');
        symbol
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{}", prefix.to_ascii_uppercase())?;
        }
        f.write_str(self.base)
    }
}

/// Errors surfaced to callers of facade routines
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetlibError {
    /// A scalar argument violated the routine's contract (XERBLA convention)
    #[error("** On entry to '{routine}' parameter number {position} had an illegal value")]
    IllegalArgument { routine: Routine, position: u32 },

    /// A buffer is shorter than the extent implied by offset, count and stride
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    /// A required buffer was absent
    #[error("required buffer `{name}` is absent")]
    NullBuffer { name: &'static str },

    /// The resolved native library does not export the routine
    #[error("symbol for {routine} isn't available in native library")]
    Unsupported { routine: Routine },

    /// Every native candidate failed for a native-only facade
    #[error("Unable to load native implementation for {facade}")]
    NativeUnavailable { facade: &'static str },
}

impl NetlibError {
    /// Create a parameter-legality error
    pub fn illegal_argument(routine: Routine, position: u32) -> Self {
        Self::IllegalArgument { routine, position }
    }

    /// Create a bounds error
    pub fn out_of_bounds(index: usize, length: usize) -> Self {
        Self::IndexOutOfBounds { index, length }
    }

    /// Create a nullness error
    pub fn null_buffer(name: &'static str) -> Self {
        Self::NullBuffer { name }
    }

    /// Create an unsupported-routine error
    pub fn unsupported(routine: Routine) -> Self {
        Self::Unsupported { routine }
    }

    /// True for the three validation kinds
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::IllegalArgument { .. } | Self::IndexOutOfBounds { .. } | Self::NullBuffer { .. }
        )
    }
}

/// Why a single resolution candidate could not be constructed.
///
/// These are absorbed by the resolution chain and logged; callers never see them.
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    /// Native loading was disabled through configuration
    #[error("native backends disabled by {variable}")]
    NativeDisabled { variable: String },

    /// The bundled library could not be located, copied or loaded
    #[error("failed to materialize {resource}: {reason}")]
    Materialize { resource: String, reason: String },

    /// A shared library could not be opened
    #[error("failed to open {library}: {source}")]
    Link {
        library: String,
        #[source]
        source: libloading::Error,
    },

    /// The host platform has no native build
    #[error("unsupported platform {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// A named optional component was not registered
    #[error("component `{name}` is not available")]
    MissingComponent { name: String },

    /// The runtime level is below what the candidate needs
    #[error("requires runtime level {required}, detected {detected}")]
    RuntimeLevel { required: String, detected: String },

    /// The library loaded but lacks every routine of the facade
    #[error("library {library} exports none of the expected symbols")]
    EmptyLibrary { library: String },
}

impl CandidateError {
    /// Create a materialization error
    pub fn materialize(resource: impl fmt::Display, reason: impl fmt::Display) -> Self {
        Self::Materialize {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a missing-component error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingComponent { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_argument_message_follows_xerbla() {
        let err = NetlibError::illegal_argument(Routine::new('D', "GEMM"), 8);
        assert_eq!(
            err.to_string(),
            "** On entry to 'DGEMM' parameter number 8 had an illegal value"
        );
    }

    #[test]
    fn plain_routine_has_no_prefix() {
        let routine = Routine::plain("ICNTEQ");
        assert_eq!(routine.to_string(), "ICNTEQ");
        assert_eq!(routine.symbol(), "icnteq_");
    }

    #[test]
    fn prefixed_symbol_is_lower_case() {
        assert_eq!(Routine::new('S', "AXPY").symbol(), "saxpy_");
    }

    #[test]
    fn contract_kinds_are_distinguished() {
        assert!(NetlibError::out_of_bounds(4, 4).is_contract_violation());
        assert!(NetlibError::null_buffer("x").is_contract_violation());
        assert!(!NetlibError::NativeUnavailable { facade: "BLAS" }.is_contract_violation());
    }
}
