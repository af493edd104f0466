//! Host platform and managed runtime level
//!
//! The native materializer keys resources by `<os>-<arch>`; the managed
//! fallback chain keys its candidates by [`RuntimeLevel`].

use std::env;
use std::fmt;
use std::sync::OnceLock;

#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
use std::arch::is_x86_feature_detected;

/// Environment variable overriding the detected runtime level
pub const RUNTIME_LEVEL_VAR: &str = "NETLIB_RUNTIME_LEVEL";

/// Operating system and CPU architecture of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: &'static str,
    pub arch: &'static str,
}

impl Platform {
    pub fn current() -> Self {
        Self {
            os: env::consts::OS,
            arch: normalize_arch(env::consts::ARCH),
        }
    }

    /// Directory name under `native/` holding this platform's libraries
    pub fn resource_key(&self) -> String {
        format!("{}-{}", self.os, self.arch)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

fn normalize_arch(arch: &'static str) -> &'static str {
    match arch {
        "x86_64" => "amd64",
        "x86" => "i386",
        "powerpc64" => "ppc64le",
        other => other,
    }
}

/// Capability tier used to pick among managed backends.
///
/// Ordered from oldest to newest; a backend requiring a tier accepts every
/// tier at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuntimeLevel {
    /// Portable scalar code only
    Baseline,
    /// Loop-unrolled code the compiler can auto-vectorize
    Vector,
    /// Explicit SIMD intrinsics (AVX2 + FMA)
    Simd,
}

impl RuntimeLevel {
    /// Parse an override value. `None` means the value was not understood.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "baseline" | "scalar" | "0" => Some(Self::Baseline),
            "vector" | "unrolled" | "1" => Some(Self::Vector),
            "simd" | "avx2" | "2" => Some(Self::Simd),
            _ => None,
        }
    }

    /// Combine an optional override with the detected level.
    ///
    /// An absent override defers to detection; an unparsable one assumes
    /// [`RuntimeLevel::Baseline`].
    pub fn from_override(value: Option<&str>, detected: RuntimeLevel) -> Self {
        match value {
            None => detected,
            Some(value) => Self::parse(value).unwrap_or(Self::Baseline),
        }
    }

    /// Level supported by the host CPU
    pub fn detect() -> Self {
        static DETECTED: OnceLock<RuntimeLevel> = OnceLock::new();
        *DETECTED.get_or_init(|| {
            let level = detect_cpu();
            tracing::debug!(?level, "Detected runtime level");
            level
        })
    }

    /// Detected level, adjusted by `NETLIB_RUNTIME_LEVEL`
    pub fn current() -> Self {
        let value = env::var(RUNTIME_LEVEL_VAR).ok();
        Self::from_override(value.as_deref(), Self::detect())
    }
}

impl fmt::Display for RuntimeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Baseline => "baseline",
            Self::Vector => "vector",
            Self::Simd => "simd",
        })
    }
}

/// True when the AVX2 and FMA instruction sets are usable
pub fn has_avx2_fma() -> bool {
    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
        static CAPS: OnceLock<bool> = OnceLock::new();
        *CAPS.get_or_init(|| is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"))
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "x86")))]
    {
        false
    }
}

fn detect_cpu() -> RuntimeLevel {
    if has_avx2_fma() {
        return RuntimeLevel::Simd;
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
    {
        if is_x86_feature_detected!("sse2") {
            return RuntimeLevel::Vector;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            return RuntimeLevel::Vector;
        }
    }

    RuntimeLevel::Baseline
}
