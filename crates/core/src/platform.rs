//! Host platform identification.
//!
//! The names used here (`darwin`, `amd64`, ...) are the ones that appear in
//! release artifact names and tool cache keys, not Rust's target names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Platform identifier combining OS and architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system.
    pub os: Os,
    /// CPU architecture.
    pub arch: Arch,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Detect the platform this process runs on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedPlatform`] when the OS or architecture is
    /// outside the supported set.
    pub fn detect() -> Result<Self> {
        Self::from_host(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map host-reported OS and architecture names (as in
    /// `std::env::consts`) to a platform.
    pub fn from_host(os: &str, arch: &str) -> Result<Self> {
        Ok(Self {
            os: Os::from_host(os)?,
            arch: Arch::from_host(arch)?,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS.
    Darwin,
    /// Linux.
    Linux,
    /// Windows.
    Windows,
}

impl Os {
    /// Map a host OS name to a supported OS.
    pub fn from_host(value: &str) -> Result<Self> {
        match value {
            "macos" | "darwin" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(Error::unsupported_os(other)),
        }
    }

    /// Name used in artifact file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    /// 64-bit x86.
    #[serde(rename = "amd64")]
    Amd64,
    /// 64-bit ARM.
    #[serde(rename = "arm64")]
    Arm64,
    /// 32-bit x86.
    #[serde(rename = "386")]
    I386,
}

impl Arch {
    /// Map a host architecture name to a supported architecture.
    pub fn from_host(value: &str) -> Result<Self> {
        match value {
            "x86_64" | "x64" | "amd64" => Ok(Self::Amd64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            "x86" | "ia32" | "386" => Ok(Self::I386),
            other => Err(Error::unsupported_arch(other)),
        }
    }

    /// Name used in cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
            Self::I386 => "386",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
