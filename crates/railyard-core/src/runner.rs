//! Runner operating systems and per-backend runner names.

use crate::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known runner images an entry can target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum RunnerOs {
    #[serde(rename = "ubuntu-latest")]
    UbuntuLatest,
    #[serde(rename = "ubuntu-22.04")]
    Ubuntu2204,
    #[serde(rename = "ubuntu-24.04")]
    Ubuntu2404,
    #[serde(rename = "windows-latest")]
    WindowsLatest,
    #[serde(rename = "windows-2022")]
    Windows2022,
    #[serde(rename = "macos-latest")]
    MacosLatest,
    #[serde(rename = "macos-14")]
    Macos14,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Linux,
    Windows,
    Macos,
}

struct RunnerInfo {
    os: RunnerOs,
    id: &'static str,
    family: OsFamily,
    azure_image: &'static str,
}

const RUNNERS: &[RunnerInfo] = &[
    RunnerInfo {
        os: RunnerOs::UbuntuLatest,
        id: "ubuntu-latest",
        family: OsFamily::Linux,
        azure_image: "ubuntu-latest",
    },
    RunnerInfo {
        os: RunnerOs::Ubuntu2204,
        id: "ubuntu-22.04",
        family: OsFamily::Linux,
        azure_image: "ubuntu-22.04",
    },
    RunnerInfo {
        os: RunnerOs::Ubuntu2404,
        id: "ubuntu-24.04",
        family: OsFamily::Linux,
        azure_image: "ubuntu-24.04",
    },
    RunnerInfo {
        os: RunnerOs::WindowsLatest,
        id: "windows-latest",
        family: OsFamily::Windows,
        azure_image: "windows-latest",
    },
    RunnerInfo {
        os: RunnerOs::Windows2022,
        id: "windows-2022",
        family: OsFamily::Windows,
        azure_image: "windows-2022",
    },
    RunnerInfo {
        os: RunnerOs::MacosLatest,
        id: "macos-latest",
        family: OsFamily::Macos,
        azure_image: "macOS-latest",
    },
    RunnerInfo {
        os: RunnerOs::Macos14,
        id: "macos-14",
        family: OsFamily::Macos,
        azure_image: "macOS-14",
    },
];

impl RunnerOs {
    pub const ALL: &'static [RunnerOs] = &[
        RunnerOs::UbuntuLatest,
        RunnerOs::Ubuntu2204,
        RunnerOs::Ubuntu2404,
        RunnerOs::WindowsLatest,
        RunnerOs::Windows2022,
        RunnerOs::MacosLatest,
        RunnerOs::Macos14,
    ];

    fn info(&self) -> &'static RunnerInfo {
        // RUNNERS holds one row per variant, in declaration order.
        &RUNNERS[*self as usize]
    }

    pub fn as_str(&self) -> &'static str {
        self.info().id
    }

    pub fn family(&self) -> OsFamily {
        self.info().family
    }
}

impl fmt::Display for RunnerOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunnerOs {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RUNNERS
            .iter()
            .find(|info| info.id.eq_ignore_ascii_case(s))
            .map(|info| info.os)
            .ok_or_else(|| Error::InvalidDeclaration(format!("unknown runner os: {}", s)))
    }
}

/// Resolves the runner label a specific CI backend uses for an OS.
pub trait RunnerNameResolver {
    fn runner_name(&self, os: RunnerOs) -> String;
}

impl<F> RunnerNameResolver for F
where
    F: Fn(RunnerOs) -> String,
{
    fn runner_name(&self, os: RunnerOs) -> String {
        self(os)
    }
}

/// CI backends with a built-in runner lookup table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Github,
    Azure,
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Github => "github",
            Backend::Azure => "azure",
            Backend::Local => "local",
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Backend::Github),
            "azure" => Ok(Backend::Azure),
            "local" => Ok(Backend::Local),
            other => Err(Error::InvalidDeclaration(format!("unknown backend: {}", other))),
        }
    }
}

impl RunnerNameResolver for Backend {
    fn runner_name(&self, os: RunnerOs) -> String {
        match self {
            Backend::Github => os.as_str().to_string(),
            Backend::Azure => os.info().azure_image.to_string(),
            Backend::Local => {
                let family = match os.family() {
                    OsFamily::Linux => "linux",
                    OsFamily::Windows => "windows",
                    OsFamily::Macos => "macos",
                };
                format!("local-{}", family)
            }
        }
    }
}
