use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Scanner;
use crate::error::{MatchError, Result};

static INSTALLED: OnceLock<ScannerTable> = OnceLock::new();

/// Which integration produced a report, for kinds more than one tool can
/// produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScannerKind {
    Trivy,
    Polaris,
    Conftest,
}

impl ScannerKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScannerKind::Trivy => "Trivy",
            ScannerKind::Polaris => "Polaris",
            ScannerKind::Conftest => "Conftest",
        }
    }
}

impl fmt::Display for ScannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScannerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trivy" => Ok(ScannerKind::Trivy),
            "polaris" => Ok(ScannerKind::Polaris),
            "conftest" => Ok(ScannerKind::Conftest),
            other => Err(format!(
                "invalid scanner: {other} (expected trivy|polaris|conftest)"
            )),
        }
    }
}

/// Expected descriptor for each scanner kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScannerTable {
    pub trivy: Scanner,
    pub polaris: Scanner,
    pub conftest: Scanner,
}

impl Default for ScannerTable {
    fn default() -> Self {
        Self {
            trivy: Scanner::new("Trivy", "Aqua Security", "0.19.2"),
            polaris: Scanner::new("Polaris", "Fairwinds Ops", "4.0"),
            conftest: Scanner::new("Conftest", "Open Policy Agent", "v0.25.0"),
        }
    }
}

impl ScannerTable {
    pub fn get(&self, kind: ScannerKind) -> &Scanner {
        match kind {
            ScannerKind::Trivy => &self.trivy,
            ScannerKind::Polaris => &self.polaris,
            ScannerKind::Conftest => &self.conftest,
        }
    }

    pub fn get_mut(&mut self, kind: ScannerKind) -> &mut Scanner {
        match kind {
            ScannerKind::Trivy => &mut self.trivy,
            ScannerKind::Polaris => &mut self.polaris,
            ScannerKind::Conftest => &mut self.conftest,
        }
    }
}

/// Sets the process-wide table. Only the first call takes effect, and it
/// must happen before the first [`table`] lookup to be seen.
pub fn install(table: ScannerTable) -> Result<()> {
    match INSTALLED.set(table) {
        Ok(()) => {
            debug!("installed scanner table");
            Ok(())
        }
        Err(_) => {
            warn!("scanner table already installed; keeping the existing one");
            Err(MatchError::ScannerTableInstalled)
        }
    }
}

/// The process-wide table: the installed one, or the defaults.
pub fn table() -> &'static ScannerTable {
    INSTALLED.get_or_init(ScannerTable::default)
}

pub fn descriptor(kind: ScannerKind) -> &'static Scanner {
    table().get(kind)
}
