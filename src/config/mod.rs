use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::Scanner;
use crate::matcher::{self, OwnerReferencePolicy};
use crate::scanners::{self, ScannerKind, ScannerTable};

#[derive(Debug, Clone, Default, Serialize)]
pub struct EffectiveConfig {
    pub matcher: MatcherConfig,
    pub scanners: ScannerTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

/// Matcher settings. They reach the convenience constructors once the config
/// is installed with [`EffectiveConfig::install`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatcherConfig {
    pub allow_extra_owner_references: bool,
}

impl MatcherConfig {
    pub fn owner_reference_policy(&self) -> OwnerReferencePolicy {
        if self.allow_extra_owner_references {
            OwnerReferencePolicy::ContainsExpected
        } else {
            OwnerReferencePolicy::Exact
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    matcher: Option<RawMatcherConfig>,
    scanners: Option<RawScannersConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMatcherConfig {
    allow_extra_owner_references: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScannersConfig {
    trivy: Option<RawScanner>,
    polaris: Option<RawScanner>,
    conftest: Option<RawScanner>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScanner {
    name: Option<String>,
    vendor: Option<String>,
    version: Option<String>,
}

/// Loads settings from a TOML file. A missing `path`, or a path that does not
/// exist, yields the defaults.
pub fn load(config_path: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let Some(path) = config_path else {
        return Ok(cfg);
    };

    if path.exists() {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s)
            .with_context(|| format!("failed to parse config file (TOML): {}", path.display()))?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
        tracing::debug!(path = %path.display(), "loaded config file");
    }

    Ok(cfg)
}

impl EffectiveConfig {
    /// Makes this config's scanner descriptors and owner-reference policy the
    /// process-wide defaults.
    pub fn install(&self) -> Result<()> {
        scanners::install(self.scanners.clone()).context("failed to install scanner table")?;
        matcher::install_owner_reference_policy(self.matcher.owner_reference_policy())
            .context("failed to install owner reference policy")
    }
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(matcher) = raw.matcher {
        if let Some(allow) = matcher.allow_extra_owner_references {
            cfg.matcher.allow_extra_owner_references = allow;
        }
    }

    if let Some(scanners) = raw.scanners {
        let overrides = [
            (ScannerKind::Trivy, scanners.trivy),
            (ScannerKind::Polaris, scanners.polaris),
            (ScannerKind::Conftest, scanners.conftest),
        ];
        for (kind, raw_scanner) in overrides
            .into_iter()
            .filter_map(|(kind, raw)| raw.map(|raw| (kind, raw)))
        {
            apply_raw_scanner(cfg.scanners.get_mut(kind), raw_scanner);
        }
    }
}

fn apply_raw_scanner(scanner: &mut Scanner, raw: RawScanner) {
    if let Some(name) = raw.name {
        scanner.name = name;
    }
    if let Some(vendor) = raw.vendor {
        scanner.vendor = vendor;
    }
    if let Some(version) = raw.version {
        scanner.version = version;
    }
}
