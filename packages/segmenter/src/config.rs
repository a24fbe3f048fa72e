//! Configuration constants, splitter settings and validation.
//!
//! All budgets are expressed in *estimated tokens* (`chars / CHARS_PER_TOKEN`),
//! all overlaps in characters. Contract documents were historically budgeted
//! in characters (2000); that budget is converted once here.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SegmenterError};

/// Characters per estimated token. Biased towards CJK text, where one
/// character is roughly one third of a typical embedding-model token budget.
pub const CHARS_PER_TOKEN: usize = 3;

/// Default token budget for statutes and regulations.
pub const DEFAULT_LEGAL_MAX_TOKENS: usize = 512;

/// Default overlap (characters) for statutes and regulations.
pub const DEFAULT_LEGAL_OVERLAP: usize = 50;

/// Default token budget for contracts: 2000 characters.
pub const DEFAULT_CONTRACT_MAX_TOKENS: usize = 2000 / CHARS_PER_TOKEN;

/// Default overlap (characters) for contracts.
pub const DEFAULT_CONTRACT_OVERLAP: usize = 200;

/// Default token budget for untyped content.
pub const DEFAULT_GENERIC_MAX_TOKENS: usize = 512;

/// Default overlap (characters) for untyped content.
pub const DEFAULT_GENERIC_OVERLAP: usize = 100;

/// Maximum number of matches counted per marker type by the contract gate.
pub const CONTRACT_MARKER_SCAN_CAP: usize = 10;

/// Minimum number of structural markers before a contract is split structurally.
pub const CONTRACT_MIN_MARKERS: usize = 3;

/// Separator used when rendering `hierarchy_path`.
pub const HIERARCHY_SEPARATOR: &str = " > ";

/// Immutable configuration of a single splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterConfig {
    /// Maximum estimated tokens per segment.
    pub max_tokens: usize,

    /// Characters carried over from the previous fragment after a cut.
    pub overlap: usize,

    /// Whether the legal splitter tracks book/chapter/section context.
    pub hierarchical: bool,
}

impl SplitterConfig {
    /// Defaults for statutes and regulations.
    #[must_use]
    pub const fn legal() -> Self {
        Self {
            max_tokens: DEFAULT_LEGAL_MAX_TOKENS,
            overlap: DEFAULT_LEGAL_OVERLAP,
            hierarchical: true,
        }
    }

    /// Defaults for contracts and contract templates.
    #[must_use]
    pub const fn contract() -> Self {
        Self {
            max_tokens: DEFAULT_CONTRACT_MAX_TOKENS,
            overlap: DEFAULT_CONTRACT_OVERLAP,
            hierarchical: true,
        }
    }

    /// Defaults for untyped content.
    #[must_use]
    pub const fn generic() -> Self {
        Self {
            max_tokens: DEFAULT_GENERIC_MAX_TOKENS,
            overlap: DEFAULT_GENERIC_OVERLAP,
            hierarchical: false,
        }
    }

    /// Set the token budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the overlap in characters.
    #[must_use]
    pub fn with_overlap(mut self, overlap: usize) -> Self {
        self.overlap = overlap;
        self
    }

    /// Enable or disable hierarchy tracking.
    #[must_use]
    pub fn with_hierarchical(mut self, hierarchical: bool) -> Self {
        self.hierarchical = hierarchical;
        self
    }

    /// Apply the fields that are set in `overrides`.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &SplitterOverrides) -> Self {
        if let Some(max_tokens) = overrides.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(overlap) = overrides.overlap {
            self.overlap = overlap;
        }
        if let Some(hierarchical) = overrides.hierarchical {
            self.hierarchical = hierarchical;
        }
        self
    }

    /// Width in characters of a forced cut, i.e. the budget in characters.
    #[must_use]
    pub fn window_chars(&self) -> usize {
        self.max_tokens.saturating_mul(CHARS_PER_TOKEN)
    }

    /// Validate the configuration.
    ///
    /// # Returns
    /// * `Ok(())` if `max_tokens > 0` and the overlap is smaller than a window
    /// * `Err(SegmenterError::InvalidConfig)` otherwise
    ///
    /// # Examples
    /// ```
    /// use legal_segmenter::config::SplitterConfig;
    ///
    /// assert!(SplitterConfig::legal().validate().is_ok());
    /// assert!(SplitterConfig::legal().with_max_tokens(0).validate().is_err());
    /// assert!(SplitterConfig::legal().with_max_tokens(10).with_overlap(30).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(SegmenterError::InvalidConfig(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.window_chars() {
            return Err(SegmenterError::InvalidConfig(format!(
                "overlap ({} chars) must be smaller than the window of {} chars ({} tokens)",
                self.overlap,
                self.window_chars(),
                self.max_tokens
            )));
        }
        Ok(())
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::legal()
    }
}

/// Partial splitter configuration, as read from a settings file or the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitterOverrides {
    pub max_tokens: Option<usize>,
    pub overlap: Option<usize>,
    pub hierarchical: Option<bool>,
}

impl SplitterOverrides {
    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max_tokens.is_none() && self.overlap.is_none() && self.hierarchical.is_none()
    }
}

/// On-disk layout of a settings file.
///
/// ```yaml
/// legal:
///   max_tokens: 400
/// contract:
///   overlap: 120
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    legal: SplitterOverrides,
    contract: SplitterOverrides,
    generic: SplitterOverrides,
}

/// Configuration for every splitter the factory can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterSettings {
    pub legal: SplitterConfig,
    pub contract: SplitterConfig,
    pub generic: SplitterConfig,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            legal: SplitterConfig::legal(),
            contract: SplitterConfig::contract(),
            generic: SplitterConfig::generic(),
        }
    }
}

impl SegmenterSettings {
    /// Parse settings from YAML, filling unset fields with per-mode defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: SettingsFile = if yaml.trim().is_empty() {
            SettingsFile::default()
        } else {
            serde_yaml_ng::from_str(yaml)?
        };

        let settings = Self::default().with_overrides(&file.legal, &file.contract, &file.generic);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply overrides per splitter mode.
    #[must_use]
    pub fn with_overrides(
        self,
        legal: &SplitterOverrides,
        contract: &SplitterOverrides,
        generic: &SplitterOverrides,
    ) -> Self {
        Self {
            legal: self.legal.with_overrides(legal),
            contract: self.contract.with_overrides(contract),
            generic: self.generic.with_overrides(generic),
        }
    }

    /// Apply the same overrides to every splitter mode.
    #[must_use]
    pub fn with_global_overrides(self, overrides: &SplitterOverrides) -> Self {
        self.with_overrides(overrides, overrides, overrides)
    }

    /// Validate every splitter configuration.
    pub fn validate(&self) -> Result<()> {
        for (mode, config) in [
            ("legal", &self.legal),
            ("contract", &self.contract),
            ("generic", &self.generic),
        ] {
            config.validate().map_err(|e| match e {
                SegmenterError::InvalidConfig(msg) => {
                    SegmenterError::InvalidConfig(format!("{mode}: {msg}"))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

/// Load settings from a YAML file.
pub fn load_settings(path: &Path) -> Result<SegmenterSettings> {
    let yaml = std::fs::read_to_string(path)?;
    let settings = SegmenterSettings::from_yaml_str(&yaml)?;
    tracing::debug!(path = %path.display(), ?settings, "Loaded segmenter settings");
    Ok(settings)
}
