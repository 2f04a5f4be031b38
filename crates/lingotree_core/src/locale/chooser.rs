//! Locale fallback chooser.
//!
//! # Responsibility
//! - Hold the explicitly constructed fallback configuration.
//! - Produce the ordered locale chain load paths walk for "best available".
//!
//! # Invariants
//! - Configuration is validated on construction; every configured locale
//!   satisfies the codec locale rules.
//! - Chains are deduplicated first-wins and always end on the default locale.

use crate::translation::name::validate_locale;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by locale chooser construction.
pub type LocaleResult<T> = Result<T, LocaleError>;

/// Errors from locale configuration handling.
#[derive(Debug)]
pub enum LocaleError {
    /// Configured locale is empty or contains a reserved separator.
    InvalidLocale(String),
}

impl Display for LocaleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(locale) => {
                write!(f, "invalid locale `{locale}` in fallback configuration")
            }
        }
    }
}

impl Error for LocaleError {}

/// Static locale fallback configuration.
///
/// Constructed explicitly and passed to whoever needs fallback resolution;
/// there is no process-wide default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// Base locale every chain falls back to last.
    pub default_locale: String,
    /// Per-locale ordered fallback lists.
    #[serde(default)]
    pub fallbacks: BTreeMap<String, Vec<String>>,
}

impl LocaleConfig {
    /// Configuration with a default locale and no per-locale fallbacks.
    pub fn with_default(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            fallbacks: BTreeMap::new(),
        }
    }
}

/// Resolves ordered fallback chains from a [`LocaleConfig`].
#[derive(Debug, Clone)]
pub struct LocaleChooser {
    config: LocaleConfig,
}

impl LocaleChooser {
    /// Validates `config` and builds a chooser from it.
    pub fn new(config: LocaleConfig) -> LocaleResult<Self> {
        check_locale(&config.default_locale)?;
        for (locale, chain) in &config.fallbacks {
            check_locale(locale)?;
            for fallback in chain {
                check_locale(fallback)?;
            }
        }
        Ok(Self { config })
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    /// Ordered, deduplicated chain of locales to try for `locale`:
    /// the locale itself, its configured fallbacks, then the default.
    pub fn fallbacks_for(&self, locale: &str) -> Vec<String> {
        let mut chain: Vec<String> = Vec::new();
        let mut push = |candidate: &str| {
            if !chain.iter().any(|existing| existing == candidate) {
                chain.push(candidate.to_string());
            }
        };

        push(locale);
        if let Some(configured) = self.config.fallbacks.get(locale) {
            for fallback in configured {
                push(fallback);
            }
        }
        push(&self.config.default_locale);
        chain
    }
}

fn check_locale(locale: &str) -> LocaleResult<()> {
    validate_locale(locale).map_err(|_| LocaleError::InvalidLocale(locale.to_string()))
}
