//! Locales and translated fields

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storefront locale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub const ALL: [Self; 2] = [Self::En, Self::Ar];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ar => "ar",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale \"{0}\"")]
pub struct UnsupportedLocale(pub String);

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ar" => Ok(Self::Ar),
            _ => Err(UnsupportedLocale(value.to_string())),
        }
    }
}

/// Translated text keyed by locale code, stored as a JSONB object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, locale: Locale, value: impl Into<String>) -> Self {
        self.0.insert(locale.as_str().to_string(), value.into());
        self
    }

    /// Resolve the text for `locale`, falling back to the default locale and then to any
    /// available translation.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> &str {
        self.0
            .get(locale.as_str())
            .filter(|value| !value.is_empty())
            .or_else(|| self.0.get(Locale::default().as_str()))
            .or_else(|| self.0.values().next())
            .map_or("", String::as_str)
    }
}
