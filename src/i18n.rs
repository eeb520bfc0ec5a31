//! Internationalization (i18n) support for the glowtype API.
//!
//! Provides locale resolution for raw language tags, locale extraction
//! from HTTP requests, and the two-tier translation lookup used by all
//! localized content.
//!
//! Supported languages: en, zh-CN.

use actix_web::{HttpRequest, http::header, web};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use utoipa::ToSchema;

/// All locales supported by the API.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::En, Locale::ZhCn];

/// A normalized locale used to select translated content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Locale {
    /// English, also the fallback for every lookup.
    #[default]
    #[serde(rename = "en")]
    En,
    /// Simplified Chinese.
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Locale {
    /// Normalizes an arbitrary language tag to a supported locale.
    ///
    /// Accepts common formats: "en-US", "zh_TW", "zh-CN,zh;q=0.9", etc.
    /// Empty input and unsupported languages resolve to English.
    pub fn resolve(tag: &str) -> Locale {
        let tag = tag.trim().to_lowercase().replace('_', "-");

        if tag.starts_with("zh") {
            Locale::ZhCn
        } else {
            // "en*", empty and unsupported tags
            Locale::En
        }
    }

    /// Returns the canonical tag, as used for translation keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::ZhCn => "zh-CN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the locale from an HTTP request.
///
/// Priority:
/// 1. `?lang=xx` query parameter (the first one wins; ignored when empty)
/// 2. `Accept-Language` header (the first tag decides)
/// 3. Fallback to `en`
pub fn extract_locale_from_request(req: &HttpRequest) -> Locale {
    // 1. Query parameter ?lang=xx
    if let Ok(pairs) = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        && let Some((_, lang)) = pairs.iter().find(|(key, _)| key == "lang")
        && !lang.trim().is_empty()
    {
        return Locale::resolve(lang);
    }

    // 2. Accept-Language header (simplified parsing)
    if let Some(accept_lang) = req.headers().get(header::ACCEPT_LANGUAGE)
        && let Ok(value) = accept_lang.to_str()
        && let Some(tag) = value
            .split(',')
            .map(|entry| entry.split(';').next().unwrap_or("").trim())
            .find(|tag| !tag.is_empty())
    {
        return Locale::resolve(tag);
    }

    // 3. Fallback
    Locale::default()
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// Returned when a translation map has no English entry.
#[derive(Debug, thiserror::Error)]
#[error("missing required \"en\" translation")]
pub struct MissingFallback;

/// A locale -> content mapping that always carries an English entry.
///
/// Deserializes from a plain JSON object keyed by locale tag. Keys other
/// than the supported locales are kept but never selected.
#[derive(Debug, Clone, Deserialize)]
#[serde(
    try_from = "HashMap<String, T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Translations<T> {
    fallback: T,
    others: HashMap<String, T>,
}

impl<T> Translations<T> {
    /// Returns the entry for exactly this locale, without fallback.
    pub fn lookup(&self, locale: Locale) -> Option<&T> {
        match locale {
            Locale::En => Some(&self.fallback),
            other => self.others.get(other.as_str()),
        }
    }

    /// Two-tier lookup: the requested locale, else English.
    pub fn get(&self, locale: Locale) -> &T {
        self.lookup(locale).unwrap_or(&self.fallback)
    }
}

impl<T> TryFrom<HashMap<String, T>> for Translations<T> {
    type Error = MissingFallback;

    fn try_from(mut entries: HashMap<String, T>) -> Result<Self, Self::Error> {
        let fallback = entries
            .remove(Locale::En.as_str())
            .ok_or(MissingFallback)?;
        Ok(Self {
            fallback,
            others: entries,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
