//! Glowtype profile lookup.

use crate::content::GlowtypeProfile;
use crate::i18n::Locale;
use crate::types::GlowtypeResponse;

/// Returned when no profile has the requested id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("glowtype not found: {0}")]
pub struct GlowtypeNotFound(pub String);

/// Serves glowtype profiles in any supported language.
pub struct GlowtypeService {
    items: Vec<GlowtypeProfile>,
}

impl GlowtypeService {
    pub fn new(items: Vec<GlowtypeProfile>) -> Self {
        Self { items }
    }

    /// Looks up a profile by id and renders it in `locale`, falling back
    /// to English when the profile has no entry for that locale.
    pub fn get_glowtype(
        &self,
        id: &str,
        locale: Locale,
    ) -> Result<GlowtypeResponse, GlowtypeNotFound> {
        let item = self
            .items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| GlowtypeNotFound(id.to_string()))?;

        let loc = item.translations.get(locale);
        Ok(GlowtypeResponse {
            id: item.id.clone(),
            language: locale,
            name: loc.name.clone(),
            tagline: loc.tagline.clone(),
            description: loc.description.clone(),
            self_care_tips: loc.self_care_tips.clone(),
            disclaimer: loc.disclaimer.clone(),
        })
    }

    /// All profile ids, in stored order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    /// Profiles lacking an entry for `locale` (served in English instead).
    pub fn untranslated(&self, locale: Locale) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.translations.lookup(locale).is_none())
            .map(|item| item.id.as_str())
            .collect()
    }
}
