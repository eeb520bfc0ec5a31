//! Read-only content store for quiz and glowtype definitions.
//!
//! # Layout
//!
//! Content lives in a configuration directory holding two JSON files:
//!
//! ```text
//! config/
//! ├── quiz.json        one quiz definition
//! └── glowtypes.json   array of glowtype profiles
//! ```
//!
//! Both files are read exactly once at startup. Any failure (missing
//! file, malformed JSON, a translation map without an `en` entry, a
//! duplicated glowtype id) is fatal: the server does not start with
//! partial content.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ContentError;
use crate::i18n::Translations;

/// File name of the quiz definition inside the config directory.
pub const QUIZ_FILE: &str = "quiz.json";

/// File name of the glowtype profiles inside the config directory.
pub const GLOWTYPES_FILE: &str = "glowtypes.json";

// ---------------------------------------------------------------------------
// Quiz definitions
// ---------------------------------------------------------------------------

/// A quiz as loaded from configuration. Immutable after load.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizDefinition {
    pub id: String,
    /// Questions in presentation sequence.
    pub questions: Vec<Question>,
}

/// A single question with all of its translations.
#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: String,
    /// Display order, passed through to clients unchanged.
    pub order: i32,
    pub translations: Translations<LocalizedQuestion>,
}

/// The text of a question in one language.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedQuestion {
    pub question: String,
    /// Option texts in their original order.
    pub options: Vec<String>,
}

// ---------------------------------------------------------------------------
// Glowtype profiles
// ---------------------------------------------------------------------------

/// A glowtype profile as loaded from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GlowtypeProfile {
    pub id: String,
    pub translations: Translations<LocalizedGlowtype>,
}

/// The text of a glowtype profile in one language.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedGlowtype {
    pub name: String,
    pub tagline: String,
    pub description: Vec<String>,
    pub self_care_tips: Vec<String>,
    pub disclaimer: String,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// All content served by the API, loaded once per process.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pub quiz: QuizDefinition,
    pub glowtypes: Vec<GlowtypeProfile>,
}

impl ContentStore {
    /// Loads and validates both content files from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ContentError> {
        let dir = dir.as_ref();
        let quiz: QuizDefinition = read_json(&dir.join(QUIZ_FILE))?;
        let glowtypes: Vec<GlowtypeProfile> = read_json(&dir.join(GLOWTYPES_FILE))?;
        let store = Self::from_parts(quiz, glowtypes)?;

        log::info!(
            "Loaded quiz '{}' ({} questions) and {} glowtype(s) from {}",
            store.quiz.id,
            store.quiz.questions.len(),
            store.glowtypes.len(),
            dir.display()
        );

        Ok(store)
    }

    /// Assembles a store from already-parsed content, rejecting the first
    /// duplicated glowtype id.
    pub fn from_parts(
        quiz: QuizDefinition,
        glowtypes: Vec<GlowtypeProfile>,
    ) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        for profile in &glowtypes {
            if !seen.insert(profile.id.as_str()) {
                return Err(ContentError::DuplicateId(profile.id.clone()));
            }
        }

        Ok(Self { quiz, glowtypes })
    }
}

/// Reads and parses one JSON document.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    let data = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: PathBuf::from(path),
        source,
    })?;

    serde_json::from_str(&data).map_err(|source| ContentError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::i18n::Locale;

    pub(crate) const SAMPLE_QUIZ: &str = r#"{
        "id": "test-quiz",
        "questions": [
            {
                "id": "q2",
                "order": 7,
                "translations": {
                    "en": { "question": "Second?", "options": ["A", "B", "C"] },
                    "zh-CN": { "question": "第二？", "options": ["甲", "乙", "丙"] }
                }
            },
            {
                "id": "q1",
                "order": 3,
                "translations": {
                    "en": { "question": "First?", "options": ["Yes", "No"] }
                }
            }
        ]
    }"#;

    pub(crate) const SAMPLE_GLOWTYPES: &str = r#"[
        {
            "id": "quiet-comet",
            "translations": {
                "en": {
                    "name": "Quiet Comet",
                    "tagline": "Soft trail",
                    "description": ["line one", "line two"],
                    "selfCareTips": ["rest"],
                    "disclaimer": "Not a diagnosis."
                },
                "zh-CN": {
                    "name": "安静彗星",
                    "tagline": "轻轻的轨迹",
                    "description": ["第一行"],
                    "selfCareTips": ["休息"],
                    "disclaimer": "不是诊断。"
                }
            }
        },
        {
            "id": "steady-ember",
            "translations": {
                "en": {
                    "name": "Steady Ember",
                    "tagline": "Warm glow",
                    "description": [],
                    "selfCareTips": [],
                    "disclaimer": "Not a diagnosis."
                }
            }
        }
    ]"#;

    /// Builds a store from the in-memory sample documents.
    pub(crate) fn sample_store() -> ContentStore {
        let quiz = serde_json::from_str(SAMPLE_QUIZ).unwrap();
        let glowtypes = serde_json::from_str(SAMPLE_GLOWTYPES).unwrap();
        ContentStore::from_parts(quiz, glowtypes).unwrap()
    }

    /// Writes the given documents into a fresh temporary directory.
    pub(crate) fn write_config(name: &str, quiz: &str, glowtypes: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "glowtype_content_test_{}_{}",
            name,
            uuid::Uuid::new_v4()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(QUIZ_FILE), quiz).unwrap();
        fs::write(dir.join(GLOWTYPES_FILE), glowtypes).unwrap();
        dir
    }

    #[test]
    fn test_load_from_directory() {
        let dir = write_config("ok", SAMPLE_QUIZ, SAMPLE_GLOWTYPES);
        let store = ContentStore::load(&dir).unwrap();

        assert_eq!(store.quiz.id, "test-quiz");
        assert_eq!(store.quiz.questions.len(), 2);
        assert_eq!(store.quiz.questions[0].id, "q2");
        assert_eq!(store.glowtypes.len(), 2);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let store = ContentStore::load(dir).unwrap();

        assert!(!store.quiz.questions.is_empty());
        assert!(store.glowtypes.iter().any(|g| g.id == "quiet-comet"));
        for question in &store.quiz.questions {
            assert!(!question.translations.get(Locale::En).options.is_empty());
        }
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = std::env::temp_dir().join(format!("glowtype_missing_{}", uuid::Uuid::new_v4()));
        let err = ContentStore::load(&dir).unwrap_err();
        assert!(matches!(err, ContentError::Read { .. }));
        assert!(err.to_string().contains(QUIZ_FILE));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = write_config("malformed", "{ not json", SAMPLE_GLOWTYPES);
        let err = ContentStore::load(&dir).unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_english_translation_is_rejected() {
        let glowtypes = r#"[{
            "id": "zh-only",
            "translations": {
                "zh-CN": {
                    "name": "名字", "tagline": "", "description": [],
                    "selfCareTips": [], "disclaimer": ""
                }
            }
        }]"#;
        let dir = write_config("no_en", SAMPLE_QUIZ, glowtypes);
        let err = ContentStore::load(&dir).unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
        assert!(err.to_string().contains(GLOWTYPES_FILE));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_duplicate_glowtype_id_is_rejected() {
        let quiz = serde_json::from_str(SAMPLE_QUIZ).unwrap();
        let mut glowtypes: Vec<GlowtypeProfile> = serde_json::from_str(SAMPLE_GLOWTYPES).unwrap();
        glowtypes.push(glowtypes[0].clone());

        let err = ContentStore::from_parts(quiz, glowtypes).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId(ref id) if id == "quiet-comet"));
    }

    #[test]
    fn test_duplicate_glowtype_id_fails_load() {
        let glowtypes = format!(
            "[{0}, {0}]",
            r#"{"id": "twin", "translations": {"en": {
                "name": "Twin", "tagline": "", "description": [],
                "selfCareTips": [], "disclaimer": ""
            }}}"#
        );
        let dir = write_config("dup", SAMPLE_QUIZ, &glowtypes);
        let err = ContentStore::load(&dir).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId(ref id) if id == "twin"));

        let _ = fs::remove_dir_all(&dir);
    }
}
