//! Quiz rendering and scoring.
//!
//! The quiz is stored with all translations side by side; [`QuizService`]
//! projects it into a single language on every request. Scoring goes
//! through the [`QuizScorer`] trait so the placeholder implementation can
//! be replaced without touching the API layer.

use std::collections::HashMap;

use crate::content::QuizDefinition;
use crate::glowtype::GlowtypeService;
use crate::i18n::Locale;
use crate::types::{QuizAnswer, QuizOptionDto, QuizQuestionDto, QuizResponse, QuizScoreResponse};

/// Glowtype id returned by [`PlaceholderScorer`] for every submission.
pub const PLACEHOLDER_GLOWTYPE_ID: &str = "quiet-comet";

/// Maps a set of answers to a glowtype.
pub trait QuizScorer: Send + Sync {
    /// Scores the answers given for `quiz`.
    fn score(&self, quiz: &QuizDefinition, answers: &[QuizAnswer]) -> QuizScoreResponse;

    /// The glowtype ids this scorer can produce, for startup validation.
    fn possible_results(&self) -> Vec<&str>;
}

/// Returns [`PLACEHOLDER_GLOWTYPE_ID`] regardless of the answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderScorer;

impl QuizScorer for PlaceholderScorer {
    fn score(&self, _quiz: &QuizDefinition, _answers: &[QuizAnswer]) -> QuizScoreResponse {
        QuizScoreResponse {
            glowtype_id: PLACEHOLDER_GLOWTYPE_ID.to_string(),
            score_details: HashMap::new(),
        }
    }

    fn possible_results(&self) -> Vec<&str> {
        vec![PLACEHOLDER_GLOWTYPE_ID]
    }
}

/// Serves the stored quiz in any supported language.
pub struct QuizService {
    quiz: QuizDefinition,
    scorer: Box<dyn QuizScorer>,
}

impl QuizService {
    /// Creates a service using the placeholder scorer.
    pub fn new(quiz: QuizDefinition) -> Self {
        Self::with_scorer(quiz, Box::new(PlaceholderScorer))
    }

    /// Creates a service with a custom scorer.
    pub fn with_scorer(quiz: QuizDefinition, scorer: Box<dyn QuizScorer>) -> Self {
        Self { quiz, scorer }
    }

    /// Renders the quiz in `locale`, falling back to English per question.
    ///
    /// Questions keep their stored sequence and `order` values. Option ids
    /// are synthesized as `o1..oN` in the original option order.
    pub fn get_quiz(&self, locale: Locale) -> QuizResponse {
        let questions = self
            .quiz
            .questions
            .iter()
            .map(|q| {
                let loc = q.translations.get(locale);
                let options = loc
                    .options
                    .iter()
                    .enumerate()
                    .map(|(idx, text)| QuizOptionDto {
                        id: format!("o{}", idx + 1),
                        text: text.clone(),
                    })
                    .collect();

                QuizQuestionDto {
                    id: q.id.clone(),
                    order: q.order,
                    question: loc.question.clone(),
                    options,
                }
            })
            .collect();

        QuizResponse {
            quiz_id: self.quiz.id.clone(),
            language: locale,
            questions,
        }
    }

    /// Scores a submission. The quiz id and locale are accepted for future
    /// scorers and currently only logged.
    pub fn score_quiz(
        &self,
        answers: &[QuizAnswer],
        quiz_id: &str,
        locale: Locale,
    ) -> QuizScoreResponse {
        if !quiz_id.is_empty() && quiz_id != self.quiz.id {
            log::warn!(
                "Score request for unknown quiz '{}' (serving '{}')",
                quiz_id,
                self.quiz.id
            );
        }

        let result = self.scorer.score(&self.quiz, answers);
        log::debug!(
            "Scored {} answer(s) [{}] -> {}",
            answers.len(),
            locale,
            result.glowtype_id
        );
        result
    }

    /// The glowtype ids the configured scorer can return.
    pub fn possible_results(&self) -> Vec<&str> {
        self.scorer.possible_results()
    }

    /// Results the scorer can return that have no configured profile.
    pub fn unconfigured_results(&self, glowtypes: &GlowtypeService) -> Vec<String> {
        self.possible_results()
            .into_iter()
            .filter(|result| glowtypes.ids().all(|id| id != *result))
            .map(str::to_string)
            .collect()
    }

    /// Number of stored questions.
    pub fn question_count(&self) -> usize {
        self.quiz.questions.len()
    }

    /// Questions lacking an entry for `locale` (served in English instead).
    pub fn untranslated(&self, locale: Locale) -> Vec<&str> {
        self.quiz
            .questions
            .iter()
            .filter(|q| q.translations.lookup(locale).is_none())
            .map(|q| q.id.as_str())
            .collect()
    }
}
