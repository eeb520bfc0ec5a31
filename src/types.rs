//! Request and response types for the glowtype API.
//!
//! Every type here is part of the JSON protocol: field names are
//! camelCase on the wire, and all localized responses carry the resolved
//! `language` they were produced in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::i18n::Locale;

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

/// A quiz rendered in a single language.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    /// Identifier of the quiz definition.
    pub quiz_id: String,
    /// The locale the quiz was rendered in.
    pub language: Locale,
    /// Questions in their stored sequence.
    pub questions: Vec<QuizQuestionDto>,
}

/// One localized question.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionDto {
    pub id: String,
    /// Display order as stored in the quiz definition.
    pub order: i32,
    pub question: String,
    pub options: Vec<QuizOptionDto>,
}

/// One answer option. Ids are `o1`, `o2`, ... in option order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuizOptionDto {
    pub id: String,
    pub text: String,
}

/// A single selected answer.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: String,
    pub option_id: String,
}

/// Body of `POST /quiz/score`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizScoreRequest {
    #[serde(default)]
    pub quiz_id: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
}

/// Result of scoring a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizScoreResponse {
    /// The glowtype the answers map to.
    pub glowtype_id: String,
    /// Free-form scoring details, reserved for future scoring algorithms.
    #[schema(value_type = Object)]
    pub score_details: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Glowtype
// ---------------------------------------------------------------------------

/// A glowtype profile rendered in a single language.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlowtypeResponse {
    pub id: String,
    pub language: Locale,
    pub name: String,
    pub tagline: String,
    pub description: Vec<String>,
    pub self_care_tips: Vec<String>,
    pub disclaimer: String,
}

// ---------------------------------------------------------------------------
// Help
// ---------------------------------------------------------------------------

/// Crisis resources for one language.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HelpResponse {
    pub language: Locale,
    pub crisis_disclaimer: String,
    pub hotlines: Vec<HotlineInfo>,
}

/// A single crisis hotline.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HotlineInfo {
    pub name: String,
    pub phone: String,
    pub website: String,
    pub note: String,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Optional body of `POST /chat/session`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionRequest {
    #[serde(default)]
    pub language: String,
    /// The glowtype the user arrived from, if any.
    #[serde(default)]
    pub glowtype_id: Option<String>,
}

/// A freshly created anonymous chat session.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionResponse {
    pub session_id: String,
}

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub language: String,
}

/// A chat reply with its safety notice.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub reply: String,
    pub safety_notice: Option<String>,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Liveness response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
