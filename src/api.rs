//! REST API for the glowtype service.
//!
//! This module exposes:
//! - The quiz in the caller's language, and quiz scoring
//! - Glowtype result profiles
//! - Crisis-help resources
//! - Anonymous chat sessions with canned replies
//!
//! GET endpoints pick their language from `?lang=`, then the
//! `Accept-Language` header, then English. POST endpoints take the
//! language from the request body.
//!
//! The API is documented with OpenAPI/Swagger via `utoipa`.
//! Swagger UI is available at `/swagger-ui/`.

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use utoipa::OpenApi;

use crate::chat::{ChatProviderKind, ChatService, SessionStore};
use crate::content::ContentStore;
use crate::error::ApiError;
use crate::glowtype::GlowtypeService;
use crate::help::HelpService;
use crate::i18n::{Locale, extract_locale_from_request};
use crate::quiz::QuizService;
use crate::types::*;

/// Shared application state holding every service.
///
/// Wrapped in `web::Data` (an `Arc`) and shared across all workers. Only
/// the chat session store is mutable; it carries its own lock.
pub struct AppState {
    pub quiz: QuizService,
    pub glowtypes: GlowtypeService,
    pub help: HelpService,
    pub chat: ChatService,
    /// Deployment environment name reported by `/health`.
    pub environment: String,
}

impl AppState {
    /// Builds all services from loaded content.
    pub fn new(content: ContentStore, chat_provider: ChatProviderKind, environment: &str) -> Self {
        let quiz = QuizService::new(content.quiz);
        let glowtypes = GlowtypeService::new(content.glowtypes);

        for result in quiz.unconfigured_results(&glowtypes) {
            log::warn!("Quiz can score to '{}' but no such glowtype is configured", result);
        }

        Self {
            quiz,
            glowtypes,
            help: HelpService::new(),
            chat: ChatService::new(SessionStore::new(), chat_provider.build()),
            environment: environment.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAPI definition
// ---------------------------------------------------------------------------

/// OpenAPI documentation for the glowtype API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Glowtype API",
        version = "0.1.0",
        description = "Localized quiz, glowtype result profiles, crisis-help resources \
            and an anonymous chat stub. Content is available in English and Simplified \
            Chinese; unsupported languages fall back to English.",
        license(name = "MIT")
    ),
    paths(
        health,
        get_quiz,
        score_quiz,
        get_glowtype,
        create_chat_session,
        send_chat_message,
        get_help,
    ),
    components(schemas(
        Locale,
        HealthResponse,
        QuizResponse,
        QuizQuestionDto,
        QuizOptionDto,
        QuizAnswer,
        QuizScoreRequest,
        QuizScoreResponse,
        GlowtypeResponse,
        HelpResponse,
        HotlineInfo,
        ChatSessionRequest,
        ChatSessionResponse,
        ChatMessageRequest,
        ChatMessageResponse,
        ErrorResponse,
    )),
    tags(
        (name = "quiz", description = "Quiz content and scoring"),
        (name = "glowtypes", description = "Glowtype result profiles"),
        (name = "chat", description = "Anonymous chat"),
        (name = "help", description = "Crisis resources"),
        (name = "system", description = "Service health"),
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// Liveness check.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    )
)]
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        environment: data.environment.clone(),
    })
}

/// Get the quiz in the caller's language.
///
/// Questions keep their stored sequence. Option ids are `o1`, `o2`, ...
/// in the original option order for every language, so answers can be
/// submitted independently of the language they were shown in.
#[utoipa::path(
    get,
    path = "/api/v1/quiz",
    tag = "quiz",
    params(
        ("lang" = Option<String>, Query, description = "Language tag, e.g. `en` or `zh-CN`"),
        ("Accept-Language" = Option<String>, Header, description = "Used when `lang` is absent"),
    ),
    responses(
        (status = 200, description = "Localized quiz", body = QuizResponse),
    )
)]
pub async fn get_quiz(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let locale = extract_locale_from_request(&req);
    HttpResponse::Ok().json(data.quiz.get_quiz(locale))
}

/// Score a completed quiz.
///
/// Scoring is currently a placeholder: every submission maps to the
/// same glowtype and `scoreDetails` is empty.
#[utoipa::path(
    post,
    path = "/api/v1/quiz/score",
    tag = "quiz",
    request_body = QuizScoreRequest,
    responses(
        (status = 200, description = "Resulting glowtype", body = QuizScoreResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
    )
)]
pub async fn score_quiz(
    body: web::Json<QuizScoreRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = Locale::resolve(&body.language);
    let result = data.quiz.score_quiz(&body.answers, &body.quiz_id, locale);

    log::info!(
        "Quiz '{}' scored ({} answers) -> {}",
        body.quiz_id,
        body.answers.len(),
        result.glowtype_id
    );

    HttpResponse::Ok().json(result)
}

/// Get a glowtype profile.
///
/// Falls back to English content when the profile has no translation
/// for the requested language.
#[utoipa::path(
    get,
    path = "/api/v1/glowtypes/{id}",
    tag = "glowtypes",
    params(
        ("id" = String, Path, description = "Glowtype identifier, e.g. `quiet-comet`"),
        ("lang" = Option<String>, Query, description = "Language tag, e.g. `en` or `zh-CN`"),
        ("Accept-Language" = Option<String>, Header, description = "Used when `lang` is absent"),
    ),
    responses(
        (status = 200, description = "Localized glowtype", body = GlowtypeResponse),
        (status = 404, description = "Unknown glowtype", body = ErrorResponse),
    )
)]
pub async fn get_glowtype(
    req: HttpRequest,
    path: web::Path<String>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let locale = extract_locale_from_request(&req);

    let glowtype = data.glowtypes.get_glowtype(&id, locale).map_err(|err| {
        log::info!("{}", err);
        let message = t!("api.glowtype_not_found", locale = locale.as_str(), id = &id);
        ApiError::NotFound(message.to_string())
    })?;

    Ok(HttpResponse::Ok().json(glowtype))
}

/// Start an anonymous chat session.
///
/// The body is optional; when present it is only logged.
#[utoipa::path(
    post,
    path = "/api/v1/chat/session",
    tag = "chat",
    request_body(content = ChatSessionRequest, description = "Optional client context"),
    responses(
        (status = 200, description = "Session created", body = ChatSessionResponse),
    )
)]
pub async fn create_chat_session(
    body: Option<web::Json<ChatSessionRequest>>,
    data: web::Data<AppState>,
) -> impl Responder {
    let context = body.map(web::Json::into_inner).unwrap_or_default();
    let session_id = data.chat.create_session();

    log::debug!(
        "Chat session requested (language '{}', glowtype {:?})",
        context.language,
        context.glowtype_id
    );
    log::info!("Chat sessions open: {}", data.chat.session_count());

    HttpResponse::Ok().json(ChatSessionResponse { session_id })
}

/// Send a chat message.
///
/// Replies are canned and localized. An unknown `sessionId` still gets a
/// reply, prefixed with a notice that the chat is anonymous.
#[utoipa::path(
    post,
    path = "/api/v1/chat/message",
    tag = "chat",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "Reply with safety notice", body = ChatMessageResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
    )
)]
pub async fn send_chat_message(
    body: web::Json<ChatMessageRequest>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = Locale::resolve(&body.language);
    let response = data.chat.reply(&body.session_id, &body.message, locale);
    HttpResponse::Ok().json(response)
}

/// Get crisis-help resources for the caller's language.
#[utoipa::path(
    get,
    path = "/api/v1/help",
    tag = "help",
    params(
        ("lang" = Option<String>, Query, description = "Language tag, e.g. `en` or `zh-CN`"),
        ("Accept-Language" = Option<String>, Header, description = "Used when `lang` is absent"),
    ),
    responses(
        (status = 200, description = "Help resources", body = HelpResponse),
    )
)]
pub async fn get_help(req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    let locale = extract_locale_from_request(&req);
    HttpResponse::Ok().json(data.help.get_help(locale))
}

/// JSON body configuration: malformed bodies become a localized 400.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("Rejected body for {} {}: {}", req.method(), req.path(), err);
        let locale = extract_locale_from_request(req);
        ApiError::BadRequest(t!("api.invalid_payload", locale = locale.as_str()).to_string()).into()
    })
}

/// Configures all API routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health))
            .route("/quiz", web::get().to(get_quiz))
            .route("/quiz/score", web::post().to(score_quiz))
            .route("/glowtypes/{id}", web::get().to(get_glowtype))
            .route("/chat/session", web::post().to(create_chat_session))
            .route("/chat/message", web::post().to(send_chat_message))
            .route("/help", web::get().to(get_help)),
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::tests::sample_store;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(sample_store(), ChatProviderKind::Mock, "test"))
    }

    macro_rules! app {
        () => {
            test::init_service(App::new().app_data(state()).configure(configure_routes)).await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/v1/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "status": "ok", "environment": "test" }));
    }

    #[actix_web::test]
    async fn test_get_quiz_by_query_parameter() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/v1/quiz?lang=zh-CN").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["quizId"], "test-quiz");
        assert_eq!(body["language"], "zh-CN");
        assert_eq!(body["questions"][0]["id"], "q2");
        assert_eq!(body["questions"][0]["order"], 7);
        assert_eq!(body["questions"][0]["question"], "第二？");
        assert_eq!(body["questions"][0]["options"][2], json!({ "id": "o3", "text": "丙" }));
        assert_eq!(body["questions"][1]["question"], "First?");
    }

    #[actix_web::test]
    async fn test_get_quiz_by_accept_language() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/v1/quiz")
            .insert_header((header::ACCEPT_LANGUAGE, "zh-TW,zh;q=0.9"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["language"], "zh-CN");

        let req = test::TestRequest::get().uri("/api/v1/quiz?lang=fr").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["language"], "en");
        assert_eq!(body["questions"][0]["question"], "Second?");
    }

    #[actix_web::test]
    async fn test_score_quiz() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/quiz/score")
            .set_json(json!({
                "quizId": "test-quiz",
                "language": "en",
                "answers": [
                    { "questionId": "q1", "optionId": "o1" },
                    { "questionId": "q2", "optionId": "o3" }
                ]
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "glowtypeId": "quiet-comet", "scoreDetails": {} }));
    }

    #[actix_web::test]
    async fn test_score_quiz_rejects_malformed_body() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/quiz/score")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"answers\": 5")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid payload");
    }

    #[actix_web::test]
    async fn test_get_glowtype() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/v1/glowtypes/quiet-comet?lang=zh")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "quiet-comet");
        assert_eq!(body["language"], "zh-CN");
        assert_eq!(body["name"], "安静彗星");
        assert_eq!(body["selfCareTips"], json!(["休息"]));
    }

    #[actix_web::test]
    async fn test_get_glowtype_not_found() {
        let app = app!();
        let req = test::TestRequest::get()
            .uri("/api/v1/glowtypes/missing-star")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "glowtype not found: missing-star");

        let req = test::TestRequest::get()
            .uri("/api/v1/glowtypes/missing-star?lang=zh-CN")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("missing-star"));
    }

    #[actix_web::test]
    async fn test_chat_session_flow() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/chat/session")
            .set_json(json!({ "language": "zh-CN" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let session_id = body["sessionId"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/v1/chat/message")
            .set_json(json!({ "sessionId": session_id, "message": "hi", "language": "zh-CN" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["reply"].as_str().unwrap().starts_with("听起来"));
        assert!(body["safetyNotice"].is_string());
    }

    #[actix_web::test]
    async fn test_chat_session_without_body() {
        let app = app!();
        let req = test::TestRequest::post().uri("/api/v1/chat/session").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(uuid::Uuid::parse_str(body["sessionId"].as_str().unwrap()).is_ok());
    }

    #[actix_web::test]
    async fn test_chat_message_unknown_session() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/v1/chat/message")
            .set_json(json!({ "sessionId": "nope", "message": "hello", "language": "en" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(
            body["reply"]
                .as_str()
                .unwrap()
                .starts_with("This is a temporary anonymous chat.")
        );
    }

    #[actix_web::test]
    async fn test_get_help() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/v1/help?lang=zh-CN").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["language"], "zh-CN");
        assert_eq!(body["hotlines"].as_array().unwrap().len(), 1);
        assert_eq!(body["hotlines"][0]["phone"], "800-810-1117 / 010-8295-1332");

        let req = test::TestRequest::get().uri("/api/v1/help").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["language"], "en");
        assert_eq!(body["hotlines"][0]["phone"], "+65 1767");
    }

    #[actix_web::test]
    async fn test_state_without_placeholder_glowtype_still_serves() {
        let mut content = sample_store();
        content.glowtypes.retain(|g| g.id != "quiet-comet");
        let state = web::Data::new(AppState::new(content, ChatProviderKind::Mock, "test"));
        assert!(!state.quiz.unconfigured_results(&state.glowtypes).is_empty());

        let app =
            test::init_service(App::new().app_data(state).configure(configure_routes)).await;
        let req = test::TestRequest::post()
            .uri("/api/v1/quiz/score")
            .set_json(json!({ "quizId": "test-quiz", "language": "en", "answers": [] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["glowtypeId"], "quiet-comet");

        let req = test::TestRequest::get()
            .uri("/api/v1/glowtypes/quiet-comet")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[::core::prelude::v1::test]
    fn test_openapi_lists_all_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/health",
            "/api/v1/quiz",
            "/api/v1/quiz/score",
            "/api/v1/glowtypes/{id}",
            "/api/v1/chat/session",
            "/api/v1/chat/message",
            "/api/v1/help",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
