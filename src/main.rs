//! # Glowtype API — Localized Content Server
//!
//! Serves a short personality quiz, the "glowtype" profiles it maps to,
//! crisis-help resources and an anonymous chat stub. All content is
//! available in English and Simplified Chinese.
//!
//! ## Features
//!
//! - **Localized content**: Every response is rendered in the caller's
//!   language (`?lang=`, then `Accept-Language`, then English). Missing
//!   translations fall back to English.
//!
//! - **Static configuration**: Quiz and glowtype content is read once
//!   from JSON files at startup; invalid content stops the server from
//!   starting.
//!
//! - **Anonymous chat**: Sessions are ephemeral UUIDs kept in memory.
//!   Replies are canned and always carry a safety notice.
//!
//! - **Swagger/OpenAPI Documentation**: Auto-generated API docs
//!   available at `/swagger-ui/`.
//!
//! ## Usage
//!
//! ```bash
//! # Start the API server (default: http://0.0.0.0:18080)
//! glowtype-api serve
//!
//! # Custom port and content directory
//! PORT=3000 glowtype-api serve --config-dir ./content
//!
//! # Validate content files without starting the server
//! glowtype-api check --config-dir ./content
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path                          | Description                    |
//! |--------|-------------------------------|--------------------------------|
//! | GET    | `/api/v1/health`              | Liveness check                 |
//! | GET    | `/api/v1/quiz`                | Localized quiz                 |
//! | POST   | `/api/v1/quiz/score`          | Score answers                  |
//! | GET    | `/api/v1/glowtypes/{id}`      | Localized glowtype profile     |
//! | POST   | `/api/v1/chat/session`        | Start an anonymous session     |
//! | POST   | `/api/v1/chat/message`        | Send a chat message            |
//! | GET    | `/api/v1/help`                | Crisis-help resources          |
//! | GET    | `/swagger-ui/`                | Swagger UI documentation       |

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod api;
pub mod chat;
pub mod content;
pub mod error;
pub mod glowtype;
pub mod help;
pub mod i18n;
pub mod quiz;
pub mod types;

use actix_cors::Cors;
use actix_web::http::{Uri, header};
use actix_web::{App, HttpServer, middleware, web};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{ApiDoc, AppState};
use crate::chat::ChatProviderKind;
use crate::content::ContentStore;
use crate::error::{ConfigError, ContentError};
use crate::glowtype::GlowtypeService;
use crate::i18n::{Locale, SUPPORTED_LOCALES};
use crate::quiz::QuizService;

/// Glowtype API — localized quiz, profile and help content server.
#[derive(Parser, Debug)]
#[command(name = "glowtype-api")]
#[command(about = "Localized quiz, glowtype and crisis-help API")]
#[command(version)]
struct Cli {
    /// Log filter (overridden by RUST_LOG).
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the REST API server with Swagger UI.
    Serve(ServeArgs),

    /// Validate the content directory and print a summary.
    Check {
        /// Directory containing quiz.json and glowtypes.json.
        #[arg(long, env = "CONFIG_DIR", default_value = "config")]
        config_dir: PathBuf,
    },
}

/// Server options. Each one can also be set through its environment variable.
#[derive(Args, Debug)]
struct ServeArgs {
    /// Deployment environment, reported by the health endpoint.
    #[arg(long, env = "ENV", value_enum, default_value_t = Environment::Development)]
    env: Environment,

    /// Host address to bind to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 18080)]
    port: u16,

    /// Allowed CORS origin(s), comma separated; `*` allows any origin.
    #[arg(long, env = "ALLOWED_ORIGINS", default_value = "*")]
    allowed_origins: String,

    /// Chat reply backend.
    #[arg(long, env = "CHAT_PROVIDER", value_enum, default_value_t = ChatProviderKind::Mock)]
    chat_provider: ChatProviderKind,

    /// Directory containing quiz.json and glowtypes.json.
    #[arg(long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Environment {
    Development,
    Production,
}

impl Environment {
    fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match cli.command {
        Commands::Serve(args) => run_server(args).await,
        Commands::Check { config_dir } => run_check(&config_dir),
    }
}

/// CORS origins parsed from `ALLOWED_ORIGINS`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parses a comma separated origin list. An empty value or a `*`
    /// entry anywhere in the list allows any origin.
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        let origins: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() || origins.contains(&"*") {
            return Ok(AllowedOrigins::Any);
        }

        origins
            .into_iter()
            .map(|origin| {
                origin
                    .parse::<Uri>()
                    .map(|_| origin.to_string())
                    .map_err(|source| ConfigError::InvalidOrigin {
                        origin: origin.to_string(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()
            .map(AllowedOrigins::List)
    }
}

/// Builds the CORS policy for the configured origins.
fn cors(allowed_origins: &AllowedOrigins) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT_LANGUAGE])
        .supports_credentials()
        .max_age(3600);

    match allowed_origins {
        AllowedOrigins::Any => cors.allow_any_origin(),
        AllowedOrigins::List(origins) => origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin)),
    }
}

/// Loads content and starts the HTTP server with all API routes and Swagger UI.
async fn run_server(args: ServeArgs) -> std::io::Result<()> {
    let allowed_origins = AllowedOrigins::parse(&args.allowed_origins).map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;
    let content = ContentStore::load(&args.config_dir).map_err(|e| {
        log::error!("Failed to load content: {}", e);
        std::io::Error::other(e)
    })?;

    let openapi = ApiDoc::openapi();
    let state = web::Data::new(AppState::new(content, args.chat_provider, args.env.as_str()));

    log::info!(
        "Starting glowtype API ({}) on {}:{}",
        args.env.as_str(),
        args.host,
        args.port
    );
    log::info!("Content directory: {}", args.config_dir.display());
    log::info!("Chat provider: {:?}", args.chat_provider);
    log::info!("Allowed origins: {:?}", allowed_origins);
    log::info!("API base URL: http://{}:{}/api/v1", args.host, args.port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", args.host, args.port);

    let server_state = state.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            // No client address in access logs
            .wrap(middleware::Logger::new("%r -> %s (%Dms)"))
            .app_data(server_state.clone())
            .configure(api::configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((args.host.as_str(), args.port))?
    .run()
    .await?;

    log::info!("Server stopped");
    if state.chat.has_sessions() {
        log::info!("Discarding {} chat session(s)", state.chat.session_count());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Content check
// ---------------------------------------------------------------------------

/// Summary of a validated content directory.
#[derive(Debug)]
struct CheckReport {
    question_count: usize,
    glowtype_ids: Vec<String>,
    /// Per locale: question ids and glowtype ids served in English.
    untranslated: Vec<(Locale, Vec<String>, Vec<String>)>,
    /// Scorer results, each with whether a glowtype profile exists for it.
    results: Vec<(String, bool)>,
}

impl CheckReport {
    fn missing_results(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|(_, configured)| !configured)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    fn print(&self) {
        println!(
            "{} quiz: {} question(s)",
            "✓".green().bold(),
            self.question_count
        );
        println!(
            "{} glowtypes: {} ({})",
            "✓".green().bold(),
            self.glowtype_ids.len(),
            self.glowtype_ids.join(", ")
        );

        for (locale, questions, profiles) in &self.untranslated {
            if questions.is_empty() && profiles.is_empty() {
                println!("{} {}: fully translated", "✓".green().bold(), locale);
                continue;
            }
            if !questions.is_empty() {
                println!(
                    "{} {}: questions served in English: {}",
                    "!".yellow().bold(),
                    locale,
                    questions.join(", ")
                );
            }
            if !profiles.is_empty() {
                println!(
                    "{} {}: glowtypes served in English: {}",
                    "!".yellow().bold(),
                    locale,
                    profiles.join(", ")
                );
            }
        }

        for (result, configured) in &self.results {
            if *configured {
                println!("{} quiz result '{}' is configured", "✓".green().bold(), result);
            } else {
                println!("{} quiz result '{}' has no glowtype", "✗".red().bold(), result);
            }
        }
    }
}

/// Loads `config_dir` and summarizes what the server would serve.
fn check_content(config_dir: &Path) -> Result<CheckReport, ContentError> {
    let content = ContentStore::load(config_dir)?;
    let quiz = QuizService::new(content.quiz);
    let glowtypes = GlowtypeService::new(content.glowtypes);

    let owned = |ids: Vec<&str>| ids.into_iter().map(str::to_string).collect::<Vec<_>>();
    let unconfigured = quiz.unconfigured_results(&glowtypes);

    Ok(CheckReport {
        question_count: quiz.question_count(),
        glowtype_ids: owned(glowtypes.ids().collect()),
        untranslated: SUPPORTED_LOCALES
            .iter()
            .map(|&locale| {
                (
                    locale,
                    owned(quiz.untranslated(locale)),
                    owned(glowtypes.untranslated(locale)),
                )
            })
            .collect(),
        results: quiz
            .possible_results()
            .into_iter()
            .map(|id| (id.to_string(), !unconfigured.iter().any(|u| u == id)))
            .collect(),
    })
}

/// Validates the content directory and prints a colored summary.
///
/// Fails when the content cannot be loaded or a quiz result has no
/// matching glowtype.
fn run_check(config_dir: &Path) -> std::io::Result<()> {
    let report = check_content(config_dir).map_err(|e| {
        println!("{} {}", "✗".red().bold(), e);
        std::io::Error::other(e)
    })?;
    report.print();

    let missing = report.missing_results();
    if !missing.is_empty() {
        return Err(std::io::Error::other(format!(
            "quiz result(s) without a glowtype: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}
