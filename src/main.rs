//! Folio - portfolio and blog backend

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{
            SqlxBlogRepository, SqlxCommentRepository, SqlxContactRepository,
            SqlxProjectRepository, SqlxResumeRepository,
        },
    },
    services::{BlogService, ContactService, ProjectService, ResumeService, SmtpMailer},
    storage,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio backend...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if config.server.admin_token.is_none() {
        tracing::warn!("No admin token configured; admin routes will refuse all requests");
    }

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver);

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Initialize media storage
    let media_store = storage::create_store(&config.storage)?;
    tracing::info!("Media storage initialized: {:?}", config.storage.driver);

    // Create repositories
    let project_repo = SqlxProjectRepository::shared(pool.clone());
    let blog_repo = SqlxBlogRepository::shared(pool.clone());
    let contact_repo = SqlxContactRepository::shared(pool.clone());
    let comment_repo = SqlxCommentRepository::shared(pool.clone());
    let resume_repo = SqlxResumeRepository::shared(pool.clone());

    // Initialize services
    let mailer = SmtpMailer::shared(config.smtp.clone());
    let notify_recipient = config.smtp.recipient().map(str::to_string);
    if notify_recipient.is_none() {
        tracing::warn!("No notification recipient configured; contact form is disabled");
    }

    let project_service = Arc::new(ProjectService::new(project_repo, media_store.clone()));
    let blog_service = Arc::new(BlogService::new(blog_repo, media_store.clone()));
    let contact_service = Arc::new(ContactService::new(
        contact_repo.clone(),
        mailer,
        notify_recipient,
    ));
    let resume_service = Arc::new(ResumeService::new(resume_repo));

    // Build application state
    let state = AppState {
        project_service,
        blog_service,
        contact_service,
        resume_service,
        comment_repo,
        contact_repo,
        media_store,
        upload_config: Arc::new(config.upload.clone()),
        admin_token: config.server.admin_token.clone(),
    };

    // Build router
    let app = api::build_router(state, &config.server.cors_origin);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
