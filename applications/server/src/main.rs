/// Mixtape Server - playlist management and discovery
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use clap::{Parser, Subcommand};
use mixtape_core::{CreateUser, Role};
use mixtape_server::{
    api,
    config::ServerConfig,
    middleware,
    services::AuthService,
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mixtape-server")]
#[command(about = "Mixtape playlist management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user account
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
        /// Role (USER, MANAGER or ADMIN)
        #[arg(short, long, default_value = "USER")]
        role: String,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtape_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => {
            serve().await?;
        }
        Commands::AddUser {
            username,
            email,
            password,
            role,
        } => {
            add_user(&username, &email, &password, &role).await?;
        }
        Commands::ListUsers => {
            list_users().await?;
        }
    }

    Ok(())
}

async fn serve() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;
    config.validate()?;

    tracing::info!("Starting Mixtape Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = mixtape_storage::connect(&config.storage.database_url).await?;
    tracing::info!("Database connected");

    // Initialize auth service
    let auth_service = Arc::new(AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    ));
    tracing::info!("Auth service initialized");

    // Build application state
    let app_state = AppState::new(pool, Arc::clone(&auth_service));

    // Build router
    let app = create_router(app_state, auth_service, config.storage.web_dir.clone());

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(app_state: AppState, auth_service: Arc<AuthService>, web_dir: PathBuf) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(api::auth::me))
        // Playlists
        .route("/playlists", get(api::playlists::list_playlists))
        .route("/playlists", post(api::playlists::create_playlist))
        .route("/playlists/public", get(api::playlists::list_public_playlists))
        .route(
            "/playlists/followed",
            get(api::playlists::list_followed_playlists),
        )
        .route("/playlists/:id", get(api::playlists::get_playlist))
        .route("/playlists/:id", put(api::playlists::update_playlist))
        .route("/playlists/:id", delete(api::playlists::delete_playlist))
        .route(
            "/playlists/:id/songs",
            post(api::playlists::add_song_to_playlist),
        )
        .route(
            "/playlists/:id/songs/:song_id",
            delete(api::playlists::remove_song_from_playlist),
        )
        .route("/playlists/:id/follow", post(api::playlists::follow_playlist))
        .route(
            "/playlists/:id/follow",
            delete(api::playlists::unfollow_playlist),
        )
        // Songs
        .route("/songs", get(api::songs::list_songs))
        .route("/songs", post(api::songs::create_song))
        .route("/songs/:id", get(api::songs::get_song))
        .route("/songs/:id", put(api::songs::update_song))
        .route("/songs/:id", delete(api::songs::delete_song))
        .route("/songs/:id/tags", get(api::songs::get_song_tags))
        .route("/songs/:id/tags/:tag_id", put(api::songs::add_song_tag))
        .route(
            "/songs/:id/tags/:tag_id",
            delete(api::songs::remove_song_tag),
        )
        // Artists
        .route("/artists", get(api::artists::list_artists))
        .route("/artists", post(api::artists::create_artist))
        .route("/artists/:id", get(api::artists::get_artist))
        .route("/artists/:id", put(api::artists::update_artist))
        .route("/artists/:id", delete(api::artists::delete_artist))
        // Albums
        .route("/albums", get(api::albums::list_albums))
        .route("/albums", post(api::albums::create_album))
        .route("/albums/:id", get(api::albums::get_album))
        .route("/albums/:id", put(api::albums::update_album))
        .route("/albums/:id", delete(api::albums::delete_album))
        // Tags
        .route("/tags", get(api::tags::list_tags))
        .route("/tags", post(api::tags::create_tag))
        .route("/tags/:id", delete(api::tags::delete_tag))
        .route("/tags/:id/songs", get(api::tags::get_tag_songs))
        // Admin
        .route("/admin/users", get(api::admin::list_users))
        .route("/admin/users", post(api::admin::create_user))
        .route("/admin/users/:id/role", put(api::admin::update_user_role))
        .route("/admin/users/:id", delete(api::admin::delete_user))
        .route("/admin/stats", get(api::admin::stats))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&auth_service),
            middleware::auth_middleware,
        ));

    // Combine routes; anything outside /api falls back to the static web build
    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .fallback_service(ServeDir::new(web_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

async fn add_user(username: &str, email: &str, password: &str, role: &str) -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = mixtape_storage::connect(&config.storage.database_url).await?;

    let role = Role::from_str(role)
        .ok_or_else(|| anyhow::anyhow!("invalid role: {role} (expected USER, MANAGER or ADMIN)"))?;

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    );
    let password_hash = auth_service.hash_password(password)?;

    let user = mixtape_storage::users::create(
        &pool,
        CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            role,
        },
        &password_hash,
    )
    .await?;

    println!("Created user {} ({})", user.username, user.role.as_str());

    Ok(())
}

async fn list_users() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    let pool = mixtape_storage::connect(&config.storage.database_url).await?;

    let users = mixtape_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} ({})", user.id, user.username, user.role.as_str());
    }

    Ok(())
}
