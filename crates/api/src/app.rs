use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::session::{SessionKeys, TokenRealm};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{
    admin, auth, blind_presets, dashboard, games, groups, health, invites, members, public_join,
    users,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub user_keys: Arc<SessionKeys>,
    pub admin_keys: Arc<SessionKeys>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let user_keys = Arc::new(SessionKeys::new(
        TokenRealm::User,
        &config.auth.session_secret,
        config.auth.session_expiry_secs,
    ));
    let admin_keys = Arc::new(SessionKeys::new(
        TokenRealm::Admin,
        &config.auth.admin_session_secret,
        config.auth.admin_session_expiry_secs,
    ));

    let state = AppState {
        pool,
        config: config.clone(),
        user_keys,
        admin_keys,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Session enforcement happens in the extractors: handlers taking a
    // UserSession or AdminSession reject missing/invalid cookies with 401.
    let api_routes = Router::new()
        // Auth
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/signin", post(auth::signin))
        .route("/api/auth/signout", post(auth::signout))
        .route("/api/auth/me", get(auth::me))
        // User search (for in-app invites)
        .route("/api/users/search", get(users::search))
        // Groups
        .route("/api/groups", post(groups::create_group).get(groups::list_groups))
        .route(
            "/api/groups/:group_id",
            get(groups::get_group)
                .patch(groups::rename_group)
                .delete(groups::delete_group),
        )
        // Members
        .route("/api/groups/:group_id/members", get(members::list_members))
        .route(
            "/api/groups/:group_id/members/:user_id",
            patch(members::change_role).delete(members::remove_member),
        )
        // Group invites
        .route(
            "/api/groups/:group_id/invites",
            post(invites::create_invite).get(invites::list_group_invites),
        )
        .route(
            "/api/groups/:group_id/invites/:invite_id",
            delete(invites::revoke_invite),
        )
        // Per-user invite inbox
        .route("/api/user/invites", get(invites::list_my_invites))
        .route("/api/user/invites/history", get(invites::my_invite_history))
        .route(
            "/api/user/invites/:invite_id/seen",
            post(invites::mark_invite_seen),
        )
        .route(
            "/api/user/invites/:invite_id/respond",
            post(invites::respond_by_id),
        )
        // Invite link flow (GET preview is unauthenticated)
        .route("/api/invites/:token", get(invites::preview_by_token))
        .route("/api/invites/:token/respond", post(invites::respond_by_token))
        // Public join link
        .route(
            "/api/groups/:group_id/public-invite",
            post(public_join::regenerate_token).delete(public_join::disable_token),
        )
        .route(
            "/api/join/:token",
            get(public_join::preview).post(public_join::join),
        )
        // Games
        .route(
            "/api/groups/:group_id/games",
            post(games::create_game).get(games::list_games),
        )
        .route(
            "/api/groups/:group_id/games/:game_id",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        // Dashboards
        .route("/api/dashboard", get(dashboard::user_dashboard))
        .route("/api/groups/:group_id/dashboard", get(dashboard::group_dashboard))
        // Blind presets
        .route(
            "/api/blind-presets",
            get(blind_presets::list_presets).post(blind_presets::create_preset),
        )
        .route("/api/blind-presets/:preset_id", delete(blind_presets::delete_preset))
        // Admin back-office
        .route("/api/admin/auth/login", post(admin::login))
        .route("/api/admin/auth/logout", post(admin::logout))
        .route("/api/admin/auth/me", get(admin::me))
        .route("/api/admin/users", get(admin::list_users))
        .route("/api/admin/users/:user_id", delete(admin::delete_user))
        .route("/api/admin/groups", get(admin::list_groups))
        .route("/api/admin/groups/:group_id", delete(admin::delete_group))
        .route("/api/admin/stats", get(admin::stats));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
