use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use wanderplan::config::Config;
use wanderplan::handlers::{
    AuthResponse, CollaborationResponse, CreateTripRequest, InviteRequest, LoginRequest,
    MessageResponse, SignupRequest, TripResponse, UpdateProfileRequest, UpdateRoleRequest,
    UpdateTripRequest,
};
use wanderplan::models::{
    AccommodationStyle, BudgetRange, CollaborationStats, Permissions, TravelPreferences,
    TravelStyle, TripPreferences, TripStats, UserResponse, UserSummary,
};
use wanderplan::state::AppState;
use wanderplan::{build_router, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::user::signup,
        handlers::user::login,
        handlers::user::get_user,
        handlers::user::update_profile,
        handlers::user::search_users,
        handlers::trip::create_trip,
        handlers::trip::list_user_trips,
        handlers::trip::get_trip,
        handlers::trip::update_trip,
        handlers::trip::delete_trip,
        handlers::trip::search_trips,
        handlers::trip::trip_stats,
        handlers::trip::generate_itinerary,
        handlers::trip::generate_recommendations,
        handlers::trip::generate_travel_tips,
        handlers::collaboration::invite,
        handlers::collaboration::list_user_invitations,
        handlers::collaboration::list_trip_collaborations,
        handlers::collaboration::accept_invitation,
        handlers::collaboration::decline_invitation,
        handlers::collaboration::revoke_invitation,
        handlers::collaboration::update_role,
        handlers::collaboration::remove_collaboration,
        handlers::collaboration::collaboration_stats,
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        UserSummary,
        UpdateProfileRequest,
        TravelPreferences,
        TravelStyle,
        BudgetRange,
        AccommodationStyle,
        CreateTripRequest,
        UpdateTripRequest,
        TripResponse,
        TripPreferences,
        TripStats,
        MessageResponse,
        InviteRequest,
        UpdateRoleRequest,
        CollaborationResponse,
        CollaborationStats,
        Permissions,
    )),
    tags(
        (name = "Users", description = "User accounts and profiles"),
        (name = "Trips", description = "Trip planning and AI content generation"),
        (name = "Collaboration", description = "Trip collaboration invitations")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    let addr = config.server_addr();

    // Initialize application state (connects to the database, runs migrations)
    tracing::info!("Connecting to database...");
    let state = AppState::new(config)
        .await
        .expect("Failed to initialize application state");
    tracing::info!("Database connection established");

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .unwrap();
}
