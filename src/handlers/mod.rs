pub mod collaboration;
pub mod common;
pub mod trip;
pub mod user;

pub use collaboration::{
    accept_invitation, collaboration_stats, decline_invitation, invite, list_trip_collaborations,
    list_user_invitations, remove_collaboration, revoke_invitation, update_role,
    CollaborationResponse, InvitationsQuery, InviteRequest, UpdateRoleRequest,
};
pub use common::validate_required;
pub use trip::{
    create_trip, delete_trip, generate_itinerary, generate_recommendations, generate_travel_tips,
    get_trip, list_user_trips, search_trips, trip_stats, update_trip, CreateTripRequest,
    ListTripsQuery, MessageResponse, SearchTripsQuery, TripResponse, UpdateTripRequest,
};
pub use user::{
    get_user, login, search_users, signup, update_profile, AuthResponse, LoginRequest,
    SignupRequest, UpdateProfileRequest,
};
