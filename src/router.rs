use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post, put, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::models::Role;
use crate::handlers::{auth, courses, health, listings, reviews, users};
use crate::middleware::{authorize, protect, ADMINS, PUBLISHERS, REVIEWERS};
use crate::state::AppState;

/// Full application router, mounted under the configured API prefix
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .merge(auth_routes(&state))
        .merge(listing_routes(&state))
        .merge(course_routes(&state))
        .merge(review_routes(&state))
        .nest("/users", user_routes(&state));

    let mut router = Router::new()
        .nest(&state.config.api.prefix, api)
        .layer(TraceLayer::new_for_http());

    if state.config.api.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

/// Require a valid bearer token
fn authenticated(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(state.clone(), protect))
}

/// Require a valid bearer token and one of `roles`. The role gate is the inner
/// layer so it sees the account bound by `protect`.
fn restricted(
    route: MethodRouter<AppState>,
    state: &AppState,
    roles: &'static [Role],
) -> MethodRouter<AppState> {
    authenticated(route.route_layer(from_fn_with_state(roles, authorize)), state)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/forgotpassword", post(auth::forgot_password))
        .route("/auth/resetpassword/:token", put(auth::reset_password))
        .route("/auth/me", authenticated(get(auth::me), state))
        .route("/auth/updatedetails", authenticated(put(auth::update_details), state))
        .route("/auth/updatepassword", authenticated(put(auth::update_password), state))
}

fn listing_routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.api.max_file_upload_bytes.saturating_mul(2);

    Router::new()
        .route(
            "/listings",
            get(listings::listing_list)
                .merge(restricted(post(listings::listing_create), state, PUBLISHERS)),
        )
        .route("/listings/radius/:zipcode/:distance", get(listings::listing_radius))
        .route(
            "/listings/:id",
            get(listings::listing_show).merge(restricted(
                put(listings::listing_update).delete(listings::listing_delete),
                state,
                PUBLISHERS,
            )),
        )
        .route(
            "/listings/:id/photo",
            restricted(
                put(listings::listing_photo).layer(DefaultBodyLimit::max(upload_limit)),
                state,
                PUBLISHERS,
            ),
        )
}

fn course_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/courses", get(courses::course_list))
        .route(
            "/courses/:id",
            get(courses::course_show).merge(restricted(
                put(courses::course_update).delete(courses::course_delete),
                state,
                PUBLISHERS,
            )),
        )
        .route(
            "/listings/:id/courses",
            get(courses::listing_course_list)
                .merge(restricted(post(courses::course_create), state, PUBLISHERS)),
        )
}

fn review_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/reviews", get(reviews::review_list))
        .route(
            "/reviews/:id",
            get(reviews::review_show).merge(restricted(
                put(reviews::review_update).delete(reviews::review_delete),
                state,
                REVIEWERS,
            )),
        )
        .route(
            "/listings/:id/reviews",
            get(reviews::listing_review_list)
                .merge(restricted(post(reviews::review_create), state, REVIEWERS)),
        )
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(users::user_list).post(users::user_create))
        .route(
            "/:id",
            get(users::user_show)
                .put(users::user_update)
                .delete(users::user_delete),
        )
        .route_layer(from_fn_with_state(ADMINS, authorize))
        .route_layer(from_fn_with_state(state.clone(), protect))
}
