pub mod login;
pub mod signup;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Router for the public auth endpoints (no token required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup::signup))
        .route("/api/auth/login", post(login::login))
}

#[derive(OpenApi)]
#[openapi(
    paths(signup::signup, login::login),
    components(schemas(
        signup::SignupRequest,
        signup::SignupResponse,
        login::LoginRequest,
        login::LoginResponse,
    ))
)]
pub struct ApiDoc;
