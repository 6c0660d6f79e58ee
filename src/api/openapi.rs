//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{account, auth, catalog, health, lending};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblos API",
        version = "0.1.0",
        description = "Library Lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::signup,
        auth::login,
        auth::logout,
        auth::me,
        // Catalog
        catalog::list_books,
        catalog::search_books,
        // Lending
        lending::borrow_book,
        lending::list_borrows,
        lending::return_book,
        // Account
        account::change_password,
    ),
    components(
        schemas(
            // Auth
            auth::SessionResponse,
            auth::MessageResponse,
            crate::models::user::User,
            crate::models::user::Credentials,
            crate::models::user::ChangePassword,
            // Catalog
            crate::models::book::Book,
            crate::models::book::SearchQuery,
            // Lending
            lending::BorrowRequest,
            lending::BorrowResponse,
            lending::ReturnResponse,
            crate::models::borrow::BorrowRecord,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "catalog", description = "Catalog browsing and search"),
        (name = "lending", description = "Borrow and return books"),
        (name = "account", description = "Account management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
