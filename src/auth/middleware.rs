use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::db;
use crate::error::AppError;
use crate::AppState;

/// The caller resolved from the bearer token, available to handlers as an extension.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(bearer.token(), &state.config)?;

    // A valid token for a user that no longer exists is still rejected.
    let user = db::users::find_by_id(&state.db, token_data.claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        email: user.email,
    });
    Ok(next.run(req).await)
}
