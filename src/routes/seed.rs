use axum::{extract::State, response::IntoResponse, Json};

use crate::{dto::SuccessResponse, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/api/seed",
    responses(
        (status = 200, description = "Store filled up to the seed targets", body = Json<SuccessResponse>)
    )
)]
#[axum::debug_handler]
pub async fn seed(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.seed_service.seed().await?;
    Ok(Json(SuccessResponse::ok()))
}
