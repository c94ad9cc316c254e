use crate::middleware::identity::CurrentUser;
use axum::Json;
use columbus_models::UserId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: UserId,
}

/// Identifier of the user resolved for this request.
pub async fn get_me(CurrentUser(user_id): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse { id: user_id })
}
