use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use gratitude_core::WallError;
use gratitude_types::api::ErrorResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Wall(#[from] WallError),

    #[error("Malformed payload: {0}")]
    BadRequest(String),

    #[error("Missing x-viewer-id header")]
    MissingViewer,

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Wall(err) => match err {
                WallError::Validation(_) => StatusCode::BAD_REQUEST,
                WallError::NotFound(_) => StatusCode::NOT_FOUND,
                WallError::AlreadyReacted { .. } => StatusCode::CONFLICT,
                WallError::AdminRequired => StatusCode::FORBIDDEN,
                WallError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::BadRequest(_) | ApiError::MissingViewer => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gratitude_types::models::NoteId;

    #[test]
    fn wall_errors_map_to_statuses() {
        let cases = [
            (WallError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (WallError::NotFound(NoteId::from("1")), StatusCode::NOT_FOUND),
            (
                WallError::AlreadyReacted {
                    id: NoteId::from("1"),
                    emoji: "👍".into(),
                },
                StatusCode::CONFLICT,
            ),
            (WallError::AdminRequired, StatusCode::FORBIDDEN),
            (WallError::StoreUnavailable("down".into()), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }
}
