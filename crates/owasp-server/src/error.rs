use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use owasp_core::error::GameError;

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found(id: u32) -> Self {
        Self(GameError::LevelNotFound(id).into())
    }
}

fn status_for(e: &GameError) -> StatusCode {
    match e {
        GameError::LevelNotFound(_) => StatusCode::NOT_FOUND,
        GameError::Busy(_) => StatusCode::CONFLICT,
        GameError::NoActiveLevel | GameError::LevelMismatch { .. } => StatusCode::CONFLICT,
        GameError::AlreadySolved(_) | GameError::EmptyCommand => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        GameError::HomeNotFound
        | GameError::Io(_)
        | GameError::Yaml(_)
        | GameError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self
            .0
            .downcast_ref::<GameError>()
            .map(status_for)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error = %format!("{:#}", self.0), "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: GameError) -> StatusCode {
        AppError(err.into()).into_response().status()
    }

    #[test]
    fn unknown_level_maps_to_404() {
        assert_eq!(status(GameError::LevelNotFound(42)), StatusCode::NOT_FOUND);
    }

    #[test]
    fn busy_maps_to_409() {
        assert_eq!(status(GameError::Busy(1)), StatusCode::CONFLICT);
    }

    #[test]
    fn inactive_level_maps_to_409() {
        assert_eq!(status(GameError::NoActiveLevel), StatusCode::CONFLICT);
        assert_eq!(
            status(GameError::LevelMismatch {
                expected: 1,
                got: 2
            }),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn solved_and_empty_map_to_422() {
        assert_eq!(
            status(GameError::AlreadySolved(3)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(GameError::EmptyCommand),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn io_maps_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            status(GameError::Io(io)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn foreign_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("task join error"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
