//! Service-level error handling.
//!
//! Store and engine code works with [`ServiceError`]; HTTP handlers convert
//! it into [`AppError`] at the boundary so clients only ever see registry
//! codes, never raw database messages.

use axum::response::{IntoResponse, Response};
use shared::error::{AppError, ErrorCode};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug)]
pub enum ServiceError {
    /// Infrastructure failure from the store layer
    Db(BoxError),
    /// Domain error with a registry code
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(Box::new(e))
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Db(e) => {
                if let Some(sqlx_err) = e.downcast_ref::<sqlx::Error>() {
                    match sqlx_err {
                        // Pool acquire timed out: another request holds the
                        // store connection. Retryable.
                        sqlx::Error::PoolTimedOut => {
                            return AppError::new(ErrorCode::TimeoutError);
                        }
                        // Unique index violation surfacing outside the
                        // reconciliation paths: a concurrent writer won.
                        sqlx::Error::Database(db)
                            if matches!(
                                db.kind(),
                                sqlx::error::ErrorKind::UniqueViolation
                            ) =>
                        {
                            return AppError::new(ErrorCode::CartConflict);
                        }
                        _ => {}
                    }
                }
                tracing::error!("Database error: {}", e);
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::App(e) => e,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
