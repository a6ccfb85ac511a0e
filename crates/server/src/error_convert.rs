use dioxus::prelude::ServerFnError;
use shared_types::AppError;

/// Postgres SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a sqlx error onto the shared error taxonomy.
///
/// Constraint violations become user-facing messages. Everything else is
/// logged and reported as a database error.
pub fn sqlx_to_app_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or_default();
                if constraint.contains("email") || db_err.message().contains("email") {
                    AppError::conflict("An account with this email already exists")
                } else if constraint.contains("company_members") {
                    AppError::conflict("This user already belongs to a company")
                } else {
                    AppError::conflict("A record with this value already exists")
                }
            }
            Some(FOREIGN_KEY_VIOLATION) => AppError::bad_request("Referenced record does not exist"),
            _ => {
                tracing::error!(error = %err, "Database error");
                AppError::database(err.to_string())
            }
        },
        _ => {
            tracing::error!(error = %err, "Database error");
            AppError::database(err.to_string())
        }
    }
}

/// Encode an `AppError` as JSON inside a `ServerFnError` so the client can
/// recover it with `AppError::from_server_error`.
pub fn app_error_to_server_fn_error(err: AppError) -> ServerFnError {
    let json = serde_json::to_string(&err).unwrap_or_else(|_| err.message.clone());
    ServerFnError::new(json)
}

pub trait SqlxErrorExt {
    fn into_app_error(self) -> AppError;
}

impl SqlxErrorExt for sqlx::Error {
    fn into_app_error(self) -> AppError {
        sqlx_to_app_error(self)
    }
}

pub trait AppErrorExt {
    fn into_server_fn_error(self) -> ServerFnError;
}

impl AppErrorExt for AppError {
    fn into_server_fn_error(self) -> ServerFnError {
        app_error_to_server_fn_error(self)
    }
}

/// Run `validator` rules on a request DTO and convert failures to `AppError`.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AppErrorKind, LoginRequest};

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = sqlx_to_app_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, AppErrorKind::NotFound);
    }

    #[test]
    fn server_fn_error_carries_app_error_json() {
        let err = AppError::forbidden("Admins only").into_server_fn_error();
        let recovered = AppError::from_server_error(&err.to_string()).unwrap();
        assert_eq!(recovered.kind, AppErrorKind::Forbidden);
        assert_eq!(recovered.message, "Admins only");
    }

    #[test]
    fn validate_request_reports_field_errors() {
        let req = LoginRequest {
            email: "not-an-email".into(),
            password: String::new(),
        };
        let err = req.validate_request().unwrap_err();
        assert_eq!(err.kind, AppErrorKind::ValidationError);
        assert!(err.field_errors.contains_key("email"));
        assert!(err.field_errors.contains_key("password"));
    }
}
