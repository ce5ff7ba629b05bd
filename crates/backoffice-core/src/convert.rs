// ── API-to-domain conversions ──
//
// Bridges raw `backoffice_api` types and errors into the core model and
// error taxonomy.

use backoffice_api::{Error as ApiError, LoginResponse, Page, Pagination as ApiPagination, UserProfile};

use crate::error::{AuthError, TransportError, TransportErrorKind};
use crate::gateway::LoginGrant;
use crate::list::{PagedResponse, Pagination};
use crate::model::Identity;

impl From<UserProfile> for Identity {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            username: p.username,
            email: p.email,
            role: p.role,
        }
    }
}

impl From<LoginResponse> for LoginGrant {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            identity: resp.user.into(),
        }
    }
}

impl From<ApiPagination> for Pagination {
    fn from(p: ApiPagination) -> Self {
        Self {
            page: p.page,
            per_page: p.per_page,
            total: p.total,
            total_pages: p.total_pages,
        }
    }
}

impl<T> From<Page<T>> for PagedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.data,
            pagination: page.pagination.into(),
        }
    }
}

impl From<ApiError> for TransportError {
    fn from(err: ApiError) -> Self {
        let kind = if err.is_auth_expired() {
            TransportErrorKind::Unauthorized
        } else if err.is_not_found() {
            TransportErrorKind::NotFound
        } else {
            match &err {
                ApiError::Transport(_) | ApiError::Tls(_) => TransportErrorKind::Network,
                ApiError::Deserialization { .. } => TransportErrorKind::Decode,
                ApiError::Authentication { .. } => TransportErrorKind::Unauthorized,
                ApiError::Api { .. } | ApiError::InvalidUrl(_) | ApiError::SessionExpired { .. } => {
                    TransportErrorKind::Rejected
                }
            }
        };

        let message = err
            .server_message()
            .map_or_else(|| err.to_string(), str::to_owned);
        Self::with_message(kind, message)
    }
}

/// Login failures keep the server's wording so the login form can show it.
pub(crate) fn auth_error(err: ApiError) -> AuthError {
    match err {
        ApiError::Authentication { message } => AuthError::InvalidCredentials { message },
        e @ (ApiError::Transport(_) | ApiError::Tls(_)) => AuthError::Network {
            message: e.to_string(),
        },
        other => AuthError::Unknown {
            message: other
                .server_message()
                .map_or_else(|| "Login failed. Please try again.".to_owned(), str::to_owned),
        },
    }
}
