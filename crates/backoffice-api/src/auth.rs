// Token authentication
//
// `POST auth/login` exchanges an email/password pair for a bearer token and
// the caller's public profile. The client does not adopt the token itself;
// whoever owns the session decides whether to keep it.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::LoginResponse;

const LOGIN_PATH: &str = "auth/login";
const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// Rejections the user can fix (HTTP 400, 401, 403, 422) come back as
    /// [`Error::Authentication`] carrying the server's message when it sent one.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.endpoint_url(LOGIN_PATH)?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        match self.post_json::<LoginResponse>(url, &body).await {
            Ok(resp) => {
                debug!(user_id = resp.user.id, "login successful");
                Ok(resp)
            }
            Err(Error::SessionExpired { message }) => Err(Error::Authentication {
                message: message.unwrap_or_else(|| LOGIN_FAILED.into()),
            }),
            Err(Error::Api {
                status: status @ (400 | 403 | 422),
                message,
            }) => Err(Error::Authentication {
                message: message.unwrap_or_else(|| format!("login rejected (HTTP {status})")),
            }),
            Err(e) => Err(e),
        }
    }
}
