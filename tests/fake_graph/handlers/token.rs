//! Token endpoint handler.
//!
//! Implements the client-credentials grant of
//! `POST /{tenant}/oauth2/v2.0/token`. The body is form encoded:
//!
//! ```text
//! grant_type=client_credentials&client_id=...&client_secret=...&scope=...
//! ```
//!
//! Valid credentials get a bearer token; anything else gets the
//! identity platform's `{error, error_description}` body.

use crate::fake_graph::tenant::{TOKEN, Tenant};
use actix_web::HttpResponse;
use serde::Deserialize;
use serde_json::json;

/// The form fields the fake cares about. `scope` is accepted and
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TokenForm {
    pub grant_type: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Handle a token request for `tenant_segment`.
pub fn handle_token(tenant_segment: &str, form: &TokenForm, tenant: &Tenant) -> HttpResponse {
    if tenant_segment != tenant.tenant_id {
        return HttpResponse::BadRequest().json(json!({
            "error": "invalid_request",
            "error_description": format!("AADSTS90002: Tenant '{tenant_segment}' not found.")
        }));
    }

    if form.grant_type.as_deref() != Some("client_credentials") {
        return HttpResponse::BadRequest().json(json!({
            "error": "unsupported_grant_type",
            "error_description": "AADSTS70003: The app requested an unsupported grant type."
        }));
    }

    if form.client_id.as_deref() != Some(tenant.client_id.as_str())
        || form.client_secret.as_deref() != Some(tenant.client_secret.as_str())
    {
        return HttpResponse::Unauthorized().json(json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        }));
    }

    HttpResponse::Ok().json(json!({
        "token_type": "Bearer",
        "expires_in": tenant.token_lifetime,
        "ext_expires_in": tenant.token_lifetime,
        "access_token": TOKEN
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_graph::handlers::body_json;
    use crate::fake_graph::tenant::{CLIENT_ID, CLIENT_SECRET, TenantBuilder};
    use actix_web::http::StatusCode;

    fn form(secret: &str) -> TokenForm {
        TokenForm {
            grant_type: Some("client_credentials".to_string()),
            client_id: Some(CLIENT_ID.to_string()),
            client_secret: Some(secret.to_string()),
        }
    }

    #[tokio::test]
    async fn issues_token_for_valid_secret() {
        let tenant = TenantBuilder::new("alice@contoso.com").build();

        let response = handle_token("contoso.com", &form(CLIENT_SECRET), &tenant);

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["access_token"], TOKEN);
        assert_eq!(body["expires_in"], 3599);
    }

    #[tokio::test]
    async fn token_lifetime_is_configurable() {
        let tenant = TenantBuilder::new("alice@contoso.com")
            .token_lifetime(60)
            .build();

        let response = handle_token("contoso.com", &form(CLIENT_SECRET), &tenant);

        assert_eq!(body_json(response).await["expires_in"], 60);
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let tenant = TenantBuilder::new("alice@contoso.com").build();

        let response = handle_token("contoso.com", &form("nope"), &tenant);

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "invalid_client");
    }

    #[test]
    fn rejects_missing_grant_type() {
        let tenant = TenantBuilder::new("alice@contoso.com").build();

        let response = handle_token("contoso.com", &TokenForm::default(), &tenant);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_unknown_tenant() {
        let tenant = TenantBuilder::new("alice@contoso.com").build();

        let response = handle_token("fabrikam.com", &form(CLIENT_SECRET), &tenant);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
