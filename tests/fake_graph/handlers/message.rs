//! Single message handler.
//!
//! Returns a full message resource. With `$expand=attachments` the
//! response embeds one small file attachment, as Graph does:
//!
//! ```text
//! GET /v1.0/users/{user}/messages/{id}?$expand=attachments
//! ```

use super::graph_error;
use crate::fake_graph::tenant::Tenant;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "$expand")]
    pub expand: Option<String>,
}

/// Handle a message fetch for `message_id`.
pub fn handle_message(message_id: &str, query: &MessageQuery, tenant: &Tenant) -> HttpResponse {
    if !tenant.has_message(message_id) {
        return graph_error(
            StatusCode::NOT_FOUND,
            "ErrorItemNotFound",
            "The specified object was not found in the store.",
        );
    }

    let mut body = json!({
        "id": message_id,
        "subject": format!("Message {message_id}"),
        "hasAttachments": true,
        "body": {"contentType": "text", "content": "Hello from the fake tenant."},
        "from": {"emailAddress": {"address": "sender@example.com"}}
    });
    if query.expand.as_deref() == Some("attachments") {
        body["attachments"] = json!([{
            "@odata.type": "#microsoft.graph.fileAttachment",
            "id": format!("{message_id}-att"),
            "name": "report.txt",
            "contentType": "text/plain",
            "size": 5,
            "contentBytes": "aGVsbG8="
        }]);
    }

    HttpResponse::Ok().json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_graph::handlers::body_json;
    use crate::fake_graph::tenant::TenantBuilder;

    fn tenant() -> Tenant {
        TenantBuilder::new("alice@contoso.com")
            .folder("inbox", "Inbox", None)
            .message("m1")
            .build()
    }

    #[tokio::test]
    async fn expands_attachments_on_request() {
        let query = MessageQuery {
            expand: Some("attachments".to_string()),
        };

        let body = body_json(handle_message("m1", &query, &tenant())).await;

        assert_eq!(body["id"], "m1");
        assert_eq!(body["attachments"][0]["name"], "report.txt");
    }

    #[tokio::test]
    async fn plain_fetch_has_no_attachments() {
        let body = body_json(handle_message("m1", &MessageQuery::default(), &tenant())).await;

        assert!(body.get("attachments").is_none());
    }

    #[test]
    fn unknown_message_is_not_found() {
        let response = handle_message("missing", &MessageQuery::default(), &tenant());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
