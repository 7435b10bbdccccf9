//! End-to-end sends through `ReqwestTransport` against a mock provider

use serde_json::json;
use switchboard_channels::{
    Attachment, ChannelConfig, ChannelHandler, ChannelKind, MediaError, MsgStatus,
    OutboundFailure, OutgoingMessage, RbmHandler, ReqwestTransport, Urn, WhatsAppHandler,
};
use uuid::Uuid;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn whatsapp_channel(server: &MockServer) -> ChannelConfig {
    ChannelConfig::new(Uuid::new_v4(), ChannelKind::WhatsApp, "250788383383")
        .with_auth_token("token123")
        .with_base_url(server.uri())
}

fn rbm_channel(server: &MockServer) -> ChannelConfig {
    ChannelConfig::new(Uuid::new_v4(), ChannelKind::Rbm, "250788383383")
        .with_auth_token("the-auth-token")
        .with_send_url(format!("{}/", server.uri()))
}

#[tokio::test]
async fn whatsapp_text_send() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("Authorization", "Bearer token123"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "to": "250788123123", "type": "text", "text": {"body": "Simple Message"}
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"messages": [{"id": "157b5e14568e8"}]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let msg = OutgoingMessage::text(Urn::whatsapp("250788123123").unwrap(), "Simple Message");

    let outcome = WhatsAppHandler::new()
        .send(&whatsapp_channel(&server), &msg, &transport)
        .await
        .unwrap();

    assert_eq!(outcome.status, MsgStatus::Wired);
    assert_eq!(outcome.external_id.as_deref(), Some("157b5e14568e8"));
    assert_eq!(outcome.logs.len(), 1);
    assert_eq!(outcome.logs[0].status_code, Some(201));
}

#[tokio::test]
async fn whatsapp_document_relay_and_send() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/media"))
        .and(header("Content-Type", "application/pdf"))
        .and(header("Authorization", "Bearer token123"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"media": [{"id": "f043afd0"}]})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_json(json!({
            "to": "250788123123", "type": "document",
            "document": {"id": "f043afd0", "caption": "monthly report"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"messages": [{"id": "wamid-1"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let msg = OutgoingMessage::text(Urn::whatsapp("250788123123").unwrap(), "monthly report")
        .with_attachment(Attachment::new(
            "application/pdf",
            format!("{}/files/report.pdf", server.uri()),
        ));

    let outcome = WhatsAppHandler::new()
        .send(&whatsapp_channel(&server), &msg, &transport)
        .await
        .unwrap();

    assert!(outcome.is_wired());
    assert_eq!(outcome.external_id.as_deref(), Some("wamid-1"));
    let steps: Vec<_> = outcome.logs.iter().map(|l| l.description.as_str()).collect();
    assert_eq!(steps, vec!["Media Fetch", "Media Upload", "Message Sent"]);
    // binary bodies are summarized, never logged raw
    assert_eq!(outcome.logs[1].request_body.as_deref(), Some("<8 bytes>"));
}

#[tokio::test]
async fn whatsapp_failed_fetch_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let msg = OutgoingMessage::text(Urn::whatsapp("250788123123").unwrap(), "")
        .with_attachment(Attachment::new(
            "image/jpeg",
            format!("{}/files/missing.jpg", server.uri()),
        ));

    let outcome = WhatsAppHandler::new()
        .send(&whatsapp_channel(&server), &msg, &transport)
        .await
        .unwrap();

    assert_eq!(outcome.status, MsgStatus::Errored);
    assert_eq!(outcome.logs.len(), 1);
    assert!(outcome.logs[0].is_error());
    assert!(matches!(
        outcome.failure,
        Some(OutboundFailure::Media(MediaError::Fetch(_)))
    ));
}

#[tokio::test]
async fn rbm_long_text_keeps_first_segment_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/phones/+250788123123/agentMessages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "phones/+250788123123/agentMessages/first-segment"
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/phones/+250788123123/agentMessages"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": {"status": "INTERNAL"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new().unwrap();
    let text = "word ".repeat(1000);
    let msg = OutgoingMessage::text(Urn::rbm("+250788123123").unwrap(), text.trim_end());

    let outcome = RbmHandler::new()
        .send(&rbm_channel(&server), &msg, &transport)
        .await
        .unwrap();

    assert_eq!(outcome.status, MsgStatus::Errored);
    assert_eq!(outcome.external_id.as_deref(), Some("first-segment"));
    assert_eq!(outcome.logs.len(), 2);
    assert!(outcome.logs[1]
        .error
        .as_deref()
        .is_some_and(|e| e.contains("INTERNAL")));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let message_ids: Vec<Uuid> = requests
        .iter()
        .map(|req| {
            let id = req
                .url
                .query_pairs()
                .find(|(k, _)| k == "messageId")
                .map(|(_, v)| v.into_owned())
                .unwrap();
            Uuid::parse_str(&id).unwrap()
        })
        .collect();
    assert_ne!(message_ids[0], message_ids[1]);
    assert_eq!(
        requests[0].headers.get("authorization").unwrap(),
        "Bearer the-auth-token"
    );
}

#[tokio::test]
async fn unreachable_provider_is_errored_outcome() {
    let server = MockServer::start().await;
    let channel = whatsapp_channel(&server);
    drop(server);

    let transport = ReqwestTransport::new().unwrap();
    let msg = OutgoingMessage::text(Urn::whatsapp("250788123123").unwrap(), "hello");

    let outcome = WhatsAppHandler::new()
        .send(&channel, &msg, &transport)
        .await
        .unwrap();

    assert_eq!(outcome.status, MsgStatus::Errored);
    assert_eq!(outcome.external_id, None);
    assert_eq!(outcome.logs[0].status_code, None);
    assert!(outcome.logs[0].is_error());
}
