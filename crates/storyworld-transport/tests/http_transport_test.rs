//! Integration tests for `HttpTransport` against an in-process stub backend.

use std::sync::Arc;

use serde_json::json;
use storyworld_core::error::RequestError;
use storyworld_core::transport::{EntityKind, Operation, Transport};
use storyworld_test_support::{StatusCode, StubBackend, StubReply, unreachable_url};
use storyworld_transport::{EndpointMap, HttpTransport};

fn transport_for(backend: &StubBackend) -> HttpTransport {
    let endpoints =
        EndpointMap::new(&backend.url("/chat"), &backend.url("/generate")).unwrap();
    HttpTransport::new(Arc::new(endpoints)).unwrap()
}

#[tokio::test]
async fn test_invoke_posts_json_and_returns_body_verbatim() {
    // Arrange
    let body = json!({ "message": "hi there", "characterName": "Yuki", "requestId": "req-1" });
    let backend =
        StubBackend::spawn(vec![("/chat", vec![StubReply::json(StatusCode::OK, &body)])]).await;
    let transport = transport_for(&backend);
    let payload = json!({ "message": "hello" });

    // Act
    let result = transport.invoke(Operation::Chat, payload.clone()).await;

    // Assert
    assert_eq!(result.unwrap(), body);
    let received = backend.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/chat");
    assert_eq!(received[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(received[0].body, payload);
}

#[tokio::test]
async fn test_invoke_routes_every_generate_kind_to_generate_endpoint() {
    // Arrange
    let backend = StubBackend::spawn(vec![(
        "/generate",
        vec![StubReply::json(StatusCode::OK, &json!({ "content": {} }))],
    )])
    .await;
    let transport = transport_for(&backend);

    // Act
    for kind in [EntityKind::Character, EntityKind::World, EntityKind::Story] {
        transport
            .invoke(Operation::Generate(kind), json!({ "type": kind }))
            .await
            .unwrap();
    }

    // Assert
    let received = backend.received();
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|r| r.path == "/generate"));
    assert_eq!(received[2].body["type"], "story");
}

#[tokio::test]
async fn test_invoke_surfaces_error_field_of_rejected_response() {
    // Arrange
    let backend = StubBackend::spawn(vec![(
        "/chat",
        vec![StubReply::json(
            StatusCode::INTERNAL_SERVER_ERROR,
            &json!({ "error": "rate limited" }),
        )],
    )])
    .await;
    let transport = transport_for(&backend);

    // Act
    let err = transport
        .invoke(Operation::Chat, json!({}))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(
        err,
        RequestError::Rejected {
            status: 500,
            message: "rate limited".to_owned(),
        }
    );
}

#[tokio::test]
async fn test_invoke_uses_fallback_for_rejection_without_json_body() {
    // Arrange
    let backend = StubBackend::spawn(vec![(
        "/generate",
        vec![StubReply::raw(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>")],
    )])
    .await;
    let transport = transport_for(&backend);

    // Act
    let err = transport
        .invoke(Operation::Generate(EntityKind::Character), json!({}))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.to_string(), "Failed to generate character");
    assert!(matches!(err, RequestError::Rejected { status: 502, .. }));
}

#[tokio::test]
async fn test_invoke_reports_non_json_success_body_as_malformed() {
    // Arrange
    let backend = StubBackend::spawn(vec![(
        "/chat",
        vec![StubReply::raw(StatusCode::OK, "definitely not json")],
    )])
    .await;
    let transport = transport_for(&backend);

    // Act
    let err = transport
        .invoke(Operation::Chat, json!({}))
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err, RequestError::MalformedResponse { .. }));
    assert_eq!(err.message(), "Failed to get AI response");
}

#[tokio::test]
async fn test_invoke_reports_connection_failure_with_fallback_message() {
    // Arrange
    let endpoints = EndpointMap::new(
        &unreachable_url("/chat").await,
        &unreachable_url("/generate").await,
    )
    .unwrap();
    let transport = HttpTransport::new(Arc::new(endpoints)).unwrap();

    // Act
    let err = transport
        .invoke(Operation::Generate(EntityKind::World), json!({}))
        .await
        .unwrap_err();

    // Assert
    match err {
        RequestError::Transport { message, detail } => {
            assert_eq!(message, "Failed to generate world");
            assert!(!detail.is_empty());
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}
