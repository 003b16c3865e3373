use beacon_core::NegotiationMessage;
use beacon_server::{ConnectionHandle, Routing};

use crate::integration::{create_mock_dispatcher, create_test_service, init_tracing};
use crate::utils::{TestClient, account, next_event, offline_rejection};

#[tokio::test]
async fn test_call_to_unregistered_account_is_rejected() {
    init_tracing();

    let service = create_test_service();
    let mut c1 = TestClient::register(&service, "U1").await;
    let mut c2 = TestClient::register(&service, "U2").await;

    let routing = c1.call("U1", "U3").await;

    assert_eq!(routing, Some(Routing::RejectedOffline));
    assert_eq!(c1.recv().await, offline_rejection());
    c1.assert_no_event();
    c2.assert_no_event();
    assert_eq!(service.dispatcher().calls().pending_count(), 0);
}

#[tokio::test]
async fn test_offline_rejection_goes_only_to_origin() {
    init_tracing();

    let (dispatcher, output) = create_mock_dispatcher();
    output.set_online(&account("u1")).await;
    let (origin, mut origin_rx) = ConnectionHandle::channel();

    let message = NegotiationMessage::CallRequest {
        from: account("u1"),
        to: account("ghost"),
        caller_display: "u1".into(),
    };
    let routing = dispatcher.dispatch(&origin, &account("u1"), message).await;

    assert_eq!(routing, Routing::RejectedOffline);
    assert_eq!(next_event(&mut origin_rx).await, offline_rejection());
    assert!(origin_rx.try_recv().is_err());
    // Nothing went out through the registry path, not even to the online caller.
    assert!(output.deliveries().await.is_empty());
}

#[tokio::test]
async fn test_request_preserves_from_unchanged() {
    init_tracing();

    let (dispatcher, output) = create_mock_dispatcher();
    output.set_online(&account("callee")).await;
    let (origin, mut origin_rx) = ConnectionHandle::channel();

    let message = NegotiationMessage::CallRequest {
        from: account("caller"),
        to: account("callee"),
        caller_display: "Ada".into(),
    };
    let routing = dispatcher.dispatch(&origin, &account("caller"), message).await;

    assert_eq!(routing, Routing::Delivered { to: account("callee") });
    let delivered = output.deliveries().await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(
        delivered[0],
        (
            account("callee"),
            beacon_core::ServerEvent::IncomingCall {
                from: account("caller"),
                caller_display: "Ada".into(),
            }
        )
    );
    assert!(origin_rx.try_recv().is_err());
}
