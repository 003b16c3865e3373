use beacon_core::ServerEvent;
use beacon_server::Routing;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::{TestClient, account};

#[tokio::test]
async fn test_rejection_reaches_caller_with_reason() {
    init_tracing();

    let service = create_test_service();
    let mut c1 = TestClient::register(&service, "u1").await;
    let mut c2 = TestClient::register(&service, "u2").await;

    c1.call("u1", "u2").await;
    c2.recv().await;

    let routing = c2.reject("u1", "u2", "Call rejected by user").await;

    assert_eq!(routing, Some(Routing::Delivered { to: account("u1") }));
    assert_eq!(
        c1.recv().await,
        ServerEvent::CallRejected {
            reason: "Call rejected by user".into()
        }
    );
    assert!(!service.dispatcher().calls().is_pending(&account("u1"), &account("u2")));
    c2.assert_no_event();
}

#[tokio::test]
async fn test_response_without_request_is_still_relayed() {
    init_tracing();

    let service = create_test_service();
    let mut c1 = TestClient::register(&service, "u1").await;
    let mut c2 = TestClient::register(&service, "u2").await;

    c2.reject("u2", "u1", "busy").await;

    assert_eq!(
        c1.recv().await,
        ServerEvent::CallRejected {
            reason: "busy".into()
        }
    );
}
