mod common;

use common::{address_of, executor, happy_service, keypair_base58, test_endpoints, ScriptedTransport};
use ed25519_dalek::{Signature, Verifier};
use xyber_project::actions::{AccountActions, SpinOutcome, UNKNOWN_IP};
use xyber_project::auth::{Authenticator, Session};
use xyber_project::client::{HttpResponse, Method};
use xyber_project::config::HttpConfig;
use xyber_project::identity::SigningIdentity;
use xyber_project::XyberError;

fn expected_session() -> Session {
    Session {
        access_token: "acc-token".to_string(),
        refresh_token: "ref-token".to_string(),
    }
}

#[tokio::test]
async fn test_login_happy_path() {
    let transport = ScriptedTransport::new(happy_service);
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();
    let identity = SigningIdentity::from_base58(&keypair_base58(5)).unwrap();

    let session = Authenticator::new(&executor, &endpoints)
        .perform_login(&identity, None)
        .await
        .expect("login should succeed");

    assert_eq!(session, expected_session());

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Get);
    assert_eq!(
        requests[0].url,
        format!(
            "http://auth.test/api/auth/challenge?address={}&network=solana",
            address_of(5)
        )
    );
    assert_eq!(requests[1].method, Method::Post);
    assert_eq!(requests[1].url, "http://auth.test/api/auth/verify");

    let body = requests[1].body.as_ref().unwrap();
    assert_eq!(body["address"], address_of(5));
    let signature_bytes = bs58::decode(body["signature"].as_str().unwrap())
        .into_vec()
        .unwrap();
    let signature = Signature::from_slice(&signature_bytes).unwrap();
    assert!(common::signing_key(5)
        .verifying_key()
        .verify(b"sign-me-please", &signature)
        .is_ok());
}

#[tokio::test(start_paused = true)]
async fn test_challenge_exhausted_retries_yields_no_session() {
    let transport = ScriptedTransport::new(|_| Ok(HttpResponse::new(503, "down")));
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();
    let identity = SigningIdentity::from_base58(&keypair_base58(5)).unwrap();

    let session = Authenticator::new(&executor, &endpoints)
        .perform_login(&identity, None)
        .await;

    assert!(session.is_none());
    assert_eq!(transport.count_matching("/api/auth/challenge"), 3);
    assert_eq!(transport.count_matching("/api/auth/verify"), 0);
}

#[tokio::test]
async fn test_challenge_unsuccessful_body_yields_no_session() {
    let transport = ScriptedTransport::new(|_| Ok(HttpResponse::new(200, r#"{"success":false}"#)));
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();
    let identity = SigningIdentity::from_base58(&keypair_base58(5)).unwrap();

    let session = Authenticator::new(&executor, &endpoints)
        .perform_login(&identity, None)
        .await;

    assert!(session.is_none());
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_verify_rejected_yields_no_session() {
    let transport = ScriptedTransport::new(|request| {
        if request.url.contains("/api/auth/verify") {
            Ok(HttpResponse::new(200, r#"{"success":false,"message":"bad signature"}"#))
        } else {
            happy_service(request)
        }
    });
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();
    let identity = SigningIdentity::from_base58(&keypair_base58(5)).unwrap();

    let session = Authenticator::new(&executor, &endpoints)
        .perform_login(&identity, None)
        .await;

    assert!(session.is_none());
    assert_eq!(transport.count_matching("/api/auth/verify"), 1);
}

#[tokio::test]
async fn test_malformed_verify_body_yields_no_session() {
    let transport = ScriptedTransport::new(|request| {
        if request.url.contains("/api/auth/verify") {
            Ok(HttpResponse::new(200, "<html>gateway</html>"))
        } else {
            happy_service(request)
        }
    });
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();
    let identity = SigningIdentity::from_base58(&keypair_base58(5)).unwrap();

    let session = Authenticator::new(&executor, &endpoints)
        .perform_login(&identity, None)
        .await;

    assert!(session.is_none());
}

#[tokio::test]
async fn test_daily_action_reports_reward() {
    let transport = ScriptedTransport::new(happy_service);
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let outcome = AccountActions::new(&executor, &endpoints)
        .daily_action(&expected_session(), None)
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SpinOutcome::Performed {
            xp_reward: "50".to_string()
        }
    );
    let requests = transport.requests();
    assert_eq!(requests[0].url, "http://hub.test/api/spinner");
    assert_eq!(
        requests[0].cookie.as_deref(),
        Some("access_token=acc-token; refresh_token=ref-token")
    );
}

#[tokio::test]
async fn test_daily_action_already_done_is_not_an_error() {
    let transport = ScriptedTransport::new(|_| {
        Ok(HttpResponse::new(
            400,
            r#"{"error":"user have already spun today"}"#,
        ))
    });
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let outcome = AccountActions::new(&executor, &endpoints)
        .daily_action(&expected_session(), None)
        .await;

    assert_eq!(outcome, Ok(SpinOutcome::AlreadyDone));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_daily_action_other_400_is_protocol_error() {
    let transport =
        ScriptedTransport::new(|_| Ok(HttpResponse::new(400, r#"{"error":"something else"}"#)));
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let outcome = AccountActions::new(&executor, &endpoints)
        .daily_action(&expected_session(), None)
        .await;

    assert!(matches!(outcome, Err(XyberError::Protocol(_))));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_fetch_status_reads_xp() {
    let transport = ScriptedTransport::new(happy_service);
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let status = AccountActions::new(&executor, &endpoints)
        .fetch_status(&expected_session(), None)
        .await
        .unwrap();

    assert_eq!(status.points, 1250.0);
    assert_eq!(transport.requests()[0].method, Method::Get);
}

#[tokio::test]
async fn test_fetch_status_rejects_unexpected_shape() {
    let transport = ScriptedTransport::new(|_| Ok(HttpResponse::new(200, r#"{"ok":false}"#)));
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let status = AccountActions::new(&executor, &endpoints)
        .fetch_status(&expected_session(), None)
        .await;

    assert!(matches!(status, Err(XyberError::Protocol(_))));
}

#[tokio::test]
async fn test_public_ip_degrades_to_unknown() {
    let transport = ScriptedTransport::new(|_| Err(XyberError::Transport("dns failure".into())));
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let ip = AccountActions::new(&executor, &endpoints)
        .fetch_public_ip(None)
        .await;

    assert_eq!(ip, UNKNOWN_IP);
}

#[tokio::test]
async fn test_public_ip_success() {
    let transport = ScriptedTransport::new(happy_service);
    let executor = executor(transport.clone(), HttpConfig::default());
    let endpoints = test_endpoints();

    let ip = AccountActions::new(&executor, &endpoints)
        .fetch_public_ip(None)
        .await;

    assert_eq!(ip, "203.0.113.7");
}
