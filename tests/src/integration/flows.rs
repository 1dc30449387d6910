//! # Integration Test Flows
//!
//! Client and provider wired on one page through the secure channel.
//!
//! ## Flows Tested:
//!
//! 1. **Proxy login**: request reaches the provider's route, response returns
//!    to the caller with the same correlation id
//! 2. **Provider failures**: structured errors arrive unchanged
//! 3. **Concurrent calls**: several pending requests on one channel settle
//!    independently
//! 4. **Timeouts and teardown**: silent providers and destroyed containers

#[cfg(test)]
mod tests {
    use crate::harness::RelayPage;
    use futures::FutureExt;
    use relay_frame::ProviderContainer;
    use relay_rpc::{DisableAutoSignIn, ProxyLogin, RelayConfig, RequestState, RpcMethod};
    use relay_types::{
        Credential, ErrorKind, ProtocolMessage, ProxyLoginResponse, RelayError,
    };
    use std::time::Duration;

    fn credential(id: &str) -> Credential {
        Credential::with_password(id, "correct horse")
    }

    // =========================================================================
    // PROXY LOGIN
    // =========================================================================

    #[tokio::test]
    async fn test_proxy_login_end_to_end() {
        let page = RelayPage::new();
        let (client, provider) = page.connect(&RelayConfig::default()).await;
        provider.router.route::<ProxyLogin, _>(|credential| {
            assert_eq!(credential.id, "user@example.com");
            assert_eq!(credential.password.as_deref(), Some("correct horse"));
            Ok(ProxyLoginResponse::new(200, "SUCCESS"))
        });

        let response = client
            .proxy_login(credential("user@example.com"))
            .await
            .unwrap();

        assert_eq!(response, ProxyLoginResponse::new(200, "SUCCESS"));
        assert!(response.is_success());
        assert_eq!(client.channel().listener_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_error_arrives_unchanged() {
        let page = RelayPage::new();
        let (client, provider) = page.connect(&RelayConfig::default()).await;
        let failure = RelayError::request_failed("upstream rejected the login")
            .with_context(serde_json::json!({ "statusCode": 403 }));
        let sent = failure.clone();
        provider
            .router
            .route::<ProxyLogin, _>(move |_| Err(sent.clone()));

        let err = client
            .proxy_login(credential("user@example.com"))
            .await
            .unwrap_err();

        assert_eq!(err, failure);
    }

    #[tokio::test]
    async fn test_unrouted_method_is_unknown() {
        let page = RelayPage::new();
        let (client, _provider) = page.connect(&RelayConfig::default()).await;

        let err = client.disable_auto_sign_in().await.unwrap_err();
        assert_eq!(err, RelayError::unknown_method(DisableAutoSignIn::NAME));
    }

    // =========================================================================
    // CORRELATION
    // =========================================================================

    #[test]
    fn test_concurrent_requests_settle_independently() {
        let page = RelayPage::new();
        let (client, timers) = page.manual_client(&RelayConfig {
            id_prefix: Some("login".into()),
            ..Default::default()
        });
        let provider = page.silent_provider();

        let requests: Vec<_> = (0..3).map(|_| client.request::<ProxyLogin>()).collect();
        let mut pending: Vec<_> = requests
            .iter()
            .enumerate()
            .map(|(i, request)| request.dispatch(credential(&format!("user{i}@example.com"))))
            .collect();
        assert_eq!(client.channel().listener_count(), 3);

        // Answer out of order.
        for i in [2, 0, 1] {
            let reply = ProxyLoginResponse::new(200, format!("user{i}"));
            provider.send(&ProtocolMessage::response(requests[i].id().clone(), &reply).unwrap());
            assert_eq!(requests[i].state(), RequestState::Resolved);
        }

        for (i, pending) in pending.iter_mut().enumerate() {
            let reply = pending.now_or_never().unwrap().unwrap();
            assert_eq!(reply.response_text, format!("user{i}"));
        }
        assert_eq!(client.channel().listener_count(), 0);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_unit_ids_follow_configured_prefix() {
        let page = RelayPage::new();
        let (client, _timers) = page.manual_client(&RelayConfig {
            id_prefix: Some("login".into()),
            ..Default::default()
        });

        let ids: Vec<String> = (0..3)
            .map(|_| client.request::<ProxyLogin>().id().to_string())
            .collect();
        assert_eq!(ids, vec!["login-1", "login-2", "login-3"]);
    }

    // =========================================================================
    // TIMEOUTS AND TEARDOWN
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_silent_provider_times_out() {
        let page = RelayPage::new();
        let (client, provider) = page.connect(&RelayConfig::default()).await;
        provider.channel.dispose();

        let started = tokio::time::Instant::now();
        let err = client.disable_auto_sign_in().await.unwrap_err();

        assert!(err.is(ErrorKind::RequestTimeout));
        assert_eq!(err, RelayError::timeout(DisableAutoSignIn::TIMEOUT));
        assert!(started.elapsed() >= DisableAutoSignIn::TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_timeout_overrides_method() {
        let page = RelayPage::new();
        let config = RelayConfig {
            request_timeout_ms: Some(1_500),
            ..Default::default()
        };
        let (client, provider) = page.connect(&config).await;
        provider.channel.dispose();

        let err = client
            .proxy_login(credential("user@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::timeout(Duration::from_millis(1_500)));
    }

    #[test]
    fn test_destroyed_container_stops_traffic() {
        let page = RelayPage::new();
        let (client, timers) = page.manual_client(&RelayConfig::default());
        let provider = page.provider();
        provider
            .router
            .route::<ProxyLogin, _>(|_| Ok(ProxyLoginResponse::new(200, "SUCCESS")));

        page.container.destroy();
        assert!(page.container.target_reference().is_none());

        let request = client.request::<ProxyLogin>();
        let mut pending = request.dispatch(credential("user@example.com"));
        assert!((&mut pending).now_or_never().is_none());

        timers.advance(ProxyLogin::TIMEOUT + Duration::from_millis(1));
        assert!(pending
            .now_or_never()
            .unwrap()
            .unwrap_err()
            .is(ErrorKind::RequestTimeout));
    }

    #[test]
    fn test_closed_client_delivers_nothing_further() {
        let page = RelayPage::new();
        let (client, timers) = page.manual_client(&RelayConfig::default());
        let provider = page.silent_provider();

        let request = client.request::<ProxyLogin>();
        let mut pending = request.dispatch(credential("user@example.com"));
        client.close();

        provider.send(
            &ProtocolMessage::response(request.id().clone(), &ProxyLoginResponse::new(200, "OK"))
                .unwrap(),
        );
        assert!((&mut pending).now_or_never().is_none());

        timers.advance(ProxyLogin::TIMEOUT + Duration::from_millis(1));
        assert!(pending.now_or_never().unwrap().is_err());
    }

    #[test]
    fn test_request_after_close_rejects_without_waiting() {
        let page = RelayPage::new();
        let (client, timers) = page.manual_client(&RelayConfig::default());
        client.close();

        let err = client
            .proxy_login(credential("user@example.com"))
            .now_or_never()
            .expect("settles without the clock advancing")
            .unwrap_err();

        assert!(err.is(ErrorKind::Cancelled));
        assert_eq!(timers.pending_count(), 0);
        assert_eq!(client.channel().listener_count(), 0);
    }
}
