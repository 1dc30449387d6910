//! # Channel Establishment
//!
//! The client pins the container's window, then waits for the provider's
//! `Ready` before issuing requests.

#[cfg(test)]
mod tests {
    use crate::harness::RelayPage;
    use relay_channel::SecureChannel;
    use relay_rpc::{ClientError, RelayClient, RelayConfig, TokioTimerService};
    use relay_types::{ErrorKind, ProtocolMessage};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_handshake_pins_container_window() {
        let page = RelayPage::new();
        let (client, provider) = page.connect(&RelayConfig::default()).await;

        let peer = client.channel().peer();
        assert_eq!(peer.origin.as_str(), "https://provider.example.com");
        assert_eq!(peer.window, Some(page.provider_window().id()));
        assert_eq!(provider.channel.peer().window, Some(page.client_window.id()));
        assert_eq!(client.channel().stats().delivered.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handshake_times_out_without_provider() {
        let page = RelayPage::new();
        let config = RelayConfig {
            ready_timeout_ms: 750,
            ..Default::default()
        };

        let result = RelayClient::connect(
            page.client_transport(),
            page.provider_peer(),
            &config,
            Arc::new(TokioTimerService::try_current().unwrap()),
        )
        .await;

        match result {
            Err(ClientError::Connect(err)) => {
                assert!(err.is(ErrorKind::RequestTimeout));
                assert_eq!(err.context, Some(serde_json::json!({ "timeoutMs": 750 })));
            }
            other => panic!("expected handshake timeout, got {other:?}"),
        }
        assert_eq!(page.page.handler_count(page.client_window.id()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_from_foreign_frame_does_not_complete_handshake() {
        let page = RelayPage::new();
        let rogue = page.rogue_window();

        let connect = SecureChannel::connect_client(
            page.client_transport(),
            page.provider_peer(),
            Duration::from_secs(1),
        );
        let spoof = async {
            tokio::task::yield_now().await;
            page.post_to_client(&rogue, &ProtocolMessage::ready());
        };

        let (result, ()) = tokio::join!(connect, spoof);
        assert!(result.unwrap_err().is(ErrorKind::RequestTimeout));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_connecting() {
        let page = RelayPage::new();
        let config = RelayConfig {
            ready_timeout_ms: 0,
            ..Default::default()
        };

        let result = RelayClient::connect(
            page.client_transport(),
            page.provider_peer(),
            &config,
            Arc::new(TokioTimerService::try_current().unwrap()),
        )
        .await;

        assert!(matches!(result, Err(ClientError::Config(_))));
        assert_eq!(page.page.handler_count(page.client_window.id()), 0);
    }
}
