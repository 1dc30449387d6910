//! Shared fixtures: a page with a client window and a provider container.

use relay_channel::{InMemoryPage, InMemoryWindow, SecureChannel, TransportBinding};
use relay_frame::{FrameConfig, HeadlessContainer, ProviderContainer};
use relay_rpc::test_utils::ManualTimerService;
use relay_rpc::{RelayClient, RelayConfig, RequestRouter, TimerService, TokioTimerService};
use relay_telemetry::LogConfig;
use relay_types::{Origin, PeerIdentity, ProtocolMessage};
use std::sync::Arc;

pub const CLIENT_ORIGIN: &str = "https://client.example.com";
pub const PROVIDER_URL_BASE: &str = "https://provider.example.com/relay";
pub const PROVIDER_ORIGIN: &str = "https://provider.example.com";
pub const ROGUE_ORIGIN: &str = "https://evil.example.net";

/// Route relay logs to the test writer. Safe to call from every test.
pub fn init_test_logging() {
    let config = LogConfig {
        ansi: false,
        ..LogConfig::with_level("relay_channel=debug,relay_rpc=debug,relay_frame=debug")
    };
    // Only the first call in the process installs a subscriber.
    let _ = relay_telemetry::init_logging(&config);
}

pub fn origin(input: &str) -> Origin {
    Origin::parse(input).expect("test origin parses")
}

/// A page hosting the client window and the provider container.
pub struct RelayPage {
    pub page: InMemoryPage,
    pub client_window: InMemoryWindow,
    pub container: HeadlessContainer,
}

impl Default for RelayPage {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPage {
    pub fn new() -> Self {
        init_test_logging();
        let page = InMemoryPage::new();
        let client_window = page.open_window(origin(CLIENT_ORIGIN));
        let container = HeadlessContainer::open(
            &page,
            &FrameConfig::new(PROVIDER_URL_BASE, "relay-frame-1"),
            client_window.origin(),
        )
        .expect("container opens");

        Self {
            page,
            client_window,
            container,
        }
    }

    pub fn provider_window(&self) -> &InMemoryWindow {
        self.container.provider_window()
    }

    /// What a client channel pins: the container's window at its origin.
    pub fn provider_peer(&self) -> PeerIdentity {
        self.container
            .peer_identity(origin(PROVIDER_ORIGIN))
            .expect("container is alive")
    }

    /// What the provider pins: the client window that embedded it.
    pub fn client_peer(&self) -> PeerIdentity {
        PeerIdentity::new(self.client_window.origin().clone(), self.client_window.id())
    }

    pub fn client_transport(&self) -> Arc<dyn TransportBinding> {
        Arc::new(self.client_window.clone())
    }

    pub fn provider_transport(&self) -> Arc<dyn TransportBinding> {
        Arc::new(self.provider_window().clone())
    }

    /// A client channel pinned to the provider, without handshake.
    pub fn client_channel(&self) -> SecureChannel {
        SecureChannel::new(self.client_transport(), self.provider_peer())
    }

    /// Provider channel plus a router answering on it. Announces `Ready`.
    pub fn provider(&self) -> Provider {
        let channel = SecureChannel::connect_provider(self.provider_transport(), self.client_peer());
        let router = Arc::new(RequestRouter::new());
        router.attach(&channel);
        Provider { channel, router }
    }

    /// Provider channel with no router, for tests that answer by hand.
    pub fn silent_provider(&self) -> SecureChannel {
        SecureChannel::new(self.provider_transport(), self.client_peer())
    }

    /// Another frame on the page, from an unrelated origin.
    pub fn rogue_window(&self) -> InMemoryWindow {
        self.page.open_window(origin(ROGUE_ORIGIN))
    }

    /// Post `message` from `window` to the client window.
    pub fn post_to_client(&self, window: &InMemoryWindow, message: &ProtocolMessage) {
        window.post(
            self.client_window.id(),
            message.encode().expect("message encodes"),
            self.client_window.origin(),
        );
    }

    /// Client on the manual clock, without handshake.
    pub fn manual_client(&self, config: &RelayConfig) -> (RelayClient, Arc<ManualTimerService>) {
        let timers = Arc::new(ManualTimerService::new());
        let client = RelayClient::from_config(self.client_channel(), timers.clone(), config)
            .expect("valid config");
        (client, timers)
    }

    /// Full handshake on the tokio clock. The provider announces before the
    /// client listens; the client's hello gets the announcement repeated.
    pub async fn connect(&self, config: &RelayConfig) -> (RelayClient, Provider) {
        let timers: Arc<dyn TimerService> =
            Arc::new(TokioTimerService::try_current().expect("inside a runtime"));
        let provider = self.provider();
        let client =
            RelayClient::connect(self.client_transport(), self.provider_peer(), config, timers)
                .await
                .expect("handshake completes");
        (client, provider)
    }
}

/// Provider side: its channel and the router answering on it.
pub struct Provider {
    pub channel: SecureChannel,
    pub router: Arc<RequestRouter>,
}
