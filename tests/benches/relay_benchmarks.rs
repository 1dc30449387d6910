//! # Credential Relay Benchmarks
//!
//! - `relay-round-trip`: proxy login through client, channel, router and
//!   back on an in-memory page
//! - `relay-foreign-traffic`: one validated message that matches none of N
//!   pending units; cost should grow linearly with N

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::FutureExt;
use relay_channel::{InMemoryPage, InboundEvent, SecureChannel};
use relay_rpc::test_utils::ManualTimerService;
use relay_rpc::{ProxyLogin, RelayClient, RelayConfig, RequestRouter};
use relay_types::{
    proxy_login_response_message, CorrelationId, Credential, Origin, PeerIdentity,
    ProxyLoginResponse, WindowId,
};
use std::sync::Arc;

struct Wiring {
    page: InMemoryPage,
    client_window: WindowId,
    client: RelayClient,
    provider: SecureChannel,
    timers: Arc<ManualTimerService>,
}

fn wire() -> Wiring {
    let page = InMemoryPage::new();
    let client_window = page.open_window(Origin::parse("https://client.example.com").unwrap());
    let provider_window = page.open_window(Origin::parse("https://provider.example.com").unwrap());

    let client_id = client_window.id();
    let provider = SecureChannel::new(
        Arc::new(provider_window.clone()),
        PeerIdentity::new(client_window.origin().clone(), client_window.id()),
    );
    let channel = SecureChannel::new(
        Arc::new(client_window),
        PeerIdentity::new(provider_window.origin().clone(), provider_window.id()),
    );
    let timers = Arc::new(ManualTimerService::new());
    let client = RelayClient::from_config(
        channel,
        timers.clone(),
        &RelayConfig {
            id_prefix: Some("bench".into()),
            ..Default::default()
        },
    )
    .unwrap();

    Wiring {
        page,
        client_window: client_id,
        client,
        provider,
        timers,
    }
}

fn bench_round_trip(c: &mut Criterion) {
    let wiring = wire();
    let router = Arc::new(RequestRouter::new());
    router.route::<ProxyLogin, _>(|_| Ok(ProxyLoginResponse::new(200, "SUCCESS")));
    router.attach(&wiring.provider);

    let mut group = c.benchmark_group("relay-round-trip");
    group.throughput(Throughput::Elements(1));
    group.bench_function("proxy_login", |b| {
        b.iter(|| {
            let response = wiring
                .client
                .proxy_login(Credential::with_password("user@example.com", "pw"))
                .now_or_never()
                .expect("in-memory reply is synchronous");
            black_box(response.is_ok())
        })
    });
    group.finish();
}

fn bench_foreign_traffic(c: &mut Criterion) {
    let mut group = c.benchmark_group("relay-foreign-traffic");

    for pending_units in [1usize, 10, 100] {
        let wiring = wire();
        let requests: Vec<_> = (0..pending_units)
            .map(|_| wiring.client.request::<ProxyLogin>())
            .collect();
        let _pending: Vec<_> = requests
            .iter()
            .map(|r| r.dispatch(Credential::with_password("user@example.com", "pw")))
            .collect();
        let foreign = proxy_login_response_message(
            CorrelationId::new("not-pending"),
            &ProxyLoginResponse::new(200, "SUCCESS"),
        )
        .unwrap()
        .encode()
        .unwrap();
        let peer = wiring.client.channel().peer().clone();

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("fan_out", pending_units),
            &foreign,
            |b, data| {
                b.iter(|| {
                    wiring.page.inject(
                        wiring.client_window,
                        InboundEvent::new(peer.origin.as_str(), peer.window, data.clone()),
                    )
                })
            },
        );
        assert_eq!(wiring.timers.pending_count(), pending_units);
    }

    group.finish();
}

criterion_group!(benches, bench_round_trip, bench_foreign_traffic);
criterion_main!(benches);
