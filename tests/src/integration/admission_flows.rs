//! # Admission Flow Tests
//!
//! Verdicts of the group admission service against a simulated relay
//! network and local store.
//!
//! ```text
//! update (kind 41) ──► local store count {40, author, id}
//!                          │ 0 rows
//!                          ├── hint ──► hinted relay (exactly one result)
//!                          └── none ──► fallback pool race (first match)
//! ```

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::join_all;
    use proptest::prelude::*;

    use cc_01_group_admission::{
        AdmissionConfig, GroupAdmissionApi, GroupAdmissionService, MockEventStore,
        MockRelayNetwork, ProofSource,
    };
    use shared_types::{Event, Kind, Tag};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ALICE: &str = "a1";
    const BOB: &str = "b0";
    const ALICE_RELAY: &str = "wss://alice.relay.example";
    const DEAD_RELAY: &str = "wss://dead.relay.example";
    const POOL: [&str; 3] = [
        "wss://pool-1.example",
        "wss://pool-2.example",
        "wss://pool-3.example",
    ];

    type Service = GroupAdmissionService<Arc<MockEventStore>, MockRelayNetwork>;

    struct Harness {
        service: Arc<Service>,
        store: Arc<MockEventStore>,
        network: MockRelayNetwork,
    }

    fn harness() -> Harness {
        let config = AdmissionConfig::for_testing().with_fallback_relays(POOL);
        let store = Arc::new(MockEventStore::new());
        let network = MockRelayNetwork::new();
        for url in POOL {
            network.add_relay(url, vec![]);
        }
        let service = Arc::new(GroupAdmissionService::new(
            config,
            Arc::clone(&store),
            network.clone(),
        ));
        Harness {
            service,
            store,
            network,
        }
    }

    fn channel(author: &str) -> Event {
        Event::new(
            author,
            1_700_000_000,
            Kind::CHANNEL_CREATION,
            vec![],
            r#"{"name":"Test Channel","about":"A test channel","picture":"https://robohash.org/test","relays":["ws://localhost:3334"]}"#,
        )
    }

    fn metadata_update(author: &str, channel: &Event, hint: &str) -> Event {
        Event::new(
            author,
            1_700_000_100,
            Kind::CHANNEL_METADATA,
            vec![
                Tag::event_reference(&channel.id, hint),
                Tag::new(["comic-chat", "v1.0.0"]),
            ],
            r#"{"name":"Renamed","about":"new about"}"#,
        )
    }

    // =============================================================================
    // NON-CHANNEL KINDS
    // =============================================================================

    #[tokio::test]
    async fn test_non_channel_kinds_pass_both_validators() {
        let h = harness();
        for kind in [0u16, 1, 7, 42, 30023] {
            let ev = Event::new(ALICE, 1, Kind(kind), vec![], "{broken");
            assert_eq!(h.service.check_creation(&ev).into_parts(), (false, String::new()));
            assert_eq!(h.service.check_update(&ev).await.into_parts(), (false, String::new()));
        }
        assert_eq!(h.store.query_count(), 0);
    }

    // =============================================================================
    // CREATION
    // =============================================================================

    #[tokio::test]
    async fn test_creation_valid_and_invalid() {
        let h = harness();
        assert_eq!(
            h.service.admit(&channel(ALICE)).await.into_parts(),
            (false, String::new())
        );

        for content in ["", "{", "[]", r#"{"name":7}"#, r#"{"relays":"wss://x"}"#] {
            let ev = Event::new(ALICE, 1, Kind::CHANNEL_CREATION, vec![], content);
            assert_eq!(
                h.service.admit(&ev).await.into_parts(),
                (true, "Invalid content".to_string()),
                "content {content:?}"
            );
        }
    }

    // =============================================================================
    // UPDATE RESOLUTION
    // =============================================================================

    #[tokio::test]
    async fn test_update_with_local_creation_accepted() {
        let h = harness();
        let ch = channel(ALICE);
        h.store.insert(ch.clone());

        let verdict = h.service.check_update(&metadata_update(ALICE, &ch, ALICE_RELAY)).await;

        assert_eq!(verdict.into_parts(), (false, String::new()));
        assert_eq!(h.network.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_update_without_hint_and_no_pool_match() {
        let h = harness();
        let ch = channel(ALICE);

        let verdict = h.service.check_update(&metadata_update(ALICE, &ch, "")).await;

        assert_eq!(
            verdict.into_parts(),
            (true, "failed to get create event: 40 channel not found".to_string())
        );
        assert_eq!(h.network.connect_count(), POOL.len());
        assert_eq!(h.network.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_update_found_in_pool() {
        let h = harness();
        let ch = channel(ALICE);
        h.network.add_relay(POOL[2], vec![ch.clone()]);

        let ev = metadata_update(ALICE, &ch, "");
        let proof = h
            .service
            .resolve_creation(&ev, tokio::time::Instant::now() + Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(proof.source, ProofSource::RemotePool);
        assert!(h.service.check_update(&ev).await.is_accepted());
        assert_eq!(h.network.open_connections(), 0);
    }

    #[tokio::test]
    async fn test_update_with_unreachable_hint() {
        let h = harness();
        h.network.add_unreachable(DEAD_RELAY);
        let ch = channel(ALICE);

        let verdict = h.service.check_update(&metadata_update(ALICE, &ch, DEAD_RELAY)).await;

        assert!(verdict.reject);
        assert!(verdict.message.starts_with("failed to get create event: "));
        assert!(verdict.message.contains(DEAD_RELAY));
        assert!(verdict.message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_other_author_cannot_update_channel() {
        let h = harness();
        let ch = channel(ALICE);
        h.network.add_relay(ALICE_RELAY, vec![ch.clone()]);
        for url in POOL {
            h.network.add_relay(url, vec![ch.clone()]);
        }

        let with_hint = h.service.check_update(&metadata_update(BOB, &ch, ALICE_RELAY)).await;
        let without_hint = h.service.check_update(&metadata_update(BOB, &ch, "")).await;

        assert_eq!(
            with_hint.into_parts(),
            (true, "failed to get create event: 40 channel not found".to_string())
        );
        assert_eq!(
            without_hint.into_parts(),
            (true, "failed to get create event: 40 channel not found".to_string())
        );
        assert!(h
            .service
            .check_update(&metadata_update(ALICE, &ch, ALICE_RELAY))
            .await
            .is_accepted());
    }

    #[tokio::test]
    async fn test_misbehaving_relay_cannot_grant_ownership() {
        let h = harness();
        let ch = channel(ALICE);
        h.network.add_relay(ALICE_RELAY, vec![ch.clone()]);
        h.network.set_ignore_filter(ALICE_RELAY);

        let verdict = h.service.check_update(&metadata_update(BOB, &ch, ALICE_RELAY)).await;

        assert_eq!(
            verdict.into_parts(),
            (true, "failed to get create event: 40 channel owned by another author".to_string())
        );
    }

    #[tokio::test]
    async fn test_hinted_relay_with_duplicates_rejected() {
        let h = harness();
        let ch = channel(ALICE);
        h.network.add_relay(ALICE_RELAY, vec![ch.clone(), ch.clone()]);

        let verdict = h.service.check_update(&metadata_update(ALICE, &ch, ALICE_RELAY)).await;

        assert!(verdict.reject);
        assert!(verdict.message.contains("2 matching events"));
    }

    #[tokio::test]
    async fn test_slow_pool_is_bounded_by_deadline() {
        let h = harness();
        let ch = channel(ALICE);
        for url in POOL {
            h.network.add_relay(url, vec![ch.clone()]);
            h.network.set_latency(url, Duration::from_secs(60));
        }

        let started = tokio::time::Instant::now();
        let verdict = h.service.check_update(&metadata_update(ALICE, &ch, "")).await;

        assert_eq!(
            verdict.message,
            "failed to get create event: 40 channel not found"
        );
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(h.network.open_connections(), 0);
    }

    // =============================================================================
    // IDEMPOTENCE & CONCURRENCY
    // =============================================================================

    #[tokio::test]
    async fn test_concurrent_checks_agree() {
        let h = harness();
        let ch = channel(ALICE);
        h.network.add_relay(ALICE_RELAY, vec![ch.clone()]);

        let owner = metadata_update(ALICE, &ch, ALICE_RELAY);
        let intruder = metadata_update(BOB, &ch, ALICE_RELAY);

        let checks = (0..16).map(|i| {
            let service = Arc::clone(&h.service);
            let ev = if i % 2 == 0 { owner.clone() } else { intruder.clone() };
            tokio::spawn(async move { service.check_update(&ev).await })
        });
        let verdicts: Vec<_> = join_all(checks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        for (i, verdict) in verdicts.iter().enumerate() {
            assert_eq!(verdict.reject, i % 2 == 1);
        }
        assert_eq!(h.network.open_connections(), 0);
        assert_eq!(h.network.close_count(), 16);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_update_verdict_is_idempotent(local in any::<bool>(), author_is_owner in any::<bool>()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .unwrap();
            rt.block_on(async {
                let h = harness();
                let ch = channel(ALICE);
                if local {
                    h.store.insert(ch.clone());
                }
                let author = if author_is_owner { ALICE } else { BOB };
                let ev = metadata_update(author, &ch, "");

                let first = h.service.check_update(&ev).await;
                let second = h.service.check_update(&ev).await;

                assert_eq!(first, second);
                assert_eq!(first.is_accepted(), local && author_is_owner);
            });
        }
    }
}
