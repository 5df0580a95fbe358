//! # Relay Pipeline Tests
//!
//! Channel lifecycles submitted through `RelayRuntime`: policy chain first,
//! then the in-memory store.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_01_group_admission::{AdmissionConfig, MissingReferencePolicy, MockRelayNetwork};
    use relay_runtime::cli::check_lines;
    use relay_runtime::{InMemoryEventStore, RelayConfig, RelayRuntime};
    use shared_types::{Event, Filter, Kind, Tag};

    const ALICE: &str = "a1";
    const MALLORY: &str = "ff";
    const ALICE_RELAY: &str = "wss://alice.relay.example";

    fn config() -> RelayConfig {
        RelayConfig {
            admission: AdmissionConfig::for_testing(),
            ..Default::default()
        }
    }

    fn channel(author: &str, name: &str) -> Event {
        Event::new(
            author,
            10,
            Kind::CHANNEL_CREATION,
            vec![],
            format!(r#"{{"name":"{name}"}}"#),
        )
    }

    fn rename(author: &str, channel: &Event, hint: &str, name: &str) -> Event {
        Event::new(
            author,
            20,
            Kind::CHANNEL_METADATA,
            vec![Tag::event_reference(&channel.id, hint)],
            format!(r#"{{"name":"{name}"}}"#),
        )
    }

    #[tokio::test]
    async fn test_channel_lifecycle() {
        let runtime = RelayRuntime::new(&config(), MockRelayNetwork::new());
        let ch = channel(ALICE, "general");
        let message = Event::new(
            ALICE,
            15,
            Kind::CHANNEL_MESSAGE,
            vec![Tag::event_reference(&ch.id, "")],
            "hello",
        );

        runtime.submit(ch.clone()).await.unwrap();
        runtime.submit(message).await.unwrap();
        runtime.submit(rename(ALICE, &ch, "", "random")).await.unwrap();

        let rejection = runtime
            .submit(rename(MALLORY, &ch, "", "pwned"))
            .await
            .unwrap_err();
        assert_eq!(
            rejection.message,
            "failed to get create event: 40 channel not found"
        );

        let updates = runtime
            .store()
            .query(&Filter::new().kind(Kind::CHANNEL_METADATA))
            .unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].pubkey, ALICE);
    }

    #[tokio::test]
    async fn test_update_resolved_from_hinted_relay() {
        let network = MockRelayNetwork::new();
        let ch = channel(ALICE, "elsewhere");
        network.add_relay(ALICE_RELAY, vec![ch.clone()]);

        let runtime = RelayRuntime::new(&config(), network.clone());
        let accepted = runtime
            .submit(rename(ALICE, &ch, ALICE_RELAY, "moved"))
            .await
            .unwrap();

        assert!(!accepted.duplicate);
        assert_eq!(network.close_count(), 1);
        assert_eq!(network.open_connections(), 0);
        assert_eq!(runtime.store().len(), 1);
    }

    #[tokio::test]
    async fn test_shared_store_sees_earlier_creations() {
        let store = Arc::new(InMemoryEventStore::new());
        let ch = channel(ALICE, "seeded");
        store.save(ch.clone()).unwrap();

        let network = MockRelayNetwork::new();
        let runtime = RelayRuntime::with_store(&config(), Arc::clone(&store), network.clone());

        runtime.submit(rename(ALICE, &ch, ALICE_RELAY, "x")).await.unwrap();
        assert_eq!(network.connect_count(), 0);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_reference_policy_reject() {
        let mut cfg = config();
        cfg.admission.missing_reference = MissingReferencePolicy::Reject;
        let runtime = RelayRuntime::new(&cfg, MockRelayNetwork::new());

        let orphan = Event::new(ALICE, 1, Kind::CHANNEL_METADATA, vec![], "{}");
        let rejection = runtime.submit(orphan).await.unwrap_err();

        assert_eq!(rejection.to_string(), "missing channel reference");
    }

    #[tokio::test]
    async fn test_check_report_lines() {
        let runtime = RelayRuntime::new(&config(), MockRelayNetwork::new());
        let ch = channel(ALICE, "general");
        let bad = Event::new(ALICE, 11, Kind::CHANNEL_CREATION, vec![], "{nope");
        let input = [
            ch.to_json(),
            bad.to_json(),
            rename(ALICE, &ch, "", "renamed").to_json(),
        ]
        .join("\n");

        let report = check_lines(&runtime, &input).await;

        assert_eq!(report.len(), 3);
        assert_eq!(report[0], format!("OK {}", ch.id));
        assert_eq!(report[1], format!("REJECTED {}: Invalid content", bad.id));
        assert!(report[2].starts_with("OK "));
    }
}
