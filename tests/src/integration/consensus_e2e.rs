//! # Oracle Consensus Flows
//!
//! Two-phase delivery through a deployed relay:
//!
//! 1. **send-hash-value**: oracles sign a digest; at threshold a pulse exists.
//! 2. **send-value-to-sub**: the payload hashing to that digest is attached
//!    once and delivered to one subscriber.
//!
//! Plus validator rotation on the registry.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{oracles, sign_slots, topology, validator_set, Bridge};
    use gw_01_oracle_consensus::{consul_rotation_digest, ConsensusError, SignatureSet};
    use gw_03_chain_adapter::{AdapterError, ProgramError, StateKey, StateValue};
    use gw_04_deploy_pipeline::{ClientError, PulseOutcome};
    use shared_types::{keccak256, BackendKind};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Five oracles, threshold three, no ports.
    async fn bridge(backend: BackendKind) -> Bridge {
        let oracles = oracles(5);
        let topology = topology(&oracles, 3, &[]);
        Bridge::deploy(backend, oracles, topology).await
    }

    /// Subscribe the registry as a plain sink; returns its subscription id.
    async fn sink(bridge: &Bridge) -> u64 {
        bridge
            .client
            .subscribe(bridge.relay(), bridge.registry())
            .await
            .unwrap()
    }

    fn consensus_error(err: &ClientError) -> &ConsensusError {
        match err.adapter_error().and_then(AdapterError::program_error) {
            Some(ProgramError::Consensus(e)) => e,
            other => panic!("expected a consensus revert, got {other:?}"),
        }
    }

    // =============================================================================
    // PULSES AND ATTACHED VALUES
    // =============================================================================

    async fn pulse_lifecycle(backend: BackendKind) {
        let bridge = bridge(backend).await;
        let relay = bridge.relay();
        let client = &bridge.client;
        let subscription = sink(&bridge).await;

        let payload = b"price:eth/usd=3141".to_vec();
        let digest = keccak256(&payload);

        // 3 signatures + 2 empty slots reach the threshold
        let outcome = client
            .submit_pulse(relay, digest, bridge.sign(&digest, &[0, 2, 4]))
            .await
            .unwrap();
        let pulse_id = outcome.pulse_id().expect("confirmed");
        assert_eq!(pulse_id, 1);
        assert_eq!(client.last_pulse_id(relay).await.unwrap(), 1);
        let pulse = client.pulse(relay, pulse_id).await.unwrap().unwrap();
        assert_eq!(pulse.digest, digest);

        // Same digest again with a quorum keeps its pulse
        let again = client
            .submit_pulse(relay, digest, bridge.sign(&digest, &[1, 2, 3, 4]))
            .await
            .unwrap();
        assert_eq!(again.pulse_id(), Some(pulse_id));
        assert_eq!(client.last_pulse_id(relay).await.unwrap(), 1);

        // Same digest below the threshold: not confirmed, pulse 1 untouched
        let short = client
            .submit_pulse(relay, digest, bridge.sign(&digest, &[0, 1]))
            .await
            .unwrap();
        assert_eq!(
            short,
            PulseOutcome::NotConfirmed {
                valid: 2,
                required: 3
            }
        );
        assert_eq!(client.last_pulse_id(relay).await.unwrap(), 1);
        assert_eq!(
            client.pulse(relay, pulse_id).await.unwrap().map(|p| p.digest),
            Some(digest)
        );

        // Two signatures on a new digest change nothing
        let other = keccak256(b"price:eth/usd=0");
        let below = client
            .submit_pulse(relay, other, bridge.sign(&other, &[0, 1]))
            .await
            .unwrap();
        assert_eq!(
            below,
            PulseOutcome::NotConfirmed {
                valid: 2,
                required: 3
            }
        );
        assert_eq!(client.last_pulse_id(relay).await.unwrap(), 1);
        assert!(client.pulse(relay, pulse_id).await.unwrap().is_some());

        // A payload that does not hash to the pulse digest is refused
        let err = client
            .attach_value(relay, subscription, pulse_id, b"price:eth/usd=1".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(
            consensus_error(&err),
            ConsensusError::DigestMismatch { pulse_id: 1, .. }
        ));
        assert_eq!(client.attached_value(relay, pulse_id).await.unwrap(), None);

        client
            .attach_value(relay, subscription, pulse_id, payload.clone())
            .await
            .unwrap();
        assert_eq!(
            client.attached_value(relay, pulse_id).await.unwrap(),
            Some(payload.clone())
        );

        // Each pulse delivers once
        let err = client
            .attach_value(relay, subscription, pulse_id, payload.clone())
            .await
            .unwrap_err();
        assert!(matches!(
            consensus_error(&err),
            ConsensusError::PulseAlreadyConsumed(1)
        ));

        // Never-confirmed pulse id
        let err = client
            .attach_value(relay, subscription, 42, payload)
            .await
            .unwrap_err();
        assert!(matches!(
            consensus_error(&err),
            ConsensusError::NoSuchPulse(42)
        ));
    }

    #[tokio::test]
    async fn test_pulse_lifecycle_evm() {
        pulse_lifecycle(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_pulse_lifecycle_account_state() {
        pulse_lifecycle(BackendKind::AccountState).await;
    }

    #[tokio::test]
    async fn test_slots_are_positional() {
        let bridge = bridge(BackendKind::Evm).await;
        let relay = bridge.relay();
        let digest = keccak256(b"positional");

        // Oracles 0 and 1 sign into each other's slot; only slot 2 is valid
        let mut swapped = SignatureSet::empty(5);
        swapped.set(0, &bridge.oracles[1].sign(&digest).unwrap());
        swapped.set(1, &bridge.oracles[0].sign(&digest).unwrap());
        swapped.set(2, &bridge.oracles[2].sign(&digest).unwrap());
        let outcome = bridge.client.submit_pulse(relay, digest, swapped).await.unwrap();
        assert_eq!(
            outcome,
            PulseOutcome::NotConfirmed {
                valid: 1,
                required: 3
            }
        );

        // One slot short of the validator count is malformed, not a miss
        let err = bridge
            .client
            .submit_pulse(relay, digest, SignatureSet::empty(4))
            .await
            .unwrap_err();
        let consensus = consensus_error(&err);
        assert!(consensus.is_malformed());
        assert!(matches!(
            consensus,
            ConsensusError::SlotCountMismatch { .. }
        ));
        assert_eq!(bridge.client.last_pulse_id(relay).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_every_signer_subset() {
        let bridge = bridge(BackendKind::Evm).await;
        let relay = bridge.relay();
        let mut confirmed = 0u64;

        for mask in 0u8..32 {
            let digest = keccak256(&[b's', mask]);
            let signers: Vec<usize> = (0..5).filter(|i| mask & (1 << i) != 0).collect();
            let outcome = bridge
                .client
                .submit_pulse(relay, digest, bridge.sign(&digest, &signers))
                .await
                .unwrap();
            if signers.len() >= 3 {
                confirmed += 1;
                assert_eq!(outcome.pulse_id(), Some(confirmed), "mask {mask:05b}");
            } else {
                assert!(outcome.pulse_id().is_none(), "mask {mask:05b}");
            }
        }

        assert_eq!(confirmed, 16);
        assert_eq!(bridge.client.last_pulse_id(relay).await.unwrap(), 16);
    }

    // =============================================================================
    // VALIDATOR ROTATION
    // =============================================================================

    async fn round_of(bridge: &Bridge) -> StateValue {
        bridge
            .adapter
            .read_state(&bridge.registry(), &StateKey::LastRound)
            .await
            .unwrap()
    }

    async fn rotation(backend: BackendKind) {
        let bridge = bridge(backend).await;
        let registry = bridge.registry();
        let next = oracles(5);
        let next_set = validator_set(&next);

        let digest = consul_rotation_digest(&next_set, 1);
        bridge
            .client
            .update_consuls(registry, next_set.clone(), 1, bridge.sign(&digest, &[0, 1, 2]))
            .await
            .unwrap();
        assert_eq!(round_of(&bridge).await, StateValue::Int(1));
        let keys = bridge
            .adapter
            .read_state(&registry, &StateKey::Validators)
            .await
            .unwrap();
        assert_eq!(keys, StateValue::Keys(next_set.to_hex()));

        // The old set no longer signs for the registry
        let third = validator_set(&oracles(5));
        let digest = consul_rotation_digest(&third, 2);
        let err = bridge
            .client
            .update_consuls(registry, third.clone(), 2, bridge.sign(&digest, &[0, 1, 2, 3]))
            .await
            .unwrap_err();
        assert!(matches!(
            consensus_error(&err),
            ConsensusError::InsufficientRotationSignatures { valid: 0, .. }
        ));

        // Stale round, even with a full quorum of the current set
        let digest = consul_rotation_digest(&third, 1);
        let signatures = sign_slots(&next, &digest, &[0, 1, 2]);
        let err = bridge
            .client
            .update_consuls(registry, third, 1, signatures)
            .await
            .unwrap_err();
        assert!(matches!(
            consensus_error(&err),
            ConsensusError::RoundNotIncreasing {
                round: 1,
                last_round: 1
            }
        ));
        assert_eq!(round_of(&bridge).await, StateValue::Int(1));
    }

    #[tokio::test]
    async fn test_rotation_evm() {
        rotation(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_rotation_account_state() {
        rotation(BackendKind::AccountState).await;
    }
}
