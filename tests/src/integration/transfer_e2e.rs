//! # Port Transfer Flows
//!
//! A lock-style and a mint-style port share one relay. Users open transfer
//! requests on the ports; oracle instructions arrive as pulses and settle
//! them.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{oracles, topology, Bridge, USER};
    use gw_01_oracle_consensus::{ConsensusError, Instruction};
    use gw_02_port_lifecycle::{PortError, RequestStatus};
    use gw_03_chain_adapter::{AdapterError, ProgramError};
    use gw_04_deploy_pipeline::ClientError;
    use shared_types::{keccak256, BackendKind, PortDirection, U256};

    const DESTINATION: [u8; 32] = [0xEE; 32];

    /// One whole token at 8 decimals.
    fn whole(n: u64) -> U256 {
        U256::from(n) * U256::from(100_000_000u64)
    }

    async fn bridge(backend: BackendKind) -> Bridge {
        let oracles = oracles(3);
        let topology = topology(&oracles, 2, &[PortDirection::Lock, PortDirection::Mint]);
        Bridge::deploy(backend, oracles, topology).await
    }

    /// Confirm `instruction` and deliver it to the port with `direction`.
    async fn deliver(
        bridge: &Bridge,
        direction: PortDirection,
        instruction: &Instruction,
    ) -> Result<u64, ClientError> {
        let payload = instruction.encode();
        let digest = keccak256(&payload);
        let pulse_id = bridge
            .client
            .submit_pulse(bridge.relay(), digest, bridge.sign(&digest, &[0, 1]))
            .await?
            .pulse_id()
            .expect("two of three confirm");
        bridge
            .client
            .attach_value(bridge.relay(), bridge.subscription(direction), pulse_id, payload)
            .await?;
        Ok(pulse_id)
    }

    fn revert(err: &ClientError) -> &ProgramError {
        err.adapter_error()
            .and_then(AdapterError::program_error)
            .unwrap_or_else(|| panic!("expected a revert, got {err}"))
    }

    // =============================================================================
    // LOCK PORT
    // =============================================================================

    async fn lock_then_approve(backend: BackendKind) {
        let bridge = bridge(backend).await;
        let port = bridge.port(PortDirection::Lock);
        let token = bridge.asset(PortDirection::Lock);
        let user = bridge.client.with_sender(USER);

        bridge.client.faucet(token, USER, 10).await.unwrap();
        assert_eq!(bridge.client.balance(token, USER).await.unwrap(), whole(10));

        let amount = whole(4);
        let request = user
            .create_transfer_request(port, amount, DESTINATION)
            .await
            .unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.amount, amount);
        assert_eq!(request.origin, USER);
        assert_eq!(request.destination, DESTINATION);
        assert_eq!(user.balance(token, USER).await.unwrap(), whole(6));
        assert_eq!(user.balance(token, *port.as_bytes()).await.unwrap(), amount);
        assert_eq!(user.pending_requests(port).await.unwrap(), vec![request.clone()]);

        deliver(
            &bridge,
            PortDirection::Lock,
            &Instruction::Approve {
                request_id: request.id,
            },
        )
        .await
        .unwrap();

        assert!(user.pending_requests(port).await.unwrap().is_empty());
        let settled = user.request(port, request.id).await.unwrap().unwrap();
        assert_eq!(settled.status, RequestStatus::Approved);
        assert_eq!(settled.amount, amount);

        // Inbound transfer pays out of custody
        let unlock = Instruction::Unlock {
            request_id: U256::from(77u64),
            amount: whole(1),
            receiver: USER,
        };
        deliver(&bridge, PortDirection::Lock, &unlock).await.unwrap();
        assert_eq!(user.balance(token, USER).await.unwrap(), whole(7));
        assert_eq!(user.balance(token, *port.as_bytes()).await.unwrap(), whole(3));
    }

    #[tokio::test]
    async fn test_lock_then_approve_evm() {
        lock_then_approve(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_lock_then_approve_account_state() {
        lock_then_approve(BackendKind::AccountState).await;
    }

    #[tokio::test]
    async fn test_lock_requires_balance() {
        let bridge = bridge(BackendKind::Evm).await;
        let user = bridge.client.with_sender(USER);
        let err = user
            .create_transfer_request(bridge.port(PortDirection::Lock), whole(1), DESTINATION)
            .await
            .unwrap_err();
        assert!(matches!(
            revert(&err),
            ProgramError::InsufficientBalance { .. }
        ));
        let port = bridge.port(PortDirection::Lock);
        assert!(user.pending_requests(port).await.unwrap().is_empty());
    }

    // =============================================================================
    // MINT PORT
    // =============================================================================

    async fn mint_once(backend: BackendKind) {
        let bridge = bridge(backend).await;
        let token = bridge.asset(PortDirection::Mint);
        let request_id = U256::from(7u64);

        let mint = Instruction::Mint {
            request_id,
            amount: whole(3),
            receiver: USER,
        };
        deliver(&bridge, PortDirection::Mint, &mint).await.unwrap();
        assert_eq!(bridge.client.balance(token, USER).await.unwrap(), whole(3));

        // Same payload: the pulse is already spent
        let err = deliver(&bridge, PortDirection::Mint, &mint).await.unwrap_err();
        assert!(matches!(
            revert(&err),
            ProgramError::Consensus(ConsensusError::PulseAlreadyConsumed(_))
        ));

        // Fresh pulse for the same request id: the port refuses it
        let replay = Instruction::Mint {
            request_id,
            amount: whole(30),
            receiver: USER,
        };
        let err = deliver(&bridge, PortDirection::Mint, &replay).await.unwrap_err();
        assert!(matches!(
            revert(&err),
            ProgramError::Port(PortError::AlreadyProcessed(id)) if *id == request_id
        ));
        assert_eq!(bridge.client.balance(token, USER).await.unwrap(), whole(3));
    }

    #[tokio::test]
    async fn test_mint_once_evm() {
        mint_once(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_mint_once_account_state() {
        mint_once(BackendKind::AccountState).await;
    }

    async fn burn_then_remove(backend: BackendKind) {
        let bridge = bridge(backend).await;
        let port = bridge.port(PortDirection::Mint);
        let token = bridge.asset(PortDirection::Mint);
        let user = bridge.client.with_sender(USER);

        deliver(
            &bridge,
            PortDirection::Mint,
            &Instruction::Mint {
                request_id: U256::one(),
                amount: whole(5),
                receiver: USER,
            },
        )
        .await
        .unwrap();

        let request = user
            .create_transfer_request(port, whole(2), DESTINATION)
            .await
            .unwrap();
        assert_eq!(user.balance(token, USER).await.unwrap(), whole(3));

        let remove = Instruction::ChangeStatus {
            request_id: request.id,
            status: RequestStatus::Removed.code(),
        };
        deliver(&bridge, PortDirection::Mint, &remove).await.unwrap();
        assert!(user.pending_requests(port).await.unwrap().is_empty());
        let removed = user.request(port, request.id).await.unwrap().unwrap();
        assert_eq!(removed.status, RequestStatus::Removed);

        // Removed is terminal
        let approve = Instruction::Approve {
            request_id: request.id,
        };
        let err = deliver(&bridge, PortDirection::Mint, &approve).await.unwrap_err();
        assert!(matches!(
            revert(&err),
            ProgramError::Port(PortError::NotPending { .. })
        ));
        let still = user.request(port, request.id).await.unwrap().unwrap();
        assert_eq!(still.status, RequestStatus::Removed);
    }

    #[tokio::test]
    async fn test_burn_then_remove_evm() {
        burn_then_remove(BackendKind::Evm).await;
    }

    #[tokio::test]
    async fn test_burn_then_remove_account_state() {
        burn_then_remove(BackendKind::AccountState).await;
    }

    #[tokio::test]
    async fn test_instruction_for_wrong_direction() {
        let bridge = bridge(BackendKind::Evm).await;
        let unlock = Instruction::Unlock {
            request_id: U256::one(),
            amount: whole(1),
            receiver: USER,
        };
        let err = deliver(&bridge, PortDirection::Mint, &unlock).await.unwrap_err();
        assert!(matches!(
            revert(&err),
            ProgramError::Port(PortError::UnsupportedInstruction { opcode: 'u', .. })
        ));
    }
}
