//! # Deployment Pipeline
//!
//! Executes the plan strictly in order. Each step builds its operation from
//! ids recorded by earlier steps, waits for finality, then records what it
//! produced. The first failure halts the run; finalized steps stay on chain
//! and no step is retried.

use crate::context::{DeploymentContext, DeploymentReport};
use crate::domain::{AssetSpec, BridgeTopology, Minter, PipelineError, Role};
use crate::plan::{existing_roles, plan, Step};
use gw_03_chain_adapter::{Call, Operation, ProgramInit, StateKey, StateValue};
use tracing::{error, info, info_span, warn, Instrument};

/// Deploys one topology.
#[derive(Clone, Debug)]
pub struct DeploymentPipeline {
    topology: BridgeTopology,
}

impl DeploymentPipeline {
    /// Pipeline for `topology`.
    pub fn new(topology: BridgeTopology) -> Self {
        Self { topology }
    }

    /// Topology being deployed.
    pub fn topology(&self) -> &BridgeTopology {
        &self.topology
    }

    /// Run every step against the context's adapter.
    ///
    /// On failure the context still holds every role recorded before the
    /// failing step.
    pub async fn run(
        &self,
        ctx: &mut DeploymentContext,
    ) -> Result<DeploymentReport, PipelineError> {
        let backend = ctx.adapter().backend();
        let span = info_span!("deploy", %backend);
        async {
            self.record_existing(ctx).await?;
            let steps = plan(&self.topology, ctx.adapter().deployment_model());
            info!(steps = steps.len(), "[gw-04] deployment planned");

            for step in &steps {
                let name = step.to_string();
                let span = info_span!("step", step = %name);
                if let Err(e) = self.execute(ctx, step, &name).instrument(span).await {
                    error!(step = %name, error = %e, "[gw-04] pipeline halted");
                    return Err(e);
                }
            }

            let report = ctx.report();
            info!(
                installs = report.installs,
                roles = report.addresses.len(),
                "[gw-04] deployment complete"
            );
            Ok(report)
        }
        .instrument(span)
        .await
    }

    /// Record supplied ids after checking each holds the right program.
    async fn record_existing(&self, ctx: &mut DeploymentContext) -> Result<(), PipelineError> {
        for (role, id) in existing_roles(&self.topology) {
            let kind = ctx
                .adapter()
                .read_state(&id, &StateKey::Kind)
                .await
                .map_err(|source| PipelineError::Adapter {
                    context: format!("checking existing {role} at {id}"),
                    source,
                })?;
            if kind != StateValue::Kind(role.kind()) {
                return Err(PipelineError::WrongKind {
                    expected: role.kind(),
                    role,
                    id,
                });
            }
            warn!(%role, %id, "[gw-04] reusing existing program");
            ctx.addresses_mut().record(role, id, true)?;
        }
        Ok(())
    }

    async fn execute(
        &self,
        ctx: &mut DeploymentContext,
        step: &Step,
        name: &str,
    ) -> Result<(), PipelineError> {
        match step {
            Step::Install { role, constructor } => {
                let init = if *constructor {
                    Some(self.init_for(ctx, name, role)?)
                } else {
                    None
                };
                let op = Operation::Install {
                    kind: role.kind(),
                    init,
                };
                let (handle, receipt) = ctx.execute(name, role, op).await?;
                let id = receipt
                    .created
                    .or_else(|| ctx.adapter().derive_created_id(&handle))
                    .ok_or_else(|| PipelineError::MissingCreatedId {
                        step: name.to_string(),
                        role: role.clone(),
                    })?;
                ctx.addresses_mut().record(role.clone(), id, false)?;
                ctx.count_install();
                info!(%role, %id, "[gw-04] program created");
            }
            Step::InitializeStorage(role) => {
                let target = ctx.require(name, role)?;
                let entries = self.init_for(ctx, name, role)?.to_entries();
                ctx.execute(name, role, Operation::InitializeStorage { target, entries })
                    .await?;
            }
            Step::AddMinter { port, minter } => {
                let token_role = Role::Asset(port.clone());
                let target = ctx.require(name, &token_role)?;
                let minter = match minter {
                    Minter::Port => ctx.require(name, &Role::Port(port.clone()))?,
                    Minter::Account(id) => *id,
                };
                let op = Operation::Invoke {
                    target,
                    call: Call::AddMinter { minter },
                };
                ctx.execute(name, &token_role, op).await?;
            }
            Step::Subscribe { relay, subscriber } => {
                let relay_id = ctx.require(name, relay)?;
                let subscriber_id = ctx.require(name, subscriber)?;
                let op = Operation::Invoke {
                    target: relay_id,
                    call: Call::Subscribe {
                        subscriber: subscriber_id,
                    },
                };
                let (_, receipt) = ctx.execute(name, subscriber, op).await?;
                let subscription = match receipt.subscription_id() {
                    Some(id) => Some(id),
                    None => ctx
                        .read(
                            name,
                            subscriber,
                            &relay_id,
                            &StateKey::SubscriptionOf(subscriber_id),
                        )
                        .await?
                        .as_int(),
                };
                let subscription =
                    subscription.ok_or_else(|| PipelineError::MissingSubscription {
                        step: name.to_string(),
                        subscriber: subscriber.clone(),
                        relay: relay_id,
                    })?;
                ctx.addresses_mut()
                    .record_subscription(subscriber.clone(), subscription)?;
            }
        }
        Ok(())
    }

    /// Configuration of `role` from the topology and recorded ids.
    fn init_for(
        &self,
        ctx: &DeploymentContext,
        step: &str,
        role: &Role,
    ) -> Result<ProgramInit, PipelineError> {
        let missing = || PipelineError::MissingDependency {
            step: step.to_string(),
            dependency: role.clone(),
        };
        Ok(match role {
            Role::Registry => ProgramInit::Registry {
                consuls: self.topology.validators.clone(),
                bft: self.topology.bft,
                last_round: 0,
            },
            Role::Relay(name) => {
                let relay = self.topology.relay(name).ok_or_else(missing)?;
                ProgramInit::Relay {
                    registry: ctx.require(step, &Role::Registry)?,
                    data_type: relay.data_type,
                    oracles: relay.oracles.clone(),
                    bft: relay.bft,
                }
            }
            Role::Asset(port) => match &self.topology.port(port).ok_or_else(missing)?.asset {
                AssetSpec::New {
                    name,
                    symbol,
                    decimals,
                } => ProgramInit::Token {
                    name: name.clone(),
                    symbol: symbol.clone(),
                    decimals: *decimals,
                },
                AssetSpec::Existing(_) => return Err(missing()),
            },
            Role::Port(name) => {
                let port = self.topology.port(name).ok_or_else(missing)?;
                ProgramInit::Port {
                    direction: port.direction,
                    relay: ctx.require(step, &Role::Relay(port.relay.clone()))?,
                    token: ctx.require(step, &Role::Asset(name.clone()))?,
                }
            }
        })
    }
}
