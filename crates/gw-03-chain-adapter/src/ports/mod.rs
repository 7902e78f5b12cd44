//! # Ports Module

pub mod outbound;

pub use outbound::{ChainAdapter, DeploymentModel};
