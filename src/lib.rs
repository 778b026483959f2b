//! Core library for the Octo infrastructure toolkit.
//!
//! The crate drives short-lived AWS build infrastructure: image lookup,
//! keypairs, compute instances and their Windows credentials, VPC networking
//! with a staged teardown, plus object storage, parameter store, service
//! discovery and caller identity helpers. Every client talks to the provider
//! through the traits in [`control_plane`], implemented for real by
//! [`aws::AwsControlPlane`] and in memory by
//! [`test_support::FakeControlPlane`].

pub mod ami;
pub mod aws;
pub mod config;
pub mod control_plane;
pub mod ec2;
pub mod error;
pub mod fs;
pub mod logging;
pub mod models;
pub mod network;
pub mod s3;
pub mod service_discovery;
pub mod ssm;
pub mod sts;
pub mod test_support;
mod wait;

pub use ami::ImageResolver;
pub use aws::AwsControlPlane;
pub use config::{AwsConfig, ConfigError, Timings};
pub use control_plane::{
    ControlPlaneError, Ec2Api, S3Api, ServiceDiscoveryApi, SsmApi, StsApi,
};
pub use ec2::{Credentials, DEFAULT_USERNAME, Ec2};
pub use error::{InfraError, InfraResult};
pub use network::{Network, StageReport, TeardownFailure, TeardownReport, TeardownStage};
pub use s3::ObjectStore;
pub use service_discovery::ServiceDiscovery;
pub use ssm::ParameterStore;
pub use sts::Identity;
