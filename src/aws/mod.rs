//! AWS SDK implementation of the control-plane traits.
//!
//! One [`AwsControlPlane`] owns a client per service family, all built from
//! the same [`SdkConfig`]. Requests are translated from the plain records in
//! [`crate::control_plane`] into SDK builders, and SDK errors are mapped onto
//! [`ControlPlaneError`](crate::control_plane::ControlPlaneError) so callers
//! never see provider types.

mod ec2;
mod error;
mod s3;
mod service_discovery;
mod ssm;
mod sts;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

use crate::config::AwsConfig;

/// Control plane backed by the AWS SDK.
#[derive(Clone, Debug)]
pub struct AwsControlPlane {
    config: SdkConfig,
    ec2: aws_sdk_ec2::Client,
    s3: aws_sdk_s3::Client,
    ssm: aws_sdk_ssm::Client,
    service_discovery: aws_sdk_servicediscovery::Client,
    sts: aws_sdk_sts::Client,
}

impl AwsControlPlane {
    /// Resolves credentials and region through the SDK default chain, honouring
    /// the configured region and profile overrides.
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = config.region.as_deref() {
            loader = loader.region(Region::new(region.trim().to_owned()));
        }
        if let Some(profile) = config.profile.as_deref() {
            loader = loader.profile_name(profile.trim());
        }
        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "loaded AWS configuration");
        Self::from_sdk_config(&sdk_config)
    }

    /// Builds every service client from an already loaded SDK configuration.
    #[must_use]
    pub fn from_sdk_config(config: &SdkConfig) -> Self {
        Self {
            config: config.clone(),
            ec2: aws_sdk_ec2::Client::new(config),
            s3: aws_sdk_s3::Client::new(config),
            ssm: aws_sdk_ssm::Client::new(config),
            service_discovery: aws_sdk_servicediscovery::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }

    /// Region the clients talk to, when one was resolved.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(Region::as_ref)
    }
}
