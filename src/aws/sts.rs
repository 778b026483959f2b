//! STS adapter.

use super::AwsControlPlane;
use super::error::sdk_error;
use crate::control_plane::{CallerIdentity, ControlPlaneFuture, StsApi};

impl StsApi for AwsControlPlane {
    fn get_caller_identity(&self) -> ControlPlaneFuture<'_, CallerIdentity> {
        Box::pin(async move {
            let output = self
                .sts
                .get_caller_identity()
                .send()
                .await
                .map_err(|err| sdk_error("GetCallerIdentity", &err))?;
            Ok(CallerIdentity {
                account: output.account().unwrap_or_default().to_owned(),
                arn: output.arn().unwrap_or_default().to_owned(),
                user_id: output.user_id().unwrap_or_default().to_owned(),
            })
        })
    }
}
