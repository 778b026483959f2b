//! Parameter store adapter.

use aws_sdk_ssm::types::{ParameterStringFilter, ParameterType};

use super::AwsControlPlane;
use super::error::{invalid, missing, sdk_error};
use crate::control_plane::{ControlPlaneFuture, PutParameterRequest, SsmApi};

impl SsmApi for AwsControlPlane {
    fn put_parameter<'a>(
        &'a self,
        request: &'a PutParameterRequest,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            let kind = if request.secure {
                ParameterType::SecureString
            } else {
                ParameterType::String
            };
            self.ssm
                .put_parameter()
                .name(&request.name)
                .value(&request.value)
                .set_description(
                    (!request.description.is_empty()).then(|| request.description.clone()),
                )
                .r#type(kind)
                .overwrite(request.overwrite)
                .send()
                .await
                .map_err(|err| sdk_error("PutParameter", &err))?;
            Ok(())
        })
    }

    fn get_parameter<'a>(
        &'a self,
        name: &'a str,
        with_decryption: bool,
    ) -> ControlPlaneFuture<'a, String> {
        Box::pin(async move {
            let output = self
                .ssm
                .get_parameter()
                .name(name)
                .with_decryption(with_decryption)
                .send()
                .await
                .map_err(|err| sdk_error("GetParameter", &err))?;
            output
                .parameter()
                .and_then(|parameter| parameter.value())
                .map(str::to_owned)
                .ok_or_else(|| missing("GetParameter", "parameter value"))
        })
    }

    fn describe_parameters<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let filter = ParameterStringFilter::builder()
                .key("Name")
                .option("Equals")
                .values(name)
                .build()
                .map_err(|err| invalid("DescribeParameters", &err))?;
            let output = self
                .ssm
                .describe_parameters()
                .parameter_filters(filter)
                .send()
                .await
                .map_err(|err| sdk_error("DescribeParameters", &err))?;
            Ok(output
                .parameters()
                .iter()
                .filter_map(|parameter| parameter.name())
                .map(str::to_owned)
                .collect())
        })
    }

    fn delete_parameter<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ssm
                .delete_parameter()
                .name(name)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteParameter", &err))?;
            Ok(())
        })
    }
}
