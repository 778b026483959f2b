//! S3 adapter.

use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};

use super::AwsControlPlane;
use super::error::{invalid, not_found, sdk_error};
use crate::control_plane::{
    ControlPlaneError, ControlPlaneFuture, ListObjectsRequest, ObjectEntry, ObjectPage, S3Api,
};

impl S3Api for AwsControlPlane {
    fn get_object<'a>(&'a self, bucket: &'a str, key: &'a str) -> ControlPlaneFuture<'a, Vec<u8>> {
        Box::pin(async move {
            let output = self
                .s3
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(GetObjectError::is_no_such_key)
                    {
                        not_found("GetObject", key)
                    } else {
                        sdk_error("GetObject", &err)
                    }
                })?;
            let body = output
                .body
                .collect()
                .await
                .map_err(|err| ControlPlaneError::Transport {
                    operation: String::from("GetObject"),
                    message: err.to_string(),
                })?;
            Ok(body.into_bytes().to_vec())
        })
    }

    fn put_object<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        body: Vec<u8>,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.s3
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(ByteStream::from(body))
                .send()
                .await
                .map_err(|err| sdk_error("PutObject", &err))?;
            Ok(())
        })
    }

    fn head_object<'a>(&'a self, bucket: &'a str, key: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.s3
                .head_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(HeadObjectError::is_not_found)
                    {
                        not_found("HeadObject", key)
                    } else {
                        sdk_error("HeadObject", &err)
                    }
                })?;
            Ok(())
        })
    }

    fn delete_objects<'a>(
        &'a self,
        bucket: &'a str,
        keys: &'a [String],
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            let objects = keys
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| invalid("DeleteObjects", &err))?;
            let batch = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|err| invalid("DeleteObjects", &err))?;
            self.s3
                .delete_objects()
                .bucket(bucket)
                .delete(batch)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteObjects", &err))?;
            Ok(())
        })
    }

    fn list_objects_page<'a>(
        &'a self,
        request: &'a ListObjectsRequest,
    ) -> ControlPlaneFuture<'a, ObjectPage> {
        Box::pin(async move {
            let output = self
                .s3
                .list_objects_v2()
                .bucket(&request.bucket)
                .set_prefix((!request.prefix.is_empty()).then(|| request.prefix.clone()))
                .set_delimiter(request.delimiter.clone())
                .set_continuation_token(request.continuation_token.clone())
                .send()
                .await
                .map_err(|err| sdk_error("ListObjectsV2", &err))?;
            let next_token = if output.is_truncated().unwrap_or(false) {
                output.next_continuation_token().map(str::to_owned)
            } else {
                None
            };
            Ok(ObjectPage {
                objects: output
                    .contents()
                    .iter()
                    .map(|object| ObjectEntry {
                        key: object.key().unwrap_or_default().to_owned(),
                        size: object.size().unwrap_or_default(),
                    })
                    .collect(),
                common_prefixes: output
                    .common_prefixes()
                    .iter()
                    .filter_map(|prefix| prefix.prefix())
                    .map(str::to_owned)
                    .collect(),
                next_token,
            })
        })
    }
}
