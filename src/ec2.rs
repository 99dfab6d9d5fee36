use async_trait::async_trait;
use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;

use crate::error::BoxError;

/// One page of DescribeInstances at a time.
///
/// `next_token` is `None` for the first page and the previous page's
/// `next_token()` afterwards.
#[async_trait]
pub trait InstancePages: Send + Sync {
    async fn describe_instances_page(
        &self,
        filters: &[Filter],
        next_token: Option<String>,
    ) -> Result<DescribeInstancesOutput, BoxError>;
}

#[async_trait]
impl InstancePages for Ec2Client {
    async fn describe_instances_page(
        &self,
        filters: &[Filter],
        next_token: Option<String>,
    ) -> Result<DescribeInstancesOutput, BoxError> {
        let resp = self
            .describe_instances()
            .set_filters(Some(filters.to_vec()))
            .set_next_token(next_token)
            .send()
            .await?;

        Ok(resp)
    }
}

#[async_trait]
impl<T: InstancePages + ?Sized> InstancePages for &T {
    async fn describe_instances_page(
        &self,
        filters: &[Filter],
        next_token: Option<String>,
    ) -> Result<DescribeInstancesOutput, BoxError> {
        (**self).describe_instances_page(filters, next_token).await
    }
}
