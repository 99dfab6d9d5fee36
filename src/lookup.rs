use std::fmt;

use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;
use aws_sdk_ec2::types::{Instance, InstanceStateName};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ec2::InstancePages;
use crate::error::{LookupError, Result};
use crate::filters::FilterSpecification;

/// Change-detection token handed in by the caller and echoed back as the
/// result's `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreshnessToken(String);

impl FreshnessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Current UTC time, RFC 3339.
    pub fn now() -> Self {
        Self(chrono::Utc::now().to_rfc3339())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FreshnessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FreshnessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for FreshnessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Addresses of one matched instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceAddresses {
    pub id: String,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
}

/// Outcome of a successful lookup.
///
/// `ids`, `private_ips` and `public_ips` are filled independently: an
/// instance without a public address adds to `ids` but not to `public_ips`,
/// so `ids[i]` and `public_ips[i]` need not belong to the same instance.
/// Use `instances` when the correspondence matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub token: FreshnessToken,
    pub ids: Vec<String>,
    pub private_ips: Vec<String>,
    pub public_ips: Vec<String>,
    pub instances: Vec<InstanceAddresses>,
}

impl LookupResult {
    fn empty(token: FreshnessToken) -> Self {
        Self {
            token,
            ids: Vec::new(),
            private_ips: Vec::new(),
            public_ips: Vec::new(),
            instances: Vec::new(),
        }
    }

    fn push(&mut self, instance: &Instance) {
        let id = match instance.instance_id() {
            Some(id) => id.to_string(),
            None => {
                warn!("Skipping non-terminated instance without an instance id");
                return;
            }
        };
        let private_ip = instance.private_ip_address().map(str::to_string);
        let public_ip = instance.public_ip_address().map(str::to_string);

        self.ids.push(id.clone());
        if let Some(ip) = &private_ip {
            self.private_ips.push(ip.clone());
        }
        if let Some(ip) = &public_ip {
            self.public_ips.push(ip.clone());
        }
        self.instances.push(InstanceAddresses {
            id,
            private_ip,
            public_ip,
        });
    }

    fn collect_page(&mut self, page: &DescribeInstancesOutput) {
        page.reservations()
            .iter()
            .flat_map(|res| res.instances())
            .filter(|inst| is_live(inst))
            .for_each(|inst| self.push(inst));
    }
}

/// An instance without a reported state is treated like a terminated one.
fn is_live(instance: &Instance) -> bool {
    match instance.state().and_then(|state| state.name()) {
        Some(InstanceStateName::Terminated) | None => false,
        Some(_) => true,
    }
}

/// Finds the non-terminated instances matching a [`FilterSpecification`].
pub struct InstanceLookup<C> {
    client: C,
}

impl<C: InstancePages> InstanceLookup<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn lookup(
        &self,
        spec: &FilterSpecification,
        token: FreshnessToken,
    ) -> Result<LookupResult> {
        let filters = spec.request_filters()?;
        info!(?filters, "Describing EC2 instances");

        let mut result = LookupResult::empty(token);
        let mut next_token: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            let sent = next_token.take();
            let page = self
                .client
                .describe_instances_page(&filters, sent.clone())
                .await
                .map_err(LookupError::Upstream)?;

            page_number += 1;
            debug!(
                page = page_number,
                reservations = page.reservations().len(),
                "Received DescribeInstances page"
            );
            result.collect_page(&page);

            match page.next_token() {
                Some(token) if token.is_empty() => break,
                Some(token) if sent.as_deref() == Some(token) => {
                    warn!(token, "DescribeInstances returned the same next token twice, stopping");
                    break;
                }
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        if result.ids.is_empty() {
            return Err(LookupError::NotFound);
        }

        debug!("Found {} instances via given filter", result.ids.len());
        Ok(result)
    }
}
