//! Lookup of non-terminated EC2 instances by filter or tag.
//!
//! [`InstanceLookup`] takes an injected [`InstancePages`] client, builds the
//! DescribeInstances filters from a [`FilterSpecification`], walks every page
//! and flattens the live instances into ids and addresses. The
//! [`data_source`] module wraps it as the `aws_instances` read operation.

pub mod aws_config;
pub mod cli;
pub mod data_source;
pub mod ec2;
pub mod error;
pub mod filters;
pub mod logging;
pub mod lookup;

pub use data_source::{InstancesConfig, InstancesState, DATA_SOURCE_NAME};
pub use ec2::InstancePages;
pub use error::{BoxError, LookupError};
pub use filters::{FilterClause, FilterSpecification};
pub use lookup::{FreshnessToken, InstanceAddresses, InstanceLookup, LookupResult};
