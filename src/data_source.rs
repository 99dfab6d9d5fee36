//! The `aws_instances` data source: configuration in, state out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ec2::InstancePages;
use crate::error::{LookupError, Result};
use crate::filters::{FilterClause, FilterSpecification};
use crate::lookup::{FreshnessToken, InstanceLookup, LookupResult};

pub const DATA_SOURCE_NAME: &str = "aws_instances";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstancesConfig {
    #[serde(default)]
    pub filter: Vec<FilterClause>,
    #[serde(default)]
    pub instance_tags: BTreeMap<String, String>,
}

impl From<InstancesConfig> for FilterSpecification {
    fn from(config: InstancesConfig) -> Self {
        FilterSpecification {
            filters: config.filter,
            tags: config.instance_tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancesState {
    pub id: String,
    pub ids: Vec<String>,
    pub private_ips: Vec<String>,
    pub public_ips: Vec<String>,
}

impl From<LookupResult> for InstancesState {
    fn from(result: LookupResult) -> Self {
        InstancesState {
            id: result.token.to_string(),
            ids: result.ids,
            private_ips: result.private_ips,
            public_ips: result.public_ips,
        }
    }
}

/// Attribute schema of the data source.
pub fn schema() -> Value {
    let string_list = json!({ "type": "list", "elem": "string", "computed": true });
    json!({
        "name": DATA_SOURCE_NAME,
        "attributes": {
            "id": { "type": "string", "computed": true },
            "filter": {
                "type": "set",
                "optional": true,
                "elem": {
                    "name": { "type": "string", "required": true },
                    "values": { "type": "set", "elem": "string", "required": true }
                }
            },
            "instance_tags": {
                "type": "map",
                "elem": "string",
                "optional": true,
                "computed": true
            },
            "ids": string_list.clone(),
            "private_ips": string_list.clone(),
            "public_ips": string_list
        }
    })
}

pub async fn read<C: InstancePages>(
    lookup: &InstanceLookup<C>,
    config: InstancesConfig,
    token: FreshnessToken,
) -> Result<InstancesState> {
    let spec = FilterSpecification::from(config);
    let result = lookup.lookup(&spec, token).await?;
    Ok(result.into())
}

/// Like [`read`], for callers holding raw JSON configuration.
pub async fn read_json<C: InstancePages>(
    lookup: &InstanceLookup<C>,
    config: Value,
    token: FreshnessToken,
) -> Result<Value> {
    let config: InstancesConfig = serde_json::from_value(config).map_err(|e| {
        LookupError::configuration(format!("invalid {} configuration: {}", DATA_SOURCE_NAME, e))
    })?;
    let state = read(lookup, config, token).await?;
    Ok(json!({
        "id": state.id,
        "ids": state.ids,
        "private_ips": state.private_ips,
        "public_ips": state.public_ips,
    }))
}
