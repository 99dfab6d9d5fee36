//! Translation of `filter` blocks and `instance_tags` into EC2 request filters.

use std::collections::BTreeMap;

use aws_sdk_ec2::types::Filter;
use serde::{Deserialize, Serialize};

use crate::error::{LookupError, Result};

/// One `filter { name = ..., values = [...] }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterClause {
    pub name: String,
    pub values: Vec<String>,
}

impl FilterClause {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LookupError::configuration("filter name must not be empty"));
        }
        if self.values.is_empty() {
            return Err(LookupError::configuration(format!(
                "filter {:?} must have at least one value",
                self.name
            )));
        }
        Ok(())
    }
}

/// What to look for. Empty collections count as not assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpecification {
    pub filters: Vec<FilterClause>,
    pub tags: BTreeMap<String, String>,
}

impl FilterSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filters.push(clause);
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.tags.is_empty()
    }

    /// Generic clauses first, then one `tag:<key>` clause per tag.
    pub fn request_filters(&self) -> Result<Vec<Filter>> {
        if self.is_empty() {
            return Err(LookupError::configuration(
                "One of filters or instance_tags must be assigned",
            ));
        }
        for clause in &self.filters {
            clause.validate()?;
        }

        let mut filters = build_filters(&self.filters);
        filters.extend(build_tag_filters(&self.tags));
        Ok(filters)
    }
}

/// Converts filter blocks to EC2 filters. Duplicate blocks collapse to one.
pub fn build_filters(clauses: &[FilterClause]) -> Vec<Filter> {
    let mut seen: Vec<&FilterClause> = Vec::with_capacity(clauses.len());
    clauses
        .iter()
        .filter(|clause| {
            if seen.contains(clause) {
                false
            } else {
                seen.push(*clause);
                true
            }
        })
        .map(|clause| {
            Filter::builder()
                .name(&clause.name)
                .set_values(Some(clause.values.clone()))
                .build()
        })
        .collect()
}

pub fn build_tag_filters(tags: &BTreeMap<String, String>) -> Vec<Filter> {
    tags.iter()
        .map(|(key, value)| {
            Filter::builder()
                .name(format!("tag:{}", key))
                .values(value)
                .build()
        })
        .collect()
}
