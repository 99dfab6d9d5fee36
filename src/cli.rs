use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;

use crate::data_source::InstancesConfig;
use crate::filters::FilterClause;

#[derive(Parser, Debug)]
#[command(
    name = "ec2-instances",
    version,
    about = "Look up non-terminated EC2 instances by filter or tag"
)]
pub struct Cli {
    /// AWS region, defaults to the provider chain
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named profile from the shared AWS config
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// JSON file with `filter` and `instance_tags`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Filter clause, e.g. name=instance-type,values=t3.micro,t3.small
    #[arg(long = "filter", value_name = "CLAUSE", value_parser = parse_filter)]
    pub filters: Vec<FilterClause>,

    /// Tag to match, e.g. env=prod
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,

    /// Freshness token to report as `id`, defaults to the current time
    #[arg(long)]
    pub token: Option<String>,

    /// Print the data source schema and exit
    #[arg(long)]
    pub schema: bool,

    #[arg(long)]
    pub pretty: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The `--config` document, if any, with `--filter` and `--tag` appended.
    pub fn instances_config(&self) -> Result<InstancesConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
                serde_json::from_str::<InstancesConfig>(&raw)
                    .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
            }
            None => InstancesConfig::default(),
        };

        config.filter.extend(self.filters.iter().cloned());
        config.instance_tags.extend(self.tags.iter().cloned());
        Ok(config)
    }
}

fn strip_key<'a>(part: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = part.split_once('=')?;
    k.trim().eq_ignore_ascii_case(key).then_some(v)
}

pub fn parse_filter(raw: &str) -> Result<FilterClause, String> {
    let mut parts = raw.split(',');
    let name = parts
        .next()
        .and_then(|p| strip_key(p, "name"))
        .filter(|n| !n.is_empty())
        .ok_or_else(|| format!("expected name=<filter-name>,values=<v1>[,<v2>...], got {:?}", raw))?;
    let first = parts
        .next()
        .and_then(|p| strip_key(p, "values"))
        .ok_or_else(|| format!("filter {:?} has no values", name))?;

    let values: Vec<String> = std::iter::once(first)
        .chain(parts)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() {
        return Err(format!("filter {:?} has no values", name));
    }
    Ok(FilterClause::new(name, values))
}

pub fn parse_tag(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_with_several_values() {
        let clause = parse_filter("Name=instance-type,Values=t3.micro,t3.small").unwrap();
        assert_eq!(clause, FilterClause::new("instance-type", ["t3.micro", "t3.small"]));
    }

    #[test]
    fn filter_values_may_contain_equals() {
        let clause = parse_filter("name=tag:owner,values=team=infra").unwrap();
        assert_eq!(clause.values, ["team=infra"]);
    }

    #[test]
    fn rejects_filter_without_values() {
        assert!(parse_filter("name=vpc-id").is_err());
        assert!(parse_filter("name=vpc-id,values=").is_err());
        assert!(parse_filter("values=vpc-1").is_err());
    }

    #[test]
    fn parses_tags() {
        assert_eq!(
            parse_tag("env=prod").unwrap(),
            ("env".to_string(), "prod".to_string())
        );
        assert_eq!(parse_tag("empty=").unwrap().1, "");
        assert!(parse_tag("=prod").is_err());
        assert!(parse_tag("env").is_err());
    }

    #[test]
    fn flags_extend_the_config() {
        let cli = Cli::parse_from([
            "ec2-instances",
            "--filter",
            "name=instance-state-name,values=running",
            "--tag",
            "env=prod",
            "--tag",
            "team=infra",
        ]);
        let config = cli.instances_config().unwrap();
        assert_eq!(config.filter.len(), 1);
        assert_eq!(config.instance_tags.len(), 2);
    }
}
