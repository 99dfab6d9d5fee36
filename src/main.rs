use clap::Parser;
use ec2_instances::aws_config::ec2_client;
use ec2_instances::cli::Cli;
use ec2_instances::{data_source, logging, FreshnessToken, InstanceLookup};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if cli.schema {
        println!("{}", serde_json::to_string_pretty(&data_source::schema())?);
        return Ok(());
    }

    let config = cli.instances_config()?;
    let token = cli
        .token
        .clone()
        .map(FreshnessToken::from)
        .unwrap_or_else(FreshnessToken::now);

    let client = ec2_client(cli.region.clone(), cli.profile.clone()).await;
    let lookup = InstanceLookup::new(client);

    let state = match data_source::read(&lookup, config, token).await {
        Ok(state) => state,
        Err(e) => {
            error!("{} lookup failed: {}", data_source::DATA_SOURCE_NAME, e);
            return Err(e.into());
        }
    };

    let out = if cli.pretty {
        serde_json::to_string_pretty(&state)?
    } else {
        serde_json::to_string(&state)?
    };
    println!("{}", out);

    Ok(())
}
