use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_types::region::Region;

/// Loads the shared AWS config. An explicit region wins over the default
/// provider chain; a profile name selects a `~/.aws/config` profile.
pub async fn configure_aws(region: Option<String>, profile: Option<String>) -> aws_types::SdkConfig {
    let region_provider =
        RegionProviderChain::first_try(region.map(Region::new)).or_default_provider();

    let mut loader = aws_config::defaults(BehaviorVersion::v2024_03_28()).region(region_provider);
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    loader.load().await
}

pub async fn ec2_client(region: Option<String>, profile: Option<String>) -> aws_sdk_ec2::Client {
    let config = configure_aws(region, profile).await;
    aws_sdk_ec2::Client::new(&config)
}
