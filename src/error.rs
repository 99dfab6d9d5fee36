/// Boxed error returned by an [`InstancePages`](crate::ec2::InstancePages) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The data source was configured without usable criteria.
    #[error("{0}")]
    Configuration(String),

    /// DescribeInstances failed. The SDK error is kept as-is.
    #[error(transparent)]
    Upstream(BoxError),

    #[error("Your query returned no results. Please change your search criteria and try again.")]
    NotFound,
}

impl LookupError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        LookupError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
