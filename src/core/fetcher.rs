use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_costexplorer::config::Region;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::types::{DateInterval, Granularity as SdkGranularity, ResultByTime};
use thiserror::Error;
use tracing::debug;

use crate::core::config::Settings;
use crate::core::models::cost::{CostQuery, CostResult, Granularity};

/// The only metric requested from Cost Explorer.
pub const METRIC: &str = "UnblendedCost";

/// Cost Explorer is served from a single region.
const COST_EXPLORER_REGION: &str = "us-east-1";

#[derive(Error, Debug)]
pub enum CostError {
    #[error("Cost Explorer request failed: {0}")]
    Api(String),
    #[error("Invalid cost query: {0}")]
    InvalidQuery(String),
    #[error("No cost data for {start} - {end}")]
    NoData { start: String, end: String },
    #[error("Result for {start} - {end} has no {metric} total")]
    MissingMetric {
        metric: &'static str,
        start: String,
        end: String,
    },
    #[error("Result bucket has no time period")]
    MissingPeriod,
}

/// Anything that can answer a cost-and-usage query with per-period buckets.
#[async_trait]
pub trait CostSource: Send + Sync {
    async fn query(&self, query: &CostQuery) -> Result<Vec<CostResult>, CostError>;
}

/// Run `query` against `source` and keep the first bucket.
pub async fn fetch_cost(
    source: &dyn CostSource,
    query: &CostQuery,
) -> Result<CostResult, CostError> {
    debug!(
        granularity = %query.granularity,
        start = %query.start,
        end = %query.end,
        "fetching cost"
    );
    let buckets = source.query(query).await?;
    buckets.into_iter().next().ok_or_else(|| CostError::NoData {
        start: query.start.clone(),
        end: query.end.clone(),
    })
}

impl From<Granularity> for SdkGranularity {
    fn from(g: Granularity) -> Self {
        match g {
            Granularity::Daily => SdkGranularity::Daily,
            Granularity::Monthly => SdkGranularity::Monthly,
        }
    }
}

/// AWS Cost Explorer backed by the SDK's default credential chain.
pub struct AwsCostExplorer {
    sdk_config: SdkConfig,
}

impl AwsCostExplorer {
    /// Resolve credentials and region once. Region falls back to us-east-1.
    pub async fn load(settings: &Settings) -> Self {
        let region = RegionProviderChain::first_try(settings.aws_region.clone().map(Region::new))
            .or_default_provider()
            .or_else(COST_EXPLORER_REGION);

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(profile) = &settings.aws_profile {
            loader = loader.profile_name(profile);
        }

        Self {
            sdk_config: loader.load().await,
        }
    }
}

#[async_trait]
impl CostSource for AwsCostExplorer {
    async fn query(&self, query: &CostQuery) -> Result<Vec<CostResult>, CostError> {
        let client = aws_sdk_costexplorer::Client::new(&self.sdk_config);

        let period = DateInterval::builder()
            .start(&query.start)
            .end(&query.end)
            .build()
            .map_err(|e| CostError::InvalidQuery(e.to_string()))?;

        let output = client
            .get_cost_and_usage()
            .time_period(period)
            .granularity(query.granularity.into())
            .metrics(METRIC)
            .send()
            .await
            .map_err(|e| CostError::Api(DisplayErrorContext(&e).to_string()))?;

        output
            .results_by_time()
            .iter()
            .map(result_from_bucket)
            .collect()
    }
}

fn result_from_bucket(bucket: &ResultByTime) -> Result<CostResult, CostError> {
    let period = bucket.time_period().ok_or(CostError::MissingPeriod)?;
    let start = period.start().to_string();
    let end = period.end().to_string();

    let metric = bucket.total().and_then(|totals| totals.get(METRIC));
    let (amount, unit) = match metric.and_then(|m| m.amount().zip(m.unit())) {
        Some((amount, unit)) => (amount.to_string(), unit.to_string()),
        None => {
            return Err(CostError::MissingMetric {
                metric: METRIC,
                start,
                end,
            })
        }
    };

    Ok(CostResult {
        start,
        end,
        amount,
        unit,
    })
}
