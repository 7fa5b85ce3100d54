//! CloudWatch adapter for the metrics sink.

use aws_config::SdkConfig;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{
    Dimension as CwDimension, MetricDatum as CwMetricDatum, StandardUnit,
};
use tokio::runtime::Handle;

use scribeops_monitor::{MetricDatum, MetricUnit, MetricsError, MetricsSink};

use super::error_code;

/// `PutMetricData` publisher bound to a runtime handle.
#[derive(Debug, Clone)]
pub struct CloudWatchMetricsSink {
    client: Client,
    runtime: Handle,
}

impl CloudWatchMetricsSink {
    pub fn new(client: Client, runtime: Handle) -> Self {
        Self { client, runtime }
    }

    pub fn from_sdk_config(config: &SdkConfig, runtime: Handle) -> Self {
        Self::new(Client::new(config), runtime)
    }

    async fn put_metric_data(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
        let dimensions = datum
            .dimensions
            .iter()
            .map(|d| CwDimension::builder().name(&d.name).value(&d.value).build())
            .collect();

        let cw_datum = CwMetricDatum::builder()
            .metric_name(&datum.metric_name)
            .value(datum.value)
            .unit(cw_unit(datum.unit))
            .timestamp(DateTime::from_millis(datum.timestamp.timestamp_millis()))
            .set_dimensions(Some(dimensions))
            .build();

        self.client
            .put_metric_data()
            .namespace(namespace)
            .metric_data(cw_datum)
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(&e).to_string();
                match error_code(&e) {
                    Some(_) => MetricsError::Rejected(message),
                    None => MetricsError::Transport(message),
                }
            })?;
        Ok(())
    }
}

fn cw_unit(unit: MetricUnit) -> StandardUnit {
    match unit {
        MetricUnit::Count => StandardUnit::Count,
        MetricUnit::None => StandardUnit::None,
    }
}

impl MetricsSink for CloudWatchMetricsSink {
    fn publish(&self, namespace: &str, datum: &MetricDatum) -> Result<(), MetricsError> {
        self.runtime.block_on(self.put_metric_data(namespace, datum))
    }
}
