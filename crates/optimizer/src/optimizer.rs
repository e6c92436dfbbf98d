//! The optimize round trip: build the request, call the service under a
//! deadline, validate the reply. Always resolves to a response.

use crate::error::OptimizerError;
use crate::request::{validate_reply, OptimizationRequest};
use crate::service::{select_service, RecommendationService};
use adalloc_core::config::OptimizerConfig;
use adalloc_core::{ChannelData, RecommendationResponse};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub const NOT_CONFIGURED_MESSAGE: &str = "AI Strategist is not configured. To use AI features, set the ADALLOC__OPTIMIZER__API_KEY environment variable.";
pub const FAILURE_MESSAGE: &str = "Failed to generate recommendations. Please check API Key or try again.";

/// Suggested totals further than this from the budget are reported.
const DRIFT_TOLERANCE: f64 = 0.01;

pub struct BudgetOptimizer {
    service: Arc<dyn RecommendationService>,
    timeout: Duration,
}

impl BudgetOptimizer {
    pub fn new(service: Arc<dyn RecommendationService>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(
            select_service(config),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub async fn optimize(&self, channels: &[ChannelData], total_budget: f64) -> RecommendationResponse {
        metrics::counter!("optimizer.requests").increment(1);
        let request = OptimizationRequest::new(channels, total_budget);

        match self.request(&request).await {
            Ok(response) => {
                let suggested = response.total_suggested_spend();
                let drift = suggested - total_budget;
                if drift.abs() > DRIFT_TOLERANCE {
                    warn!(
                        total_budget,
                        suggested, drift, "Suggested spend does not match the budget"
                    );
                }
                let unknown: Vec<&str> = response
                    .recommendations
                    .iter()
                    .map(|r| r.channel_id.as_str())
                    .filter(|id| !request.channel_ids().any(|c| c == *id))
                    .collect();
                if !unknown.is_empty() {
                    warn!(channel_ids = ?unknown, "Recommendations for channels not in the request");
                }
                info!(
                    recommendations = response.recommendations.len(),
                    total_budget, "Optimization received"
                );
                response
            }
            Err(OptimizerError::NotConfigured) => {
                metrics::counter!("optimizer.failures", "reason" => "not_configured").increment(1);
                RecommendationResponse::fallback(NOT_CONFIGURED_MESSAGE)
            }
            Err(e) => {
                metrics::counter!("optimizer.failures", "reason" => e.kind()).increment(1);
                error!(error = %e, "Error fetching optimization");
                RecommendationResponse::fallback(FAILURE_MESSAGE)
            }
        }
    }

    async fn request(&self, request: &OptimizationRequest) -> Result<RecommendationResponse, OptimizerError> {
        let raw = tokio::time::timeout(self.timeout, self.service.generate(request))
            .await
            .map_err(|_| OptimizerError::Timeout(self.timeout))??;
        validate_reply(&raw)
    }
}
