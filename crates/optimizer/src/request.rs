//! Turning a campaign's channels into a recommendation request, and checking
//! what comes back.

use crate::error::OptimizerError;
use adalloc_core::{ChannelData, RecommendationResponse};
use serde::Serialize;
use serde_json::{json, Value};

const SYSTEM_INSTRUCTION: &str = "\
You are a world-class performance marketing strategist.
Your goal is to analyze channel performance data (Spend, ROAS, CPC, CTR) and suggest an optimal budget allocation to maximize total Revenue.

Rules:
1. Identify high ROAS channels and suggest increasing spend there.
2. Identify low ROAS channels with high CPA/CPC and suggest cutting spend, unless they are vital for awareness (high impressions).
3. Ensure the total suggested spend across all channels equals the provided totalBudget exactly.
4. Provide a brief, punchy reasoning for each channel change.
5. Provide a global strategy summary.";

/// The per-channel fields the strategist sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSnapshot {
    pub id: String,
    pub name: String,
    pub spend: f64,
    pub roas: f64,
    pub revenue: f64,
    pub cpc: f64,
}

impl From<&ChannelData> for ChannelSnapshot {
    fn from(c: &ChannelData) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            spend: c.spend,
            roas: c.roas,
            revenue: c.revenue,
            cpc: c.cpc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub total_budget: f64,
    pub channels: Vec<ChannelSnapshot>,
}

impl OptimizationRequest {
    pub fn new(channels: &[ChannelData], total_budget: f64) -> Self {
        Self {
            total_budget,
            channels: channels.iter().map(ChannelSnapshot::from).collect(),
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// User prompt: the budget, then the channel table as indented JSON.
    pub fn prompt(&self) -> String {
        let table = serde_json::to_string_pretty(&self.channels).unwrap_or_else(|_| "[]".into());
        format!(
            "Total Budget Available: ${}\n\nCurrent Performance Data:\n{}\n\nPlease provide an optimized budget allocation.",
            self.total_budget, table
        )
    }

    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.id.as_str())
    }
}

/// Structured-output schema the service must answer in.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "channelId": { "type": "STRING" },
                        "suggestedSpend": { "type": "NUMBER" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["channelId", "suggestedSpend", "reasoning"]
                }
            },
            "globalStrategy": { "type": "STRING" }
        },
        "required": ["recommendations", "globalStrategy"]
    })
}

/// Parse the raw reply text and reject anything outside the contract.
pub fn validate_reply(raw: &str) -> Result<RecommendationResponse, OptimizerError> {
    let response: RecommendationResponse = serde_json::from_str(raw.trim())?;

    for (i, rec) in response.recommendations.iter().enumerate() {
        if rec.channel_id.trim().is_empty() {
            return Err(OptimizerError::MalformedReply(format!(
                "recommendation {i} has an empty channelId"
            )));
        }
        if !rec.suggested_spend.is_finite() || rec.suggested_spend < 0.0 {
            return Err(OptimizerError::MalformedReply(format!(
                "recommendation for {} has invalid suggestedSpend {}",
                rec.channel_id, rec.suggested_spend
            )));
        }
        if rec.reasoning.trim().is_empty() {
            return Err(OptimizerError::MalformedReply(format!(
                "recommendation for {} has no reasoning",
                rec.channel_id
            )));
        }
    }
    if response.global_strategy.trim().is_empty() {
        return Err(OptimizerError::MalformedReply("globalStrategy is blank".into()));
    }

    Ok(response)
}
