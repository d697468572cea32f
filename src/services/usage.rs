//! Usage and cost accounting
//!
//! Tracks token counts across one relayed stream and produces the trailing
//! UsageSummary line. Upstream-reported counts win; a running word-count
//! estimate of the prompt and emitted text is the fallback for upstreams
//! that never report usage.

use crate::config::PricingConfig;
use crate::models::openai::ChatUsage;
use crate::models::playground::UsageSummary;

/// Whitespace word count used as the token estimate
pub fn estimate_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Per-stream usage tracker
#[derive(Debug)]
pub struct UsageTracker {
    input_estimate: u32,
    output_estimate: u32,
    reported: Option<ChatUsage>,
}

impl UsageTracker {
    /// Start tracking a stream; the prompt and system prompt seed the
    /// input-side estimate
    pub fn new(prompt: &str, system_prompt: Option<&str>) -> Self {
        let input_estimate =
            estimate_tokens(prompt) + system_prompt.map(estimate_tokens).unwrap_or(0);
        Self {
            input_estimate,
            output_estimate: 0,
            reported: None,
        }
    }

    /// Add an emitted text fragment to the output estimate
    pub fn add_output(&mut self, fragment: &str) {
        self.output_estimate += estimate_tokens(fragment);
    }

    /// Record upstream-reported usage; the latest report wins
    pub fn record_reported(&mut self, usage: ChatUsage) {
        self.reported = Some(usage);
    }

    /// Whether the upstream reported usage for this stream
    pub fn has_reported(&self) -> bool {
        self.reported.is_some()
    }

    /// Produce the final summary at the configured per-1k-token rates
    pub fn finish(self, pricing: &PricingConfig) -> UsageSummary {
        let (input_tokens, output_tokens) = match self.reported {
            Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
            None => (self.input_estimate, self.output_estimate),
        };

        let total_cost = (input_tokens as f64 / 1000.0) * pricing.input_per_1k
            + (output_tokens as f64 / 1000.0) * pricing.output_per_1k;

        UsageSummary {
            input_tokens,
            output_tokens,
            total_cost,
        }
    }
}
