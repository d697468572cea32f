//! Usage accounting tests
//!
//! Cost formula and word-count estimation behavior

use playground_proxy::config::settings::PricingConfig;
use playground_proxy::models::openai::ChatUsage;
use playground_proxy::services::{estimate_tokens, UsageTracker};

fn pricing(input: f64, output: f64) -> PricingConfig {
    PricingConfig {
        input_per_1k: input,
        output_per_1k: output,
    }
}

#[test]
fn test_cost_formula_exact() {
    let mut tracker = UsageTracker::new("", None);
    tracker.record_reported(ChatUsage {
        prompt_tokens: 500,
        completion_tokens: 1500,
        total_tokens: 2000,
    });

    let summary = tracker.finish(&pricing(0.0015, 0.002));

    let expected = (500.0 / 1000.0) * 0.0015 + (1500.0 / 1000.0) * 0.002;
    assert_eq!(summary.total_cost, expected);
    assert_eq!(summary.input_tokens, 500);
    assert_eq!(summary.output_tokens, 1500);
}

#[test]
fn test_cost_is_zero_for_empty_stream() {
    let tracker = UsageTracker::new("", None);
    let summary = tracker.finish(&pricing(0.0015, 0.002));

    assert_eq!(summary.input_tokens, 0);
    assert_eq!(summary.output_tokens, 0);
    assert_eq!(summary.total_cost, 0.0);
}

#[test]
fn test_word_count_estimate_accumulates() {
    let mut tracker = UsageTracker::new("what is the meaning of life", None);
    tracker.add_output("The answer");
    tracker.add_output(" is");
    tracker.add_output(" forty-two.");

    let summary = tracker.finish(&pricing(0.0015, 0.002));

    assert_eq!(summary.input_tokens, 6);
    assert_eq!(summary.output_tokens, 4);
}

#[test]
fn test_system_prompt_counts_toward_input() {
    let tracker = UsageTracker::new("hello there", Some("you are a helpful assistant"));
    let summary = tracker.finish(&pricing(0.0015, 0.002));

    assert_eq!(summary.input_tokens, 7);
}

#[test]
fn test_reported_usage_overrides_estimate() {
    let mut tracker = UsageTracker::new("a very long prompt with many words here", None);
    tracker.add_output("estimated output words that should be ignored");
    tracker.record_reported(ChatUsage {
        prompt_tokens: 3,
        completion_tokens: 5,
        total_tokens: 8,
    });

    let summary = tracker.finish(&pricing(0.0015, 0.002));
    assert_eq!(summary.input_tokens, 3);
    assert_eq!(summary.output_tokens, 5);
}

#[test]
fn test_estimate_tokens_whitespace_handling() {
    assert_eq!(estimate_tokens(""), 0);
    assert_eq!(estimate_tokens("   "), 0);
    assert_eq!(estimate_tokens("one two three"), 3);
    assert_eq!(estimate_tokens("newline\nseparated\nwords"), 3);
}

#[test]
fn test_summary_serializes_to_wire_shape() {
    let mut tracker = UsageTracker::new("", None);
    tracker.record_reported(ChatUsage {
        prompt_tokens: 10,
        completion_tokens: 20,
        total_tokens: 30,
    });

    let summary = tracker.finish(&pricing(0.0015, 0.002));
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["inputTokens"], 10);
    assert_eq!(json["outputTokens"], 20);
    assert!(json["totalCost"].is_f64());
}
