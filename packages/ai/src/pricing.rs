// ABOUTME: Per-model token pricing table and cost computation
// ABOUTME: Unknown models deliberately fall back to the default rate

/// USD per 1000 tokens for models without an explicit table entry.
///
/// Permissive policy: an unrecognized model is billed at the default rate
/// rather than rejected, so adding a model upstream never breaks invocations.
pub const DEFAULT_RATE_PER_1K: f64 = 0.0005;

/// USD per 1000 tokens for a given model.
pub fn rate_per_1k(model: &str) -> f64 {
    match model {
        "gpt-4o" => 0.005,
        "gpt-4o-mini" => 0.0005,
        _ => DEFAULT_RATE_PER_1K,
    }
}

/// Cost of an invocation: `total_tokens / 1000 * rate`.
pub fn estimate_cost(total_tokens: u32, model: &str) -> f64 {
    (total_tokens as f64 / 1000.0) * rate_per_1k(model)
}
