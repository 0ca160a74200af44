//! Token counts → money.
//!
//! Provider rates are quoted in USD per million tokens; proposals quote costs
//! in GBP, so every figure passes through a fixed exchange constant and is
//! rounded to four decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Fixed USD → GBP conversion applied to every cost estimate.
pub const USD_TO_GBP: Decimal = Decimal::from_parts(79, 0, 0, false, 2);

const PER_MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// USD price per million tokens for one model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRates {
    pub input: Decimal,
    pub output: Decimal,
    pub thinking: Decimal,
}

impl ModelRates {
    pub const STANDARD: Self = Self {
        input: Decimal::from_parts(3, 0, 0, false, 0),
        output: Decimal::from_parts(15, 0, 0, false, 0),
        thinking: Decimal::from_parts(15, 0, 0, false, 0),
    };

    pub const PREMIUM: Self = Self {
        input: Decimal::from_parts(15, 0, 0, false, 0),
        output: Decimal::from_parts(75, 0, 0, false, 0),
        thinking: Decimal::from_parts(75, 0, 0, false, 0),
    };

    /// Opus-class models bill at premium rates; everything else at standard.
    #[must_use]
    pub fn for_model(model: &str) -> Self {
        if model.to_ascii_lowercase().contains("opus") {
            Self::PREMIUM
        } else {
            Self::STANDARD
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Estimated, not reported. See [`estimate_thinking_tokens`].
    pub thinking_tokens: u64,
}

impl TokenUsage {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.thinking_tokens)
    }

    /// Field-wise sum.
    #[must_use]
    pub fn combined(self, other: Self) -> Self {
        Self {
            input_tokens: self.input_tokens.saturating_add(other.input_tokens),
            output_tokens: self.output_tokens.saturating_add(other.output_tokens),
            thinking_tokens: self.thinking_tokens.saturating_add(other.thinking_tokens),
        }
    }
}

/// Rough token count for prompt text: one token per four characters, rounded up.
#[must_use]
pub fn estimate_tokens(text: &str) -> u64 {
    let chars = u64::try_from(text.chars().count()).unwrap_or(u64::MAX);
    chars.div_ceil(4)
}

/// Thinking usage is inferred as reported input minus the locally estimated
/// prompt size, floored at zero. The result is approximate.
#[must_use]
pub fn estimate_thinking_tokens(reported_input: u64, estimated_prompt: u64) -> u64 {
    reported_input.saturating_sub(estimated_prompt)
}

/// Cost in GBP, rounded to 4 dp.
#[must_use]
pub fn cost_gbp(usage: &TokenUsage, rates: &ModelRates) -> Decimal {
    let usd = Decimal::from(usage.input_tokens) * rates.input
        + Decimal::from(usage.output_tokens) * rates.output
        + Decimal::from(usage.thinking_tokens) * rates.thinking;
    (usd / PER_MILLION * USD_TO_GBP).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(i: u64, o: u64, t: u64) -> TokenUsage {
        TokenUsage {
            input_tokens: i,
            output_tokens: o,
            thinking_tokens: t,
        }
    }

    #[test]
    fn known_cost_for_standard_model() {
        // 10k in × $3 + 2k out × $15 = $0.06 → £0.0474
        let cost = cost_gbp(&usage(10_000, 2_000, 0), &ModelRates::STANDARD);
        assert_eq!(cost, Decimal::new(474, 4));
    }

    #[test]
    fn premium_is_five_times_standard() {
        let u = usage(100_000, 20_000, 20_000);
        let standard = cost_gbp(&u, &ModelRates::STANDARD);
        let premium = cost_gbp(&u, &ModelRates::PREMIUM);
        assert_eq!(premium, standard * Decimal::from(5));
    }

    #[test]
    fn model_rates_follow_family() {
        assert_eq!(ModelRates::for_model("claude-opus-4-1-20250805"), ModelRates::PREMIUM);
        assert_eq!(ModelRates::for_model("claude-sonnet-4-20250514"), ModelRates::STANDARD);
    }

    #[test]
    fn cost_is_linear_within_rounding() {
        let tolerance = Decimal::new(3, 4);
        let samples = [0u64, 1, 7, 999, 12_345, 250_000, 1_000_000, 9_876_543];
        for &i in &samples {
            for &o in &samples {
                for &t in &samples {
                    for rates in [ModelRates::STANDARD, ModelRates::PREMIUM] {
                        let whole = cost_gbp(&usage(i, o, t), &rates);
                        let parts = cost_gbp(&usage(i, 0, 0), &rates)
                            + cost_gbp(&usage(0, o, 0), &rates)
                            + cost_gbp(&usage(0, 0, t), &rates);
                        assert!((whole - parts).abs() <= tolerance, "({i},{o},{t})");
                    }
                }
            }
        }
    }

    #[test]
    fn cost_is_monotonic_in_each_argument() {
        let steps = [0u64, 1, 50, 333, 4_000, 77_777, 2_000_000];
        for window in steps.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            for &fixed in &steps {
                let r = ModelRates::STANDARD;
                assert!(cost_gbp(&usage(lo, fixed, fixed), &r) <= cost_gbp(&usage(hi, fixed, fixed), &r));
                assert!(cost_gbp(&usage(fixed, lo, fixed), &r) <= cost_gbp(&usage(fixed, hi, fixed), &r));
                assert!(cost_gbp(&usage(fixed, fixed, lo), &r) <= cost_gbp(&usage(fixed, fixed, hi), &r));
            }
        }
    }

    #[test]
    fn cost_is_deterministic() {
        let u = usage(31_415, 9_265, 3_589);
        assert_eq!(cost_gbp(&u, &ModelRates::STANDARD), cost_gbp(&u, &ModelRates::STANDARD));
    }

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("££££"), 1);
    }

    #[test]
    fn thinking_estimate_floors_at_zero() {
        assert_eq!(estimate_thinking_tokens(5_000, 1_200), 3_800);
        assert_eq!(estimate_thinking_tokens(1_000, 1_200), 0);
    }

    #[test]
    fn usage_totals_and_combines() {
        let a = usage(10, 20, 30);
        assert_eq!(a.total(), 60);
        assert_eq!(a.combined(usage(1, 2, 3)), usage(11, 22, 33));
    }
}
