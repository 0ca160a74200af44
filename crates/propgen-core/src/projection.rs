//! Deterministic visitor → lead → customer → revenue projections.
//!
//! These numbers are embedded verbatim in content prompts and re-derived by
//! the renderers, so the calculation must stay a pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::proposal::{MathStep, ResultRow};
use crate::text::{format_gbp, format_number};
use crate::tier::PackageTier;

/// Visitor → lead rate used when the customer record carries no override.
pub const DEFAULT_VISITOR_TO_LEAD: f64 = 0.03;
/// Lead → customer rate used when the customer record carries no override.
pub const DEFAULT_LEAD_TO_CUSTOMER: f64 = 0.25;
/// Deal value in whole pounds used when neither request nor record has one.
pub const DEFAULT_DEAL_VALUE: u64 = 1_000;
/// Monthly visitors assumed when research surfaces no real traffic figure.
pub const DEFAULT_CURRENT_TRAFFIC: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRates {
    pub visitor_to_lead: f64,
    pub lead_to_customer: f64,
    pub visitor_to_customer: f64,
}

/// Real figures from the customer record that replace the default assumptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOverrides {
    pub average_deal_value: Option<u64>,
    pub profit_per_deal: Option<u64>,
    /// Lead → customer rate as a fraction in `(0, 1]`.
    pub lead_to_customer_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub traffic: u64,
    pub leads: u64,
    pub customers: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionCalculation {
    pub tier: PackageTier,
    pub current_traffic: u64,
    pub projected_traffic: u64,
    pub growth_multiplier: f64,
    pub deal_value: u64,
    pub monthly_leads: u64,
    pub monthly_customers: u64,
    pub monthly_revenue: u64,
    pub annual_revenue: u64,
    pub monthly_investment: u64,
    pub annual_investment: u64,
    /// Profit per customer when the record supplies one; ROI is computed on it.
    pub profit_per_deal: Option<u64>,
    /// Annual return divided by annual investment, one decimal place.
    pub roi_multiple: f64,
    pub month_six: Milestone,
    pub conversion_rates: ConversionRates,
}

/// Projection using default conversion assumptions.
#[must_use]
pub fn calculate_projections(
    current_traffic: u64,
    tier: PackageTier,
    deal_value: u64,
) -> ProjectionCalculation {
    calculate_projections_with(current_traffic, tier, deal_value, &ConversionOverrides::default())
}

/// Projection with record-level overrides applied.
///
/// Out-of-range override rates (non-finite, `<= 0`, `> 1`) are ignored.
#[must_use]
pub fn calculate_projections_with(
    current_traffic: u64,
    tier: PackageTier,
    deal_value: u64,
    overrides: &ConversionOverrides,
) -> ProjectionCalculation {
    let growth_multiplier = tier.growth_multiplier();
    let lead_to_customer = overrides
        .lead_to_customer_rate
        .filter(|r| r.is_finite() && *r > 0.0 && *r <= 1.0)
        .unwrap_or(DEFAULT_LEAD_TO_CUSTOMER);
    let conversion_rates = ConversionRates {
        visitor_to_lead: DEFAULT_VISITOR_TO_LEAD,
        lead_to_customer,
        visitor_to_customer: DEFAULT_VISITOR_TO_LEAD * lead_to_customer,
    };
    let deal_value = overrides.average_deal_value.unwrap_or(deal_value);

    let projected_traffic = scale(current_traffic, growth_multiplier);
    let full = funnel(projected_traffic, &conversion_rates, deal_value);

    // Month six sits halfway along the ramp.
    let month_six_traffic = current_traffic + (projected_traffic - current_traffic) / 2;
    let month_six = funnel(month_six_traffic, &conversion_rates, deal_value);

    let monthly_investment = tier.monthly_price();
    let annual_investment = monthly_investment * 12;
    let annual_revenue = full.revenue.saturating_mul(12);
    let annual_return = overrides
        .profit_per_deal
        .map_or(annual_revenue, |p| full.customers.saturating_mul(p).saturating_mul(12));

    #[allow(clippy::cast_precision_loss)]
    let roi_multiple = ((annual_return as f64 / annual_investment as f64) * 10.0).round() / 10.0;

    ProjectionCalculation {
        tier,
        current_traffic,
        projected_traffic,
        growth_multiplier,
        deal_value,
        monthly_leads: full.leads,
        monthly_customers: full.customers,
        monthly_revenue: full.revenue,
        annual_revenue,
        monthly_investment,
        annual_investment,
        profit_per_deal: overrides.profit_per_deal,
        roi_multiple,
        month_six,
        conversion_rates,
    }
}

fn funnel(traffic: u64, rates: &ConversionRates, deal_value: u64) -> Milestone {
    let leads = scale(traffic, rates.visitor_to_lead);
    let customers = scale(leads, rates.lead_to_customer);
    Milestone {
        traffic,
        leads,
        customers,
        revenue: customers.saturating_mul(deal_value),
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn scale(value: u64, factor: f64) -> u64 {
    (value as f64 * factor).round() as u64
}

impl ProjectionCalculation {
    /// Step-by-step arithmetic shown in the "simple math" section.
    #[must_use]
    pub fn simple_math_steps(&self) -> Vec<MathStep> {
        let rates = &self.conversion_rates;
        let mut steps = vec![
            MathStep {
                label: "Website visitors today".to_string(),
                calculation: "Current monthly organic traffic".to_string(),
                result: format!("{} visitors/month", format_number(self.current_traffic)),
            },
            MathStep {
                label: "Visitors after 12 months".to_string(),
                calculation: format!(
                    "{} × {}",
                    format_number(self.current_traffic),
                    format_multiplier(self.growth_multiplier)
                ),
                result: format!("{} visitors/month", format_number(self.projected_traffic)),
            },
            MathStep {
                label: "New enquiries".to_string(),
                calculation: format!(
                    "{} × {} enquiry rate",
                    format_number(self.projected_traffic),
                    format_percent(rates.visitor_to_lead)
                ),
                result: format!("{} leads/month", format_number(self.monthly_leads)),
            },
            MathStep {
                label: "New customers".to_string(),
                calculation: format!(
                    "{} × {} close rate",
                    format_number(self.monthly_leads),
                    format_percent(rates.lead_to_customer)
                ),
                result: format!("{} customers/month", format_number(self.monthly_customers)),
            },
            MathStep {
                label: "Monthly revenue".to_string(),
                calculation: format!(
                    "{} × {} average deal",
                    format_number(self.monthly_customers),
                    format_gbp(self.deal_value)
                ),
                result: format_gbp(self.monthly_revenue),
            },
        ];
        steps.push(MathStep {
            label: "Return on investment".to_string(),
            calculation: format!(
                "{} per year ÷ {} per year",
                format_gbp(self.annual_revenue),
                format_gbp(self.annual_investment)
            ),
            result: format!("{:.1}x", self.roi_multiple),
        });
        steps
    }

    /// Rows for the concise "projected results" table: today, month 6, month 12.
    #[must_use]
    pub fn projected_results_rows(&self) -> Vec<ResultRow> {
        let current = funnel(self.current_traffic, &self.conversion_rates, self.deal_value);
        let row = |metric: &str, f: &dyn Fn(&Milestone) -> String| ResultRow {
            metric: metric.to_string(),
            current: f(&current),
            month_six: f(&self.month_six),
            month_twelve: f(&Milestone {
                traffic: self.projected_traffic,
                leads: self.monthly_leads,
                customers: self.monthly_customers,
                revenue: self.monthly_revenue,
            }),
        };
        vec![
            row("Monthly visitors", &|m| format_number(m.traffic)),
            row("Monthly leads", &|m| format_number(m.leads)),
            row("New customers / month", &|m| format_number(m.customers)),
            row("Monthly revenue", &|m| format_gbp(m.revenue)),
        ]
    }
}

fn format_multiplier(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}x growth")
    } else {
        format!("{value:.1}x growth")
    }
}

fn format_percent(rate: f64) -> String {
    let pct = rate * 100.0;
    if pct.fract() == 0.0 {
        format!("{pct:.0}%")
    } else {
        format!("{pct:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_tier_default_funnel() {
        let calc = calculate_projections(200, PackageTier::Local, 1_000);
        assert_eq!(calc.projected_traffic, 600);
        assert_eq!(calc.monthly_leads, 18);
        assert_eq!(calc.monthly_customers, 5); // 4.5 rounds half away from zero
        assert_eq!(calc.monthly_revenue, 5_000);
        assert_eq!(calc.annual_revenue, 60_000);
        assert_eq!(calc.monthly_investment, 2_000);
        assert_eq!(calc.annual_investment, 24_000);
        assert!((calc.roi_multiple - 2.5).abs() < f64::EPSILON);
        assert_eq!(calc.month_six.traffic, 400);
    }

    #[test]
    fn identical_inputs_give_identical_outputs() {
        let a = calculate_projections(1_234, PackageTier::Regional, 2_500);
        let b = calculate_projections(1_234, PackageTier::Regional, 2_500);
        assert_eq!(a, b);
    }

    #[test]
    fn projections_are_monotonic_in_traffic() {
        for tier in PackageTier::ALL {
            for deal in [0, 1, 750, 12_000] {
                let mut prev = calculate_projections(0, tier, deal);
                for traffic in (1..5_000).step_by(7) {
                    let next = calculate_projections(traffic, tier, deal);
                    assert!(next.projected_traffic >= prev.projected_traffic);
                    assert!(next.monthly_revenue >= prev.monthly_revenue);
                    assert!(next.annual_revenue >= prev.annual_revenue);
                    prev = next;
                }
            }
        }
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = ConversionOverrides {
            average_deal_value: Some(4_000),
            profit_per_deal: Some(1_000),
            lead_to_customer_rate: Some(0.5),
        };
        let calc = calculate_projections_with(1_000, PackageTier::Local, 500, &overrides);
        assert_eq!(calc.deal_value, 4_000);
        assert!((calc.conversion_rates.lead_to_customer - 0.5).abs() < f64::EPSILON);
        assert_eq!(calc.monthly_leads, 90);
        assert_eq!(calc.monthly_customers, 45);
        assert_eq!(calc.monthly_revenue, 180_000);
        // ROI on profit: 45 × 1,000 × 12 / 24,000
        assert!((calc.roi_multiple - 22.5).abs() < f64::EPSILON);
    }

    #[test]
    fn out_of_range_override_rate_is_ignored() {
        let overrides = ConversionOverrides {
            lead_to_customer_rate: Some(25.0),
            ..ConversionOverrides::default()
        };
        let calc = calculate_projections_with(1_000, PackageTier::Local, 500, &overrides);
        assert!((calc.conversion_rates.lead_to_customer - DEFAULT_LEAD_TO_CUSTOMER).abs() < 1e-12);
    }

    #[test]
    fn zero_traffic_yields_zero_funnel() {
        let calc = calculate_projections(0, PackageTier::National, 1_000);
        assert_eq!(calc.projected_traffic, 0);
        assert_eq!(calc.monthly_revenue, 0);
        assert!(calc.roi_multiple.abs() < f64::EPSILON);
    }

    #[test]
    fn simple_math_uses_calculated_figures() {
        let calc = calculate_projections(200, PackageTier::Local, 1_000);
        let steps = calc.simple_math_steps();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[1].result, "600 visitors/month");
        assert_eq!(steps[4].result, "£5,000");
        assert_eq!(steps[5].result, "2.5x");
        assert!(steps[2].calculation.contains("3%"));
    }

    #[test]
    fn projected_rows_cover_three_checkpoints() {
        let calc = calculate_projections(200, PackageTier::Local, 1_000);
        let rows = calc.projected_results_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].current, "200");
        assert_eq!(rows[0].month_six, "400");
        assert_eq!(rows[0].month_twelve, "600");
        assert_eq!(rows[3].month_twelve, "£5,000");
    }
}
