//! Offline lookups: projections and industry mapping.

use std::path::Path;

use propgen_core::projection::{calculate_projections_with, DEFAULT_DEAL_VALUE};
use propgen_core::{ConversionOverrides, IndustryMap, IndustryServices, PackageTier, ProjectionCalculation};

pub(crate) fn projection(
    traffic: u64,
    tier: PackageTier,
    deal_value: Option<u64>,
    close_rate: Option<f64>,
) -> ProjectionCalculation {
    let overrides = ConversionOverrides {
        lead_to_customer_rate: close_rate,
        ..ConversionOverrides::default()
    };
    calculate_projections_with(
        traffic,
        tier,
        deal_value.unwrap_or(DEFAULT_DEAL_VALUE),
        &overrides,
    )
}

/// # Errors
///
/// Returns an error if the projection cannot be serialized.
pub(crate) fn print_projection(
    traffic: u64,
    tier: PackageTier,
    deal_value: Option<u64>,
    close_rate: Option<f64>,
) -> anyhow::Result<()> {
    let calc = projection(traffic, tier, deal_value, close_rate);
    println!("{}", serde_json::to_string_pretty(&calc)?);
    Ok(())
}

pub(crate) fn industry_services(
    label: &str,
    map_path: Option<&Path>,
) -> anyhow::Result<IndustryServices> {
    let map = match map_path {
        Some(path) => IndustryMap::with_overrides(path)?,
        None => IndustryMap::builtin(),
    };
    Ok(map.lookup(label).clone())
}

/// # Errors
///
/// Returns an error if the override file cannot be loaded.
pub(crate) fn print_industry(label: &str, map_path: Option<&Path>) -> anyhow::Result<()> {
    let services = industry_services(label, map_path)?;
    println!("{}", serde_json::to_string_pretty(&services)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_defaults_the_deal_value() {
        let calc = projection(500, PackageTier::Regional, None, None);
        assert_eq!(calc.deal_value, DEFAULT_DEAL_VALUE);
        assert_eq!(calc.monthly_investment, PackageTier::Regional.monthly_price());
        assert!(calc.projected_traffic > 500);
    }

    #[test]
    fn close_rate_override_is_applied() {
        let calc = projection(1_000, PackageTier::Local, Some(2_500), Some(0.5));
        assert!((calc.conversion_rates.lead_to_customer - 0.5).abs() < f64::EPSILON);
        assert_eq!(calc.deal_value, 2_500);
    }

    #[test]
    fn every_label_maps_to_a_primary_service() {
        for label in ["Roofing", "solar energy.", ""] {
            let services = industry_services(label, None).unwrap();
            assert!(!services.primary_services.is_empty(), "{label:?}");
        }
    }

    #[test]
    fn unreadable_override_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(industry_services("Roofing", Some(&dir.path().join("missing.yaml"))).is_err());
    }
}
