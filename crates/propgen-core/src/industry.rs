//! Industry label → canonical search terms.
//!
//! Free-text industry labels from CRM records are unreliable ("Solar Energy.",
//! "roofing ", "Plumbing & Heating"), so lookup runs through progressively
//! looser matches: exact → case-insensitive → bidirectional substring →
//! generic fallback. Every input, including an empty string, resolves to a
//! bucket with at least one primary service.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryServices {
    pub primary_services: Vec<String>,
    #[serde(default)]
    pub secondary_services: Vec<String>,
    #[serde(default)]
    pub related_terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryEntry {
    pub label: String,
    #[serde(flatten)]
    pub services: IndustryServices,
}

#[derive(Debug, Deserialize)]
struct IndustryFile {
    industries: Vec<IndustryEntry>,
}

#[derive(Debug, Clone)]
pub struct IndustryMap {
    entries: Vec<IndustryEntry>,
    fallback: IndustryServices,
}

static BUILTIN: LazyLock<IndustryMap> = LazyLock::new(IndustryMap::builtin);

/// Looks `label` up in the built-in table.
#[must_use]
pub fn services_for_industry(label: &str) -> IndustryServices {
    BUILTIN.lookup(label).clone()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn entry(label: &str, primary: &[&str], secondary: &[&str], related: &[&str]) -> IndustryEntry {
    IndustryEntry {
        label: label.to_string(),
        services: IndustryServices {
            primary_services: strings(primary),
            secondary_services: strings(secondary),
            related_terms: strings(related),
        },
    }
}

impl IndustryMap {
    /// The compiled-in table.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = vec![
            entry("Roofing", &["roofer", "roofing company", "roof repairs"], &["flat roofing", "new roof", "guttering"], &["roof leak", "slate roof", "chimney repair"]),
            entry("Solar", &["solar panel installers", "solar panels", "solar installation"], &["battery storage", "solar pv"], &["renewable energy", "ev charger"]),
            entry("Plumbing", &["plumber", "emergency plumber", "plumbing services"], &["boiler repair", "bathroom fitting"], &["leak repair", "blocked drain"]),
            entry("Heating", &["heating engineer", "boiler installation", "central heating"], &["boiler service", "heat pump installer"], &["gas safe engineer"]),
            entry("Electrical", &["electrician", "electrical contractor", "emergency electrician"], &["rewiring", "eicr certificate"], &["fuse board", "ev charger installation"]),
            entry("HVAC", &["air conditioning installation", "hvac contractor", "air conditioning repair"], &["ventilation", "heat pumps"], &["commercial air conditioning"]),
            entry("Legal", &["solicitors", "law firm", "lawyers"], &["family law solicitor", "conveyancing solicitor"], &["legal advice", "personal injury claim"]),
            entry("Dental", &["dentist", "dental practice", "private dentist"], &["teeth whitening", "dental implants"], &["emergency dentist", "invisalign"]),
            entry("Accountancy", &["accountants", "accountancy firm", "chartered accountant"], &["bookkeeping services", "tax return help"], &["small business accountant", "payroll services"]),
            entry("Estate Agent", &["estate agents", "letting agents", "property valuation"], &["property management", "houses for sale"], &["sell my house", "landlord services"]),
            entry("Construction", &["builders", "construction company", "building contractor"], &["house extensions", "loft conversions"], &["new build", "renovation"]),
            entry("Landscaping", &["landscaper", "landscape gardener", "garden design"], &["patio installation", "fencing"], &["garden maintenance", "artificial grass"]),
            entry("Cleaning", &["cleaning company", "commercial cleaning", "office cleaning"], &["end of tenancy cleaning", "carpet cleaning"], &["domestic cleaner"]),
            entry("Automotive", &["car garage", "mot centre", "car servicing"], &["car repairs", "tyre fitting"], &["used cars", "car dealership"]),
            entry("Restaurant", &["restaurant", "restaurants near me", "places to eat"], &["private dining", "takeaway"], &["best restaurants", "table booking"]),
            entry("Hotel", &["hotel", "boutique hotel", "hotel accommodation"], &["wedding venue", "conference venue"], &["spa breaks", "bed and breakfast"]),
            entry("Fitness", &["gym", "personal trainer", "fitness classes"], &["yoga classes", "pilates studio"], &["gym membership", "boxing gym"]),
            entry("Beauty", &["beauty salon", "hair salon", "beautician"], &["nail salon", "aesthetics clinic"], &["lash extensions", "spa treatments"]),
            entry("Veterinary", &["vets", "veterinary practice", "emergency vet"], &["pet vaccinations", "dog grooming"], &["pet insurance", "exotic vet"]),
            entry("Healthcare", &["private clinic", "private gp", "physiotherapist"], &["health screening", "sports massage"], &["osteopath", "chiropractor"]),
            entry("Insurance", &["insurance broker", "business insurance", "insurance quotes"], &["commercial insurance", "landlord insurance"], &["life insurance", "public liability insurance"]),
            entry("Financial Services", &["financial adviser", "mortgage broker", "wealth management"], &["pension advice", "investment advice"], &["remortgage", "equity release"]),
            entry("IT Services", &["it support", "managed it services", "it company"], &["cyber security services", "cloud migration"], &["network support", "it consultancy"]),
            entry("Marketing", &["marketing agency", "digital marketing agency", "web design"], &["seo agency", "social media management"], &["ppc management", "branding agency"]),
            entry("Ecommerce", &["online shop", "buy online", "ecommerce store"], &["free delivery", "next day delivery"], &["discount code", "best price"]),
            entry("Manufacturing", &["manufacturer", "manufacturing company", "contract manufacturing"], &["cnc machining", "fabrication"], &["precision engineering", "sheet metal"]),
            entry("Logistics", &["courier services", "logistics company", "freight forwarding"], &["same day courier", "warehousing"], &["haulage", "pallet delivery"]),
            entry("Education", &["tutoring", "private tutor", "training courses"], &["online courses", "exam preparation"], &["gcse tutor", "driving lessons"]),
            entry("Home Improvement", &["home improvements", "kitchen fitters", "bathroom fitters"], &["windows and doors", "conservatories"], &["double glazing", "flooring"]),
            entry("Security", &["security systems", "cctv installation", "alarm installers"], &["security guards", "access control"], &["locksmith", "intruder alarm"]),
        ];
        Self {
            entries,
            fallback: IndustryServices {
                primary_services: strings(&["services", "local services", "professional services"]),
                secondary_services: strings(&["near me"]),
                related_terms: strings(&["reviews", "best"]),
            },
        }
    }

    /// Builds the built-in table with entries from a YAML file merged over it.
    ///
    /// File entries replace built-in entries whose label matches
    /// case-insensitively; new labels are appended.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or contains
    /// an entry with an empty label or no primary services.
    pub fn with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IndustryMapIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let file: IndustryFile = serde_yaml::from_str(&content)?;
        let mut map = Self::builtin();
        for override_entry in file.industries {
            if override_entry.label.trim().is_empty() {
                return Err(ConfigError::IndustryMapValidation(
                    "industry label must not be empty".to_string(),
                ));
            }
            if override_entry
                .services
                .primary_services
                .iter()
                .all(|s| s.trim().is_empty())
            {
                return Err(ConfigError::IndustryMapValidation(format!(
                    "industry '{}' has no primary services",
                    override_entry.label
                )));
            }
            match map
                .entries
                .iter_mut()
                .find(|e| e.label.eq_ignore_ascii_case(override_entry.label.trim()))
            {
                Some(existing) => existing.services = override_entry.services,
                None => map.entries.push(override_entry),
            }
        }
        Ok(map)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a free-text label. Never fails.
    #[must_use]
    pub fn lookup(&self, label: &str) -> &IndustryServices {
        let cleaned = clean_label(label);
        if cleaned.is_empty() {
            return &self.fallback;
        }

        if let Some(e) = self.entries.iter().find(|e| e.label == cleaned) {
            return &e.services;
        }

        let lowered = cleaned.to_lowercase();
        if let Some(e) = self
            .entries
            .iter()
            .find(|e| e.label.to_lowercase() == lowered)
        {
            return &e.services;
        }

        // Longest matching label wins so "Home Improvement" beats a shorter overlap.
        let substring = self
            .entries
            .iter()
            .filter(|e| {
                let key = e.label.to_lowercase();
                lowered.contains(&key) || key.contains(&lowered)
            })
            .max_by_key(|e| e.label.len());
        if let Some(e) = substring {
            return &e.services;
        }

        tracing::debug!(industry = %cleaned, "no industry mapping matched; using generic services");
        &self.fallback
    }
}

fn clean_label(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn exact_match() {
        let s = services_for_industry("Roofing");
        assert_eq!(s.primary_services[0], "roofer");
    }

    #[test]
    fn case_insensitive_match() {
        let s = services_for_industry("dental");
        assert_eq!(s.primary_services[0], "dentist");
    }

    #[test]
    fn substring_match_both_directions() {
        // input contains key
        assert_eq!(services_for_industry("Solar Energy").primary_services[0], "solar panel installers");
        // key contains input
        assert_eq!(services_for_industry("Estate").primary_services[0], "estate agents");
    }

    #[test]
    fn trailing_punctuation_is_stripped() {
        assert_eq!(services_for_industry("  Plumbing.  ").primary_services[0], "plumber");
        assert_eq!(services_for_industry("Legal!!").primary_services[0], "solicitors");
    }

    #[test]
    fn unknown_and_blank_inputs_fall_back() {
        for input in ["", "   ", "...", "Underwater Basket Weaving", "\t\n"] {
            let s = services_for_industry(input);
            assert_eq!(s.primary_services[0], "services", "input {input:?}");
        }
    }

    #[test]
    fn never_returns_empty_primary_services() {
        let map = IndustryMap::builtin();
        let mut inputs: Vec<String> = map.entries.iter().map(|e| e.label.clone()).collect();
        inputs.extend(
            ["", " ", "x", "SOLAR", "it", "a very long unknown industry label", "ß∂ƒ", "!!!"]
                .iter()
                .map(|s| (*s).to_string()),
        );
        for input in inputs {
            assert!(
                !map.lookup(&input).primary_services.is_empty(),
                "empty primary services for {input:?}"
            );
        }
    }

    #[test]
    fn yaml_overrides_replace_and_append() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "industries:\n  - label: roofing\n    primary_services: [roof specialists]\n  - label: Pest Control\n    primary_services: [pest control]\n    related_terms: [wasp nest removal]"
        )
        .unwrap();
        let map = IndustryMap::with_overrides(file.path()).unwrap();
        assert_eq!(map.lookup("Roofing").primary_services, vec!["roof specialists"]);
        assert_eq!(map.lookup("pest control").related_terms, vec!["wasp nest removal"]);
        assert_eq!(map.len(), IndustryMap::builtin().len() + 1);
    }

    #[test]
    fn yaml_override_without_primary_services_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "industries:\n  - label: Empty\n    primary_services: []").unwrap();
        let result = IndustryMap::with_overrides(file.path());
        assert!(matches!(result, Err(ConfigError::IndustryMapValidation(_))));
    }
}
