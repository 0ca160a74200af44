//! External data research: what the search engine actually shows.
//!
//! Queries are built from the industry's service terms and the prospect's
//! location ("roofer Leeds"), never from the prospect's own brand name, so
//! the results show who really competes for the work.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;

use propgen_core::research::{
    domain_of, DiscoveredCompetitor, KeywordPosition, LocationOpportunity,
};
use propgen_core::text::primary_city;
use propgen_core::{EnhancedResearch, IndustryMap, ResearchRequest};

use crate::error::ResearchError;
use crate::search::{SearchProvider, SearchQuery, SearchResults};

const MAX_COMPETITORS: usize = 10;
const MAX_CONTENT_GAPS: usize = 10;
const MAX_EXTRA_LOCATIONS: usize = 3;

/// Directories, marketplaces and social platforms that rank for everything
/// and are not real competitors.
const DIRECTORY_DOMAINS: &[&str] = &[
    "yell.com",
    "checkatrade.com",
    "trustatrader.com",
    "mybuilder.com",
    "ratedpeople.com",
    "trustpilot.com",
    "facebook.com",
    "yelp.com",
    "yelp.co.uk",
    "bark.com",
    "linkedin.com",
    "wikipedia.org",
    "youtube.com",
    "instagram.com",
    "twitter.com",
    "x.com",
    "tiktok.com",
    "pinterest.com",
    "reddit.com",
    "amazon.co.uk",
    "amazon.com",
    "gov.uk",
    "nhs.uk",
    "thomsonlocal.com",
    "freeindex.co.uk",
    "cylex-uk.co.uk",
    "hotfrog.co.uk",
    "scoot.co.uk",
    "192.com",
    "tripadvisor.co.uk",
    "tripadvisor.com",
    "houzz.co.uk",
    "which.co.uk",
    "google.com",
    "indeed.com",
    "companieshouse.gov.uk",
];

/// Location tokens that name a country, not a searchable place.
const COUNTRY_TOKENS: &[&str] = &[
    "uk",
    "united kingdom",
    "england",
    "scotland",
    "wales",
    "northern ireland",
    "gb",
    "great britain",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueryKind {
    Service,
    Location,
}

#[derive(Debug, Clone)]
struct PlannedQuery {
    kind: QueryKind,
    keyword: String,
    location: String,
}

pub struct EnhancedResearchAgent {
    search: Arc<dyn SearchProvider>,
    industries: Arc<IndustryMap>,
}

impl EnhancedResearchAgent {
    #[must_use]
    pub fn new(search: Arc<dyn SearchProvider>, industries: Arc<IndustryMap>) -> Self {
        Self { search, industries }
    }

    /// Runs every planned query concurrently and distils the results.
    ///
    /// # Errors
    ///
    /// Returns [`ResearchError::Search`] if any query fails after retries.
    /// No partial result is produced.
    pub async fn conduct_enhanced_research(
        &self,
        request: &ResearchRequest,
    ) -> Result<EnhancedResearch, ResearchError> {
        let plan = self.plan_queries(request);
        tracing::info!(
            company = %request.company_name,
            queries = plan.len(),
            tier = %request.tier,
            "running search queries"
        );

        let searches = plan.iter().map(|q| {
            let query = SearchQuery {
                query: q.keyword.clone(),
                location: q.location.clone(),
            };
            let search = Arc::clone(&self.search);
            async move { search.search(&query).await }
        });
        let results = try_join_all(searches).await?;

        Ok(distil(request, &plan, &results))
    }

    fn plan_queries(&self, request: &ResearchRequest) -> Vec<PlannedQuery> {
        let services = self.industries.lookup(&request.industry);
        let locations = search_locations(&request.location);
        let home = locations
            .first()
            .cloned()
            .unwrap_or_else(|| request.location.trim().to_string());

        let mut plan: Vec<PlannedQuery> = services
            .primary_services
            .iter()
            .chain(services.secondary_services.iter())
            .take(request.tier.search_queries())
            .map(|service| PlannedQuery {
                kind: QueryKind::Service,
                keyword: query_text(service, &home),
                location: request.location.trim().to_string(),
            })
            .collect();

        if let Some(top) = services.primary_services.first() {
            for extra in locations.iter().skip(1).take(MAX_EXTRA_LOCATIONS) {
                plan.push(PlannedQuery {
                    kind: QueryKind::Location,
                    keyword: query_text(top, extra),
                    location: extra.clone(),
                });
            }
        }
        plan
    }
}

fn query_text(service: &str, location: &str) -> String {
    if location.is_empty() {
        service.to_string()
    } else {
        format!("{service} {location}")
    }
}

/// Distinct place names in a free-text location, country tokens removed.
fn search_locations(location: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in location.split([',', ';', '/', '&']).map(str::trim) {
        if part.is_empty() || COUNTRY_TOKENS.contains(&part.to_lowercase().as_str()) {
            continue;
        }
        if !out.iter().any(|p| p.eq_ignore_ascii_case(part)) {
            out.push(part.to_string());
        }
    }
    if out.is_empty() {
        let city = primary_city(location);
        if !city.is_empty() {
            out.push(city);
        }
    }
    out
}

/// True for directory domains and their subdomains.
fn is_directory(domain: &str) -> bool {
    DIRECTORY_DOMAINS
        .iter()
        .any(|d| domain == *d || domain.ends_with(&format!(".{d}")))
}

/// Monthly-volume bucket inferred from the engine's total-results count.
fn estimated_volume(total_results: Option<u64>) -> u64 {
    match total_results.unwrap_or(0) {
        0 => 0,
        1..=99_999 => 50,
        100_000..=999_999 => 150,
        1_000_000..=9_999_999 => 500,
        10_000_000..=99_999_999 => 1_500,
        _ => 5_000,
    }
}

fn competition_level(business_domains: usize) -> &'static str {
    match business_domains {
        0..=3 => "low",
        4..=6 => "medium",
        _ => "high",
    }
}

/// Readable name from a result title ("Acme Roofing | Roofers in Leeds" → "Acme Roofing").
fn name_from_title(title: &str, domain: &str) -> String {
    title
        .split(['|', '-', '–', ':'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map_or_else(|| domain.to_string(), str::to_string)
}

fn distil(
    request: &ResearchRequest,
    plan: &[PlannedQuery],
    results: &[SearchResults],
) -> EnhancedResearch {
    let client_domain = request.domain();
    let is_client = |domain: &str| {
        client_domain
            .as_deref()
            .is_some_and(|c| domain == c || domain.ends_with(&format!(".{c}")))
    };

    let mut keyword_data = Vec::new();
    let mut location_opportunities = Vec::new();
    let mut competitors: HashMap<String, DiscoveredCompetitor> = HashMap::new();
    let mut content_gaps: Vec<String> = Vec::new();

    for (planned, result) in plan.iter().zip(results) {
        let domains: Vec<String> = result
            .organic
            .iter()
            .filter_map(|r| domain_of(&r.link))
            .collect();

        let client_position = result
            .organic
            .iter()
            .find(|r| domain_of(&r.link).is_some_and(|d| is_client(&d)))
            .map(|r| r.position);

        let volume = estimated_volume(result.total_results);
        let business_domains = domains
            .iter()
            .filter(|d| !is_directory(d) && !is_client(d))
            .count();

        keyword_data.push(KeywordPosition {
            keyword: planned.keyword.clone(),
            location: planned.location.clone(),
            client_position,
            estimated_volume: volume,
            top_domains: domains.clone(),
        });

        if planned.kind == QueryKind::Location {
            location_opportunities.push(LocationOpportunity {
                location: planned.location.clone(),
                query: planned.keyword.clone(),
                estimated_volume: volume,
                competition: competition_level(business_domains).to_string(),
            });
        }

        for organic in &result.organic {
            let Some(domain) = domain_of(&organic.link) else {
                continue;
            };
            if is_directory(&domain) || is_client(&domain) {
                continue;
            }
            competitors
                .entry(domain.clone())
                .and_modify(|c| {
                    c.appearances += 1;
                    c.best_position = c.best_position.min(organic.position);
                })
                .or_insert_with(|| DiscoveredCompetitor {
                    name: name_from_title(&organic.title, &domain),
                    domain,
                    best_position: organic.position,
                    appearances: 1,
                    sample_url: organic.link.clone(),
                });
        }

        for question in &result.related_questions {
            if content_gaps.len() < MAX_CONTENT_GAPS
                && !content_gaps.iter().any(|q| q.eq_ignore_ascii_case(question))
            {
                content_gaps.push(question.clone());
            }
        }
    }

    // The home location is itself an opportunity when no extra places were given.
    if location_opportunities.is_empty() {
        if let (Some(planned), Some(first)) = (plan.first(), keyword_data.first()) {
            let business = first
                .top_domains
                .iter()
                .filter(|d| !is_directory(d) && !is_client(d))
                .count();
            location_opportunities.push(LocationOpportunity {
                location: planned.location.clone(),
                query: planned.keyword.clone(),
                estimated_volume: first.estimated_volume,
                competition: competition_level(business).to_string(),
            });
        }
    }

    let mut competitors: Vec<DiscoveredCompetitor> = competitors.into_values().collect();
    competitors.sort_by(|a, b| {
        b.appearances
            .cmp(&a.appearances)
            .then(a.best_position.cmp(&b.best_position))
            .then_with(|| a.domain.cmp(&b.domain))
    });
    competitors.truncate(MAX_COMPETITORS);

    EnhancedResearch {
        keyword_data,
        competitors,
        location_opportunities,
        content_gaps,
        queries_run: u32::try_from(plan.len()).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
#[path = "enhanced_test.rs"]
mod tests;
