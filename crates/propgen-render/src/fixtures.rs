//! Sample content shared by renderer tests.

use serde_json::json;

use propgen_core::{calculate_projections, PackageTier, ProposalContent};

pub(crate) fn concise() -> ProposalContent {
    let value = json!({
        "kind": "concise",
        "coverPage": {"companyName": "Acme Roofing", "title": "SEO Growth Proposal", "date": "16 October 2026"},
        "introduction": {"headline": "Leeds homeowners can't find you", "keyPoints": ["Page 3 for 'roofer leeds'"]},
        "competition": {
            "summary": "Three local firms take most clicks.",
            "comparisonTable": [
                {"name": "Acme Roofing", "monthlyTraffic": 180, "isClient": true},
                {"name": "Rival Roofs", "monthlyTraffic": "1,400", "rankingKeywords": 220}
            ],
            "gaps": ["No service-area pages"],
            "opportunity": "Own 'emergency roof repair leeds'."
        },
        "strategy": {
            "approach": "Local-first.",
            "tactics": ["Google Business Profile clean-up", "Service-area pages"],
            "timeline": [{"period": "Months 1-2", "focus": "Foundations"}],
            "outcomes": ["Top three map pack"]
        },
        "investment": {"packageName": "Local SEO", "deliverables": ["15 target keywords", "4 articles per month"]},
        "summary": {"benefits": ["More calls"], "nextSteps": ["Book a kickoff call"], "callToAction": "Let's start."}
    });
    let mut content: ProposalContent =
        serde_json::from_value(value).expect("concise fixture deserializes");
    content.apply_projection(&calculate_projections(180, PackageTier::Local, 1_000));
    content
}

pub(crate) fn detailed() -> ProposalContent {
    let value = json!({
        "kind": "detailed",
        "coverPage": {"companyName": "Northern Solar Ltd", "title": "Search Growth Plan"},
        "executiveSummary": {"overview": "Strong brand, weak search presence.", "keyFindings": ["No blog"], "recommendation": "Regional package"},
        "brutalTruthCallouts": [{"title": "You are invisible", "message": "Competitors take 90% of clicks."}],
        "statisticsCards": [{"value": "12,000", "label": "Monthly searches", "context": "solar panels yorkshire"}],
        "marketOpportunity": {"summary": "Demand is rising.", "searchDemand": ["solar panels leeds"], "growthDrivers": ["Energy prices"]},
        "currentSituation": {"strengths": ["Reviews"], "weaknesses": ["Slow site"], "opportunities": ["Battery storage"], "threats": ["Nationals"]},
        "recommendedStrategy": {"overview": "Three pillars.", "pillars": [{"title": "Technical", "description": "Fix speed", "actions": ["Compress images"]}]},
        "technicalSeo": {"summary": "Speed first.", "tactics": ["Core Web Vitals"]},
        "contentStrategy": {"summary": "Guides.", "topics": ["Grants"], "articlesPerMonth": 8},
        "localSeo": {"summary": "Map pack.", "tactics": ["Citations"]},
        "linkBuilding": {"summary": "Local PR.", "tactics": ["Press releases"]},
        "competitorComparison": [{"name": "SunCo", "monthlyTraffic": 5000, "domainAuthority": 38}],
        "packages": [
            {"name": "Local SEO", "description": "One city"},
            {"name": "Regional SEO", "description": "County wide"},
            {"name": "National SEO", "description": "UK wide"}
        ],
        "nextSteps": ["Sign off", "Kickoff"]
    });
    let mut content: ProposalContent =
        serde_json::from_value(value).expect("detailed fixture deserializes");
    content.apply_projection(&calculate_projections(400, PackageTier::Regional, 2_500));
    content
}
