//! Maps proposal content onto the classic PDF block tree, section by section.

use propgen_core::proposal::{ComparisonRow, ConciseProposal, CoverPage, DetailedProposal};
use propgen_core::text::{format_gbp, format_number};
use propgen_core::ResearchResult;

use super::doc::{Block, Document, Table};
use crate::view::{comparison_rows, competitor_label, opt_number, package_price, RenderContext};

fn cover(doc: &mut Document, cover: &CoverPage, ctx: &RenderContext) {
    let mut meta = Vec::new();
    if !cover.prepared_for.is_empty() {
        meta.push(format!("Prepared for {}", cover.prepared_for));
    }
    let prepared_by = if cover.prepared_by.is_empty() {
        &ctx.agency_name
    } else {
        &cover.prepared_by
    };
    meta.push(format!("Prepared by {prepared_by}"));
    meta.push(if cover.date.is_empty() {
        ctx.date_label.clone()
    } else {
        cover.date.clone()
    });
    if let Some(number) = &ctx.proposal_number {
        meta.push(number.clone());
    }
    doc.push(Block::Cover {
        company: cover.company_name.clone(),
        title: cover.title.clone(),
        subtitle: cover.subtitle.clone(),
        meta,
    });
}

fn comparison(rows: &[ComparisonRow], research: Option<&ResearchResult>) -> Option<Table> {
    let rows = comparison_rows(rows, research);
    if rows.is_empty() {
        return None;
    }
    let mut table = Table::new(&["Business", "Monthly traffic", "Keywords", "Authority", "Notes"])
        .widths(&[2.4, 1.2, 1.1, 1.0, 2.6]);
    for (i, row) in rows.iter().enumerate() {
        if row.is_client {
            table.highlight = Some(i);
        }
        table.push(vec![
            competitor_label(row, research),
            opt_number(row.monthly_traffic),
            opt_number(row.ranking_keywords),
            opt_number(row.domain_authority),
            row.notes.clone(),
        ]);
    }
    Some(table)
}

fn heading(doc: &mut Document, text: &str) {
    doc.push(Block::Heading(text.to_string()));
}

fn subheading(doc: &mut Document, text: &str) {
    doc.push(Block::Subheading(text.to_string()));
}

pub fn detailed(d: &DetailedProposal, research: Option<&ResearchResult>, ctx: &RenderContext) -> Document {
    let mut doc = Document::new(&format!("SEO Proposal: {}", d.cover_page.company_name));
    cover(&mut doc, &d.cover_page, ctx);

    heading(&mut doc, "Executive Summary");
    doc.paragraph(&d.executive_summary.overview);
    if !d.statistics_cards.is_empty() {
        doc.push(Block::Stats(
            d.statistics_cards
                .iter()
                .map(|c| (c.value.clone(), c.label.clone()))
                .collect(),
        ));
    }
    if !d.executive_summary.key_findings.is_empty() {
        subheading(&mut doc, "Key findings");
        doc.bullets(&d.executive_summary.key_findings);
    }
    for callout in &d.brutal_truth_callouts {
        doc.push(Block::Callout {
            title: callout.title.clone(),
            body: callout.message.clone(),
        });
    }
    if !d.executive_summary.recommendation.is_empty() {
        subheading(&mut doc, "Our recommendation");
        doc.paragraph(&d.executive_summary.recommendation);
    }

    heading(&mut doc, "Market Opportunity");
    doc.paragraph(&d.market_opportunity.summary);
    if !d.market_opportunity.search_demand.is_empty() {
        subheading(&mut doc, "Search demand");
        doc.bullets(&d.market_opportunity.search_demand);
    }
    if !d.market_opportunity.growth_drivers.is_empty() {
        subheading(&mut doc, "Growth drivers");
        doc.bullets(&d.market_opportunity.growth_drivers);
    }

    heading(&mut doc, "Where You Stand Today");
    let swot = &d.current_situation;
    for (label, items) in [
        ("Strengths", &swot.strengths),
        ("Weaknesses", &swot.weaknesses),
        ("Opportunities", &swot.opportunities),
        ("Threats", &swot.threats),
    ] {
        if !items.is_empty() {
            subheading(&mut doc, label);
            doc.bullets(items);
        }
    }

    doc.push(Block::PageBreak);
    heading(&mut doc, "Recommended Strategy");
    doc.paragraph(&d.recommended_strategy.overview);
    for pillar in &d.recommended_strategy.pillars {
        subheading(&mut doc, &pillar.title);
        doc.paragraph(&pillar.description);
        doc.bullets(&pillar.actions);
    }

    heading(&mut doc, "How We Will Do It");
    subheading(&mut doc, "Technical SEO");
    doc.paragraph(&d.technical_seo.summary);
    doc.bullets(&d.technical_seo.tactics);
    subheading(&mut doc, "Content Strategy");
    doc.paragraph(&d.content_strategy.summary);
    if let Some(n) = d.content_strategy.articles_per_month.filter(|n| *n > 0) {
        doc.paragraph(&format!("{n} articles per month."));
    }
    doc.bullets(&d.content_strategy.topics);
    if let Some(local) = &d.local_seo {
        subheading(&mut doc, "Local SEO");
        doc.paragraph(&local.summary);
        doc.bullets(&local.tactics);
    }
    subheading(&mut doc, "Link Building");
    doc.paragraph(&d.link_building.summary);
    doc.bullets(&d.link_building.tactics);

    if let Some(table) = comparison(&d.competitor_comparison, research) {
        heading(&mut doc, "Competitor Comparison");
        doc.push(Block::Table(table));
    }

    doc.push(Block::PageBreak);
    heading(&mut doc, "Investment Options");
    for package in &d.packages {
        let title = if package.recommended {
            format!("{} (recommended)", package.name)
        } else {
            package.name.clone()
        };
        subheading(&mut doc, &format!("{title}: {}", package_price(package)));
        doc.paragraph(&package.description);
        doc.bullets(&package.deliverables);
    }

    heading(&mut doc, "Projected Results");
    let p = &d.projections;
    let mut table = Table::new(&["Milestone", "Monthly visitors", "Leads", "Customers", "Revenue"]);
    for (label, snap) in [("Month 6", &p.month_six), ("Month 12", &p.month_twelve)] {
        table.push(vec![
            label.to_string(),
            format_number(snap.traffic),
            format_number(snap.leads),
            format_number(snap.customers),
            format_gbp(snap.revenue),
        ]);
    }
    doc.push(Block::Table(table));
    doc.push(Block::Stats(vec![
        (format_gbp(p.roi.annual_investment), "Annual investment".into()),
        (format_gbp(p.roi.annual_revenue), "Projected annual revenue".into()),
        (format!("{:.1}x", p.roi.roi_multiple), "Return on investment".into()),
    ]));
    doc.paragraph(&p.roi.summary);
    if !d.simple_math.is_empty() {
        subheading(&mut doc, "The simple maths");
        doc.push(Block::Numbered(
            d.simple_math
                .iter()
                .map(|s| format!("{}: {} = {}", s.label, s.calculation, s.result))
                .collect(),
        ));
    }

    heading(&mut doc, "Next Steps");
    doc.push(Block::Numbered(d.next_steps.clone()));
    doc
}

pub fn concise(c: &ConciseProposal, research: Option<&ResearchResult>, ctx: &RenderContext) -> Document {
    let mut doc = Document::new(&format!("SEO Proposal: {}", c.cover_page.company_name));
    cover(&mut doc, &c.cover_page, ctx);

    heading(&mut doc, &c.introduction.headline);
    doc.bullets(&c.introduction.key_points);

    subheading(&mut doc, "Your competition");
    doc.paragraph(&c.competition.summary);
    if let Some(table) = comparison(&c.competition.comparison_table, research) {
        doc.push(Block::Table(table));
    }
    if !c.competition.gaps.is_empty() {
        subheading(&mut doc, "Gaps we found");
        doc.bullets(&c.competition.gaps);
    }
    if !c.competition.opportunity.is_empty() {
        doc.push(Block::Callout {
            title: "The opportunity".into(),
            body: c.competition.opportunity.clone(),
        });
    }

    heading(&mut doc, "The Plan");
    doc.paragraph(&c.strategy.approach);
    doc.bullets(&c.strategy.tactics);
    if !c.strategy.timeline.is_empty() {
        let mut table = Table::new(&["When", "Focus"]).widths(&[1.0, 3.0]);
        for phase in &c.strategy.timeline {
            table.push(vec![phase.period.clone(), phase.focus.clone()]);
        }
        doc.push(Block::Table(table));
    }
    if !c.strategy.outcomes.is_empty() {
        subheading(&mut doc, "What you get");
        doc.bullets(&c.strategy.outcomes);
    }

    heading(&mut doc, "Your Investment");
    let inv = &c.investment;
    let price = inv
        .price()
        .map_or_else(|| "On request".to_string(), |p| format!("{}/month", format_gbp(p)));
    doc.push(Block::Stats(vec![(price, inv.package_name.clone())]));
    doc.bullets(&inv.deliverables);
    if !inv.projected_results.is_empty() {
        let mut table = Table::new(&["Metric", "Today", "Month 6", "Month 12"]);
        for row in &inv.projected_results {
            table.push(vec![
                row.metric.clone(),
                row.current.clone(),
                row.month_six.clone(),
                row.month_twelve.clone(),
            ]);
        }
        doc.push(Block::Table(table));
    }
    doc.paragraph(&inv.roi_summary);

    heading(&mut doc, "Summary");
    doc.bullets(&c.summary.benefits);
    if !c.summary.next_steps.is_empty() {
        subheading(&mut doc, "Next steps");
        doc.push(Block::Numbered(c.summary.next_steps.clone()));
    }
    if !c.summary.call_to_action.is_empty() {
        doc.push(Block::Callout {
            title: "Ready when you are".into(),
            body: c.summary.call_to_action.clone(),
        });
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use propgen_core::ProposalContent;

    fn ctx() -> RenderContext {
        RenderContext::new("Propgen Digital", "16 October 2026")
    }

    #[test]
    fn concise_starts_with_cover_and_prices_from_tier() {
        let ProposalContent::Concise(c) = fixtures::concise() else {
            panic!("fixture is concise");
        };
        let doc = concise(&c, None, &ctx());
        assert!(matches!(&doc.blocks[0], Block::Cover { company, .. } if company == "Acme Roofing"));
        assert!(doc.blocks.iter().any(|b| matches!(
            b,
            Block::Stats(cards) if cards[0].0 == "£2,000/month"
        )));
    }

    #[test]
    fn client_row_is_highlighted() {
        let ProposalContent::Concise(c) = fixtures::concise() else {
            panic!("fixture is concise");
        };
        let doc = concise(&c, None, &ctx());
        let table = doc
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) if t.headers[0] == "Business" => Some(t),
                _ => None,
            })
            .expect("comparison table present");
        assert_eq!(table.highlight, Some(0));
    }

    #[test]
    fn detailed_marks_recommended_package() {
        let ProposalContent::Detailed(d) = fixtures::detailed() else {
            panic!("fixture is detailed");
        };
        let doc = detailed(&d, None, &ctx());
        assert!(doc
            .blocks
            .contains(&Block::Subheading("Regional SEO (recommended): £3,000/month".into())));
        assert!(doc
            .blocks
            .contains(&Block::Subheading("National SEO: £5,000/month".into())));
    }
}
