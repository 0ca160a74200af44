//! Classic-HTML: a printable, page-per-section document with embedded styles.

use propgen_core::proposal::{ConciseProposal, CoverPage, DetailedProposal, PackageOption};
use propgen_core::text::{format_gbp, format_number};
use propgen_core::{ProposalContent, ResearchResult};

use super::{comparison_table, list, paragraph};
use crate::escape::escape_html;
use crate::view::{package_price, RenderContext};

const STYLE: &str = r#"
  * { box-sizing: border-box; }
  body { margin: 0; font-family: "Helvetica Neue", Helvetica, Arial, sans-serif; color: #1f2937; background: #e5e7eb; line-height: 1.5; }
  .page { width: 210mm; min-height: 297mm; margin: 12px auto; padding: 22mm 20mm; background: #ffffff; page-break-after: always; position: relative; }
  .page:last-child { page-break-after: auto; }
  .cover { background: #0f172a; color: #f8fafc; display: flex; flex-direction: column; justify-content: center; }
  .cover h1 { font-size: 34pt; margin: 0 0 8px; color: #ffffff; }
  .cover .subtitle { font-size: 15pt; color: #cbd5e1; }
  .cover .meta { margin-top: 48px; font-size: 11pt; color: #94a3b8; }
  .cover .accent { width: 80px; height: 6px; background: #f97316; margin-bottom: 24px; }
  h2 { font-size: 20pt; color: #0f172a; border-bottom: 3px solid #f97316; padding-bottom: 6px; margin: 0 0 16px; }
  h3 { font-size: 13pt; color: #1e3a8a; margin: 18px 0 6px; }
  p { margin: 0 0 10px; }
  ul.bullets { margin: 0 0 12px; padding-left: 20px; }
  ul.bullets li { margin-bottom: 4px; }
  .callout { border-left: 5px solid #dc2626; background: #fef2f2; padding: 12px 16px; margin: 12px 0; }
  .callout strong { display: block; color: #991b1b; margin-bottom: 4px; }
  .stats { display: flex; gap: 12px; margin: 16px 0; }
  .stat { flex: 1; border: 1px solid #e2e8f0; border-radius: 6px; padding: 12px; text-align: center; }
  .stat .value { font-size: 20pt; font-weight: 700; color: #f97316; }
  .stat .label { font-size: 10pt; font-weight: 600; }
  .stat .context { font-size: 9pt; color: #64748b; }
  .swot { display: grid; grid-template-columns: 1fr 1fr; gap: 12px; }
  .swot > div { border: 1px solid #e2e8f0; border-radius: 6px; padding: 10px 12px; }
  table.data { width: 100%; border-collapse: collapse; margin: 12px 0; font-size: 10pt; }
  table.data th { background: #1e3a8a; color: #ffffff; text-align: left; padding: 6px 8px; }
  table.data td { border-bottom: 1px solid #e2e8f0; padding: 6px 8px; }
  table.data tr:nth-child(even) td { background: #f8fafc; }
  table.data tr.client td { background: #fff7ed; font-weight: 700; }
  .packages { display: flex; gap: 12px; }
  .package { flex: 1; border: 1px solid #e2e8f0; border-radius: 6px; padding: 14px; }
  .package.recommended { border: 2px solid #f97316; }
  .package .price { font-size: 18pt; font-weight: 700; color: #0f172a; }
  .badge { display: inline-block; background: #f97316; color: #ffffff; font-size: 8pt; padding: 2px 8px; border-radius: 10px; }
  .math li { margin-bottom: 6px; }
  .math .calc { color: #64748b; }
  .footer { position: absolute; bottom: 10mm; left: 20mm; right: 20mm; font-size: 8pt; color: #94a3b8; display: flex; justify-content: space-between; }
  @media print { body { background: #ffffff; } .page { margin: 0; } }
"#;

/// Full Classic-HTML document for either content variant.
#[must_use]
pub fn render(
    content: &ProposalContent,
    research: Option<&ResearchResult>,
    ctx: &RenderContext,
) -> String {
    let (title, pages) = match content {
        ProposalContent::Detailed(d) => (&d.cover_page.company_name, detailed_pages(d, research, ctx)),
        ProposalContent::Concise(c) => (&c.cover_page.company_name, concise_pages(c, research, ctx)),
    };
    document(title, &pages)
}

fn document(company: &str, pages: &[String]) -> String {
    let mut out = String::with_capacity(32 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en-GB\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>SEO Proposal for {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape_html(company)
    ));
    for page in pages {
        out.push_str(page);
        out.push('\n');
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn page(class: &str, body: &str, ctx: &RenderContext) -> String {
    format!(
        "<div class=\"page {class}\">{body}<div class=\"footer\"><span>{}</span><span>{}</span></div></div>",
        escape_html(&ctx.agency_name),
        escape_html(&ctx.reference_line()),
    )
}

fn section(heading: &str, body: &str, ctx: &RenderContext) -> String {
    page("", &format!("<h2>{}</h2>{body}", escape_html(heading)), ctx)
}

fn cover(cover: &CoverPage, ctx: &RenderContext) -> String {
    let prepared_by = if cover.prepared_by.is_empty() {
        &ctx.agency_name
    } else {
        &cover.prepared_by
    };
    let date = if cover.date.is_empty() {
        &ctx.date_label
    } else {
        &cover.date
    };
    let mut body = String::from("<div class=\"accent\"></div>");
    body.push_str(&format!("<h1>{}</h1>", escape_html(&cover.company_name)));
    body.push_str(&format!("<div class=\"subtitle\">{}</div>", escape_html(&cover.title)));
    body.push_str(&paragraph(&cover.subtitle, "subtitle"));
    body.push_str("<div class=\"meta\">");
    if !cover.prepared_for.is_empty() {
        body.push_str(&format!("Prepared for {}<br>", escape_html(&cover.prepared_for)));
    }
    body.push_str(&format!(
        "Prepared by {}<br>{}",
        escape_html(prepared_by),
        escape_html(date)
    ));
    if let Some(number) = &ctx.proposal_number {
        body.push_str(&format!("<br>{}", escape_html(number)));
    }
    body.push_str("</div>");
    format!("<div class=\"page cover\">{body}</div>")
}

fn package_card(package: &PackageOption) -> String {
    let class = if package.recommended {
        "package recommended"
    } else {
        "package"
    };
    let badge = if package.recommended {
        "<span class=\"badge\">Recommended</span>"
    } else {
        ""
    };
    format!(
        "<div class=\"{class}\">{badge}<h3>{}</h3><div class=\"price\">{}</div>{}{}</div>",
        escape_html(&package.name),
        escape_html(&package_price(package)),
        paragraph(&package.description, ""),
        list(&package.deliverables, "bullets"),
    )
}

fn detailed_pages(
    d: &DetailedProposal,
    research: Option<&ResearchResult>,
    ctx: &RenderContext,
) -> Vec<String> {
    let mut pages = vec![cover(&d.cover_page, ctx)];

    let mut body = paragraph(&d.executive_summary.overview, "");
    if !d.executive_summary.key_findings.is_empty() {
        body.push_str("<h3>Key findings</h3>");
        body.push_str(&list(&d.executive_summary.key_findings, "bullets"));
    }
    for callout in &d.brutal_truth_callouts {
        body.push_str(&format!(
            "<div class=\"callout\"><strong>{}</strong>{}</div>",
            escape_html(&callout.title),
            escape_html(&callout.message)
        ));
    }
    if !d.statistics_cards.is_empty() {
        body.push_str("<div class=\"stats\">");
        for card in &d.statistics_cards {
            body.push_str(&format!(
                "<div class=\"stat\"><div class=\"value\">{}</div><div class=\"label\">{}</div><div class=\"context\">{}</div></div>",
                escape_html(&card.value),
                escape_html(&card.label),
                escape_html(&card.context)
            ));
        }
        body.push_str("</div>");
    }
    if !d.executive_summary.recommendation.is_empty() {
        body.push_str("<h3>Our recommendation</h3>");
        body.push_str(&paragraph(&d.executive_summary.recommendation, ""));
    }
    pages.push(section("Executive Summary", &body, ctx));

    let market = &d.market_opportunity;
    let mut body = paragraph(&market.summary, "");
    if !market.search_demand.is_empty() {
        body.push_str("<h3>Search demand</h3>");
        body.push_str(&list(&market.search_demand, "bullets"));
    }
    if !market.growth_drivers.is_empty() {
        body.push_str("<h3>Growth drivers</h3>");
        body.push_str(&list(&market.growth_drivers, "bullets"));
    }
    let swot = &d.current_situation;
    body.push_str("<h3>Where you stand today</h3><div class=\"swot\">");
    for (label, items) in [
        ("Strengths", &swot.strengths),
        ("Weaknesses", &swot.weaknesses),
        ("Opportunities", &swot.opportunities),
        ("Threats", &swot.threats),
    ] {
        body.push_str(&format!("<div><h3>{label}</h3>{}</div>", list(items, "bullets")));
    }
    body.push_str("</div>");
    pages.push(section("Market Opportunity", &body, ctx));

    let mut body = paragraph(&d.recommended_strategy.overview, "");
    for pillar in &d.recommended_strategy.pillars {
        body.push_str(&format!("<h3>{}</h3>", escape_html(&pillar.title)));
        body.push_str(&paragraph(&pillar.description, ""));
        body.push_str(&list(&pillar.actions, "bullets"));
    }
    pages.push(section("Recommended Strategy", &body, ctx));

    let mut body = String::new();
    let mut tactic = |heading: &str, summary: &str, items: &[String]| {
        body.push_str(&format!("<h3>{}</h3>", escape_html(heading)));
        body.push_str(&paragraph(summary, ""));
        body.push_str(&list(items, "bullets"));
    };
    tactic("Technical SEO", &d.technical_seo.summary, &d.technical_seo.tactics);
    let content_summary = match d.content_strategy.articles_per_month {
        Some(n) if n > 0 => format!("{} ({n} articles per month)", d.content_strategy.summary),
        _ => d.content_strategy.summary.clone(),
    };
    tactic("Content Strategy", &content_summary, &d.content_strategy.topics);
    if let Some(local) = &d.local_seo {
        tactic("Local SEO", &local.summary, &local.tactics);
    }
    tactic("Link Building", &d.link_building.summary, &d.link_building.tactics);
    pages.push(section("How We Will Do It", &body, ctx));

    let table = comparison_table(&d.competitor_comparison, research, "data", "client");
    if !table.is_empty() {
        pages.push(section("Competitor Comparison", &table, ctx));
    }

    let mut body = String::from("<div class=\"packages\">");
    for package in &d.packages {
        body.push_str(&package_card(package));
    }
    body.push_str("</div>");
    pages.push(section("Investment Options", &body, ctx));

    let p = &d.projections;
    let mut body = String::from(
        "<table class=\"data\"><thead><tr><th>Milestone</th><th>Monthly visitors</th><th>Leads</th>\
         <th>Customers</th><th>Revenue</th></tr></thead><tbody>",
    );
    for (label, snap) in [("Month 6", &p.month_six), ("Month 12", &p.month_twelve)] {
        body.push_str(&format!(
            "<tr><td>{label}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            format_number(snap.traffic),
            format_number(snap.leads),
            format_number(snap.customers),
            format_gbp(snap.revenue)
        ));
    }
    body.push_str("</tbody></table>");
    body.push_str(&format!(
        "<div class=\"stats\"><div class=\"stat\"><div class=\"value\">{}</div><div class=\"label\">Annual investment</div></div>\
         <div class=\"stat\"><div class=\"value\">{}</div><div class=\"label\">Projected annual revenue</div></div>\
         <div class=\"stat\"><div class=\"value\">{:.1}x</div><div class=\"label\">Return on investment</div></div></div>",
        format_gbp(p.roi.annual_investment),
        format_gbp(p.roi.annual_revenue),
        p.roi.roi_multiple
    ));
    body.push_str(&paragraph(&p.roi.summary, ""));
    if !d.simple_math.is_empty() {
        body.push_str("<h3>The simple maths</h3><ol class=\"math\">");
        for step in &d.simple_math {
            body.push_str(&format!(
                "<li><strong>{}</strong> <span class=\"calc\">{}</span> = {}</li>",
                escape_html(&step.label),
                escape_html(&step.calculation),
                escape_html(&step.result)
            ));
        }
        body.push_str("</ol>");
    }
    pages.push(section("Projected Results", &body, ctx));

    pages.push(section("Next Steps", &list(&d.next_steps, "bullets"), ctx));
    pages
}

fn concise_pages(
    c: &ConciseProposal,
    research: Option<&ResearchResult>,
    ctx: &RenderContext,
) -> Vec<String> {
    let mut pages = vec![cover(&c.cover_page, ctx)];

    let mut body = format!("<h3>{}</h3>", escape_html(&c.introduction.headline));
    body.push_str(&list(&c.introduction.key_points, "bullets"));
    body.push_str("<h3>Your competition</h3>");
    body.push_str(&paragraph(&c.competition.summary, ""));
    body.push_str(&comparison_table(
        &c.competition.comparison_table,
        research,
        "data",
        "client",
    ));
    if !c.competition.gaps.is_empty() {
        body.push_str("<h3>Gaps we found</h3>");
        body.push_str(&list(&c.competition.gaps, "bullets"));
    }
    if !c.competition.opportunity.is_empty() {
        body.push_str(&format!(
            "<div class=\"callout\"><strong>The opportunity</strong>{}</div>",
            escape_html(&c.competition.opportunity)
        ));
    }
    pages.push(section("Where You Are Now", &body, ctx));

    let s = &c.strategy;
    let mut body = paragraph(&s.approach, "");
    body.push_str(&list(&s.tactics, "bullets"));
    if !s.timeline.is_empty() {
        body.push_str(
            "<table class=\"data\"><thead><tr><th>When</th><th>Focus</th></tr></thead><tbody>",
        );
        for phase in &s.timeline {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&phase.period),
                escape_html(&phase.focus)
            ));
        }
        body.push_str("</tbody></table>");
    }
    if !s.outcomes.is_empty() {
        body.push_str("<h3>What you get</h3>");
        body.push_str(&list(&s.outcomes, "bullets"));
    }
    pages.push(section("The Plan", &body, ctx));

    let inv = &c.investment;
    let price = inv
        .price()
        .map_or_else(|| "On request".to_string(), |p| format!("{}/month", format_gbp(p)));
    let mut body = format!(
        "<div class=\"package recommended\"><h3>{}</h3><div class=\"price\">{}</div>{}</div>",
        escape_html(&inv.package_name),
        escape_html(&price),
        list(&inv.deliverables, "bullets")
    );
    if !inv.projected_results.is_empty() {
        body.push_str(
            "<table class=\"data\"><thead><tr><th>Metric</th><th>Today</th><th>Month 6</th>\
             <th>Month 12</th></tr></thead><tbody>",
        );
        for row in &inv.projected_results {
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&row.metric),
                escape_html(&row.current),
                escape_html(&row.month_six),
                escape_html(&row.month_twelve)
            ));
        }
        body.push_str("</tbody></table>");
    }
    body.push_str(&paragraph(&inv.roi_summary, ""));
    pages.push(section("Your Investment", &body, ctx));

    let mut body = list(&c.summary.benefits, "bullets");
    if !c.summary.next_steps.is_empty() {
        body.push_str("<h3>Next steps</h3>");
        body.push_str(&list(&c.summary.next_steps, "bullets"));
    }
    if !c.summary.call_to_action.is_empty() {
        body.push_str(&format!(
            "<div class=\"callout\"><strong>{}</strong></div>",
            escape_html(&c.summary.call_to_action)
        ));
    }
    pages.push(section("Summary", &body, ctx));
    pages
}

#[cfg(test)]
#[path = "classic_test.rs"]
mod tests;
