//! Modern-HTML: a responsive, screen-share oriented document built on the
//! Tailwind CDN build, with gradient accents, video testimonials and
//! scroll-reveal animations.

use propgen_core::proposal::{ConciseProposal, CoverPage, DetailedProposal, PackageOption};
use propgen_core::text::{format_gbp, format_number};
use propgen_core::{ProposalContent, ResearchResult};

use super::{comparison_table, list, paragraph};
use crate::escape::escape_html;
use crate::view::{package_price, RenderContext, Testimonial};

pub const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";
const MAX_TESTIMONIALS: usize = 3;

const HEAD_EXTRA: &str = r#"<style>
  .reveal { opacity: 0; transform: translateY(24px); transition: opacity .6s ease-out, transform .6s ease-out; }
  .reveal.visible { opacity: 1; transform: none; }
  .gradient-hero { background: linear-gradient(135deg, #0f172a 0%, #1e3a8a 55%, #f97316 140%); }
  .gradient-text { background: linear-gradient(90deg, #f97316, #facc15); -webkit-background-clip: text; background-clip: text; color: transparent; }
  ul.bullets { list-style: none; padding: 0; }
  ul.bullets li { padding-left: 1.5rem; position: relative; margin-bottom: .5rem; }
  ul.bullets li::before { content: "\2713"; position: absolute; left: 0; color: #f97316; font-weight: 700; }
  table.cmp { width: 100%; border-collapse: collapse; }
  table.cmp th { text-align: left; padding: .75rem; background: #0f172a; color: #fff; font-weight: 600; }
  table.cmp td { padding: .75rem; border-bottom: 1px solid #e2e8f0; }
  table.cmp tr.client td { background: #fff7ed; font-weight: 700; }
</style>"#;

const REVEAL_SCRIPT: &str = r"<script>
  (function () {
    var items = document.querySelectorAll('.reveal');
    if (!('IntersectionObserver' in window)) {
      items.forEach(function (el) { el.classList.add('visible'); });
      return;
    }
    var observer = new IntersectionObserver(function (entries) {
      entries.forEach(function (entry) {
        if (entry.isIntersecting) {
          entry.target.classList.add('visible');
          observer.unobserve(entry.target);
        }
      });
    }, { threshold: 0.12 });
    items.forEach(function (el) { observer.observe(el); });
  })();
</script>";

/// Full Modern-HTML document for either content variant.
#[must_use]
pub fn render(
    content: &ProposalContent,
    research: Option<&ResearchResult>,
    ctx: &RenderContext,
) -> String {
    let (cover_page, sections) = match content {
        ProposalContent::Detailed(d) => (&d.cover_page, detailed_sections(d, research)),
        ProposalContent::Concise(c) => (&c.cover_page, concise_sections(c, research)),
    };

    let mut out = String::with_capacity(48 * 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en-GB\" class=\"scroll-smooth\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    out.push_str(&format!(
        "<title>{} | SEO Proposal</title>\n<script src=\"{TAILWIND_CDN}\"></script>\n{HEAD_EXTRA}\n</head>\n",
        escape_html(&cover_page.company_name)
    ));
    out.push_str("<body class=\"bg-slate-50 text-slate-800 antialiased\">\n");
    out.push_str(&hero(cover_page, ctx));
    out.push_str("<main class=\"max-w-5xl mx-auto px-6 py-16 space-y-20\">\n");
    for section in &sections {
        out.push_str(section);
        out.push('\n');
    }
    out.push_str(&testimonials(&ctx.testimonials));
    out.push_str("</main>\n");
    out.push_str(&format!(
        "<footer class=\"py-10 text-center text-sm text-slate-400\">{} &middot; {}</footer>\n",
        escape_html(&ctx.agency_name),
        escape_html(&ctx.reference_line())
    ));
    out.push_str(REVEAL_SCRIPT);
    out.push_str("\n</body>\n</html>\n");
    out
}

fn hero(cover: &CoverPage, ctx: &RenderContext) -> String {
    let date = if cover.date.is_empty() {
        &ctx.date_label
    } else {
        &cover.date
    };
    format!(
        "<header class=\"gradient-hero text-white\"><div class=\"max-w-5xl mx-auto px-6 py-28\">\
         <p class=\"uppercase tracking-widest text-orange-300 text-sm mb-4\">{}</p>\
         <h1 class=\"text-5xl md:text-6xl font-extrabold mb-6\">{}</h1>\
         <p class=\"text-xl text-slate-200 max-w-2xl\">{}</p>\
         <p class=\"mt-10 text-slate-300\">{} &middot; {}</p></div></header>\n",
        escape_html(&cover.title),
        escape_html(&cover.company_name),
        escape_html(&cover.subtitle),
        escape_html(&ctx.agency_name),
        escape_html(date),
    )
}

fn block(id: &str, eyebrow: &str, heading: &str, body: &str) -> String {
    format!(
        "<section id=\"{id}\" class=\"reveal\"><p class=\"gradient-text font-bold uppercase tracking-wider text-sm\">{}</p>\
         <h2 class=\"text-3xl font-bold text-slate-900 mt-2 mb-6\">{}</h2>{body}</section>",
        escape_html(eyebrow),
        escape_html(heading),
    )
}

fn card(inner: &str) -> String {
    format!("<div class=\"bg-white rounded-2xl shadow-sm ring-1 ring-slate-200 p-6\">{inner}</div>")
}

fn stat(value: &str, label: &str) -> String {
    card(&format!(
        "<div class=\"text-4xl font-extrabold gradient-text\">{}</div><div class=\"mt-2 text-slate-500\">{}</div>",
        escape_html(value),
        escape_html(label)
    ))
}

fn package_card(package: &PackageOption) -> String {
    let ring = if package.recommended {
        "ring-2 ring-orange-500 scale-105"
    } else {
        "ring-1 ring-slate-200"
    };
    let badge = if package.recommended {
        "<span class=\"inline-block bg-orange-500 text-white text-xs font-semibold px-3 py-1 rounded-full mb-3\">Recommended</span>"
    } else {
        ""
    };
    format!(
        "<div class=\"bg-white rounded-2xl shadow-sm {ring} p-6\">{badge}<h3 class=\"text-xl font-bold\">{}</h3>\
         <div class=\"text-3xl font-extrabold my-3\">{}</div>{}{}</div>",
        escape_html(&package.name),
        escape_html(&package_price(package)),
        paragraph(&package.description, "text-slate-500 mb-4"),
        list(&package.deliverables, "bullets"),
    )
}

fn testimonials(items: &[Testimonial]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut body = String::from("<div class=\"grid md:grid-cols-3 gap-6\">");
    for t in items.iter().take(MAX_TESTIMONIALS) {
        body.push_str(&card(&format!(
            "<div class=\"aspect-video mb-4\"><iframe class=\"w-full h-full rounded-xl\" src=\"{}\" title=\"{}\" \
             loading=\"lazy\" allow=\"encrypted-media; picture-in-picture\" allowfullscreen></iframe></div>\
             <blockquote class=\"italic text-slate-600\">&ldquo;{}&rdquo;</blockquote>\
             <p class=\"mt-3 font-semibold\">{}</p>",
            escape_html(&t.video_url),
            escape_html(&t.client),
            escape_html(&t.quote),
            escape_html(&t.client),
        )));
    }
    body.push_str("</div>");
    block("testimonials", "Proof", "Hear it from our clients", &body)
}

fn detailed_sections(d: &DetailedProposal, research: Option<&ResearchResult>) -> Vec<String> {
    let mut sections = Vec::new();

    let mut body = paragraph(&d.executive_summary.overview, "text-lg leading-relaxed mb-6");
    if !d.statistics_cards.is_empty() {
        body.push_str("<div class=\"grid md:grid-cols-3 gap-6 my-8\">");
        for s in &d.statistics_cards {
            body.push_str(&card(&format!(
                "<div class=\"text-4xl font-extrabold gradient-text\">{}</div><div class=\"mt-2 font-semibold\">{}</div>\
                 <div class=\"text-sm text-slate-500\">{}</div>",
                escape_html(&s.value),
                escape_html(&s.label),
                escape_html(&s.context)
            )));
        }
        body.push_str("</div>");
    }
    body.push_str(&list(&d.executive_summary.key_findings, "bullets"));
    for callout in &d.brutal_truth_callouts {
        body.push_str(&format!(
            "<div class=\"my-6 rounded-2xl bg-gradient-to-r from-red-600 to-orange-500 text-white p-6\">\
             <h3 class=\"text-xl font-bold mb-2\">{}</h3><p>{}</p></div>",
            escape_html(&callout.title),
            escape_html(&callout.message)
        ));
    }
    body.push_str(&paragraph(&d.executive_summary.recommendation, "text-lg font-semibold"));
    sections.push(block("summary", "The short version", "Executive Summary", &body));

    let m = &d.market_opportunity;
    let mut body = paragraph(&m.summary, "text-lg mb-6");
    body.push_str("<div class=\"grid md:grid-cols-2 gap-6\">");
    body.push_str(&card(&format!(
        "<h3 class=\"font-bold mb-3\">Search demand</h3>{}",
        list(&m.search_demand, "bullets")
    )));
    body.push_str(&card(&format!(
        "<h3 class=\"font-bold mb-3\">Growth drivers</h3>{}",
        list(&m.growth_drivers, "bullets")
    )));
    body.push_str("</div><div class=\"grid md:grid-cols-2 gap-6 mt-6\">");
    let swot = &d.current_situation;
    for (label, items) in [
        ("Strengths", &swot.strengths),
        ("Weaknesses", &swot.weaknesses),
        ("Opportunities", &swot.opportunities),
        ("Threats", &swot.threats),
    ] {
        body.push_str(&card(&format!(
            "<h3 class=\"font-bold mb-3\">{label}</h3>{}",
            list(items, "bullets")
        )));
    }
    body.push_str("</div>");
    sections.push(block("market", "The opportunity", "Market Opportunity", &body));

    let mut body = paragraph(&d.recommended_strategy.overview, "text-lg mb-6");
    body.push_str("<div class=\"grid md:grid-cols-3 gap-6\">");
    for pillar in &d.recommended_strategy.pillars {
        body.push_str(&card(&format!(
            "<h3 class=\"text-xl font-bold mb-2\">{}</h3>{}{}",
            escape_html(&pillar.title),
            paragraph(&pillar.description, "text-slate-600 mb-3"),
            list(&pillar.actions, "bullets")
        )));
    }
    body.push_str("</div><div class=\"grid md:grid-cols-2 gap-6 mt-6\">");
    let mut tactics = vec![
        ("Technical SEO", &d.technical_seo.summary, &d.technical_seo.tactics),
        ("Content", &d.content_strategy.summary, &d.content_strategy.topics),
    ];
    if let Some(local) = &d.local_seo {
        tactics.push(("Local SEO", &local.summary, &local.tactics));
    }
    tactics.push(("Link Building", &d.link_building.summary, &d.link_building.tactics));
    for (title, summary, items) in tactics {
        body.push_str(&card(&format!(
            "<h3 class=\"font-bold mb-2\">{title}</h3>{}{}",
            paragraph(summary, "text-slate-600 mb-3"),
            list(items, "bullets")
        )));
    }
    body.push_str("</div>");
    sections.push(block("strategy", "The plan", "Recommended Strategy", &body));

    let table = comparison_table(&d.competitor_comparison, research, "cmp", "client");
    if !table.is_empty() {
        sections.push(block(
            "competitors",
            "Who you are up against",
            "Competitor Comparison",
            &card(&table),
        ));
    }

    let mut body = String::from("<div class=\"grid md:grid-cols-3 gap-6 items-center\">");
    for package in &d.packages {
        body.push_str(&package_card(package));
    }
    body.push_str("</div>");
    sections.push(block("packages", "Investment", "Choose Your Package", &body));

    let p = &d.projections;
    let mut body = String::from("<div class=\"grid md:grid-cols-4 gap-6\">");
    body.push_str(&stat(&format_number(p.month_twelve.traffic), "Monthly visitors by month 12"));
    body.push_str(&stat(&format_number(p.month_twelve.leads), "Monthly leads"));
    body.push_str(&stat(&format_gbp(p.roi.annual_revenue), "Projected annual revenue"));
    body.push_str(&stat(&format!("{:.1}x", p.roi.roi_multiple), "Return on investment"));
    body.push_str("</div>");
    if !d.simple_math.is_empty() {
        body.push_str("<ol class=\"mt-8 space-y-3\">");
        for (i, step) in d.simple_math.iter().enumerate() {
            body.push_str(&format!(
                "<li class=\"flex gap-4\"><span class=\"shrink-0 w-8 h-8 rounded-full bg-orange-500 text-white grid place-items-center font-bold\">{}</span>\
                 <span><strong>{}</strong> <span class=\"text-slate-500\">{}</span> = <strong>{}</strong></span></li>",
                i + 1,
                escape_html(&step.label),
                escape_html(&step.calculation),
                escape_html(&step.result)
            ));
        }
        body.push_str("</ol>");
    }
    sections.push(block("projections", "The numbers", "Projected Results", &body));

    sections.push(block(
        "next-steps",
        "Let's go",
        "Next Steps",
        &card(&list(&d.next_steps, "bullets")),
    ));
    sections
}

fn concise_sections(c: &ConciseProposal, research: Option<&ResearchResult>) -> Vec<String> {
    let mut sections = Vec::new();

    let mut body = format!(
        "<p class=\"text-2xl font-semibold mb-6\">{}</p>",
        escape_html(&c.introduction.headline)
    );
    body.push_str(&list(&c.introduction.key_points, "bullets"));
    sections.push(block("introduction", "Why we're talking", "The Situation", &body));

    let comp = &c.competition;
    let mut body = paragraph(&comp.summary, "text-lg mb-6");
    body.push_str(&card(&comparison_table(
        &comp.comparison_table,
        research,
        "cmp",
        "client",
    )));
    body.push_str("<div class=\"grid md:grid-cols-2 gap-6 mt-6\">");
    body.push_str(&card(&format!(
        "<h3 class=\"font-bold mb-3\">Gaps</h3>{}",
        list(&comp.gaps, "bullets")
    )));
    body.push_str(&format!(
        "<div class=\"rounded-2xl bg-gradient-to-br from-orange-500 to-amber-400 text-white p-6\">\
         <h3 class=\"font-bold mb-3\">The opportunity</h3><p>{}</p></div>",
        escape_html(&comp.opportunity)
    ));
    body.push_str("</div>");
    sections.push(block("competition", "The competition", "Where You Stand", &body));

    let s = &c.strategy;
    let mut body = paragraph(&s.approach, "text-lg mb-6");
    body.push_str(&list(&s.tactics, "bullets"));
    if !s.timeline.is_empty() {
        body.push_str("<ol class=\"border-l-4 border-orange-500 pl-6 space-y-4 my-8\">");
        for phase in &s.timeline {
            body.push_str(&format!(
                "<li><p class=\"font-bold\">{}</p><p class=\"text-slate-600\">{}</p></li>",
                escape_html(&phase.period),
                escape_html(&phase.focus)
            ));
        }
        body.push_str("</ol>");
    }
    body.push_str(&list(&s.outcomes, "bullets"));
    sections.push(block("plan", "The plan", "How We'll Get You There", &body));

    let inv = &c.investment;
    let price = inv
        .price()
        .map_or_else(|| "On request".to_string(), |p| format!("{}/month", format_gbp(p)));
    let mut body = String::from("<div class=\"grid md:grid-cols-2 gap-6\">");
    body.push_str(&format!(
        "<div class=\"bg-white rounded-2xl shadow-sm ring-2 ring-orange-500 p-6\"><h3 class=\"text-xl font-bold\">{}</h3>\
         <div class=\"text-4xl font-extrabold my-3\">{}</div>{}</div>",
        escape_html(&inv.package_name),
        escape_html(&price),
        list(&inv.deliverables, "bullets")
    ));
    let mut rows = String::from(
        "<table class=\"cmp\"><thead><tr><th></th><th>Today</th><th>Month 6</th><th>Month 12</th></tr></thead><tbody>",
    );
    for row in &inv.projected_results {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.metric),
            escape_html(&row.current),
            escape_html(&row.month_six),
            escape_html(&row.month_twelve)
        ));
    }
    rows.push_str("</tbody></table>");
    body.push_str(&card(&rows));
    body.push_str("</div>");
    body.push_str(&paragraph(&inv.roi_summary, "text-lg font-semibold mt-6"));
    sections.push(block("investment", "Investment", "Your Package", &body));

    let mut body = list(&c.summary.benefits, "bullets");
    body.push_str(&card(&format!(
        "<h3 class=\"font-bold mb-3\">Next steps</h3>{}",
        list(&c.summary.next_steps, "bullets")
    )));
    if !c.summary.call_to_action.is_empty() {
        body.push_str(&format!(
            "<p class=\"mt-8 text-center text-2xl font-bold gradient-text\">{}</p>",
            escape_html(&c.summary.call_to_action)
        ));
    }
    sections.push(block("summary", "In short", "Summary", &body));
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn ctx() -> RenderContext {
        RenderContext::new("Propgen Digital", "16 October 2026")
    }

    #[test]
    fn loads_tailwind_and_reveal_script() {
        let html = render(&fixtures::concise(), None, &ctx());
        assert!(html.contains("<script src=\"https://cdn.tailwindcss.com\"></script>"));
        assert!(html.contains("IntersectionObserver"));
        assert!(html.contains("<section id=\"competition\" class=\"reveal\">"));
        assert!(html.contains("£2,000/month"));
    }

    #[test]
    fn testimonials_are_embedded_and_capped() {
        let mut context = ctx();
        context.testimonials = (1..=5)
            .map(|i| Testimonial {
                client: format!("Client {i}"),
                quote: "Calls doubled".into(),
                video_url: format!("https://www.youtube.com/embed/v{i}"),
            })
            .collect();
        let html = render(&fixtures::detailed(), None, &context);
        assert_eq!(html.matches("<iframe").count(), 3);
        assert!(html.contains("https://www.youtube.com/embed/v3"));
        assert!(!html.contains("https://www.youtube.com/embed/v4"));
    }

    #[test]
    fn testimonials_section_omitted_when_none() {
        let html = render(&fixtures::detailed(), None, &ctx());
        assert!(!html.contains("id=\"testimonials\""));
        assert!(html.contains("Choose Your Package"));
        assert!(html.contains("£5,000/month"));
    }

    #[test]
    fn hostile_video_urls_are_escaped() {
        let mut context = ctx();
        context.testimonials = vec![Testimonial {
            client: "X".into(),
            quote: "Y".into(),
            video_url: "\"><script>bad()</script>".into(),
        }];
        let html = render(&fixtures::concise(), None, &context);
        assert!(!html.contains("<script>bad()"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }
}
