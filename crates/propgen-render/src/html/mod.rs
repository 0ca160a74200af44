//! String-templated HTML documents.
//!
//! Every value that came from the LLM or a customer record passes through
//! [`escape_html`] at the point it is interpolated.

pub mod classic;
pub mod modern;

use propgen_core::proposal::ComparisonRow;
use propgen_core::ResearchResult;

use crate::escape::escape_html;
use crate::view::{comparison_rows, competitor_label, opt_number};

/// `<ul>` of escaped items with the given class; empty when there are none.
pub(crate) fn list(items: &[String], class: &str) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("<ul class=\"{class}\">");
    for item in items {
        out.push_str("<li>");
        out.push_str(&escape_html(item));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// `<p>` of escaped text with the given class; empty for blank text.
pub(crate) fn paragraph(text: &str, class: &str) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        format!("<p class=\"{class}\">{}</p>", escape_html(text))
    }
}

/// Competitor comparison table body rows, client row marked.
pub(crate) fn comparison_table(
    rows: &[ComparisonRow],
    research: Option<&ResearchResult>,
    table_class: &str,
    client_class: &str,
) -> String {
    let rows = comparison_rows(rows, research);
    if rows.is_empty() {
        return String::new();
    }
    let mut out = format!(
        "<table class=\"{table_class}\"><thead><tr><th>Business</th><th>Monthly traffic</th>\
         <th>Ranking keywords</th><th>Authority</th><th>Notes</th></tr></thead><tbody>"
    );
    for row in &rows {
        let class = if row.is_client { client_class } else { "" };
        out.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&competitor_label(row, research)),
            opt_number(row.monthly_traffic),
            opt_number(row.ranking_keywords),
            opt_number(row.domain_authority),
            escape_html(&row.notes),
        ));
    }
    out.push_str("</tbody></table>");
    out
}
