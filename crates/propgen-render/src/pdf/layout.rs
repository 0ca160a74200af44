//! Flows a [`Document`] onto fixed-size pages and emits one content stream
//! per page.

use super::doc::{Block, Document, Table};
use super::fonts::{literal, text_width, Font};
use super::style::{Color, Stylesheet};

const STAT_CARD_HEIGHT: f32 = 64.0;
const STAT_GAP: f32 = 10.0;
const CALLOUT_BAR: f32 = 4.0;
const CALLOUT_PAD: f32 = 10.0;

/// A finished page: its content stream and whether it is a cover.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub ops: String,
    pub cover: bool,
}

/// Greedy word wrap against real glyph widths. Words wider than `width` are
/// split between characters.
pub fn wrap(text: &str, font: Font, size: f32, width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        let mut line = String::new();
        for word in source_line.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if text_width(&candidate, font, size) <= width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if text_width(word, font, size) <= width {
                line = word.to_string();
                continue;
            }
            for ch in word.chars() {
                line.push(ch);
                if line.chars().count() > 1 && text_width(&line, font, size) > width {
                    line.pop();
                    lines.push(std::mem::take(&mut line));
                    line.push(ch);
                }
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    lines
}

struct Layout<'a> {
    style: &'a Stylesheet,
    pages: Vec<Page>,
    y: f32,
    needs_page: bool,
}

/// Lays out every block and stamps page footers.
pub fn layout(doc: &Document, style: &Stylesheet) -> Vec<Page> {
    let mut l = Layout {
        style,
        pages: Vec::new(),
        y: style.top(),
        needs_page: true,
    };
    for block in &doc.blocks {
        l.block(block);
    }
    if l.pages.is_empty() {
        l.new_page(false);
    }
    l.footers(&doc.title);
    l.pages
}

impl Layout<'_> {
    fn new_page(&mut self, cover: bool) {
        self.pages.push(Page {
            ops: String::new(),
            cover,
        });
        self.y = self.style.top();
        self.needs_page = false;
    }

    fn at_top(&self) -> bool {
        (self.y - self.style.top()).abs() < f32::EPSILON
    }

    /// Starts a new page unless `height` still fits above the footer.
    fn ensure(&mut self, height: f32) {
        if self.needs_page || self.y - height < self.style.bottom() {
            self.new_page(false);
        }
    }

    fn ops(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.new_page(false);
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last].ops
    }

    fn text(&mut self, x: f32, baseline: f32, font: Font, size: f32, color: Color, text: &str) {
        let op = format!(
            "BT /{} {size:.2} Tf {} {x:.2} {baseline:.2} Td {} Tj ET\n",
            font.resource(),
            color.fill(),
            literal(text)
        );
        self.ops().push_str(&op);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let op = format!("{} {x:.2} {y:.2} {w:.2} {h:.2} re f\n", color.fill());
        self.ops().push_str(&op);
    }

    fn hline(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: Color) {
        let op = format!(
            "{} {width:.2} w {x1:.2} {y:.2} m {x2:.2} {y:.2} l S\n",
            color.stroke()
        );
        self.ops().push_str(&op);
    }

    /// Draws wrapped lines from the cursor, breaking pages between lines.
    fn lines(&mut self, lines: &[String], x: f32, font: Font, size: f32, color: Color) {
        let lh = self.style.line_height(size);
        for line in lines {
            self.ensure(lh);
            let baseline = self.y - size;
            self.text(x, baseline, font, size, color, line);
            self.y -= lh;
        }
    }

    fn block(&mut self, block: &Block) {
        let s = self.style;
        match block {
            Block::Cover {
                company,
                title,
                subtitle,
                meta,
            } => self.cover(company, title, subtitle, meta),
            Block::Heading(text) => {
                let lh = s.line_height(s.heading_size);
                // Keep the heading with at least a few lines of what follows.
                self.ensure(lh + 6.0 * s.line_height(s.body_size));
                if !self.at_top() {
                    self.y -= 10.0;
                }
                let lines = wrap(text, Font::Bold, s.heading_size, s.content_width());
                self.lines(&lines, s.margin, Font::Bold, s.heading_size, s.navy);
                let rule_y = self.y + 2.0;
                self.hline(s.margin, s.margin + s.content_width(), rule_y, 0.75, s.rule);
                self.hline(s.margin, s.margin + 60.0, rule_y, 2.5, s.accent);
                self.y -= s.block_gap + 4.0;
            }
            Block::Subheading(text) => {
                self.ensure(s.line_height(s.subheading_size) + 2.0 * s.line_height(s.body_size));
                if !self.at_top() {
                    self.y -= 4.0;
                }
                let lines = wrap(text, Font::Bold, s.subheading_size, s.content_width());
                self.lines(&lines, s.margin, Font::Bold, s.subheading_size, s.blue);
                self.y -= 2.0;
            }
            Block::Paragraph(text) => {
                let lines = wrap(text, Font::Regular, s.body_size, s.content_width());
                self.lines(&lines, s.margin, Font::Regular, s.body_size, s.text);
                self.y -= s.block_gap;
            }
            Block::Bullets(items) => {
                let markers = vec!["•".to_string(); items.len()];
                self.list(items, &markers);
            }
            Block::Numbered(items) => {
                let markers: Vec<String> = (1..=items.len()).map(|i| format!("{i}.")).collect();
                self.list(items, &markers);
            }
            Block::Callout { title, body } => self.callout(title, body),
            Block::Stats(cards) => self.stats(cards),
            Block::Table(table) => self.table(table),
            Block::Spacer(height) => {
                if self.needs_page || self.pages.is_empty() {
                    self.new_page(false);
                }
                self.y -= height;
            }
            Block::PageBreak => self.needs_page = true,
        }
    }

    fn cover(&mut self, company: &str, title: &str, subtitle: &str, meta: &[String]) {
        let s = self.style;
        self.new_page(true);
        self.rect(0.0, 0.0, s.page_width, s.page_height, s.navy);
        self.y = s.page_height * 0.64;
        self.rect(s.margin, self.y, 80.0, 6.0, s.accent);
        self.y -= 24.0;
        let width = s.content_width();
        let company_lines = wrap(company, Font::Bold, s.cover_size, width);
        self.lines(&company_lines, s.margin, Font::Bold, s.cover_size, s.white);
        let title_lines = wrap(title, Font::Bold, s.heading_size, width);
        self.lines(&title_lines, s.margin, Font::Bold, s.heading_size, s.accent);
        let subtitle_lines = wrap(subtitle, Font::Regular, s.subheading_size, width);
        self.lines(&subtitle_lines, s.margin, Font::Regular, s.subheading_size, s.rule);

        let lh = s.line_height(s.body_size);
        #[allow(clippy::cast_precision_loss)]
        let meta_height = meta.len() as f32 * lh;
        self.y = s.margin + 40.0 + meta_height;
        self.lines(meta, s.margin, Font::Regular, s.body_size, s.rule);
        self.needs_page = true;
    }

    fn list(&mut self, items: &[String], markers: &[String]) {
        let s = self.style;
        let lh = s.line_height(s.body_size);
        let width = s.content_width() - s.bullet_indent;
        for (item, marker) in items.iter().zip(markers) {
            let lines = wrap(item, Font::Regular, s.body_size, width);
            let mut first = true;
            for line in &lines {
                self.ensure(lh);
                let baseline = self.y - s.body_size;
                if first {
                    self.text(s.margin + 2.0, baseline, Font::Bold, s.body_size, s.accent, marker);
                    first = false;
                }
                self.text(s.margin + s.bullet_indent, baseline, Font::Regular, s.body_size, s.text, line);
                self.y -= lh;
            }
            self.y -= 2.0;
        }
        self.y -= s.block_gap - 2.0;
    }

    fn callout(&mut self, title: &str, body: &str) {
        let s = self.style;
        let inner = s.content_width() - CALLOUT_BAR - 2.0 * CALLOUT_PAD;
        let title_lines = wrap(title, Font::Bold, s.body_size, inner);
        let body_lines = wrap(body, Font::Regular, s.body_size, inner);
        let lh = s.line_height(s.body_size);
        #[allow(clippy::cast_precision_loss)]
        let height = (title_lines.len() + body_lines.len()) as f32 * lh + 2.0 * CALLOUT_PAD;
        self.ensure(height);
        let top = self.y;
        self.rect(s.margin, top - height, s.content_width(), height, s.danger_bg);
        self.rect(s.margin, top - height, CALLOUT_BAR, height, s.danger);
        self.y -= CALLOUT_PAD;
        let x = s.margin + CALLOUT_BAR + CALLOUT_PAD;
        self.lines(&title_lines, x, Font::Bold, s.body_size, s.danger);
        self.lines(&body_lines, x, Font::Regular, s.body_size, s.text);
        self.y = top - height - s.block_gap;
    }

    fn stats(&mut self, cards: &[(String, String)]) {
        if cards.is_empty() {
            return;
        }
        let s = self.style;
        let cards = &cards[..cards.len().min(4)];
        #[allow(clippy::cast_precision_loss)]
        let n = cards.len() as f32;
        let card_width = (s.content_width() - STAT_GAP * (n - 1.0)) / n;
        self.ensure(STAT_CARD_HEIGHT);
        let top = self.y;
        for (i, (value, label)) in cards.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = s.margin + i as f32 * (card_width + STAT_GAP);
            self.rect(x, top - STAT_CARD_HEIGHT, card_width, STAT_CARD_HEIGHT, s.zebra);
            self.rect(x, top - 3.0, card_width, 3.0, s.accent);

            let value_width = text_width(value, Font::Bold, s.stat_size);
            let size = if value_width > card_width - 8.0 {
                s.stat_size * (card_width - 8.0) / value_width
            } else {
                s.stat_size
            };
            let vx = x + (card_width - text_width(value, Font::Bold, size)) / 2.0;
            self.text(vx, top - 12.0 - size, Font::Bold, size, s.accent, value);

            let label_lines = wrap(label, Font::Regular, s.small_size, card_width - 8.0);
            let mut baseline = top - 44.0;
            for line in label_lines.iter().take(2) {
                let lx = x + (card_width - text_width(line, Font::Regular, s.small_size)) / 2.0;
                self.text(lx, baseline, Font::Regular, s.small_size, s.muted, line);
                baseline -= s.line_height(s.small_size);
            }
        }
        self.y = top - STAT_CARD_HEIGHT - s.block_gap;
    }

    fn table_header(&mut self, table: &Table, widths: &[f32]) {
        let s = self.style;
        let pad = s.cell_padding;
        let lh = s.line_height(s.table_size);
        let wrapped: Vec<Vec<String>> = table
            .headers
            .iter()
            .zip(widths)
            .map(|(h, w)| wrap(h, Font::Bold, s.table_size, w - 2.0 * pad))
            .collect();
        let rows = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
        #[allow(clippy::cast_precision_loss)]
        let height = rows as f32 * lh + 2.0 * pad;
        let top = self.y;
        self.rect(s.margin, top - height, s.content_width(), height, s.blue);
        let mut x = s.margin;
        for (lines, w) in wrapped.iter().zip(widths) {
            let mut baseline = top - pad - s.table_size;
            for line in lines {
                self.text(x + pad, baseline, Font::Bold, s.table_size, s.white, line);
                baseline -= lh;
            }
            x += w;
        }
        self.y = top - height;
    }

    fn table(&mut self, table: &Table) {
        let s = self.style;
        let pad = s.cell_padding;
        let lh = s.line_height(s.table_size);
        let widths = table.column_widths(s.content_width());
        let header_height = lh + 2.0 * pad;

        self.ensure(header_height + lh + 2.0 * pad);
        self.table_header(table, &widths);

        for (index, row) in table.rows.iter().enumerate() {
            let highlighted = table.highlight == Some(index);
            let font = if highlighted { Font::Bold } else { Font::Regular };
            let wrapped: Vec<Vec<String>> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| wrap(cell, font, s.table_size, w - 2.0 * pad))
                .collect();
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
            #[allow(clippy::cast_precision_loss)]
            let height = lines as f32 * lh + 2.0 * pad;

            if self.y - height < s.bottom() {
                self.new_page(false);
                self.table_header(table, &widths);
            }
            let top = self.y;
            if highlighted {
                self.rect(s.margin, top - height, s.content_width(), height, s.highlight);
            } else if index % 2 == 1 {
                self.rect(s.margin, top - height, s.content_width(), height, s.zebra);
            }
            let mut x = s.margin;
            for (cell, w) in wrapped.iter().zip(&widths) {
                let mut baseline = top - pad - s.table_size;
                for line in cell {
                    self.text(x + pad, baseline, font, s.table_size, s.text, line);
                    baseline -= lh;
                }
                x += w;
            }
            self.hline(s.margin, s.margin + s.content_width(), top - height, 0.5, s.rule);
            self.y = top - height;
        }
        self.y -= s.block_gap;
    }

    fn footers(&mut self, title: &str) {
        let s = self.style;
        let total = self.pages.len();
        for (i, page) in self.pages.iter_mut().enumerate() {
            if page.cover {
                continue;
            }
            let label = format!("Page {} of {total}", i + 1);
            let y = s.margin;
            let right = s.page_width - s.margin - text_width(&label, Font::Regular, s.small_size);
            page.ops.push_str(&format!(
                "{} 0.50 w {:.2} {:.2} m {:.2} {:.2} l S\n",
                s.rule.stroke(),
                s.margin,
                y + 12.0,
                s.page_width - s.margin,
                y + 12.0
            ));
            for (x, text) in [(s.margin, title), (right, label.as_str())] {
                page.ops.push_str(&format!(
                    "BT /{} {:.2} Tf {} {x:.2} {y:.2} Td {} Tj ET\n",
                    Font::Regular.resource(),
                    s.small_size,
                    s.muted.fill(),
                    literal(text)
                ));
            }
        }
    }
}
