//! The component tree a classic PDF is laid out from.

/// One laid-out unit. Blocks never split except for paragraphs, bullet
/// lists and tables, which continue on the next page.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Full-page dark cover.
    Cover {
        company: String,
        title: String,
        subtitle: String,
        meta: Vec<String>,
    },
    /// Section heading with accent rule; starts a new page when little room is left.
    Heading(String),
    Subheading(String),
    Paragraph(String),
    Bullets(Vec<String>),
    Numbered(Vec<String>),
    Callout { title: String, body: String },
    /// Up to four big-number cards in one row: (value, label).
    Stats(Vec<(String, String)>),
    Table(Table),
    Spacer(f32),
    PageBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Relative column widths; equal widths when empty.
    pub widths: Vec<f32>,
    /// Row drawn with the highlight fill (the client's own row).
    pub highlight: Option<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: Vec::new(),
            widths: Vec::new(),
            highlight: None,
        }
    }

    #[must_use]
    pub fn widths(mut self, widths: &[f32]) -> Self {
        self.widths = widths.to_vec();
        self
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Column widths in points for the given total width.
    pub fn column_widths(&self, total: f32) -> Vec<f32> {
        let columns = self.headers.len().max(1);
        if self.widths.len() == columns {
            let sum: f32 = self.widths.iter().sum();
            if sum > 0.0 {
                return self.widths.iter().map(|w| w / sum * total).collect();
            }
        }
        #[allow(clippy::cast_precision_loss)]
        let each = total / columns as f32;
        vec![each; columns]
    }
}

/// An ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub title: String,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Pushes a paragraph unless the text is blank.
    pub fn paragraph(&mut self, text: &str) {
        if !text.trim().is_empty() {
            self.blocks.push(Block::Paragraph(text.trim().to_string()));
        }
    }

    /// Pushes a bullet list unless it is empty.
    pub fn bullets(&mut self, items: &[String]) {
        if !items.is_empty() {
            self.blocks.push(Block::Bullets(items.to_vec()));
        }
    }
}
