//! Shared design tokens for the classic PDF.

/// RGB colour, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    // Channels are < 256 so the float conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    fn hex(rgb: u32) -> Self {
        Self(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    /// Fill-colour operator.
    pub fn fill(self) -> String {
        format!("{:.3} {:.3} {:.3} rg", self.0, self.1, self.2)
    }

    /// Stroke-colour operator.
    pub fn stroke(self) -> String {
        format!("{:.3} {:.3} {:.3} RG", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone)]
pub struct Stylesheet {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub footer_height: f32,

    pub navy: Color,
    pub blue: Color,
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
    pub danger: Color,
    pub danger_bg: Color,
    pub zebra: Color,
    pub highlight: Color,
    pub rule: Color,
    pub white: Color,

    pub cover_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
    pub table_size: f32,
    pub small_size: f32,
    pub stat_size: f32,
    pub leading: f32,

    pub block_gap: f32,
    pub bullet_indent: f32,
    pub cell_padding: f32,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            // A4 in points.
            page_width: 595.28,
            page_height: 841.89,
            margin: 50.0,
            footer_height: 24.0,

            navy: Color::hex(0x0f_172a),
            blue: Color::hex(0x1e_3a8a),
            accent: Color::hex(0xf9_7316),
            text: Color::hex(0x1f_2937),
            muted: Color::hex(0x64_748b),
            danger: Color::hex(0x99_1b1b),
            danger_bg: Color::hex(0xfe_f2f2),
            zebra: Color::hex(0xf8_fafc),
            highlight: Color::hex(0xff_f7ed),
            rule: Color::hex(0xe2_e8f0),
            white: Color::hex(0xff_ffff),

            cover_size: 32.0,
            heading_size: 18.0,
            subheading_size: 12.5,
            body_size: 10.0,
            table_size: 8.5,
            small_size: 7.5,
            stat_size: 20.0,
            leading: 1.4,

            block_gap: 8.0,
            bullet_indent: 14.0,
            cell_padding: 4.0,
        }
    }
}

impl Stylesheet {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Baseline-to-baseline distance for a font size.
    pub fn line_height(&self, size: f32) -> f32 {
        size * self.leading
    }

    pub fn top(&self) -> f32 {
        self.page_height - self.margin
    }

    /// Lowest y a content block may reach before a page break.
    pub fn bottom(&self) -> f32 {
        self.margin + self.footer_height
    }
}
