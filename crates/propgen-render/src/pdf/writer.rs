//! Serialises laid-out pages into a PDF 1.4 file: catalog, page tree, two
//! standard fonts, one uncompressed content stream per page, document info,
//! cross-reference table and trailer.

use chrono::{DateTime, Utc};

use super::fonts::{literal, Font};
use super::layout::Page;
use super::style::Stylesheet;

const CATALOG: usize = 1;
const PAGES: usize = 2;
const FONT_REGULAR: usize = 3;
const FONT_BOLD: usize = 4;
const FIRST_PAGE: usize = 5;

/// Document information dictionary values.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub created: DateTime<Utc>,
}

struct ObjectWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new() -> Self {
        let mut buf = Vec::with_capacity(64 * 1024);
        buf.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    /// Writes object `id`. Objects must be written in id order.
    fn object(&mut self, id: usize, body: &str) {
        debug_assert_eq!(id, self.offsets.len() + 1, "objects written out of order");
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &str) {
        let body = format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        );
        self.object(id, &body);
    }

    fn finish(mut self, info_id: usize) -> Vec<u8> {
        let xref_at = self.buf.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {CATALOG} 0 R /Info {info_id} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

fn font_dict(font: Font) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        font.base_name()
    )
}

/// Assembles the final file.
pub fn write_pdf(pages: &[Page], info: &DocumentInfo, style: &Stylesheet) -> Vec<u8> {
    let mut w = ObjectWriter::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE + 2 * i))
        .collect();
    w.object(CATALOG, &format!("<< /Type /Catalog /Pages {PAGES} 0 R >>"));
    w.object(
        PAGES,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );
    w.object(FONT_REGULAR, &font_dict(Font::Regular));
    w.object(FONT_BOLD, &font_dict(Font::Bold));

    for (i, page) in pages.iter().enumerate() {
        let page_id = FIRST_PAGE + 2 * i;
        let content_id = page_id + 1;
        w.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /{} {FONT_REGULAR} 0 R /{} {FONT_BOLD} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                style.page_width,
                style.page_height,
                Font::Regular.resource(),
                Font::Bold.resource(),
            ),
        );
        w.stream(content_id, &page.ops);
    }

    let info_id = FIRST_PAGE + 2 * pages.len();
    w.object(
        info_id,
        &format!(
            "<< /Title {} /Author {} /Producer (propgen) /CreationDate (D:{}Z) >>",
            literal(&info.title),
            literal(&info.author),
            info.created.format("%Y%m%d%H%M%S")
        ),
    );
    w.finish(info_id)
}
