//! Minimal PDF 1.4 serializer: A4 pages, the two standard Helvetica faces,
//! uncompressed content streams.

use std::fmt::Write as _;

pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// RGB fill/stroke colour, components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb(pub f32, pub f32, pub f32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0.0, 0.0, 0.0);
    pub const DARK_GRAY: Rgb = Rgb(0.27, 0.27, 0.27);
    pub const NAVY: Rgb = Rgb(0.0, 0.0, 0.55);
    pub const BLUE: Rgb = Rgb(0.0, 0.0, 1.0);
    pub const GREEN: Rgb = Rgb(0.0, 0.39, 0.0);
    pub const RED: Rgb = Rgb(0.8, 0.0, 0.0);
}

/// Content stream of one page, in top-down coordinates.
#[derive(Debug, Default)]
pub struct PageCanvas {
    ops: String,
}

impl PageCanvas {
    /// Draws `text` with its baseline at `baseline` points from the top.
    pub fn text(&mut self, x: f32, baseline: f32, face: Face, size: f32, color: Rgb, text: &str) {
        let _ = writeln!(
            self.ops,
            "BT {} {} {} rg /{} {} Tf {:.2} {:.2} Td ({}) Tj ET",
            color.0,
            color.1,
            color.2,
            face.resource(),
            size,
            x,
            PAGE_HEIGHT - baseline,
            escape(text)
        );
    }

    /// Horizontal rule at `y` points from the top.
    pub fn rule(&mut self, x1: f32, x2: f32, y: f32, width: f32, color: Rgb) {
        let y = PAGE_HEIGHT - y;
        let _ = writeln!(
            self.ops,
            "{} {} {} RG {} w {:.2} {:.2} m {:.2} {:.2} l S",
            color.0, color.1, color.2, width, x1, y, x2, y
        );
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[cfg(test)]
    pub fn ops(&self) -> &str {
        &self.ops
    }
}

/// Escapes a string literal and maps it to WinAnsi bytes; characters outside
/// Latin-1 become `?`.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            '\u{a0}'..='\u{ff}' => {
                let _ = write!(out, "\\{:03o}", c as u32);
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Serializes pages into a complete PDF file.
pub fn finish(pages: &[PageCanvas]) -> Vec<u8> {
    // Objects: 1 catalog, 2 page tree, 3 regular font, 4 bold font, then a
    // page object and a content stream per page.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + i * 2).collect();
    let mut objects: Vec<String> = Vec::with_capacity(4 + pages.len() * 2);

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{id} 0 R")).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    for base_font in ["Helvetica", "Helvetica-Bold"] {
        objects.push(format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>"
        ));
    }
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            id + 1
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            page.ops.len(),
            page.ops
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        let _ = write!(out, "{} 0 obj\n{}\nendobj\n", index + 1, body);
    }
    let xref = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref
    );
    out.into_bytes()
}
