//! Flowed layout: a vertical cursor over A4 pages with greedy word wrap.

use super::{
    metrics::text_width,
    writer::{Face, PageCanvas, Rgb},
};

pub const MARGIN_LEFT: f32 = 40.0;
pub const MARGIN_RIGHT: f32 = 550.0;
pub const CONTENT_WIDTH: f32 = MARGIN_RIGHT - MARGIN_LEFT;
pub const TOP: f32 = 50.0;
pub const BOTTOM: f32 = 780.0;
/// Extra leading below each line, on top of the font size.
const LEADING: f32 = 5.0;

/// Text style of a line.
#[derive(Clone, Copy, Debug)]
pub struct Style {
    pub face: Face,
    pub size: f32,
    pub color: Rgb,
}

impl Style {
    pub const fn regular(size: f32) -> Self {
        Self {
            face: Face::Regular,
            size,
            color: Rgb::BLACK,
        }
    }

    pub const fn bold(size: f32) -> Self {
        Self {
            face: Face::Bold,
            size,
            color: Rgb::BLACK,
        }
    }

    pub const fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

/// Splits `text` into lines narrower than `max_width`.
///
/// Words are added to the current line while the measured line stays under
/// the budget; the word that overflows starts the next line. A single word
/// wider than the budget gets a line of its own. Never yields empty lines.
pub fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if text_width(&candidate, size) < max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Page sequence plus the cursor position on the current page.
#[derive(Debug)]
pub struct Layout {
    pages: Vec<PageCanvas>,
    y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Self {
            pages: vec![PageCanvas::default()],
            y: TOP,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&mut self) -> &mut PageCanvas {
        if self.pages.is_empty() {
            self.pages.push(PageCanvas::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Starts a new page when `height` more points would pass the bottom
    /// margin. Nothing is carried over to the new page.
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > BOTTOM {
            self.pages.push(PageCanvas::default());
            self.y = TOP;
        }
    }

    /// Moves the cursor down without drawing.
    pub fn gap(&mut self, height: f32) {
        self.y += height;
    }

    /// One unwrapped line at `x`.
    pub fn line(&mut self, x: f32, style: Style, text: &str) {
        self.ensure_room(style.size + LEADING);
        let baseline = self.y + style.size;
        self.page()
            .text(x, baseline, style.face, style.size, style.color, text);
        self.y += style.size + LEADING;
    }

    /// Text wrapped to `max_width`, each resulting line placed like
    /// [`line`](Layout::line).
    pub fn paragraph(&mut self, x: f32, max_width: f32, style: Style, text: &str) {
        for line in wrap(text, max_width, style.size) {
            self.line(x, style, &line);
        }
    }

    /// A line whose left part wraps inside `left_width` and whose right part is
    /// right-aligned to the margin on the last wrapped line.
    pub fn split_line(
        &mut self,
        left_width: f32,
        left: (Style, &str),
        right: (Style, &str),
    ) {
        let (left_style, left_text) = left;
        let (right_style, right_text) = right;
        let mut lines = wrap(left_text, left_width, left_style.size);
        if lines.is_empty() {
            lines.push(String::new());
        }
        let last = lines.len() - 1;
        for (index, line) in lines.iter().enumerate() {
            let height = left_style.size.max(right_style.size) + LEADING;
            self.ensure_room(height);
            let baseline = self.y + left_style.size;
            let indent = MARGIN_LEFT + 10.0;
            let page = self.page();
            if !line.is_empty() {
                page.text(
                    indent,
                    baseline,
                    left_style.face,
                    left_style.size,
                    left_style.color,
                    line,
                );
            }
            if index == last {
                let x = MARGIN_RIGHT - text_width(right_text, right_style.size);
                page.text(
                    x,
                    baseline,
                    right_style.face,
                    right_style.size,
                    right_style.color,
                    right_text,
                );
            }
            self.y += height;
        }
    }

    /// Full-width horizontal rule.
    pub fn rule(&mut self, width: f32, color: Rgb) {
        self.ensure_room(LEADING);
        let y = self.y;
        self.page().rule(MARGIN_LEFT, MARGIN_RIGHT, y, width, color);
        self.y += LEADING;
    }

    pub fn into_pages(self) -> Vec<PageCanvas> {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_is_greedy_and_never_empty() {
        let lines = wrap("one two three four five six", text_width("one two three", 10.0) + 0.1, 10.0);
        assert_eq!(lines, ["one two three", "four five six"]);
        assert!(wrap("   ", 100.0, 10.0).is_empty());
        assert!(wrap("", 100.0, 10.0).is_empty());
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap("a supercalifragilistic b", 30.0, 10.0);
        assert_eq!(lines, ["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn every_wrapped_line_fits_unless_single_word() {
        let text = "Monthly groceries from the market including vegetables rice lentils and \
                    spices for the whole family";
        for line in wrap(text, 120.0, 10.0) {
            assert!(text_width(&line, 10.0) < 120.0 || !line.contains(' '));
        }
    }

    #[test]
    fn page_breaks_before_passing_the_bottom() {
        let mut layout = Layout::new();
        let style = Style::regular(10.0);
        let per_page = ((BOTTOM - TOP) / (10.0 + LEADING)).floor() as usize;
        for i in 0..per_page {
            layout.line(MARGIN_LEFT, style, &format!("row {i}"));
        }
        assert_eq!(layout.page_count(), 1);
        assert!(layout.cursor() <= BOTTOM);

        layout.line(MARGIN_LEFT, style, "overflow");
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.cursor(), TOP + 15.0);
        let pages = layout.into_pages();
        assert!(pages[1].ops().contains("(overflow) Tj"));
        assert!(!pages[0].ops().contains("overflow"));
    }
}
