//! Fonts, styled text runs, markup decoding, and measured layouts.
//!
//! Labels accept a small HTML-like markup. [`MarkupDecoder`] turns it into a
//! list of [`StyledRun`]s, and a [`Renderer`](crate::Renderer) measures the
//! runs into a [`TextLayout`].
//!
//! ```
//! use trellis_render::text::{Font, MarkupDecoder};
//!
//! let decoder = MarkupDecoder::new(Font::default()).unwrap();
//! let runs = decoder.decode("plain <b>bold</b>");
//! assert_eq!(runs.len(), 2);
//! assert!(runs[1].style.bold);
//! ```

use regex::Regex;

use crate::error::RenderResult;
use crate::types::{Color, HasIntrinsicSize, Size};

/// Point sizes selected by `<font size="1..7">`.
pub const FONT_SIZES: [f32; 7] = [8.0, 10.0, 12.0, 14.0, 18.0, 24.0, 48.0];

/// Index into [`FONT_SIZES`] used when markup gives a relative size.
const DEFAULT_SIZE_STEP: i32 = 3;

/// Family, size, and weight of text.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn with_size(&self, size: f32) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Montserrat", 12.0)
    }
}

/// Horizontal alignment of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HorizontalAlign {
    /// Parse `"left"`, `"center"`, or `"right"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Styling applied to a run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Explicit color from markup. `None` follows the widget's state color.
    pub color: Option<Color>,
    pub size: f32,
}

impl TextStyle {
    fn from_font(font: &Font) -> Self {
        Self {
            bold: font.bold,
            italic: font.italic,
            underline: false,
            color: None,
            size: font.size,
        }
    }
}

/// A stretch of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
}

/// Decoder for the label markup.
///
/// Supported tags are `b`/`strong`, `i`/`em`, `u`, `font` (with `color` and
/// `size` attributes) and `br`. The entities `&amp;`, `&lt;`, `&gt;`,
/// `&quot;`, and `&apos;` are expanded. Unknown tags are dropped but their
/// text is kept. Runs of whitespace collapse to a single space.
#[derive(Debug, Clone)]
pub struct MarkupDecoder {
    font: Font,
    tag: Regex,
    attribute: Regex,
    whitespace: Regex,
}

impl MarkupDecoder {
    /// Create a decoder whose unstyled text uses `font`.
    pub fn new(font: Font) -> RenderResult<Self> {
        Ok(Self {
            font,
            tag: Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>")?,
            attribute: Regex::new(r#"([a-zA-Z_-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Decode markup into styled runs. Adjacent runs with equal style merge.
    pub fn decode(&self, markup: &str) -> Vec<StyledRun> {
        let base = TextStyle::from_font(&self.font);
        // (tag name, style in effect inside it, size step)
        let mut stack: Vec<(String, TextStyle, i32)> = Vec::new();
        let mut runs = Vec::new();
        let mut cursor = 0;

        let current = |stack: &[(String, TextStyle, i32)]| {
            stack
                .last()
                .map(|(_, style, step)| (style.clone(), *step))
                .unwrap_or((base.clone(), DEFAULT_SIZE_STEP))
        };

        for captures in self.tag.captures_iter(markup) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            self.push_text(&mut runs, &markup[cursor..whole.start()], current(&stack).0);
            cursor = whole.end();

            let closing = !captures[1].is_empty();
            let name = captures[2].to_ascii_lowercase();
            let (mut style, mut step) = current(&stack);

            if closing {
                if let Some(position) = stack.iter().rposition(|(tag, _, _)| *tag == name) {
                    stack.truncate(position);
                }
                continue;
            }

            match name.as_str() {
                "br" => {
                    push_run(&mut runs, "\n".to_string(), style);
                    continue;
                }
                "b" | "strong" => style.bold = true,
                "i" | "em" => style.italic = true,
                "u" => style.underline = true,
                "font" => {
                    for attribute in self.attribute.captures_iter(&captures[3]) {
                        let value = attribute
                            .get(2)
                            .or_else(|| attribute.get(3))
                            .or_else(|| attribute.get(4))
                            .map_or("", |m| m.as_str());
                        match attribute[1].to_ascii_lowercase().as_str() {
                            "color" => {
                                if let Some(color) = Color::from_hex(value) {
                                    style.color = Some(color);
                                }
                            }
                            "size" => {
                                if let Some(new_step) = parse_size_step(value, step) {
                                    step = new_step;
                                    style.size = FONT_SIZES[(step - 1) as usize];
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => continue,
            }

            stack.push((name, style, step));
        }

        self.push_text(&mut runs, &markup[cursor..], current(&stack).0);
        runs
    }

    /// The decoded text without styling.
    pub fn plain_text(&self, markup: &str) -> String {
        self.decode(markup).into_iter().map(|run| run.text).collect()
    }

    fn push_text(&self, runs: &mut Vec<StyledRun>, raw: &str, style: TextStyle) {
        if raw.is_empty() {
            return;
        }
        let collapsed = self.whitespace.replace_all(raw, " ");
        push_run(runs, decode_entities(&collapsed), style);
    }
}

fn push_run(runs: &mut Vec<StyledRun>, text: String, style: TextStyle) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(&text),
        _ => runs.push(StyledRun { text, style }),
    }
}

/// `"5"` is absolute, `"+1"`/`"-2"` are relative to `current`. Clamped to 1..=7.
fn parse_size_step(value: &str, current: i32) -> Option<i32> {
    let value = value.trim();
    let step = if value.starts_with('+') || value.starts_with('-') {
        current + value.parse::<i32>().ok()?
    } else {
        value.parse::<i32>().ok()?
    };
    Some(step.clamp(1, FONT_SIZES.len() as i32))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Options for measuring text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutOptions {
    /// Wrap width. Only honored when `multiline` is set.
    pub width: Option<f32>,
    pub multiline: bool,
    pub align: HorizontalAlign,
}

/// Measured text ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub runs: Vec<StyledRun>,
    pub font: Font,
    pub lines: Vec<String>,
    pub align: HorizontalAlign,
    pub content_size: Size,
}

impl TextLayout {
    /// Width of one glyph relative to the font size in [`monospace`](Self::monospace).
    pub const GLYPH_ADVANCE: f32 = 0.6;
    /// Line height relative to the font size in [`monospace`](Self::monospace).
    pub const LINE_SPACING: f32 = 1.2;

    /// Lay out runs with fixed-advance metrics.
    ///
    /// Glyphs are sized by the largest run size, so markup such as
    /// `<font size=7>` grows the whole layout. `font` only sizes a layout
    /// without runs; runs decoded by a [`MarkupDecoder`] already start at
    /// the decoder's font size.
    ///
    /// Multiline layouts wrap on spaces at the requested width and report
    /// that width. Single-line layouts ignore newlines in the width and
    /// report the natural text extent.
    pub fn monospace(runs: &[StyledRun], font: &Font, options: &LayoutOptions) -> Self {
        let text: String = runs.iter().map(|run| run.text.as_str()).collect();
        let size = runs
            .iter()
            .map(|run| run.style.size)
            .reduce(f32::max)
            .unwrap_or(font.size);
        let advance = size * Self::GLYPH_ADVANCE;

        let lines: Vec<String> = match (options.multiline, options.width) {
            (true, Some(width)) if width > 0.0 => {
                let max_chars = ((width / advance).floor() as usize).max(1);
                text.split('\n')
                    .flat_map(|paragraph| wrap(paragraph, max_chars))
                    .collect()
            }
            (true, _) => text.split('\n').map(str::to_string).collect(),
            (false, _) => vec![text.replace('\n', " ")],
        };

        let widest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32
            * advance;
        let width = match (options.multiline, options.width) {
            (true, Some(width)) if width > 0.0 => width,
            _ => widest,
        };
        let height = if text.is_empty() {
            0.0
        } else {
            lines.len() as f32 * size * Self::LINE_SPACING
        };

        Self {
            runs: runs.to_vec(),
            font: font.clone(),
            lines,
            align: options.align,
            content_size: Size::new(width, height),
        }
    }

    /// All text in the layout.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

fn wrap(paragraph: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in paragraph.split(' ') {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    lines.push(line);
    lines
}

impl HasIntrinsicSize for TextLayout {
    fn width(&self) -> f32 {
        self.content_size.width
    }

    fn height(&self) -> f32 {
        self.content_size.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> MarkupDecoder {
        MarkupDecoder::new(Font::default()).unwrap()
    }

    fn mono() -> Font {
        Font::new("Mono", 10.0)
    }

    #[test]
    fn test_plain_text_single_run() {
        let runs = decoder().decode("Hello   world");
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello world");
        assert_eq!(runs[0].style.size, 12.0);
    }

    #[test]
    fn test_nested_styles() {
        let runs = decoder().decode("a<b>b<i>c</i></b>d");
        let texts: Vec<_> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c", "d"]);
        assert!(runs[1].style.bold && !runs[1].style.italic);
        assert!(runs[2].style.bold && runs[2].style.italic);
        assert!(!runs[3].style.bold);
    }

    #[test]
    fn test_font_attributes() {
        let runs = decoder().decode(r##"<font color="#ff0000" size="+2">big</font>"##);
        assert_eq!(runs[0].style.color, Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(runs[0].style.size, FONT_SIZES[4]);

        let runs = decoder().decode("<font size=1>tiny</font>");
        assert_eq!(runs[0].style.size, 8.0);
    }

    #[test]
    fn test_entities_and_breaks() {
        let d = decoder();
        assert_eq!(d.plain_text("a &lt;b&gt; &amp;amp;"), "a <b> &amp;");
        assert_eq!(d.plain_text("one<br>two"), "one\ntwo");
        assert_eq!(d.plain_text("<marquee>kept</marquee>"), "kept");
    }

    #[test]
    fn test_monospace_single_line() {
        let runs = MarkupDecoder::new(mono()).unwrap().decode("abcd");
        let layout = TextLayout::monospace(&runs, &mono(), &LayoutOptions::default());
        assert!((layout.width() - 24.0).abs() < 1e-4);
        assert!((layout.height() - 12.0).abs() < 1e-4);
        assert_eq!(layout.line_count(), 1);
    }

    #[test]
    fn test_monospace_wraps_to_width() {
        let runs = MarkupDecoder::new(mono()).unwrap().decode("aaa bbb ccc");
        let options = LayoutOptions {
            width: Some(30.0),
            multiline: true,
            align: HorizontalAlign::Left,
        };
        let layout = TextLayout::monospace(&runs, &mono(), &options);
        assert_eq!(layout.lines, ["aaa", "bbb", "ccc"]);
        assert_eq!(layout.width(), 30.0);
        assert!((layout.height() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_run_size_wins_over_layout_font() {
        let runs = decoder().decode("<font size=1>tiny</font>");
        let layout = TextLayout::monospace(&runs, &mono(), &LayoutOptions::default());
        assert!((layout.width() - 4.0 * 8.0 * TextLayout::GLYPH_ADVANCE).abs() < 1e-4);
        assert!((layout.height() - 8.0 * TextLayout::LINE_SPACING).abs() < 1e-4);

        let runs = MarkupDecoder::new(mono()).unwrap().decode("ab<font size=7>cd</font>");
        let layout = TextLayout::monospace(&runs, &mono(), &LayoutOptions::default());
        let largest = FONT_SIZES[6];
        assert!((layout.width() - 4.0 * largest * TextLayout::GLYPH_ADVANCE).abs() < 1e-3);
    }

    #[test]
    fn test_empty_layout_has_no_size() {
        let layout = TextLayout::monospace(&[], &Font::default(), &LayoutOptions::default());
        assert_eq!(layout.intrinsic_size(), Size::ZERO);
    }

    #[test]
    fn test_align_names() {
        assert_eq!(HorizontalAlign::from_name("center"), Some(HorizontalAlign::Center));
        assert_eq!(HorizontalAlign::from_name("middle"), None);
    }
}
