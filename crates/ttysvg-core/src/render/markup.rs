//! Small markup helpers shared by the layer writers.

use std::fmt::Write as _;
use std::io;
use std::io::Write;

use super::options::Palette;
use crate::style::TextStyle;

/// Formats a coordinate or time without trailing zeros, at most three
/// decimals.
pub fn num(value: f64) -> String {
    trimmed(value, 3)
}

/// Formats a point in time with microsecond precision.
pub fn time(value: f64) -> String {
    trimmed(value, 6)
}

/// Like [`time`], but a positive duration never collapses to `0`, which
/// would make the animation attribute invalid.
pub fn duration(value: f64) -> String {
    let s = trimmed(value, 6);
    if value > 0.0 && s == "0" {
        "0.000001".to_string()
    } else {
        s
    }
}

fn trimmed(value: f64, decimals: usize) -> String {
    let mut s = format!("{value:.decimals$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Escapes text for use inside an element or a single-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        push_escaped(&mut out, ch);
    }
    out
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '\'' => out.push_str("&apos;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}

/// Like [`escape`], but spaces become non-breaking so SVG whitespace
/// handling cannot collapse them.
pub fn push_glyphs(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == ' ' {
            out.push_str("&#160;");
        } else {
            push_escaped(out, ch);
        }
    }
}

/// Presentation attributes for a non-plain text style, each with a leading
/// space.
pub fn style_attrs(style: &TextStyle, palette: &Palette) -> String {
    let mut attrs = String::new();
    if !style.fg.is_default_foreground() {
        let _ = write!(attrs, " fill='#{}'", palette.resolve(style.fg));
    }
    if style.bold {
        attrs.push_str(" font-weight='bold'");
    }
    if style.underline {
        attrs.push_str(" text-decoration='underline'");
    }
    attrs
}

/// The child that reveals its hidden parent for one interval of the loop.
pub fn reveal(out: &mut dyn Write, begin: f64, dur: f64) -> io::Result<()> {
    writeln!(
        out,
        " <set attributeType='XML' attributeName='display' to='inline' begin='start.begin+{}' dur='{}'/>",
        time(begin),
        duration(dur)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ColorRef;

    #[test]
    fn test_num_trims_trailing_zeros() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(2.25), "2.25");
        assert_eq!(num(1.0 / 3.0), "0.333");
        assert_eq!(num(-0.0), "0");
        assert_eq!(num(0.0001), "0");
        assert_eq!(num(1234.5678), "1234.568");
    }

    #[test]
    fn test_times_keep_microseconds() {
        assert_eq!(time(0.50999), "0.50999");
        assert_eq!(time(1.5), "1.5");
        assert_eq!(duration(0.0002), "0.0002");
        assert_eq!(duration(2.0), "2");
    }

    #[test]
    fn test_positive_duration_never_prints_zero() {
        assert_eq!(duration(1e-9), "0.000001");
        assert_eq!(duration(0.0), "0");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    }

    #[test]
    fn test_push_glyphs_uses_nbsp() {
        let mut out = String::new();
        push_glyphs(&mut out, "a <");
        assert_eq!(out, "a&#160;&lt;");
    }

    #[test]
    fn test_style_attrs() {
        let palette = Palette::default();
        assert_eq!(style_attrs(&TextStyle::PLAIN, &palette), "");
        let style = TextStyle {
            fg: ColorRef::Indexed(2),
            bold: true,
            underline: true,
        };
        assert_eq!(
            style_attrs(&style, &palette),
            " fill='#00cd00' font-weight='bold' text-decoration='underline'"
        );
    }

    #[test]
    fn test_reveal() {
        let mut out = Vec::new();
        reveal(&mut out, 1.5, 0.25).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("begin='start.begin+1.5'"));
        assert!(text.contains("dur='0.25'"));
    }
}
