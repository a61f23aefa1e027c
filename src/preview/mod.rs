//! Preview rendering.
//!
//! Turns a raw buffer into display markup by running a fixed sequence of
//! regex rewrites:
//! - ANSI foreground regions, then background regions, become colored spans
//! - Markdown delimiters become `<b>`, `<i>`, `<u>`, `<s>`, `<code>` and
//!   `<blockquote>`
//! - Unpaired delimiters, fences and stray escapes are stripped
//! - Newlines become `<br>`
//!
//! [`terminal`] paints the resulting markup onto a terminal.

mod pipeline;
pub mod terminal;

use crate::perf;

/// Render `source` into preview markup.
///
/// Total and deterministic: malformed input degrades to plain text, and text
/// without delimiters or escapes comes back unchanged.
pub fn render(source: &str) -> String {
    let _scope = perf::scope("preview.render");
    let mut text = source.to_string();
    let mut rewrites = 0usize;
    for stage in pipeline::stages() {
        if let Some(rewritten) = stage.apply(&text) {
            tracing::trace!(stage = %stage.name, "stage rewrote preview");
            rewrites += 1;
            text = rewritten;
        }
    }
    perf::log_event(
        "preview.render",
        format!(
            "chars={} stages={} rewrites={rewrites}",
            source.chars().count(),
            pipeline::stages().len()
        ),
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(render("just words"), "just words");
    }

    #[test]
    fn test_bold_example() {
        assert_eq!(render("Hello **world**"), "Hello <b>world</b>");
    }

    #[test]
    fn test_each_markdown_style_decodes() {
        assert_eq!(render("*a*"), "<i>a</i>");
        assert_eq!(render("__a__"), "<u>a</u>");
        assert_eq!(render("~~a~~"), "<s>a</s>");
        assert_eq!(render("`a`"), "<code>a</code>");
        assert_eq!(render("> a"), "<blockquote>a</blockquote>");
    }

    #[test]
    fn test_bold_is_extracted_before_italic() {
        assert_eq!(render("**b** and *i*"), "<b>b</b> and <i>i</i>");
    }

    #[test]
    fn test_leftover_star_after_bold_still_italicizes() {
        assert_eq!(render("***x***"), "<b><i>x</b></i>");
    }

    #[test]
    fn test_quote_only_at_line_start() {
        assert_eq!(
            render("a > b\n> c"),
            "a > b<br><blockquote>c</blockquote>"
        );
    }

    #[test]
    fn test_multi_line_quote() {
        assert_eq!(
            render("> one\n> two"),
            "<blockquote>one</blockquote><br><blockquote>two</blockquote>"
        );
    }

    #[test]
    fn test_color_block_renders_without_fences_or_escapes() {
        let out = render("```ansi\n\x1b[31mWarn\x1b[0m\n```");
        assert_eq!(out, r#"<br><span style="color:#e74c3c">Warn</span><br>"#);
    }

    #[test]
    fn test_background_wraps_foreground_span() {
        let out = render("\x1b[43mx \x1b[31mred\x1b[0m tail\x1b[0m");
        // The foreground pass claims the first reset, the background pass the second.
        assert_eq!(
            out,
            r#"<span style="background-color:#7c592e">x <span style="color:#e74c3c">red</span> tail</span>"#
        );
    }

    #[test]
    fn test_unmatched_markers_are_stripped() {
        assert_eq!(render("a * b"), "a  b");
        assert_eq!(render("snake__case"), "snakecase");
        assert_eq!(render("~~dangling"), "dangling");
        assert_eq!(render("tick ` here"), "tick  here");
    }

    #[test]
    fn test_stray_escapes_and_fences_are_stripped() {
        assert_eq!(render("\x1b[1;31mhi"), "hi");
        assert_eq!(render("```ansi\nx"), "<br>x");
        assert_eq!(render("```"), "");
        assert_eq!(render("\x1b[mx\x1b[0m"), "x");
    }

    #[test]
    fn test_ampersand_and_angle_bracket_pass_through() {
        let once = render("AT&T rocks, 1 < 2");
        assert_eq!(once, "AT&T rocks, 1 < 2");
        assert_eq!(render(&once), once);
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(render("a\n\nb"), "a<br><br>b");
    }

    #[test]
    fn test_markers_do_not_span_lines() {
        assert_eq!(render("__a\nb__"), "a<br>b");
        assert_eq!(render("~~a\nb~~"), "a<br>b");
    }

    #[test]
    fn test_render_is_deterministic() {
        let src = "**x** \x1b[32mgo\x1b[0m\n> q";
        assert_eq!(render(src), render(src));
    }
}
