use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::FormatConfig;

/// Renders an entry title as `<h1><a>first</a></h1>` followed by one `<h2>`
/// per remaining delimiter-separated segment.
#[derive(Debug, Clone)]
pub struct TitleFormatter {
    delimiters: Vec<String>,
    untitled: String,
    missing_link: String,
}

impl TitleFormatter {
    pub fn new(config: &FormatConfig) -> Self {
        Self {
            delimiters: config
                .title_delimiters
                .iter()
                .filter(|d| !d.is_empty())
                .cloned()
                .collect(),
            untitled: config.untitled.clone(),
            missing_link: config.missing_link.clone(),
        }
    }

    /// Split on whichever configured delimiter occurs first, repeatedly.
    pub fn segments<'a>(&self, title: &'a str) -> Vec<&'a str> {
        let mut segments = Vec::new();
        let mut rest = title;

        loop {
            let next = self
                .delimiters
                .iter()
                .filter_map(|d| rest.find(d.as_str()).map(|pos| (pos, d.len())))
                .min_by_key(|(pos, _)| *pos);

            match next {
                Some((pos, len)) => {
                    segments.push(&rest[..pos]);
                    rest = &rest[pos + len..];
                }
                None => {
                    segments.push(rest);
                    break;
                }
            }
        }

        segments
    }

    pub fn format(&self, title: Option<&str>, link: Option<&str>) -> String {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.untitled);
        let link = link
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.missing_link);

        let mut segments = self.segments(title).into_iter().map(str::trim);
        let head = segments.next().unwrap_or_default();

        let mut html = format!(
            r#"<h1><a href="{}" target="_blank" rel="noopener">{}</a></h1>"#,
            encode_double_quoted_attribute(link),
            encode_text(head)
        );

        for segment in segments.filter(|s| !s.is_empty()) {
            html.push_str("<h2>");
            html.push_str(&encode_text(segment));
            html.push_str("</h2>");
        }

        html
    }
}

impl Default for TitleFormatter {
    fn default() -> Self {
        Self::new(&FormatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_em_dash_title() {
        let formatter = TitleFormatter::default();
        assert_eq!(
            formatter.format(Some("A \u{2014} B \u{2014} C"), Some("http://x")),
            r#"<h1><a href="http://x" target="_blank" rel="noopener">A</a></h1><h2>B</h2><h2>C</h2>"#
        );
    }

    #[test]
    fn test_mojibake_em_dash_title() {
        let formatter = TitleFormatter::default();
        assert_eq!(
            formatter.format(Some("A â€” B â€” C"), Some("http://x")),
            r#"<h1><a href="http://x" target="_blank" rel="noopener">A</a></h1><h2>B</h2><h2>C</h2>"#
        );
    }

    #[test]
    fn test_mixed_encodings_in_one_title() {
        let formatter = TitleFormatter::default();
        assert_eq!(
            formatter.segments("A â€” B \u{2014} C"),
            vec!["A", "B", "C"]
        );
    }

    #[test]
    fn test_plain_title_has_no_subheadings() {
        let formatter = TitleFormatter::default();
        let html = formatter.format(Some("Just a title"), Some("http://x"));
        assert!(html.contains(">Just a title</a></h1>"));
        assert!(!html.contains("<h2>"));
    }

    #[test]
    fn test_ascii_hyphen_is_not_a_delimiter() {
        let formatter = TitleFormatter::default();
        assert_eq!(formatter.segments("A - B"), vec!["A - B"]);
        assert_eq!(formatter.segments("A\u{2014}B"), vec!["A\u{2014}B"]);
    }

    #[test]
    fn test_placeholders() {
        let formatter = TitleFormatter::default();
        assert_eq!(
            formatter.format(None, None),
            r##"<h1><a href="#" target="_blank" rel="noopener">Untitled</a></h1>"##
        );
        assert_eq!(
            formatter.format(Some("   "), Some("")),
            r##"<h1><a href="#" target="_blank" rel="noopener">Untitled</a></h1>"##
        );
    }

    #[test]
    fn test_title_text_is_escaped() {
        let formatter = TitleFormatter::default();
        let html = formatter.format(Some("<script>x</script> \u{2014} a & b"), Some("http://x?a=\"1\""));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<h2>a &amp; b</h2>"));
        assert!(html.contains(r#"href="http://x?a=&quot;1&quot;""#));
    }

    #[test]
    fn test_configurable_delimiter() {
        let formatter = TitleFormatter::new(&FormatConfig {
            title_delimiters: vec![" | ".into()],
            ..FormatConfig::default()
        });
        let html = formatter.format(Some("A | B \u{2014} C"), Some("http://x"));
        assert!(html.ends_with("<h2>B \u{2014} C</h2>"));
    }
}
