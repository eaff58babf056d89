//! Output sanitizer for generated section bodies.
//!
//! Single-pass generation tends to echo headings: bolded sub-headers, markdown
//! headings, and the names of *other* sections leaking into a body. Each cleanup
//! is an explicit pattern-to-replacement rule applied in order.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct SanitizeRule {
    pub name: &'static str,
    pattern: Regex,
    replacement: String,
}

impl SanitizeRule {
    pub fn new(name: &'static str, pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, regex::NoExpand(&self.replacement))
            .into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct OutputSanitizer {
    rules: Vec<SanitizeRule>,
}

impl OutputSanitizer {
    /// Rules for a run whose document has the given sections.
    pub fn for_sections<S: AsRef<str>>(section_names: &[S]) -> Result<Self, regex::Error> {
        let mut rules = vec![
            SanitizeRule::new("crlf", r"\r\n", "\n")?,
            // "## Background" style headings inside a body
            SanitizeRule::new("markdown_heading", r"(?m)^[ \t]*#{1,6}[ \t]+[^\n]*(?:\n|$)", "")?,
            // a short bold line with no citation or sentence punctuation,
            // e.g. "**Key Contributions:**"; a bolded cited claim is kept
            SanitizeRule::new(
                "bold_subheader_line",
                r"(?m)^[ \t]*(?:\*\*|__)[^*_\n\[\].!?]{1,60}(?:\*\*|__)[ \t]*:?[ \t]*(?:\n|$)",
                "",
            )?,
        ];

        for name in section_names {
            let escaped = regex::escape(name.as_ref().trim());
            if escaped.is_empty() {
                continue;
            }
            // the section name alone on a line, with optional heading/bold markup
            rules.push(SanitizeRule::new(
                "section_name_line",
                &format!(r"(?mi)^[ \t]*(?:#{{1,6}}[ \t]*)?(?:\*\*|__)?[ \t]*{escaped}[ \t]*:?[ \t]*(?:\*\*|__)?[ \t]*:?[ \t]*(?:\n|$)"),
                "",
            )?);
            // "**Abstract:** text" or "Abstract: text" opening the body only
            rules.push(SanitizeRule::new(
                "section_label_prefix",
                &format!(r"(?i)\A\s*(?:\*\*|__)?{escaped}(?:\*\*|__)?[ \t]*:[ \t]*(?:\*\*|__)?[ \t]*"),
                "",
            )?);
        }

        rules.push(SanitizeRule::new("blank_line_runs", r"\n[ \t]*\n(?:[ \t]*\n)+", "\n\n")?);

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[SanitizeRule] {
        &self.rules
    }

    pub fn sanitize(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        for rule in &self.rules {
            text = rule.apply(&text);
        }
        text.trim().to_string()
    }
}
