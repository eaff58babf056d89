//! Markdown and HTML output.

use std::iter;

use pulldown_cmark::{html, Event, Options, Parser};

use crate::document::GeneratedDocument;

pub trait Renderer {
    /// File extension for the rendered output, without the dot.
    fn extension(&self) -> &'static str;
    fn render(&self, doc: &GeneratedDocument) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn body(doc: &GeneratedDocument) -> String {
        let mut out = format!("# Research Paper: {}\n\n", doc.topic);
        for section in &doc.sections {
            out.push_str(&format!("## {}\n\n{}\n\n", section.name, section.body));
        }
        out
    }

    fn references(doc: &GeneratedDocument) -> String {
        let mut out = String::from("## References\n\n");
        for line in doc.formatted_references() {
            out.push_str(&line);
            out.push_str("\n\n");
        }
        out
    }
}

impl Renderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render(&self, doc: &GeneratedDocument) -> String {
        let mut out = Self::body(doc);
        out.push_str(&Self::references(doc));
        out
    }
}

const STYLESHEET: &str = r#"
    body { font-family: Arial, sans-serif; line-height: 1.6; margin: 40px; font-size: 12pt; }
    h1 { font-size: 18pt; text-align: center; margin-bottom: 30px; color: #2c3e50; }
    h2 { font-size: 16pt; margin-top: 25px; margin-bottom: 15px; color: #34495e; border-bottom: 1px solid #ecf0f1; padding-bottom: 5px; }
    p { margin-bottom: 15px; text-align: justify; }
    .references { margin-top: 30px; font-size: 11pt; }
    .references p { margin-bottom: 8px; }
"#;

/// Standalone HTML page with an embedded print stylesheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

/// Model output and paper metadata are untrusted, so raw HTML in the markdown
/// is emitted as escaped text rather than markup.
fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    html::push_html(&mut out, iter::once(Event::Text(s.into())));
    out
}

impl Renderer for HtmlRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, doc: &GeneratedDocument) -> String {
        let body = markdown_to_html(&MarkdownRenderer::body(doc));
        let references = markdown_to_html(&MarkdownRenderer::references(doc));
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Research Paper: {title}</title>\n\
             <style>{STYLESHEET}</style>\n</head>\n<body>\n{body}<div class=\"references\">\n{references}</div>\n</body>\n</html>\n",
            title = escape_text(&doc.topic),
        )
    }
}
