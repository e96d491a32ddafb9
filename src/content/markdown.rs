//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

fn options() -> Options {
    // Front matter is stripped before the body reaches the parser
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with the default theme
    pub fn new() -> Self {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create a renderer following the site's highlight settings
    pub fn with_config(config: &HighlightConfig) -> Self {
        let theme = if config.enable {
            let mut theme_set = ThemeSet::load_defaults();
            let theme = theme_set.themes.remove(&config.theme);
            if theme.is_none() {
                tracing::warn!(
                    "Unknown highlight theme {:?}, code blocks will not be highlighted",
                    config.theme
                );
            }
            theme
        } else {
            None
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, options());

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            (!lang.is_empty()).then_some(lang)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let class = lang.unwrap_or("text");

        let highlighted = match (lang, &self.theme) {
            (Some(lang), Some(theme)) => {
                let syntax = self
                    .syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
                    .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            }
            _ => None,
        };

        match highlighted {
            Some(html) => format!(r#"<figure class="highlight {}">{}</figure>"#, class, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                class,
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the readable text of a markdown document
///
/// Inline markup is dropped without splitting words; block boundaries become spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    let mut opts = options();
    opts.remove(Options::ENABLE_SMART_PUNCTUATION);

    for event in Parser::new_ext(markdown, opts) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::Rule => text.push(' '),
            Event::End(end)
                if !matches!(
                    end,
                    TagEnd::Emphasis
                        | TagEnd::Strong
                        | TagEnd::Strikethrough
                        | TagEnd::Link
                        | TagEnd::Image
                ) =>
            {
                text.push(' ')
            }
            _ => {}
        }
    }

    text
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"class="highlight rust""#));
        assert!(!html.contains("```"));
    }

    #[test]
    fn test_render_plain_code_block_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("    <b>not bold</b>\n");
        assert!(html.contains(r#"<pre><code class="language-text">&lt;b&gt;"#));
    }

    #[test]
    fn test_highlighting_disabled() {
        let renderer = MarkdownRenderer::with_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        });
        let html = renderer.render("```rust\nlet x = 1;\n```");
        assert!(html.contains(r#"<code class="language-rust">let x = 1;"#));
    }

    #[test]
    fn test_plain_text_keeps_words_whole() {
        assert_eq!(plain_text("un*believ*able").split_whitespace().count(), 1);
        let text = plain_text("# Title\nFirst line\nsecond `code` line\n\n- a\n- b");
        assert_eq!(
            text.split_whitespace().collect::<Vec<_>>(),
            vec!["Title", "First", "line", "second", "code", "line", "a", "b"]
        );
    }

    #[test]
    fn test_plain_text_includes_code_blocks() {
        let text = plain_text("Intro\n\n```sh\ncargo run --release\n```\n");
        assert_eq!(text.split_whitespace().count(), 4);
    }
}
