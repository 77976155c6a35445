//! Markdown processing pipeline with TOC injection.

pub mod highlight;
pub mod mdx;

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

pub use highlight::HighlightTransformer;
pub use mdx::strip_mdx_constructs;

#[derive(Debug, Clone)]
struct TocItem {
    level: u32,
    title: String,
    id: String,
}

/// Markdown processor producing page HTML plus a TOC fragment
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Convert markdown to HTML
    ///
    /// Returns a tuple of (html, toc_html). `toc_html` is `None` when the
    /// document has no headings. A literal `{{toc}}` marker in the body is
    /// replaced with the rendered TOC.
    pub fn convert(&self, markdown: &str) -> (String, Option<String>) {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();

        // Collect headings for the TOC and later id injection
        let headings = collect_headings(&events);

        let events = attach_heading_ids(to_static(events), &headings);
        let events = add_heading_anchors(events);

        // Apply syntax highlighting to code blocks
        let highlight_transformer = HighlightTransformer::new();
        let events = highlight_transformer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        let toc_html = if headings.is_empty() {
            None
        } else {
            Some(render_toc(&headings))
        };

        // Inject the TOC where the body asks for it; without headings the
        // marker is dropped rather than left in the page
        let toc_fragment = toc_html.as_deref().unwrap_or("");
        html_output = html_output
            .replace("<p>{{toc}}</p>", toc_fragment)
            .replace("{{toc}}", toc_fragment);

        (html_output, toc_html)
    }

    /// Convert an `.mdx` source: ESM statements and JSX comments are
    /// stripped first, the remainder goes through the normal pipeline.
    pub fn convert_mdx(&self, mdx: &str) -> (String, Option<String>) {
        let markdown = strip_mdx_constructs(mdx);
        self.convert(&markdown)
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_headings(events: &[Event]) -> Vec<TocItem> {
    let mut toc: Vec<TocItem> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut current: Option<(u32, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((*level as u32, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_level, ref mut title)) = current {
                    title.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current.take() {
                    let base = slugify(&title);
                    // Repeated headings get -2, -3... so anchors stay unique
                    let count = seen.entry(base.clone()).or_insert(0);
                    *count += 1;
                    let id = if *count == 1 {
                        base
                    } else {
                        format!("{}-{}", base, count)
                    };
                    toc.push(TocItem { level, title, id });
                }
            }
            _ => {}
        }
    }

    toc
}

fn attach_heading_ids(
    mut events: Vec<Event<'static>>,
    headings: &[TocItem],
) -> Vec<Event<'static>> {
    let mut heading_iter = headings.iter();
    let mut result = Vec::with_capacity(events.len());

    for event in events.drain(..) {
        match event {
            Event::Start(Tag::Heading {
                level,
                mut id,
                classes,
                attrs,
            }) => {
                let next = heading_iter.next();
                if id.is_none() {
                    if let Some(next) = next {
                        id = Some(CowStr::Boxed(next.id.clone().into_boxed_str()));
                    }
                }
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            _ => result.push(event),
        }
    }

    result
}

fn add_heading_anchors(events: Vec<Event<'static>>) -> Vec<Event<'static>> {
    let mut result = Vec::with_capacity(events.len());
    let mut current_id: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                current_id = id.as_ref().map(|s| s.to_string());
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            Event::End(TagEnd::Heading(level)) => {
                if let Some(id) = current_id.take() {
                    let anchor = format!(
                        "<a class=\"heading-anchor\" href=\"#{}\" aria-label=\"Link to heading\">#</a>",
                        html_escape(&id)
                    );
                    result.push(Event::Html(CowStr::Boxed(anchor.into_boxed_str())));
                }
                result.push(Event::End(TagEnd::Heading(level)));
            }
            other => result.push(other),
        }
    }

    result
}

fn render_toc(headings: &[TocItem]) -> String {
    let mut html = String::from(r#"<nav class="toc-nav"><h3>Contents</h3><ul class="toc-list">"#);
    for h in headings {
        html.push_str(&format!(
            r##"<li class="toc-level-{}"><a href="#{}">{}</a></li>"##,
            h.level,
            h.id,
            html_escape(&h.title)
        ));
    }
    html.push_str("</ul></nav>");
    html
}

fn to_static(events: Vec<Event<'_>>) -> Vec<Event<'static>> {
    events
        .into_iter()
        .map(highlight::event_into_static)
        .collect()
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
