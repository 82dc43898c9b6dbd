//! MDX body compilation using pulldown-cmark.
//!
//! The body (metadata block already removed) goes through three passes:
//!
//! 1. top-level `import`/`export` blocks are hoisted out as ESM
//! 2. JSX tags and `{expression}` spans are swapped for placeholders, so
//!    markdown parsing can neither split nor reinterpret them
//! 3. markdown renders as JSX against an overridable `_components` mapping,
//!    with the placeholders spliced back verbatim
//!
//! The result is a JSX module:
//!
//! ```text
//! import React from "react";
//! <esm blocks>
//! function MDXContent(props = {}) {
//!   const _components = Object.assign({ h1: "h1" }, props.components);
//!   return <><_components.h1>{"Hello"}</_components.h1></>;
//! }
//! export default MDXContent;
//! ```
//!
//! Syntax is not checked here; the import rewriting pass parses the module.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TextMergeStream};
use rustc_hash::FxHashMap;

/// Options for markdown conversion
#[derive(Debug, Clone, Default)]
pub struct MarkdownOptions {
    /// Enable tables extension
    pub tables: bool,
    /// Enable footnotes extension (`[^label]`)
    pub footnotes: bool,
    /// Enable strikethrough extension
    pub strikethrough: bool,
    /// Enable task lists extension
    pub task_lists: bool,
    /// Enable heading attributes extension (e.g., `# Heading {#custom-id}`)
    pub heading_attributes: bool,
    /// Enable `$inline$` and `$$display$$` math
    pub math: bool,
}

impl MarkdownOptions {
    /// Create options with all extensions enabled
    pub fn all() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            heading_attributes: true,
            math: true,
        }
    }

    /// Convert to pulldown-cmark Options
    fn to_pulldown_options(&self) -> Options {
        let mut opts = Options::empty();
        if self.tables {
            opts.insert(Options::ENABLE_TABLES);
        }
        if self.footnotes {
            opts.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.strikethrough {
            opts.insert(Options::ENABLE_STRIKETHROUGH);
        }
        if self.task_lists {
            opts.insert(Options::ENABLE_TASKLISTS);
        }
        if self.heading_attributes {
            opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        }
        if self.math {
            opts.insert(Options::ENABLE_MATH);
        }
        opts
    }
}

/// Compile an MDX body into JSX module text.
pub fn compile_body(body: &str, options: &MarkdownOptions) -> String {
    let (esm, markdown) = split_esm(body);
    let (islands, markdown) = Islands::protect(&markdown);

    let mut writer = JsxWriter {
        islands,
        ..JsxWriter::default()
    };
    let parser = Parser::new_ext(&markdown, options.to_pulldown_options());
    for event in TextMergeStream::new(parser) {
        writer.handle_event(event);
    }

    writer.into_module(&esm)
}

// =============================================================================
// ESM extraction
// =============================================================================

/// Separate top-level ESM blocks from markdown.
///
/// An ESM block starts with a column-0 `import`/`export` line and runs to the
/// first blank line at which its brackets balance. Its lines are blanked in
/// the markdown so line structure is unchanged.
fn split_esm(source: &str) -> (Vec<String>, String) {
    let mut esm = Vec::new();
    let mut markdown = String::with_capacity(source.len());
    let mut current: Option<String> = None;
    let mut fence: Option<&str> = None;

    for line in source.split_inclusive('\n') {
        if let Some(block) = current.as_mut() {
            if line.trim().is_empty() && bracket_depth(block) <= 0 {
                esm.extend(current.take());
                markdown.push_str(line);
            } else {
                block.push_str(line);
                markdown.push('\n');
            }
            continue;
        }

        if let Some(open) = fence {
            if fence_marker(line) == Some(open) {
                fence = None;
            }
        } else if let Some(open) = fence_marker(line) {
            fence = Some(open);
        } else if is_esm_start(line) {
            current = Some(line.to_string());
            markdown.push('\n');
            continue;
        }

        markdown.push_str(line);
    }
    esm.extend(current);

    (esm, markdown)
}

fn is_esm_start(line: &str) -> bool {
    ["import", "export"].iter().any(|keyword| {
        line.strip_prefix(keyword)
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_whitespace() || c == '{' || c == '*')
    })
}

fn fence_marker(line: &str) -> Option<&'static str> {
    let marker = line.trim_start();
    ["```", "~~~"].into_iter().find(|fence| marker.starts_with(fence))
}

// =============================================================================
// JS scanning
// =============================================================================

/// End of the string literal or comment starting at `bytes[i]`, if one does.
///
/// Unterminated literals run to the end of input.
fn skip_js_literal(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes[i] {
        quote @ (b'"' | b'\'' | b'`') => {
            let mut j = i + 1;
            while j < bytes.len() {
                match bytes[j] {
                    b'\\' => j += 2,
                    c if c == quote => return Some(j + 1),
                    _ => j += 1,
                }
            }
            Some(bytes.len())
        }
        b'/' => match bytes.get(i + 1) {
            Some(b'/') => Some(find_from(bytes, i, b"\n").unwrap_or(bytes.len())),
            Some(b'*') => Some(find_from(bytes, i + 2, b"*/").map_or(bytes.len(), |end| end + 2)),
            _ => None,
        },
        _ => None,
    }
}

/// Net count of open `(`, `[` and `{` in JS source.
fn bracket_depth(code: &str) -> i32 {
    let bytes = code.as_bytes();
    let mut depth = 0;
    let mut i = 0;
    while i < bytes.len() {
        if let Some(next) = skip_js_literal(bytes, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    depth
}

/// Length of the brace-balanced expression at the start of `text`.
fn balanced_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        if depth > 0
            && let Some(next) = skip_js_literal(bytes, i)
        {
            i = next;
            continue;
        }
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Length of the JSX tag at the start of `text`: `<Name attr={x}>`,
/// `<Name />`, `</Name>`, `<>` or `</>`.
fn jsx_tag_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let closing = bytes.get(1) == Some(&b'/');
    let mut i = if closing { 2 } else { 1 };

    let name = jsx_name_len(&bytes[i..]);
    if name == 0 {
        return (bytes.get(i) == Some(&b'>')).then_some(i + 1);
    }
    i += name;

    loop {
        let gap = whitespace_len(&bytes[i..]);
        i += gap;
        match bytes.get(i)? {
            b'>' => return Some(i + 1),
            b'/' if !closing && bytes.get(i + 1) == Some(&b'>') => return Some(i + 2),
            _ if closing || gap == 0 => return None,
            // spread: `{...props}`
            b'{' => i += balanced_len(&text[i..])?,
            _ => {
                let attr = jsx_name_len(&bytes[i..]);
                if attr == 0 {
                    return None;
                }
                i += attr;

                let eq = i + whitespace_len(&bytes[i..]);
                if bytes.get(eq) == Some(&b'=') {
                    let value = eq + 1 + whitespace_len(&bytes[eq + 1..]);
                    i = value + attr_value_len(&text[value..])?;
                }
            }
        }
    }
}

fn jsx_name_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => bytes
            .iter()
            .take_while(|&&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b':' | b'-'))
            .count(),
        _ => 0,
    }
}

fn attr_value_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    match *bytes.first()? {
        quote @ (b'"' | b'\'') => bytes[1..]
            .iter()
            .position(|&b| b == quote)
            .map(|end| end + 2),
        b'{' => balanced_len(text),
        _ => None,
    }
}

fn whitespace_len(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_whitespace()).count()
}

/// Length of the inline code span at the start of `text`, or of the bare
/// backtick run when it never closes within the paragraph.
fn code_span_len(text: &str) -> usize {
    let run = text.bytes().take_while(|&b| b == b'`').count();
    let end = text.find("\n\n").unwrap_or(text.len());
    let bytes = &text.as_bytes()[..end];

    let mut i = run;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let close = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            if close == run {
                return i + close;
            }
            i += close;
        } else {
            i += 1;
        }
    }
    run
}

fn find_from(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| from + at)
}

// =============================================================================
// Islands
// =============================================================================

/// Placeholder delimiters: `\u{e000}<index>\u{e001}`.
const ISLAND_OPEN: char = '\u{e000}';
const ISLAND_CLOSE: char = '\u{e001}';

/// JSX tags and `{expression}` spans lifted out of the markdown.
#[derive(Debug, Default)]
struct Islands {
    spans: Vec<String>,
}

impl Islands {
    /// Replace JSX tags and expressions in `markdown` with placeholders.
    ///
    /// Fenced code and inline code spans are left alone, HTML comments are
    /// dropped.
    fn protect(markdown: &str) -> (Self, String) {
        let mut islands = Self::default();
        let mut out = String::with_capacity(markdown.len());
        let bytes = markdown.as_bytes();
        let mut fence: Option<&str> = None;
        let mut line_start = true;
        let mut i = 0;

        while i < bytes.len() {
            if line_start {
                let end = find_from(bytes, i, b"\n").map_or(bytes.len(), |nl| nl + 1);
                let line = &markdown[i..end];
                let marker = fence_marker(line);
                if fence.is_some() || marker.is_some() {
                    fence = match fence {
                        Some(open) if marker == Some(open) => None,
                        Some(open) => Some(open),
                        None => marker,
                    };
                    out.push_str(line);
                    i = end;
                    continue;
                }
                line_start = false;
            }

            let rest = &markdown[i..];
            match bytes[i] {
                b'\n' => {
                    line_start = true;
                    out.push('\n');
                    i += 1;
                }
                b'`' => {
                    let len = code_span_len(rest);
                    out.push_str(&rest[..len]);
                    i += len;
                }
                b'\\' => {
                    let len = 1 + rest[1..].chars().next().map_or(0, char::len_utf8);
                    out.push_str(&rest[..len]);
                    i += len;
                }
                b'<' if rest.starts_with("<!--") => {
                    i = find_from(bytes, i + 4, b"-->").map_or(bytes.len(), |end| end + 3);
                }
                b'{' | b'<' => {
                    let len = if bytes[i] == b'{' {
                        balanced_len(rest)
                    } else {
                        jsx_tag_len(rest)
                    };
                    match len {
                        Some(len) => {
                            islands.push(&rest[..len], &mut out);
                            i += len;
                        }
                        None => {
                            out.push(char::from(bytes[i]));
                            i += 1;
                        }
                    }
                }
                _ => {
                    let Some(c) = rest.chars().next() else {
                        break;
                    };
                    out.push(c);
                    i += c.len_utf8();
                }
            }
        }

        (islands, out)
    }

    fn push(&mut self, span: &str, out: &mut String) {
        out.push(ISLAND_OPEN);
        out.push_str(&self.spans.len().to_string());
        out.push(ISLAND_CLOSE);
        self.spans.push(span.to_string());
    }

    fn get(&self, index: usize) -> &str {
        self.spans.get(index).map_or("", String::as_str)
    }

    /// Put the original source back into `text`.
    fn restore(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some((before, index, after)) = next_island(rest) {
            out.push_str(before);
            out.push_str(self.get(index));
            rest = after;
        }
        out.push_str(rest);
        out
    }
}

/// Split `text` around its first placeholder.
fn next_island(text: &str) -> Option<(&str, usize, &str)> {
    let start = text.find(ISLAND_OPEN)?;
    let digits = start + ISLAND_OPEN.len_utf8();
    let len = text[digits..].find(ISLAND_CLOSE)?;
    let index = text[digits..digits + len].parse().ok()?;
    let after = digits + len + ISLAND_CLOSE.len_utf8();
    Some((&text[..start], index, &text[after..]))
}

// =============================================================================
// Markdown → JSX
// =============================================================================

/// What to emit when a markdown tag closes.
enum Closer {
    Element(&'static str),
    Paragraph,
    CodeBlock,
    Image { src: String, title: String },
    TableHead,
    Table,
    Nothing,
}

/// Paragraph being written; dropped on close when it holds only islands.
struct Paragraph {
    open_at: usize,
    body_at: usize,
    has_content: bool,
}

#[derive(Default)]
struct JsxWriter {
    /// Rendered children of the root fragment
    out: String,
    /// Open markdown tags
    closers: Vec<Closer>,
    /// Intrinsic components referenced, in first-seen order
    components: Vec<&'static str>,
    islands: Islands,
    paragraph: Option<Paragraph>,
    /// Footnote label → number, in first-seen order
    footnotes: FxHashMap<String, usize>,
    /// Alt text of the image being collected
    alt: Option<String>,
    in_code_block: bool,
    in_table_head: bool,
    tbody_open: bool,
}

impl JsxWriter {
    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.end_tag(),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.add_inline_code(&code),
            Event::InlineMath(math) => self.add_math(&math, "math math-inline"),
            Event::DisplayMath(math) => self.add_math(&math, "math math-display"),
            Event::Html(html) | Event::InlineHtml(html) => self.add_jsx(&html),
            Event::SoftBreak => self.push_literal("\n"),
            Event::HardBreak => self.void_element("br", &[]),
            Event::Rule => self.void_element("hr", &[]),
            Event::FootnoteReference(label) => self.add_footnote_reference(&label),
            Event::TaskListMarker(checked) => self.add_task_marker(checked),
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        let closer = match tag {
            Tag::Paragraph => {
                let open_at = self.out.len();
                self.open("p", &[]);
                self.paragraph = Some(Paragraph {
                    open_at,
                    body_at: self.out.len(),
                    has_content: false,
                });
                Closer::Paragraph
            }
            Tag::Heading { level, id, .. } => {
                let attrs: Vec<(&str, String)> = id
                    .map(|id| ("id", self.islands.restore(&id)))
                    .into_iter()
                    .collect();
                self.open(heading_tag(level), &attrs)
            }
            Tag::BlockQuote(_) => self.open("blockquote", &[]),
            Tag::CodeBlock(kind) => {
                let attrs: Vec<(&str, String)> = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        let lang = lang.split_whitespace().next().unwrap_or_default();
                        vec![("className", format!("language-{lang}"))]
                    }
                    _ => vec![],
                };
                self.open("pre", &[]);
                self.open("code", &attrs);
                self.in_code_block = true;
                Closer::CodeBlock
            }
            Tag::List(Some(start)) => {
                let attrs: Vec<(&str, String)> = if start == 1 {
                    vec![]
                } else {
                    vec![("start", start.to_string())]
                };
                self.open("ol", &attrs)
            }
            Tag::List(None) => self.open("ul", &[]),
            Tag::Item => self.open("li", &[]),
            Tag::FootnoteDefinition(label) => {
                let number = self.footnote_number(&label);
                let closer = self.open(
                    "div",
                    &[
                        ("id", format!("fn-{label}")),
                        ("className", "footnote-definition".to_string()),
                    ],
                );
                self.open("sup", &[]);
                self.push_literal(&number.to_string());
                self.close("sup");
                closer
            }
            Tag::Table(_) => self.open("table", &[]),
            Tag::TableHead => {
                self.open("thead", &[]);
                self.open("tr", &[]);
                self.in_table_head = true;
                Closer::TableHead
            }
            Tag::TableRow => self.open("tr", &[]),
            Tag::TableCell => {
                let cell = if self.in_table_head { "th" } else { "td" };
                self.open(cell, &[])
            }
            Tag::Emphasis => self.open("em", &[]),
            Tag::Strong => self.open("strong", &[]),
            Tag::Strikethrough => self.open("del", &[]),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut attrs = vec![("href", self.islands.restore(&dest_url))];
                if !title.is_empty() {
                    attrs.push(("title", self.islands.restore(&title)));
                }
                self.open("a", &attrs)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.alt = Some(String::new());
                Closer::Image {
                    src: self.islands.restore(&dest_url),
                    title: self.islands.restore(&title),
                }
            }
            _ => Closer::Nothing,
        };

        // `Table` closes its implicit tbody as well
        let closer = match closer {
            Closer::Element("table") => Closer::Table,
            other => other,
        };
        self.closers.push(closer);
    }

    fn end_tag(&mut self) {
        let Some(closer) = self.closers.pop() else {
            return;
        };

        match closer {
            Closer::Element(name) => self.close(name),
            // A paragraph of JSX and expressions only is flow content
            Closer::Paragraph => match self.paragraph.take() {
                Some(paragraph) if !paragraph.has_content => {
                    self.out.replace_range(paragraph.open_at..paragraph.body_at, "");
                }
                _ => self.close("p"),
            },
            Closer::CodeBlock => {
                self.in_code_block = false;
                self.close("code");
                self.close("pre");
            }
            Closer::Image { src, title } => {
                let alt = self.alt.take().unwrap_or_default();
                let mut attrs = vec![("src", src), ("alt", alt)];
                if !title.is_empty() {
                    attrs.push(("title", title));
                }
                self.void_element("img", &attrs);
            }
            Closer::TableHead => {
                self.in_table_head = false;
                self.close("tr");
                self.close("thead");
                self.open("tbody", &[]);
                self.tbody_open = true;
            }
            Closer::Table => {
                if std::mem::take(&mut self.tbody_open) {
                    self.close("tbody");
                }
                self.close("table");
            }
            Closer::Nothing => {}
        }
    }

    /// Add text content, splicing protected JSX and expressions back in
    fn add_text(&mut self, text: &str) {
        if let Some(alt) = self.alt.as_mut() {
            alt.push_str(&self.islands.restore(text));
            return;
        }
        if self.in_code_block {
            let text = self.islands.restore(text);
            self.push_literal(&text);
            return;
        }

        let mut rest = text;
        while let Some((before, index, after)) = next_island(rest) {
            self.push_literal(before);
            self.out.push_str(self.islands.get(index));
            rest = after;
        }
        self.push_literal(rest);
    }

    fn add_inline_code(&mut self, code: &str) {
        let code = self.islands.restore(code);
        self.open("code", &[]);
        self.push_literal(&code);
        self.close("code");
    }

    fn add_math(&mut self, math: &str, class: &str) {
        let math = self.islands.restore(math);
        self.open("code", &[("className", class.to_string())]);
        self.push_literal(&math);
        self.close("code");
    }

    /// Raw HTML that is not a JSX tag passes through as-is.
    fn add_jsx(&mut self, html: &str) {
        self.mark_content();
        let html = self.islands.restore(html);
        self.out.push_str(&html);
    }

    fn add_footnote_reference(&mut self, label: &str) {
        let number = self.footnote_number(label);
        self.open("sup", &[("className", "footnote-reference".to_string())]);
        self.open("a", &[("href", format!("#fn-{label}"))]);
        self.push_literal(&number.to_string());
        self.close("a");
        self.close("sup");
    }

    fn footnote_number(&mut self, label: &str) -> usize {
        let next = self.footnotes.len() + 1;
        *self.footnotes.entry(label.to_string()).or_insert(next)
    }

    fn add_task_marker(&mut self, checked: bool) {
        self.mark_content();
        self.register("input");
        self.out.push_str("<_components.input type=\"checkbox\" disabled");
        if checked {
            self.out.push_str(" checked");
        }
        self.out.push_str(" />");
    }

    fn open(&mut self, name: &'static str, attrs: &[(&str, String)]) -> Closer {
        self.mark_content();
        self.register(name);
        self.out.push_str("<_components.");
        self.out.push_str(name);
        push_attrs(&mut self.out, attrs);
        self.out.push('>');
        Closer::Element(name)
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</_components.");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn void_element(&mut self, name: &'static str, attrs: &[(&str, String)]) {
        self.mark_content();
        self.register(name);
        self.out.push_str("<_components.");
        self.out.push_str(name);
        push_attrs(&mut self.out, attrs);
        self.out.push_str(" />");
    }

    fn register(&mut self, name: &'static str) {
        if !self.components.contains(&name) {
            self.components.push(name);
        }
    }

    fn mark_content(&mut self) {
        if let Some(paragraph) = self.paragraph.as_mut() {
            paragraph.has_content = true;
        }
    }

    fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !text.trim().is_empty() {
            self.mark_content();
        }
        self.out.push('{');
        self.out.push_str(&js_string(text));
        self.out.push('}');
    }

    fn into_module(self, esm: &[String]) -> String {
        let mut module = String::new();

        if !imports_react(esm) {
            module.push_str("import React from \"react\";\n");
        }
        for block in esm {
            module.push_str(block.trim_end());
            module.push('\n');
        }

        let defaults = self
            .components
            .iter()
            .map(|name| format!("{name}: {}", js_string(name)))
            .collect::<Vec<_>>()
            .join(", ");

        module.push_str("function MDXContent(props = {}) {\n");
        module.push_str(&format!(
            "  const _components = Object.assign({{{defaults}}}, props.components);\n"
        ));
        module.push_str(&format!("  return <>{}</>;\n", self.out));
        module.push_str("}\n");
        module.push_str("export default MDXContent;\n");
        module
    }
}

fn push_attrs(out: &mut String, attrs: &[(&str, String)]) {
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("={");
        out.push_str(&js_string(value));
        out.push('}');
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Whether an ESM block already binds `React` through an import.
fn imports_react(esm: &[String]) -> bool {
    esm.iter().any(|block| {
        block.match_indices("import").any(|(at, keyword)| {
            let at_statement = block[..at]
                .chars()
                .next_back()
                .is_none_or(|c| c.is_whitespace() || c == ';');
            let clause = &block[at + keyword.len()..];
            let clause = clause.find("from").map_or("", |end| &clause[..end]);
            at_statement && clause_binds(clause, "React")
        })
    })
}

/// Whether an import clause (`A, { b as c }`, `* as D`) binds `name`.
fn clause_binds(clause: &str, name: &str) -> bool {
    let tokens: Vec<&str> = clause
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '{' | '}'))
        .filter(|token| !token.is_empty())
        .collect();

    tokens.iter().enumerate().any(|(i, &token)| {
        let renamed_to = i > 0 && tokens[i - 1] == "as";
        let renamed_from = tokens.get(i + 1) == Some(&"as");
        token == name && (renamed_to || !renamed_from)
    })
}

/// Quote `text` as a JS string literal.
pub(crate) fn js_string(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(source: &str) -> String {
        compile_body(source, &MarkdownOptions::all())
    }

    #[test]
    fn test_heading() {
        let module = compile("# Hello");
        assert!(module.contains("<_components.h1>{\"Hello\"}</_components.h1>"));
        assert!(module.contains("h1: \"h1\""));
        assert!(module.contains("export default MDXContent;"));
    }

    #[test]
    fn test_esm_hoisted() {
        let source = "import Chart from \"./chart\";\nexport const year = 2024;\n\n# Report\n\n<Chart />";
        let module = compile(source);

        let import_at = module.find("import Chart from \"./chart\";").unwrap();
        let component_at = module.find("function MDXContent").unwrap();
        assert!(import_at < component_at);
        assert!(module.contains("export const year = 2024;"));
        assert!(module.contains("<Chart />"));
    }

    #[test]
    fn test_esm_block_spans_blank_line_until_balanced() {
        let source = "export const cfg = {\n  a: 1,\n\n  b: 2\n};\n\n# Hi\n";
        let (esm, markdown) = split_esm(source);

        assert_eq!(esm, ["export const cfg = {\n  a: 1,\n\n  b: 2\n};\n"]);
        assert!(!markdown.contains("b: 2"));
        assert!(markdown.contains("# Hi"));
    }

    #[test]
    fn test_esm_inside_code_fence_is_markdown() {
        let source = "```js\nimport x from \"y\";\n```\n";
        let (esm, markdown) = split_esm(source);
        assert!(esm.is_empty());
        assert_eq!(markdown, source);
    }

    #[test]
    fn test_existing_react_import_kept_single() {
        let module = compile("import React from \"react\";\n\n# Hi");
        assert_eq!(module.matches("import React").count(), 1);
    }

    #[test]
    fn test_namespace_react_import_not_duplicated() {
        let module = compile("import * as React from \"react\";\n\n# Hi");
        assert!(!module.contains("import React from"));

        let module = compile("import { React as R } from \"x\";\n\n# Hi");
        assert!(module.contains("import React from \"react\";"));
    }

    #[test]
    fn test_expression_islands() {
        let module = compile("Year: {year} and {\"braces\"}");
        assert!(module.contains("{\"Year: \"}{year}"));
        assert!(module.contains("{\"braces\"}"));
    }

    #[test]
    fn test_expression_spanning_lines() {
        let module = compile("Total: {items.map(i =>\n  i.name)}");
        assert!(module.contains("{\"Total: \"}{items.map(i =>\n  i.name)}"));
    }

    #[test]
    fn test_expression_not_parsed_as_emphasis() {
        let module = compile("Value {2*3*4} here");
        assert!(module.contains("{\"Value \"}{2*3*4}{\" here\"}"));
        assert!(!module.contains("_components.em"));
    }

    #[test]
    fn test_block_jsx_with_expression_attribute() {
        let module = compile("<Chart data={x + 1} />\n");
        assert!(module.contains("return <><Chart data={x + 1} /></>;"));
        assert!(!module.contains("<_components.p>"));
    }

    #[test]
    fn test_multiline_jsx_tag() {
        let module = compile("<Chart\n  title=\"Sales\"\n  data={rows}\n/>\n");
        assert!(module.contains("<Chart\n  title=\"Sales\"\n  data={rows}\n/>"));
    }

    #[test]
    fn test_inline_jsx_inside_paragraph() {
        let module = compile("Hello <Badge tone=\"info\">new</Badge> world");
        assert!(module.contains(
            "<_components.p>{\"Hello \"}<Badge tone=\"info\">{\"new\"}</Badge>{\" world\"}</_components.p>"
        ));
    }

    #[test]
    fn test_jsx_wrapping_markdown() {
        let module = compile("<Note>\n\nSome *text*\n\n</Note>\n");
        assert!(module.contains("<Note><_components.p>{\"Some \"}<_components.em>"));
        assert!(module.contains("</_components.p></Note>"));
    }

    #[test]
    fn test_braces_in_code_stay_literal() {
        let module = compile("Use `{x}` here\n\n```js\nconst o = { a: <b /> };\n```\n");
        assert!(module.contains("<_components.code>{\"{x}\"}</_components.code>"));
        assert!(module.contains("{\"const o = { a: <b /> };\\n\"}"));
    }

    #[test]
    fn test_autolink_is_not_jsx() {
        let module = compile("See <https://example.com>.");
        assert!(module.contains("<_components.a href={\"https://example.com\"}>"));
    }

    #[test]
    fn test_unbalanced_brace_is_text() {
        let module = compile("open { only");
        assert!(module.contains("{\"open { only\"}"));
    }

    #[test]
    fn test_link_and_image() {
        let module = compile("[Docs](/docs \"Read\") ![Logo](/logo.png)");
        assert!(module.contains("<_components.a href={\"/docs\"} title={\"Read\"}>"));
        assert!(module.contains("<_components.img src={\"/logo.png\"} alt={\"Logo\"} />"));
    }

    #[test]
    fn test_code_block_language() {
        let module = compile("```rust\nfn main() {}\n```");
        assert!(module.contains("<_components.code className={\"language-rust\"}>"));
        assert!(module.contains("{\"fn main() {}\\n\"}"));
    }

    #[test]
    fn test_table_sections() {
        let module = compile("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(module.contains("<_components.thead><_components.tr><_components.th>"));
        assert!(module.contains("<_components.tbody><_components.tr><_components.td>"));
        assert!(module.contains("</_components.tbody></_components.table>"));
    }

    #[test]
    fn test_footnotes() {
        let module = compile("Claim[^src].\n\n[^src]: Source text.\n");
        assert!(module.contains(
            "<_components.sup className={\"footnote-reference\"}><_components.a href={\"#fn-src\"}>{\"1\"}</_components.a></_components.sup>"
        ));
        assert!(module.contains("<_components.div id={\"fn-src\"} className={\"footnote-definition\"}>"));
        assert!(!module.contains("[src]"));
    }

    #[test]
    fn test_math() {
        let module = compile("Area $x^2$ here");
        assert!(module.contains("<_components.code className={\"math math-inline\"}>{\"x^2\"}</_components.code>"));
    }

    #[test]
    fn test_html_comment_dropped() {
        let module = compile("<!-- note -->\n\nText");
        assert!(!module.contains("note"));
    }

    #[test]
    fn test_balanced_len() {
        assert_eq!(balanced_len("{a}rest"), Some(3));
        assert_eq!(balanced_len("{a{b}}"), Some(6));
        assert_eq!(balanced_len("{\"}\"}"), Some(5));
        assert_eq!(balanced_len("{open"), None);
    }

    #[test]
    fn test_jsx_tag_len() {
        assert_eq!(jsx_tag_len("<Chart data={x + 1} /> tail"), Some(22));
        assert_eq!(jsx_tag_len("</Note>"), Some(7));
        assert_eq!(jsx_tag_len("<>"), Some(2));
        assert_eq!(jsx_tag_len("<Box {...props}>"), Some(16));
        assert_eq!(jsx_tag_len("<https://example.com>"), None);
        assert_eq!(jsx_tag_len("<a@b.c>"), None);
        assert_eq!(jsx_tag_len("< b"), None);
    }

    #[test]
    fn test_bracket_depth() {
        assert_eq!(bracket_depth("export const a = {\n  b: [1,"), 2);
        assert_eq!(bracket_depth("f(\")\") // (\n"), 0);
    }
}
