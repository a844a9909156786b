//! Document model
//!
//! A template is parsed once into a preamble and a list of sections, each
//! starting at an `<h2>` heading. Optional sections are then found by
//! heading lookup, and text passes only ever see preamble and section
//! bodies, never heading markup.
//!
//! `Document::parse(t).to_html() == t` for every template.

use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h2(?:\s[^>]*)?>(.*?)</h2>").unwrap());

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// One heading plus everything up to the next heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Heading text without tags, trimmed
    pub heading: String,
    /// Full heading markup, `<h2>…</h2>`
    pub markup: String,
    pub body: String,
}

impl Section {
    pub fn is(&self, heading: &str) -> bool {
        self.heading.eq_ignore_ascii_case(heading.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn parse(template: &str) -> Self {
        let mut doc = Document::default();
        let mut cursor = 0;
        let mut current: Option<Section> = None;

        for caps in HEADING_RE.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let between = &template[cursor..whole.start()];
            match current.as_mut() {
                Some(section) => section.body.push_str(between),
                None => doc.preamble.push_str(between),
            }
            if let Some(done) = current.take() {
                doc.sections.push(done);
            }
            current = Some(Section {
                heading: plain_text(&caps[1]),
                markup: whole.as_str().to_string(),
                body: String::new(),
            });
            cursor = whole.end();
        }

        let rest = &template[cursor..];
        match current {
            Some(mut section) => {
                section.body.push_str(rest);
                doc.sections.push(section);
            }
            None => doc.preamble.push_str(rest),
        }
        doc
    }

    pub fn to_html(&self) -> String {
        let mut out = self.preamble.clone();
        for section in &self.sections {
            out.push_str(&section.markup);
            out.push_str(&section.body);
        }
        out
    }

    pub fn position(&self, heading: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.is(heading))
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.is(heading))
    }

    pub fn section_mut(&mut self, heading: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.is(heading))
    }

    pub fn remove_section(&mut self, heading: &str) -> Option<Section> {
        self.position(heading).map(|i| self.sections.remove(i))
    }

    /// Insert `section` right after the section headed `anchor`.
    /// Returns false, leaving the document untouched, if `anchor` is absent.
    pub fn insert_after(&mut self, anchor: &str, section: Section) -> bool {
        match self.position(anchor) {
            Some(i) => {
                self.sections.insert(i + 1, section);
                true
            }
            None => false,
        }
    }

    /// Rewrite the preamble and every section body
    pub fn rewrite_bodies(&mut self, mut f: impl FnMut(&str) -> String) {
        self.preamble = f(&self.preamble);
        for section in &mut self.sections {
            section.body = f(&section.body);
        }
    }

    /// Rewrite one section's body; no-op when the section is absent
    pub fn rewrite_section(&mut self, heading: &str, f: impl FnOnce(&str) -> String) -> bool {
        match self.section_mut(heading) {
            Some(section) => {
                section.body = f(&section.body);
                true
            }
            None => false,
        }
    }

    /// True if any body contains `needle`, ignoring ASCII case
    pub fn contains_ignore_case(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        std::iter::once(&self.preamble)
            .chain(self.sections.iter().map(|s| &s.body))
            .any(|body| body.to_lowercase().contains(&needle))
    }
}

fn plain_text(markup: &str) -> String {
    TAG_RE.replace_all(markup, "").trim().to_string()
}
