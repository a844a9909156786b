//! Render passes
//!
//! Every pass rewrites the working document in place. Passes run in a fixed
//! order and each sees the cumulative result of the ones before it.

use std::cmp::Reverse;
use std::sync::LazyLock;

use agreement_types::{AnswerKind, CanonicalAnswer};
use regex::{Captures, NoExpand, Regex, RegexBuilder};
use tracing::{debug, warn};

use super::derived::{derive, DerivedValue};
use super::document::Document;
use super::list::{format_list, split_list};
use super::rules::{ChoiceRule, Scope, ScopedRule};
use super::{PlaceholderSyntax, RenderOptions};
use crate::answers::AnswerStore;
use crate::render::rules::RenderRules;
use crate::resolver::PlaceholderResolver;

/// `{…}` and `{/…/}`
static CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(/?)([^{}]*)\}").unwrap());

/// Shared inputs of one render call
pub(crate) struct PassContext<'a> {
    pub answers: &'a AnswerStore,
    pub resolver: PlaceholderResolver<'a>,
    pub rules: &'a RenderRules,
    pub options: &'a RenderOptions,
    pub highlight_class: &'a str,
}

impl PassContext<'_> {
    fn syntax(&self) -> PlaceholderSyntax {
        self.options.syntax
    }

    fn highlight(&self, value: &str) -> String {
        format!(r#"<span class="{}">{}</span>"#, self.highlight_class, value)
    }

    /// Template token for a question; unknown questions stand for themselves
    fn token(&self, question: &str) -> String {
        let fragment = self.resolver.resolve_fragment(question).unwrap_or(question);
        self.syntax().token(fragment)
    }

    /// What an unanswered question shows in place of its token
    fn unanswered_label(&self, question: &str) -> String {
        let fragment = self.resolver.resolve_fragment(question).unwrap_or(question);
        PlaceholderSyntax::Bracketed.token(fragment)
    }

    /// Highlighted text answer, or the bracketed placeholder when blank
    fn text_or_label(&self, question: &str) -> String {
        match self.answers.get(question).as_text() {
            Some(text) => self.highlight(text),
            None => self.unanswered_label(question),
        }
    }
}

// =============================================================================
// Text helpers
// =============================================================================

fn literal_regex(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(error = %e, "Could not compile placeholder pattern");
            None
        }
    }
}

/// Replace every case-insensitive occurrence of `token`. The replacement is
/// inserted literally.
pub(crate) fn replace_token(text: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    match literal_regex(&regex::escape(token)) {
        Some(re) => re.replace_all(text, NoExpand(replacement)).into_owned(),
        None => text.to_string(),
    }
}

/// Delete every whole line containing `token`, including its newline
pub(crate) fn delete_lines_with(text: &str, token: &str) -> String {
    if token.is_empty() {
        return text.to_string();
    }
    let pattern = format!(r"(?m)^[^\n]*{}[^\n]*\n?", regex::escape(token));
    match literal_regex(&pattern) {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Remove `fragment` and any whitespace before it
fn remove_fragment(text: &str, fragment: &str) -> String {
    let pattern = format!(r"\s*{}", regex::escape(fragment));
    match literal_regex(&pattern) {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Replace `token` only between the anchor literals, keeping the anchors
fn replace_anchored(text: &str, before: &str, token: &str, after: &str, replacement: &str) -> String {
    let pattern = format!(
        "({}){}({})",
        regex::escape(before),
        regex::escape(token),
        regex::escape(after)
    );
    match literal_regex(&pattern) {
        Some(re) => re
            .replace_all(text, |caps: &Captures| {
                format!("{}{}{}", &caps[1], replacement, &caps[2])
            })
            .into_owned(),
        None => text.to_string(),
    }
}

// =============================================================================
// Pass 1: small conditional clauses
// =============================================================================

pub(crate) fn conditional_clauses(doc: &mut Document, ctx: &PassContext<'_>) {
    doc.rewrite_bodies(|body| {
        CLAUSE_RE
            .replace_all(body, |caps: &Captures| {
                let slashed = !caps[1].is_empty();
                let content = &caps[2];
                let inner = if slashed {
                    content.strip_suffix('/').unwrap_or(content)
                } else {
                    content
                };
                match ctx.rules.clause_for(inner) {
                    Some(rule) if ctx.answers.get(&rule.question).is_affirmative() => {
                        inner.to_string()
                    }
                    Some(rule) => {
                        debug!(question = %rule.question, "Dropping conditional clause");
                        String::new()
                    }
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    });
}

// =============================================================================
// Pass 2: structural optional sections
// =============================================================================

pub(crate) fn optional_sections(doc: &mut Document, pristine: &Document, ctx: &PassContext<'_>) {
    for rule in &ctx.rules.sections {
        if !ctx.answers.get(&rule.question).is_affirmative() {
            if doc.remove_section(&rule.heading).is_some() {
                debug!(heading = %rule.heading, "Removed optional section");
            }
            continue;
        }
        if doc.section(&rule.heading).is_some() {
            continue;
        }
        let Some(section) = pristine.section(&rule.heading).cloned() else {
            continue;
        };
        if doc.insert_after(&rule.anchor, section) {
            debug!(heading = %rule.heading, anchor = %rule.anchor, "Restored optional section");
        }
    }
}

// =============================================================================
// Pass 3: list-valued placeholders
// =============================================================================

pub(crate) fn list_placeholders(doc: &mut Document, ctx: &PassContext<'_>) {
    let Some(question) = ctx.rules.list_question.as_deref() else {
        return;
    };
    let token = ctx.token(question);
    if !doc.contains_ignore_case(&token) {
        return;
    }

    let items = ctx
        .answers
        .get(question)
        .as_text()
        .map(split_list)
        .unwrap_or_default();
    let replacement = if items.is_empty() {
        ctx.options.location_fallback_label.clone()
    } else {
        ctx.highlight(&format_list(&items, &ctx.options.location_fallback_label))
    };
    doc.rewrite_bodies(|body| replace_token(body, &token, &replacement));
}

// =============================================================================
// Pass 4: answer-driven substitution
// =============================================================================

/// Substitute every answered question, plus every radio question the store
/// lacks, which renders as unanswered. Returns the derived value, if one was
/// computed.
pub(crate) fn answer_substitution(doc: &mut Document, ctx: &PassContext<'_>) -> Option<String> {
    let absent_radio = ctx
        .resolver
        .questions(AnswerKind::Radio)
        .filter(|question| !ctx.answers.contains(question))
        .map(|question| (question, ctx.answers.get(question)));
    let mut pending: Vec<(&str, &CanonicalAnswer, String)> = ctx
        .answers
        .iter()
        .chain(absent_radio)
        .filter(|(question, _)| !ctx.rules.is_structural(question))
        .map(|(question, answer)| (question, answer, ctx.token(question)))
        .collect();
    // Special cases first, then longest token first so that a token never
    // clobbers a longer one containing it
    pending.sort_by_key(|(question, _, token)| {
        (!ctx.rules.is_special(question), Reverse(token.len()), question.to_string())
    });
    pending.dedup_by(|a, b| a.0 == b.0);

    let mut calculated = None;
    for (question, answer, token) in pending {
        if let Some(rule) = ctx.rules.scoped_rule(question) {
            if let Some(text) = answer.as_text() {
                scoped_substitution(doc, rule, &token, &ctx.highlight(text));
                continue;
            }
        }
        if let Some(rule) = ctx.rules.choice.as_ref().filter(|r| r.question == question) {
            if let Some(text) = answer.as_text() {
                choice_substitution(doc, rule, &token, text, ctx);
                continue;
            }
        }
        if ctx.rules.derived_question.as_deref() == Some(question) {
            calculated = derived_substitution(doc, question, answer, &token, ctx);
            continue;
        }
        generic_substitution(doc, question, answer, &token, ctx);
    }
    calculated
}

fn scoped_substitution(doc: &mut Document, rule: &ScopedRule, token: &str, replacement: &str) {
    for scope in &rule.scopes {
        match scope {
            Scope::Preamble => doc.preamble = replace_token(&doc.preamble, token, replacement),
            Scope::Section(heading) => {
                if !doc.rewrite_section(heading, |body| replace_token(body, token, replacement)) {
                    debug!(heading = %heading, "Scoped section not present");
                }
            }
            Scope::Anchored { before, after } => doc.rewrite_bodies(|body| {
                replace_anchored(body, before, token, after, replacement)
            }),
        }
    }
}

fn choice_substitution(
    doc: &mut Document,
    rule: &ChoiceRule,
    token: &str,
    answer: &str,
    ctx: &PassContext<'_>,
) {
    let chosen = rule
        .options
        .iter()
        .find(|(option, _)| option.eq_ignore_ascii_case(answer))
        .map(|(_, clause)| clause.as_str())
        .unwrap_or(answer);
    let replacement = ctx.highlight(chosen);
    doc.rewrite_section(&rule.section, |body| replace_token(body, token, &replacement));
}

fn derived_substitution(
    doc: &mut Document,
    question: &str,
    answer: &CanonicalAnswer,
    token: &str,
    ctx: &PassContext<'_>,
) -> Option<String> {
    let derived = answer
        .as_text()
        .and_then(|text| derive(text, &ctx.options.derived));
    let display = match derived {
        Some(value @ DerivedValue::Value(_)) => value.display(),
        Some(DerivedValue::NoResult) => {
            debug!(question = %question, "Derived value has no result");
            None
        }
        None => {
            debug!(question = %question, "Answer is not a number, keeping placeholder");
            None
        }
    };
    let replacement = match &display {
        Some(value) => ctx.highlight(value),
        None => ctx.unanswered_label(question),
    };
    doc.rewrite_bodies(|body| replace_token(body, token, &replacement));
    display
}

fn generic_substitution(
    doc: &mut Document,
    question: &str,
    answer: &CanonicalAnswer,
    token: &str,
    ctx: &PassContext<'_>,
) {
    let kind = ctx
        .resolver
        .resolve(question)
        .map(|r| r.kind)
        .unwrap_or(AnswerKind::Unknown);

    match answer {
        CanonicalAnswer::Money { amount, currency } => {
            let amount = ctx.highlight(amount);
            doc.rewrite_bodies(|body| replace_token(body, token, &amount));
            let currency_token = ctx
                .rules
                .money_rule(question)
                .map(|r| ctx.syntax().token(&r.currency_placeholder));
            if let Some(currency_token) = currency_token {
                let currency = ctx.highlight(currency);
                doc.rewrite_bodies(|body| replace_token(body, &currency_token, &currency));
            }
        }
        // `false` deletes the line; "No" is never printed
        CanonicalAnswer::Bool(true) => doc.rewrite_bodies(|body| replace_token(body, token, "Yes")),
        CanonicalAnswer::Bool(false) => doc.rewrite_bodies(|body| delete_lines_with(body, token)),
        CanonicalAnswer::Text(text) if !text.trim().is_empty() => {
            let replacement = ctx.highlight(text.trim());
            doc.rewrite_bodies(|body| replace_token(body, token, &replacement));
        }
        CanonicalAnswer::Text(_) | CanonicalAnswer::Unanswered => {
            if kind == AnswerKind::Radio {
                doc.rewrite_bodies(|body| delete_lines_with(body, token));
            } else {
                let label = ctx.unanswered_label(question);
                doc.rewrite_bodies(|body| replace_token(body, token, &label));
            }
        }
    }
}

// =============================================================================
// Pass 5: bespoke radio clauses
// =============================================================================

pub(crate) fn bespoke_clauses(doc: &mut Document, ctx: &PassContext<'_>) {
    if let Some(rule) = &ctx.rules.sick_pay {
        if ctx.answers.get(&rule.question).is_affirmative() {
            let token = ctx.token(&rule.details_question);
            let replacement = ctx.text_or_label(&rule.details_question);
            doc.rewrite_bodies(|body| replace_token(body, &token, &replacement));
        } else {
            let clause = ctx.syntax().convert(&rule.clause);
            doc.rewrite_bodies(|body| remove_fragment(body, &clause));
        }
    }

    if let Some(rule) = &ctx.rules.termination {
        if ctx.answers.get(&rule.question).is_affirmative() {
            let token = ctx.token(&rule.notice_question);
            let replacement = ctx.text_or_label(&rule.notice_question);
            doc.rewrite_section(&rule.section, |body| replace_token(body, &token, &replacement));
        } else {
            let fragment = ctx.syntax().convert(&rule.fragment);
            doc.rewrite_section(&rule.section, |body| replace_token(body, &fragment, ""));
        }
    }
}
