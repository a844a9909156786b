//! Template Renderer
//!
//! Renders an agreement template against the current answers. Every call
//! starts from the pristine parsed template and runs a fixed sequence of
//! passes, so the output depends only on the template, the answers and the
//! options:
//!
//! 1. small conditional clauses `{…}` and `{/…/}`
//! 2. optional sections located by heading
//! 3. list-valued placeholders
//! 4. answer-driven substitution
//! 5. sick pay and termination clauses
//!
//! ```ignore
//! let registry = PlaceholderRegistry::builtin();
//! let renderer = TemplateRenderer::employment_agreement(&registry, RenderOptions::default());
//! let output = renderer.render(&answers, &Theme::default());
//! ```

pub mod derived;
pub mod document;
pub mod list;
mod passes;
pub mod rules;

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::answers::AnswerStore;
use crate::error::ConfigError;
use crate::registry::PlaceholderRegistry;
use crate::resolver::PlaceholderResolver;

pub use derived::{ArithmeticOperation, DerivedValue, DerivedValueConfig};
pub use document::{Document, Section};
pub use list::{format_list, split_list};
pub use rules::RenderRules;

use passes::PassContext;

/// Bundled employment agreement template
pub const EMPLOYMENT_AGREEMENT_TEMPLATE: &str =
    include_str!("../../templates/employment_agreement.html");

/// Default fallback printed when no additional locations were entered
pub const DEFAULT_LOCATION_FALLBACK: &str = "other locations";

pub const DEFAULT_HIGHLIGHT_CLASS: &str = "highlight";

static BRACKETED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").unwrap());

// =============================================================================
// Placeholder syntax
// =============================================================================

/// How placeholders are written in a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderSyntax {
    /// `[Employee Name]`
    #[default]
    Bracketed,
    /// `Employee Name`
    Bare,
}

impl PlaceholderSyntax {
    /// Template token for a registry fragment.
    ///
    /// Fragments that already contain bracketed placeholders (full clause
    /// strings) are converted as text rather than wrapped.
    pub fn token(self, fragment: &str) -> String {
        let fragment = fragment.trim();
        if fragment.contains('[') {
            return self.convert(fragment);
        }
        match self {
            PlaceholderSyntax::Bracketed => format!("[{}]", fragment),
            PlaceholderSyntax::Bare => fragment.to_string(),
        }
    }

    /// Rewrite text authored with bracketed placeholders into this syntax
    pub fn convert(self, text: &str) -> String {
        match self {
            PlaceholderSyntax::Bracketed => text.to_string(),
            PlaceholderSyntax::Bare => BRACKETED_RE.replace_all(text, "$1").into_owned(),
        }
    }
}

impl fmt::Display for PlaceholderSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderSyntax::Bracketed => f.write_str("bracketed"),
            PlaceholderSyntax::Bare => f.write_str("bare"),
        }
    }
}

impl FromStr for PlaceholderSyntax {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bracketed" | "brackets" => Ok(PlaceholderSyntax::Bracketed),
            "bare" | "plain" => Ok(PlaceholderSyntax::Bare),
            _ => Err(ConfigError::UnknownSyntax(s.to_string())),
        }
    }
}

// =============================================================================
// Options and output
// =============================================================================

/// Presentation theme; changing it only changes the highlight class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub highlight_class: String,
}

impl Theme {
    pub fn new(highlight_class: impl Into<String>) -> Self {
        Self {
            highlight_class: highlight_class.into(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_CLASS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub syntax: PlaceholderSyntax,
    /// Printed, unhighlighted, when the location list is empty
    pub location_fallback_label: String,
    pub derived: DerivedValueConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            syntax: PlaceholderSyntax::default(),
            location_fallback_label: DEFAULT_LOCATION_FALLBACK.to_string(),
            derived: DerivedValueConfig::default(),
        }
    }
}

/// Result of one render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub html: String,
    /// Derived value computed during the render, for the caller to publish
    pub calculated_value: Option<String>,
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders one template; cheap to call repeatedly
#[derive(Debug, Clone)]
pub struct TemplateRenderer<'r> {
    pristine: Document,
    registry: &'r PlaceholderRegistry,
    rules: RenderRules,
    options: RenderOptions,
}

impl<'r> TemplateRenderer<'r> {
    /// Renderer with no clause rules: only generic substitution applies
    pub fn new(template: &str, registry: &'r PlaceholderRegistry, options: RenderOptions) -> Self {
        Self::with_rules(template, registry, RenderRules::default(), options)
    }

    pub fn with_rules(
        template: &str,
        registry: &'r PlaceholderRegistry,
        rules: RenderRules,
        options: RenderOptions,
    ) -> Self {
        let pristine = Document::parse(&options.syntax.convert(template));
        debug!(
            sections = pristine.sections.len(),
            syntax = %options.syntax,
            "Parsed template"
        );
        Self {
            pristine,
            registry,
            rules,
            options,
        }
    }

    /// The bundled employment agreement with its clause rules
    pub fn employment_agreement(registry: &'r PlaceholderRegistry, options: RenderOptions) -> Self {
        Self::with_rules(
            EMPLOYMENT_AGREEMENT_TEMPLATE,
            registry,
            RenderRules::employment_agreement(),
            options,
        )
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn rules(&self) -> &RenderRules {
        &self.rules
    }

    pub fn pristine(&self) -> &Document {
        &self.pristine
    }

    #[instrument(level = "debug", skip_all, fields(answers = answers.len()))]
    pub fn render(&self, answers: &AnswerStore, theme: &Theme) -> RenderOutput {
        let ctx = PassContext {
            answers,
            resolver: PlaceholderResolver::new(self.registry),
            rules: &self.rules,
            options: &self.options,
            highlight_class: &theme.highlight_class,
        };

        let mut doc = self.pristine.clone();
        passes::conditional_clauses(&mut doc, &ctx);
        passes::optional_sections(&mut doc, &self.pristine, &ctx);
        passes::list_placeholders(&mut doc, &ctx);
        let calculated_value = passes::answer_substitution(&mut doc, &ctx);
        passes::bespoke_clauses(&mut doc, &ctx);

        RenderOutput {
            html: doc.to_html(),
            calculated_value,
        }
    }
}

/// Render `template` with the built-in registry, the employment agreement
/// rules and default options.
pub fn render(template: &str, answers: &AnswerStore, theme: &Theme) -> String {
    let registry = PlaceholderRegistry::builtin();
    TemplateRenderer::with_rules(
        template,
        &registry,
        RenderRules::employment_agreement(),
        RenderOptions::default(),
    )
    .render(answers, theme)
    .html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin::questions;
    use agreement_types::CanonicalAnswer;
    use pretty_assertions::assert_eq;

    fn answers(pairs: &[(&str, CanonicalAnswer)]) -> AnswerStore {
        let mut store = AnswerStore::new();
        for (q, a) in pairs {
            store.set(*q, a.clone());
        }
        store
    }

    fn bundled(store: &AnswerStore) -> RenderOutput {
        let registry = PlaceholderRegistry::builtin();
        TemplateRenderer::employment_agreement(&registry, RenderOptions::default())
            .render(store, &Theme::default())
    }

    #[test]
    fn test_syntax_token() {
        assert_eq!(PlaceholderSyntax::Bracketed.token("Job Title"), "[Job Title]");
        assert_eq!(PlaceholderSyntax::Bare.token(" Job Title "), "Job Title");
        assert_eq!(
            PlaceholderSyntax::Bare.token("The first [Probation Period Length] of employment"),
            "The first Probation Period Length of employment"
        );
        assert_eq!(
            PlaceholderSyntax::Bracketed.token("The first [Probation Period Length] of employment"),
            "The first [Probation Period Length] of employment"
        );
    }

    #[test]
    fn test_syntax_from_str() {
        assert_eq!("Bare".parse::<PlaceholderSyntax>().unwrap(), PlaceholderSyntax::Bare);
        assert!(matches!(
            "curly".parse::<PlaceholderSyntax>(),
            Err(ConfigError::UnknownSyntax(_))
        ));
    }

    #[test]
    fn test_generic_text_substitution() {
        let registry = PlaceholderRegistry::builtin();
        let renderer =
            TemplateRenderer::new("<p>Hello [employee name].</p>", &registry, RenderOptions::default());
        let store = answers(&[(questions::EMPLOYEE_NAME, "Ada".into())]);
        assert_eq!(
            renderer.render(&store, &Theme::new("hl")).html,
            r#"<p>Hello <span class="hl">Ada</span>.</p>"#
        );
    }

    #[test]
    fn test_theme_only_changes_class() {
        let store = answers(&[(questions::EMPLOYEE_NAME, "Ada".into())]);
        let registry = PlaceholderRegistry::builtin();
        let renderer = TemplateRenderer::employment_agreement(&registry, RenderOptions::default());
        let a = renderer.render(&store, &Theme::new("light")).html;
        let b = renderer.render(&store, &Theme::new("dark")).html;
        assert_eq!(a.replace("\"light\"", "\"dark\""), b);
    }

    #[test]
    fn test_unanswered_template_keeps_placeholders() {
        let output = bundled(&AnswerStore::new());
        assert!(output.html.contains("[Employee Name]"));
        assert!(output.html.contains("[Job Title]"));
        assert!(!output.html.contains("<h2>PENSION</h2>"));
        assert!(!output.html.contains("<h2>PROBATIONARY PERIOD</h2>"));
        assert_eq!(output.calculated_value, None);
    }

    #[test]
    fn test_optional_sections_shown_when_true() {
        let store = answers(&[
            (questions::PENSION_APPLICABLE, true.into()),
            (questions::PROBATION_APPLICABLE, false.into()),
        ]);
        let html = bundled(&store).html;
        assert!(html.contains("<h2>PENSION</h2>"));
        assert!(!html.contains("PROBATIONARY PERIOD"));
    }

    #[test]
    fn test_money_answer_fills_amount_and_currency() {
        let store = answers(&[(
            questions::ANNUAL_SALARY,
            CanonicalAnswer::Money {
                amount: "45000".to_string(),
                currency: "GBP".to_string(),
            },
        )]);
        let html = bundled(&store).html;
        assert!(html.contains(
            r#"<span class="highlight">45000</span> <span class="highlight">GBP</span>"#
        ));
        assert!(!html.contains("[Currency]"));
    }

    #[test]
    fn test_derived_value_is_returned() {
        let store = answers(&[(questions::UNUSED_HOLIDAY_DAYS, "10".into())]);
        let registry = PlaceholderRegistry::builtin();
        let options = RenderOptions {
            derived: DerivedValueConfig::new(ArithmeticOperation::Multiply, 2.into()),
            ..RenderOptions::default()
        };
        let output = TemplateRenderer::employment_agreement(&registry, options)
            .render(&store, &Theme::default());
        assert_eq!(output.calculated_value.as_deref(), Some("20"));
        assert!(output.html.contains(r#"<span class="highlight">20</span>"#));
    }

    #[test]
    fn test_derived_value_parse_failure_keeps_label() {
        let store = answers(&[(questions::UNUSED_HOLIDAY_DAYS, "ten".into())]);
        let output = bundled(&store);
        assert_eq!(output.calculated_value, None);
        assert!(output.html.contains("[Unused Holiday Days]"));
    }

    #[test]
    fn test_crate_render_matches_renderer() {
        let store = answers(&[(questions::JOB_TITLE, "Engineer".into())]);
        let html = render(EMPLOYMENT_AGREEMENT_TEMPLATE, &store, &Theme::default());
        assert_eq!(html, bundled(&store).html);
    }
}
