//! Clause rules for the employment agreement.
//!
//! Each rule ties a canonical question to the piece of template text it
//! governs. Questions owned by a structural rule (clauses, sections, list,
//! bespoke radio clauses) are skipped by the generic substitution pass.

use crate::registry::builtin::{questions, SICK_PAY_CLAUSE, TERMINATION_NOTICE_FRAGMENT};

/// Brace-delimited clause governed by one answer, found by a marker
/// substring of its content (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseRule {
    pub question: String,
    pub marker: String,
}

/// Whole section removed unless its answer is `true`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRule {
    pub heading: String,
    pub question: String,
    /// Section after which a missing section is restored
    pub anchor: String,
}

/// Where a scoped special case may replace its placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Text before the first heading
    Preamble,
    /// Body of the section with this heading
    Section(String),
    /// Only where the placeholder sits between these two literals
    Anchored { before: String, after: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedRule {
    pub question: String,
    pub scopes: Vec<Scope>,
}

/// Text answer picking one of several fixed clause texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRule {
    pub question: String,
    pub section: String,
    /// (answer, clause text); answers compare case-insensitively
    pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyRule {
    pub question: String,
    /// Placeholder receiving the currency code
    pub currency_placeholder: String,
}

/// Sick pay: fixed clause removed verbatim, inner placeholder substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SickPayRule {
    pub question: String,
    /// Clause text written with bracketed placeholders
    pub clause: String,
    pub details_question: String,
}

/// Termination: fixed sentence fragment stripped from one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationRule {
    pub question: String,
    pub section: String,
    /// Fragment text written with bracketed placeholders
    pub fragment: String,
    pub notice_question: String,
}

/// Complete rule set for one template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRules {
    pub clauses: Vec<ClauseRule>,
    pub sections: Vec<SectionRule>,
    /// Question whose answer is a free-text list
    pub list_question: Option<String>,
    pub scoped: Vec<ScopedRule>,
    pub choice: Option<ChoiceRule>,
    /// Question whose printed value is derived
    pub derived_question: Option<String>,
    pub money: Vec<MoneyRule>,
    pub sick_pay: Option<SickPayRule>,
    pub termination: Option<TerminationRule>,
}

impl RenderRules {
    /// Rules matching `templates/employment_agreement.html`
    pub fn employment_agreement() -> Self {
        use questions::*;

        let clause = |question: &str, marker: &str| ClauseRule {
            question: question.to_string(),
            marker: marker.to_string(),
        };
        let section = |heading: &str, question: &str, anchor: &str| SectionRule {
            heading: heading.to_string(),
            question: question.to_string(),
            anchor: anchor.to_string(),
        };
        let anchored = |before: &str, after: &str| Scope::Anchored {
            before: before.to_string(),
            after: after.to_string(),
        };

        Self {
            clauses: vec![
                clause(ADDITIONAL_LOCATIONS, "other locations"),
                clause(FIXED_TERM, "fixed term"),
                clause(VARIABLE_PATTERN, "working pattern may vary"),
                clause(BONUS_ELIGIBLE, "discretionary bonus"),
            ],
            sections: vec![
                section("PROBATIONARY PERIOD", PROBATION_APPLICABLE, "PLACE OF WORK"),
                section("PENSION", PENSION_APPLICABLE, "HOLIDAY ENTITLEMENT"),
            ],
            list_question: Some(ADDITIONAL_LOCATION.to_string()),
            scoped: vec![
                ScopedRule {
                    question: JOB_TITLE.to_string(),
                    scopes: vec![Scope::Section("JOB TITLE AND DUTIES".to_string())],
                },
                ScopedRule {
                    question: EMPLOYER_NAME.to_string(),
                    scopes: vec![Scope::Preamble, Scope::Section("SIGNATURES".to_string())],
                },
                ScopedRule {
                    question: AUTHORIZED_REPRESENTATIVE.to_string(),
                    scopes: vec![anchored("by ", ",")],
                },
                ScopedRule {
                    question: AUTHORIZED_REPRESENTATIVE_TITLE.to_string(),
                    scopes: vec![anchored(", ", ".")],
                },
            ],
            choice: Some(ChoiceRule {
                question: OVERTIME_CLAUSE.to_string(),
                section: "OVERTIME".to_string(),
                options: vec![
                    (
                        "Paid overtime".to_string(),
                        "Hours worked in excess of normal working hours will be paid at the Employee's normal hourly rate.".to_string(),
                    ),
                    (
                        "Time off in lieu".to_string(),
                        "Hours worked in excess of normal working hours will be compensated with equivalent time off in lieu.".to_string(),
                    ),
                    (
                        "No overtime".to_string(),
                        "The Employee is not entitled to additional payment for hours worked in excess of normal working hours.".to_string(),
                    ),
                ],
            }),
            derived_question: Some(UNUSED_HOLIDAY_DAYS.to_string()),
            money: vec![MoneyRule {
                question: ANNUAL_SALARY.to_string(),
                currency_placeholder: "Currency".to_string(),
            }],
            sick_pay: Some(SickPayRule {
                question: SICK_PAY_APPLICABLE.to_string(),
                clause: SICK_PAY_CLAUSE.to_string(),
                details_question: SICK_PAY_DETAILS.to_string(),
            }),
            termination: Some(TerminationRule {
                question: TERMINATION_APPLICABLE.to_string(),
                section: "TERMINATION".to_string(),
                fragment: TERMINATION_NOTICE_FRAGMENT.to_string(),
                notice_question: NOTICE_PERIOD.to_string(),
            }),
        }
    }

    /// Clause whose content contains a rule's marker
    pub fn clause_for(&self, content: &str) -> Option<&ClauseRule> {
        let content = content.to_lowercase();
        self.clauses
            .iter()
            .find(|rule| content.contains(&rule.marker.to_lowercase()))
    }

    pub fn scoped_rule(&self, question: &str) -> Option<&ScopedRule> {
        self.scoped.iter().find(|r| r.question == question)
    }

    pub fn money_rule(&self, question: &str) -> Option<&MoneyRule> {
        self.money.iter().find(|r| r.question == question)
    }

    /// True when a pass other than generic substitution owns the question
    pub fn is_structural(&self, question: &str) -> bool {
        self.clauses.iter().any(|r| r.question == question)
            || self.sections.iter().any(|r| r.question == question)
            || self.list_question.as_deref() == Some(question)
            || self
                .sick_pay
                .as_ref()
                .is_some_and(|r| r.question == question || r.details_question == question)
            || self
                .termination
                .as_ref()
                .is_some_and(|r| r.question == question || r.notice_question == question)
    }

    /// Named special cases, substituted before generic answers
    pub fn is_special(&self, question: &str) -> bool {
        self.scoped_rule(question).is_some()
            || self.choice.as_ref().is_some_and(|r| r.question == question)
            || self.derived_question.as_deref() == Some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_lookup_by_marker() {
        let rules = RenderRules::employment_agreement();
        let rule = rules
            .clause_for(" The Employee may be required to work at [Other Locations].")
            .unwrap();
        assert_eq!(rule.question, questions::ADDITIONAL_LOCATIONS);
        assert!(rules.clause_for("unrelated").is_none());
    }

    #[test]
    fn test_structural_and_special_are_disjoint() {
        let rules = RenderRules::employment_agreement();
        for q in [
            questions::ADDITIONAL_LOCATIONS,
            questions::ADDITIONAL_LOCATION,
            questions::PENSION_APPLICABLE,
            questions::SICK_PAY_DETAILS,
            questions::NOTICE_PERIOD,
        ] {
            assert!(rules.is_structural(q), "{q}");
            assert!(!rules.is_special(q), "{q}");
        }
        for q in [
            questions::JOB_TITLE,
            questions::OVERTIME_CLAUSE,
            questions::UNUSED_HOLIDAY_DAYS,
        ] {
            assert!(rules.is_special(q), "{q}");
            assert!(!rules.is_structural(q), "{q}");
        }
        assert!(!rules.is_structural(questions::EMPLOYEE_NAME));
        assert!(!rules.is_special(questions::EMPLOYEE_NAME));
    }

    #[test]
    fn test_default_rules_are_empty() {
        let rules = RenderRules::default();
        assert!(!rules.is_structural(questions::PENSION_APPLICABLE));
        assert!(rules.clause_for("other locations").is_none());
    }
}
