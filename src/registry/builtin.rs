//! Built-in registry for the employment agreement template.
//!
//! Question strings are the stable identities used by the answer store and
//! by the renderer's clause rules, so they live here as constants.

use agreement_types::AnswerKind;

use super::PlaceholderRegistry;

// =========================================================================
// Canonical questions
// =========================================================================

pub mod questions {
    // Text
    pub const EMPLOYER_NAME: &str = "What's the name of the employer?";
    pub const REGISTERED_ADDRESS: &str = "What's the employer's registered address?";
    pub const EMPLOYEE_NAME: &str = "What's the name of the employee?";
    pub const EMPLOYEE_ADDRESS: &str = "What's the employee's address?";
    pub const JOB_TITLE: &str = "What's the job title of the employee?";
    pub const WORKPLACE_ADDRESS: &str = "What's the employee's principal place of work?";
    pub const ADDITIONAL_LOCATION: &str = "What is the additional work location?";
    pub const PAY_FREQUENCY: &str = "How often is the salary paid?";
    pub const OVERTIME_CLAUSE: &str = "Which overtime arrangement applies?";
    pub const HR_CONTACT: &str = "Who is the HR/Relevant Contact?";
    pub const SICK_PAY_DETAILS: &str = "What are the details of the company sick pay policy?";
    pub const GOVERNING_COUNTRY: &str = "What's the governing country?";
    pub const AUTHORIZED_REPRESENTATIVE: &str = "Who is the authorized representative?";
    pub const AUTHORIZED_REPRESENTATIVE_TITLE: &str =
        "What's the title of the authorized representative?";

    // Number
    pub const ANNUAL_SALARY: &str = "What's the annual salary?";
    pub const WORKING_HOURS: &str = "How many hours does the employee work per week?";
    pub const PROBATION_LENGTH: &str = "What's the probation period length?";
    pub const NOTICE_PERIOD: &str = "What's the notice period?";
    pub const HOLIDAY_ENTITLEMENT: &str =
        "How many days of paid holiday is the employee entitled to?";
    pub const UNUSED_HOLIDAY_DAYS: &str = "How many unused holiday days can be carried forward?";
    pub const BONUS_AMOUNT: &str = "What is the maximum bonus amount?";

    // Date
    pub const AGREEMENT_DATE: &str = "What's the date of the agreement?";
    pub const START_DATE: &str = "What's the employment start date?";
    pub const END_DATE: &str = "What's the employment end date?";

    // Radio
    pub const PROBATION_APPLICABLE: &str = "Is the clause of probationary period applicable?";
    pub const PENSION_APPLICABLE: &str = "Is the Pension clause applicable?";
    pub const SICK_PAY_APPLICABLE: &str = "Is the sick pay policy applicable?";
    pub const TERMINATION_APPLICABLE: &str = "Is the termination clause applicable?";
    pub const ADDITIONAL_LOCATIONS: &str =
        "Does the employee need to work at additional locations?";
    pub const FIXED_TERM: &str = "Is the employment for a fixed term?";
    pub const VARIABLE_PATTERN: &str = "Can the employee's working pattern vary?";
    pub const REMOTE_WORKING: &str = "Is the employee permitted to work remotely?";
    pub const BONUS_ELIGIBLE: &str = "Is the employee eligible for a bonus?";
}

// =========================================================================
// Full-clause fragments (matched by exact text)
// =========================================================================

pub const PROBATION_CLAUSE: &str =
    "The first [Probation Period Length] of employment will be a probationary period.";
pub const PENSION_CLAUSE: &str = "The Employee will be enrolled in the Company's workplace pension scheme in accordance with applicable laws.";
pub const SICK_PAY_CLAUSE: &str =
    "The Employee may also be entitled to Company sick pay of [Details of Company Sick Pay Policy].";

/// Sentence fragment stripped from TERMINATION when termination does not apply
pub const TERMINATION_NOTICE_FRAGMENT: &str =
    " by providing [Notice Period] written notice to the other party";

/// Governing-country fragment, always ordered last
pub const GOVERNING_COUNTRY_FRAGMENT: &str = "USA";

pub(super) fn register_builtins(registry: &mut PlaceholderRegistry) {
    use questions::*;

    // Radio first: the classifier searches it first
    let radio = [
        (PROBATION_CLAUSE, PROBATION_APPLICABLE),
        (PENSION_CLAUSE, PENSION_APPLICABLE),
        (SICK_PAY_CLAUSE, SICK_PAY_APPLICABLE),
        ("Termination Clause", TERMINATION_APPLICABLE),
        ("Additional Work Locations", ADDITIONAL_LOCATIONS),
        ("Fixed Term", FIXED_TERM),
        ("Variable Working Pattern", VARIABLE_PATTERN),
        ("Remote Working", REMOTE_WORKING),
        ("Bonus", BONUS_ELIGIBLE),
    ];
    for (fragment, question) in radio {
        registry.register(AnswerKind::Radio, fragment, question);
    }

    let text = [
        ("Employer Name", EMPLOYER_NAME),
        ("Registered Address", REGISTERED_ADDRESS),
        ("Employee Name", EMPLOYEE_NAME),
        ("Employee Address", EMPLOYEE_ADDRESS),
        ("Job Title", JOB_TITLE),
        ("Workplace Address", WORKPLACE_ADDRESS),
        ("other locations", ADDITIONAL_LOCATION),
        ("Pay Frequency", PAY_FREQUENCY),
        ("Overtime Pay Clause", OVERTIME_CLAUSE),
        ("HR/Relevant Contact", HR_CONTACT),
        ("Details of Company Sick Pay Policy", SICK_PAY_DETAILS),
        (GOVERNING_COUNTRY_FRAGMENT, GOVERNING_COUNTRY),
        ("Authorized Representative", AUTHORIZED_REPRESENTATIVE),
        ("Authorized Representative Title", AUTHORIZED_REPRESENTATIVE_TITLE),
    ];
    for (fragment, question) in text {
        registry.register(AnswerKind::Text, fragment, question);
    }

    let number = [
        ("Annual Salary", ANNUAL_SALARY),
        ("Working Hours", WORKING_HOURS),
        ("Probation Period Length", PROBATION_LENGTH),
        ("Notice Period", NOTICE_PERIOD),
        ("Holiday Entitlement", HOLIDAY_ENTITLEMENT),
        ("Unused Holiday Days", UNUSED_HOLIDAY_DAYS),
        // Also a Radio fragment: eligibility is primary, amount alternate
        ("Bonus", BONUS_AMOUNT),
    ];
    for (fragment, question) in number {
        registry.register(AnswerKind::Number, fragment, question);
    }

    let date = [
        ("Date of Agreement", AGREEMENT_DATE),
        ("Employment Start Date", START_DATE),
        ("Employment End Date", END_DATE),
    ];
    for (fragment, question) in date {
        registry.register(AnswerKind::Date, fragment, question);
    }

    registry.add_follow_up(ADDITIONAL_LOCATION, ADDITIONAL_LOCATIONS);
    registry.add_follow_up(PROBATION_LENGTH, PROBATION_APPLICABLE);
    registry.add_follow_up(NOTICE_PERIOD, TERMINATION_APPLICABLE);
    registry.add_follow_up(HR_CONTACT, SICK_PAY_APPLICABLE);
    registry.add_follow_up(SICK_PAY_DETAILS, SICK_PAY_APPLICABLE);
    registry.add_follow_up(END_DATE, FIXED_TERM);
    registry.add_follow_up(BONUS_AMOUNT, BONUS_ELIGIBLE);
}
