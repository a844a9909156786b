//! Session flow: select fragments, order questions, answer, persist, reload,
//! render. Uses file-backed stores in a temporary directory.

use agreement_engine::answers::side_channel::KEY_CALCULATED_VALUE;
use agreement_engine::registry::builtin::{questions, PENSION_CLAUSE};
use agreement_engine::render::ArithmeticOperation;
use agreement_engine::{
    align_selection, AnswerKind, AnswerStore, CanonicalAnswer, Classifier, FileStore,
    KeyValueStore, PlaceholderRegistry, QuestionOrderer, RenderOptions, SelectionInput,
    SessionStore, SideChannel, TemplateRenderer, Theme,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use tempfile::TempDir;

#[test]
fn test_classifier_ambiguity_radio_over_number() {
    let registry = PlaceholderRegistry::builtin();
    let classification = Classifier::new(&registry).classify("Bonus");

    assert_eq!(classification.primary_kind, AnswerKind::Radio);
    assert_eq!(classification.primary_question, questions::BONUS_ELIGIBLE);
    assert_eq!(classification.alternate_kind, Some(AnswerKind::Number));
    assert_eq!(
        classification.alternate_question.as_deref(),
        Some(questions::BONUS_AMOUNT)
    );
    assert_eq!(classification.valid_kinds.len(), 6);
}

#[test]
fn test_order_is_stable_across_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let registry = PlaceholderRegistry::builtin();
    let orderer = QuestionOrderer::new(&registry);
    let selection = ["USA", "Job Title", "Employee Name", "[Job Title]"];

    let first = orderer.order(&selection, None);
    assert_eq!(first.entries.len(), 3);
    assert_eq!(first.duplicates.len(), 1);

    // The user drags the last question to the top
    let reordered = vec![2, 0, 1];
    let mut session = SessionStore::new(FileStore::open(&path).unwrap());
    session.save_question_order(&reordered).unwrap();

    let mut session = SessionStore::new(FileStore::open(&path).unwrap());
    let persisted = session.load();
    let second = orderer.order(&selection, Some(persisted.question_order.as_slice()));
    assert!(!second.permutation_reset);
    assert_eq!(
        second.questions(),
        vec![questions::GOVERNING_COUNTRY, questions::JOB_TITLE, questions::EMPLOYEE_NAME]
    );

    // A changed selection invalidates the saved order
    let third = orderer.order(&["Employee Name"], Some(persisted.question_order.as_slice()));
    assert!(third.permutation_reset);
    assert_eq!(third.permutation, vec![0]);
}

#[test]
fn test_persisted_kinds_realign_entries() {
    let registry = PlaceholderRegistry::builtin();
    let mut session = SessionStore::new(agreement_engine::MemoryStore::new());
    let mut persisted = session.load();
    persisted.selected_question_types = vec!["Email".to_string()];
    session.save(&persisted).unwrap();

    let mut outcome =
        QuestionOrderer::new(&registry).order(&["Employee Name", "Job Title"], None);
    align_selection(&mut outcome.entries, &SelectionInput::from_session(&session.load()));

    assert_eq!(outcome.entries[0].kind, AnswerKind::Email);
    assert!(outcome.entries[0].kind.is_equivalent(AnswerKind::Text));
    assert_eq!(outcome.entries[1].kind, AnswerKind::Text);
}

#[test]
fn test_reloaded_answers_reproduce_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    let registry = PlaceholderRegistry::builtin();
    let renderer = TemplateRenderer::employment_agreement(&registry, RenderOptions::default());
    let theme = Theme::default();

    let mut answers = AnswerStore::new();
    let mut session = SessionStore::new(FileStore::open(&path).unwrap());
    for (question, answer) in [
        (questions::EMPLOYEE_NAME, CanonicalAnswer::text("Ada Lovelace")),
        (questions::PENSION_APPLICABLE, CanonicalAnswer::Bool(true)),
        (questions::ANNUAL_SALARY, CanonicalAnswer::money("52000", "EUR")),
        (questions::REMOTE_WORKING, CanonicalAnswer::Bool(false)),
    ] {
        answers.set(question, answer);
        session.save_answers(&answers).unwrap();
    }
    let seen = renderer.render(&answers, &theme);
    assert!(seen.html.contains(PENSION_CLAUSE));

    let mut reloaded = SessionStore::new(FileStore::open(&path).unwrap());
    let restored = reloaded.load_answers();
    assert_eq!(restored, answers);
    assert_eq!(renderer.render(&restored, &theme), seen);
}

#[test]
fn test_corrupt_answers_entry_yields_empty_map() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set("userAnswers", "{\"broken\": ".to_string()).unwrap();
    store.set("questionOrder", "[0]".to_string()).unwrap();

    let mut session = SessionStore::new(FileStore::open(&path).unwrap());
    assert!(session.load_answers().is_empty());

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("userAnswers"), None);
    assert_eq!(reopened.get("questionOrder").as_deref(), Some("[0]"));
}

#[test]
fn test_side_channel_feeds_derived_value() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("side-channel.json");
    let registry = PlaceholderRegistry::builtin();

    let mut channel = SideChannel::new(FileStore::open(&path).unwrap());
    channel
        .set_operation(ArithmeticOperation::Add, Decimal::new(25, 1))
        .unwrap();

    let options = RenderOptions {
        derived: channel.derived_config(),
        ..RenderOptions::default()
    };
    let mut answers = AnswerStore::new();
    answers.set(questions::UNUSED_HOLIDAY_DAYS, "5");
    let output = TemplateRenderer::employment_agreement(&registry, options)
        .render(&answers, &Theme::default());
    assert_eq!(output.calculated_value.as_deref(), Some("7.5"));

    channel
        .store_calculated(output.calculated_value.as_deref())
        .unwrap();
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(KEY_CALCULATED_VALUE).as_deref(), Some("\"7.5\""));
}
