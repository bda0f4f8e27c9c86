use crate::db::PrebuiltPrompt;
use crate::prompts::{DuplicatePolicy, SyncError, build_plan};

fn row(theme: &str, use_case: &str) -> PrebuiltPrompt {
    PrebuiltPrompt {
        theme_title: theme.to_string(),
        theme_subtitle: "S1".to_string(),
        theme_position: None,
        use_case_title: use_case.to_string(),
        use_case_instruction: format!("Do {use_case}"),
        use_case_user_input_form: String::new(),
        use_case_position: None,
    }
}

#[test]
fn groups_rows_by_theme_in_first_occurrence_order() {
    let rows = vec![row("A", "U1"), row("B", "U2"), row("A", "U3")];

    let plan = build_plan(&rows, DuplicatePolicy::LastWins).expect("plan");

    assert_eq!(plan.themes.len(), 2);
    assert_eq!(plan.themes[0].key.title, "A");
    assert_eq!(plan.themes[0].sequence, 0);
    assert_eq!(plan.themes[1].key.title, "B");
    assert_eq!(plan.themes[1].sequence, 1);

    let titles: Vec<_> = plan.themes[0]
        .use_cases
        .iter()
        .map(|u| (u.key.title.as_str(), u.sequence))
        .collect();
    assert_eq!(titles, vec![("U1", 0), ("U3", 1)]);
    assert_eq!(plan.use_case_count(), 3);
}

#[test]
fn empty_submission_gives_empty_plan() {
    let plan = build_plan(&[], DuplicatePolicy::Reject).expect("plan");
    assert!(plan.themes.is_empty());
}

#[test]
fn theme_identity_is_case_and_whitespace_sensitive() {
    let rows = vec![row("A", "U1"), row("a", "U1"), row("A ", "U1")];

    let plan = build_plan(&rows, DuplicatePolicy::LastWins).expect("plan");

    assert_eq!(plan.themes.len(), 3);
}

#[test]
fn blank_required_field_names_row_and_field() {
    let mut bad = row("A", "U2");
    bad.use_case_instruction = "   ".to_string();
    let rows = vec![row("A", "U1"), bad];

    match build_plan(&rows, DuplicatePolicy::LastWins) {
        Err(SyncError::Validation { index, field }) => {
            assert_eq!(index, 1);
            assert_eq!(field, "use_case_instruction");
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn empty_user_input_form_is_allowed() {
    let rows = vec![row("A", "U1")];
    assert!(rows[0].use_case_user_input_form.is_empty());
    assert!(build_plan(&rows, DuplicatePolicy::Reject).is_ok());
}

#[test]
fn duplicate_theme_position_last_occurrence_wins() {
    let mut first = row("A", "U1");
    first.theme_position = Some(1);
    let middle = row("B", "U2");
    let mut last = row("A", "U3");
    last.theme_position = Some(7);

    let plan = build_plan(&[first, middle, last], DuplicatePolicy::LastWins).expect("plan");

    // Slot comes from the first occurrence, attributes from the last.
    assert_eq!(plan.themes[0].key.title, "A");
    assert_eq!(plan.themes[0].position, Some(7));
    assert_eq!(plan.themes[0].use_cases.len(), 2);
}

#[test]
fn duplicate_use_case_is_merged_into_one_slot() {
    let mut first = row("A", "U1");
    first.use_case_position = Some(2);
    let other = row("A", "U2");
    let mut repeat = row("A", "U1");
    repeat.use_case_position = Some(5);

    let plan = build_plan(&[first, other, repeat], DuplicatePolicy::LastWins).expect("plan");

    let use_cases = &plan.themes[0].use_cases;
    assert_eq!(use_cases.len(), 2);
    assert_eq!(use_cases[0].key.title, "U1");
    assert_eq!(use_cases[0].position, Some(5));
    assert_eq!(use_cases[0].sequence, 0);
}

#[test]
fn reject_policy_refuses_disagreeing_duplicates() {
    let mut first = row("A", "U1");
    first.theme_position = Some(1);
    let mut second = row("A", "U2");
    second.theme_position = Some(2);

    let err = build_plan(&[first, second], DuplicatePolicy::Reject).unwrap_err();

    assert!(matches!(err, SyncError::Conflict { .. }));
    assert!(!err.is_retryable());
}

#[test]
fn reject_policy_accepts_agreeing_duplicates() {
    let rows = vec![row("A", "U1"), row("A", "U1")];

    let plan = build_plan(&rows, DuplicatePolicy::Reject).expect("plan");

    assert_eq!(plan.use_case_count(), 1);
}
