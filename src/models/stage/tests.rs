use crate::models::record::RecordId;
use crate::models::stage::{Stage, StatusField};

#[test]
fn test_forward_one_step_is_valid() {
    assert!(Stage::Ready.can_transition_to(Stage::Testing));
    assert!(Stage::Testing.can_transition_to(Stage::Building));
    assert!(Stage::Building.can_transition_to(Stage::Review));
    assert!(Stage::Review.can_transition_to(Stage::Completed));
}

#[test]
fn test_review_can_go_back_to_building() {
    assert!(Stage::Review.can_transition_to(Stage::Building));
}

#[test]
fn test_every_other_pair_is_rejected() {
    let allowed = [
        (Stage::Ready, Stage::Testing),
        (Stage::Testing, Stage::Building),
        (Stage::Building, Stage::Review),
        (Stage::Review, Stage::Completed),
        (Stage::Review, Stage::Building),
    ];

    for from in Stage::ALL {
        for to in Stage::ALL {
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "unexpected verdict for {from} -> {to}"
            );
        }
    }
}

#[test]
fn test_completed_is_terminal() {
    assert!(Stage::Completed.valid_transitions().is_empty());
    let err = Stage::Completed
        .try_transition(RecordId::new(1), Stage::Review)
        .unwrap_err();
    assert!(err.to_string().contains("terminal"));
}

#[test]
fn test_try_transition_lists_allowed_targets() {
    let err = Stage::Ready
        .try_transition(RecordId::new(12), Stage::Building)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("record 012"));
    assert!(msg.contains("ready -> building"));
    assert!(msg.contains("Allowed from ready: testing"));
    assert!(err.is_blocking());
}

#[test]
fn test_done_is_a_completed_synonym_only() {
    assert_eq!(Stage::from_status("done"), Some(Stage::Completed));
    assert_eq!(Stage::from_status("completed"), Some(Stage::Completed));
    assert_eq!(Stage::from_status("finished"), None);
    assert_eq!(Stage::from_status("ideation"), None);
}

#[test]
fn test_stage_from_str_is_case_insensitive() {
    assert_eq!("Review".parse::<Stage>().unwrap(), Stage::Review);
    assert!("shipping".parse::<Stage>().is_err());
}

#[test]
fn test_status_field_distinguishes_missing_from_invalid() {
    assert_eq!(StatusField::parse(None), StatusField::Missing);
    assert_eq!(StatusField::parse(Some("  ")), StatusField::Missing);
    assert_eq!(
        StatusField::parse(Some("wip")),
        StatusField::Invalid("wip".to_string())
    );
    let field = StatusField::parse(Some("done"));
    assert_eq!(field.stage(), Some(Stage::Completed));
    assert_eq!(field.declared(), "done");
}

#[test]
fn test_ordering_follows_lifecycle() {
    assert!(Stage::Ready < Stage::Testing);
    assert!(Stage::Testing < Stage::Building);
    assert!(Stage::Building < Stage::Review);
    assert!(Stage::Review < Stage::Completed);
}
