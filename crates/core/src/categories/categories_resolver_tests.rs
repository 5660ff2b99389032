use super::*;
use crate::errors::Error;

#[test]
fn test_fixed_label_round_trips() {
    for label in DEFAULT_CATEGORY_LABELS {
        let saved = resolve_for_save(Some(label), "").unwrap();
        assert_eq!(saved.as_deref(), Some(label));

        let selection = resolve_for_edit(saved.as_deref(), &DEFAULT_CATEGORY_LABELS);
        assert_eq!(selection.selected_label, label);
        assert_eq!(selection.custom_text, "");
    }
}

#[test]
fn test_custom_text_round_trips() {
    let saved = resolve_for_save(Some(CUSTOM_CATEGORY_LABEL), "Pet supplies").unwrap();
    assert_eq!(saved.as_deref(), Some("Pet supplies"));

    let selection = resolve_for_edit(saved.as_deref(), &DEFAULT_CATEGORY_LABELS);
    assert_eq!(selection.selected_label, CUSTOM_CATEGORY_LABEL);
    assert_eq!(selection.custom_text, "Pet supplies");
}

#[test]
fn test_custom_text_is_trimmed() {
    let saved = resolve_for_save(Some(CUSTOM_CATEGORY_LABEL), "  Rent  ").unwrap();
    assert_eq!(saved.as_deref(), Some("Rent"));
}

#[test]
fn test_blank_custom_text_means_uncategorized() {
    assert_eq!(resolve_for_save(Some(CUSTOM_CATEGORY_LABEL), "").unwrap(), None);
    assert_eq!(
        resolve_for_save(Some(CUSTOM_CATEGORY_LABEL), "   ").unwrap(),
        None
    );

    let selection = resolve_for_edit(None, &DEFAULT_CATEGORY_LABELS);
    assert_eq!(selection.selected_label, CUSTOM_CATEGORY_LABEL);
    assert_eq!(selection.custom_text, "");
}

#[test]
fn test_no_selection_is_a_validation_error() {
    let err = resolve_for_save(None, "ignored").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_edit_matches_labels_case_insensitively() {
    let selection = resolve_for_edit(Some("food"), &DEFAULT_CATEGORY_LABELS);
    assert_eq!(selection.selected_label, "Food");
    assert_eq!(selection.custom_text, "");

    let selection = resolve_for_edit(Some("FOOD "), &DEFAULT_CATEGORY_LABELS);
    assert_eq!(selection.selected_label, "Food");
}

#[test]
fn test_unknown_category_falls_back_to_custom_field() {
    let selection = resolve_for_edit(Some("Gym"), &DEFAULT_CATEGORY_LABELS);
    assert_eq!(selection.selected_label, CUSTOM_CATEGORY_LABEL);
    assert_eq!(selection.custom_text, "Gym");
}

#[test]
fn test_sentinel_is_never_a_stored_value() {
    // Selecting the sentinel resolves to the free text, not to the sentinel
    // label, so the sentinel can never round-trip into a stored category.
    let saved = resolve_for_save(Some(CUSTOM_CATEGORY_LABEL), "Groceries").unwrap();
    assert_ne!(saved.as_deref(), Some(CUSTOM_CATEGORY_LABEL));
}
