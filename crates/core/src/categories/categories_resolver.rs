use crate::categories::CUSTOM_CATEGORY_LABEL;
use crate::errors::{Result, ValidationError};

/// Dialog pre-selection computed for an edit flow: which fixed label to
/// select and what to place in the free-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    pub selected_label: String,
    pub custom_text: String,
}

/// Resolves dialog input to the category value to persist.
///
/// `selected_label` is the fixed option the user picked (or the reserved
/// custom sentinel); `custom_text` is the free-text override field. Returns
/// `Ok(None)` for an uncategorized save (sentinel picked, blank text). Fails
/// only when no selection was made at all, in which case the caller must
/// reject the save.
pub fn resolve_for_save(selected_label: Option<&str>, custom_text: &str) -> Result<Option<String>> {
    let label = selected_label
        .ok_or_else(|| ValidationError::MissingField("category".to_string()))?;

    if label == CUSTOM_CATEGORY_LABEL {
        let trimmed = custom_text.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    } else {
        Ok(Some(label.to_string()))
    }
}

/// Inverse of [`resolve_for_save`] for edit flows.
///
/// Matches `existing` against `labels` case-insensitively; on a match that
/// label is pre-selected and the free-text field cleared, otherwise the
/// custom sentinel is selected with the field populated (empty when the
/// expense is uncategorized).
pub fn resolve_for_edit(existing: Option<&str>, labels: &[&str]) -> CategorySelection {
    if let Some(current) = existing.map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(label) = labels
            .iter()
            .find(|label| label.to_lowercase() == current.to_lowercase())
        {
            return CategorySelection {
                selected_label: (*label).to_string(),
                custom_text: String::new(),
            };
        }
        return CategorySelection {
            selected_label: CUSTOM_CATEGORY_LABEL.to_string(),
            custom_text: current.to_string(),
        };
    }

    CategorySelection {
        selected_label: CUSTOM_CATEGORY_LABEL.to_string(),
        custom_text: String::new(),
    }
}
