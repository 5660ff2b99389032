/// Fixed category options offered in the add/edit dialog. The presentation
/// layer may supply its own set; resolution only needs the sentinel below.
pub const DEFAULT_CATEGORY_LABELS: [&str; 5] = ["Food", "Travel", "Shopping", "Bills", "Other"];

/// Reserved selection signaling that the final category comes from the
/// free-text field. Never stored as a category value itself.
pub const CUSTOM_CATEGORY_LABEL: &str = "Add Category";
