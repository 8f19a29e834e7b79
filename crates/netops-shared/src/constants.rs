/// Repository hosting the conditions of use document
pub const CONDITIONS_REPO_URL: &str = "https://github.com/simplex-chat/simplex-chat";

/// Path of the conditions document inside the repository
pub const CONDITIONS_DOCUMENT: &str = "PRIVACY.md";

/// Shown when the current conditions could not be fetched at all
pub const DEFAULT_CONDITIONS_URL: &str =
    "https://github.com/simplex-chat/simplex-chat/blob/stable/PRIVACY.md";

/// Link to the conditions text at a given commit.
pub fn conditions_url(commit: &str) -> String {
    format!("{CONDITIONS_REPO_URL}/blob/{commit}/{CONDITIONS_DOCUMENT}")
}

/// Link to the diff that introduced a given conditions commit.
pub fn conditions_changes_url(commit: &str) -> String {
    format!("{CONDITIONS_REPO_URL}/commit/{commit}")
}
