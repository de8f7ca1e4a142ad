//! "Edit this page" links for generated pages.

/// Join a repository URL, its edit URI and a repository path into a link.
///
/// `edit_uri` is appended to `repo_url` with a `/` between them unless it
/// starts with `?` or `#`, or is itself an absolute URL. The path is then
/// appended to the result; an edit URI ending in `/`, `=`, `?` or `#` takes
/// the path as is.
///
/// Returns `None` when either setting is missing.
#[must_use]
pub fn edit_url(repo_url: Option<&str>, edit_uri: Option<&str>, path: &str) -> Option<String> {
    let repo_url = repo_url.filter(|u| !u.is_empty())?;
    let edit_uri = edit_uri.filter(|u| !u.is_empty())?;

    let base = if edit_uri.contains("://") {
        edit_uri.to_owned()
    } else if edit_uri.starts_with(['?', '#']) {
        format!("{repo_url}{edit_uri}")
    } else {
        format!(
            "{}/{}",
            repo_url.trim_end_matches('/'),
            edit_uri.trim_start_matches('/')
        )
    };

    let path = path.trim_start_matches('/');
    if base.ends_with(['/', '=', '?', '#']) {
        Some(format!("{base}{path}"))
    } else {
        Some(format!("{base}/{path}"))
    }
}
