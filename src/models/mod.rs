pub mod auth;
pub mod child;
pub mod incident;
pub mod parent;

/// Blank strings count as absent, for required and optional body fields alike.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
