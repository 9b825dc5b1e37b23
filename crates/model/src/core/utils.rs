/// Normalizes a display alias: surrounding whitespace is trimmed and inner
/// whitespace runs become single underscores.
pub fn normalize_alias(alias: &str) -> String {
    alias.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Strips a subquery qualifier (`sq.` or `sqN.`) from a column reference.
///
/// Any other qualifier is left untouched, e.g. `orders.id` stays as is.
pub fn strip_subquery_qualifier(name: &str) -> &str {
    match name.split_once('.') {
        Some((qualifier, rest)) if is_subquery_qualifier(qualifier) => rest,
        _ => name,
    }
}

/// Returns true for `sq` and `sq1`, `sq2`, ...
pub fn is_subquery_qualifier(qualifier: &str) -> bool {
    match qualifier.strip_prefix("sq") {
        Some(digits) => digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Name of the N-th (1-based) subquery of a composite document.
pub fn subquery_name(position: usize) -> String {
    format!("sq{position}")
}
