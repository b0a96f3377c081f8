//! Column-name normalization and keyword matching

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Return a normalized, accent-free column identifier.
///
/// ```
/// use sheetfix_convert::names::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Comisión Más IVA "), "comision mas iva");
/// ```
#[must_use]
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Return columns whose normalized name contains any of the keywords, in
/// column order. Blank keywords never match.
pub fn find_columns_with_keywords<S, K>(columns: &[S], keywords: &[K]) -> Vec<String>
where
    S: AsRef<str>,
    K: AsRef<str>,
{
    let keywords: Vec<String> = keywords
        .iter()
        .map(|k| normalize_column_name(k.as_ref()))
        .filter(|k| !k.is_empty())
        .collect();

    columns
        .iter()
        .filter(|column| {
            let normalized = normalize_column_name(column.as_ref());
            keywords.iter().any(|k| normalized.contains(k.as_str()))
        })
        .map(|column| column.as_ref().to_string())
        .collect()
}

/// True when the name carries `id` as a word of its own, as in
/// `Operacion ID`, `id_venta` or `ID`.
#[must_use]
pub fn is_id_column(name: &str) -> bool {
    normalize_column_name(name)
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == "id")
}
