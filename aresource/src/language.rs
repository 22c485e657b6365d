//! Language detection from Android resource directory qualifiers.

use std::{path::Path, str::FromStr};

use unic_langid::LanguageIdentifier;

/// Infers the language of a `strings.xml` from its `values-…` directory.
///
/// The unqualified `values` directory holds the default resources and has no
/// language of its own.
///
/// # Example
/// ```rust
/// use aresource::language::infer_language_from_path;
///
/// assert_eq!(infer_language_from_path("res/values-es/strings.xml"), Some("es".to_string()));
/// assert_eq!(infer_language_from_path("res/values-zh-rCN/strings.xml"), Some("zh-CN".to_string()));
/// assert_eq!(infer_language_from_path("res/values-b+sr+Latn/strings.xml"), Some("sr-Latn".to_string()));
/// assert_eq!(infer_language_from_path("res/values/strings.xml"), None);
/// ```
pub fn infer_language_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    path.as_ref()
        .parent()?
        .file_name()?
        .to_str()
        .and_then(parse_values_qualifier)
}

/// values-zh-rCN → zh-CN; values-es → es; values-b+zh+Hans+CN → zh-Hans-CN
fn parse_values_qualifier(component: &str) -> Option<String> {
    let rest = component.strip_prefix("values-")?;
    if let Some(bcp47) = rest.strip_prefix("b+") {
        return normalize_lang(&bcp47.replace('+', "-"));
    }

    // Legacy qualifiers: lang[-rREGION] followed by unrelated qualifiers
    // such as `night` or `land`.
    let mut tokens = rest.split('-').filter(|t| !t.is_empty());
    let lang = tokens.next()?;
    if lang.len() != 2 && lang.len() != 3 {
        return None;
    }
    let region = tokens.find_map(|t| t.strip_prefix('r').filter(|r| r.len() == 2));
    match region {
        Some(region) => normalize_lang(&format!("{lang}-{region}")),
        None => normalize_lang(lang),
    }
}

fn normalize_lang(candidate: &str) -> Option<String> {
    LanguageIdentifier::from_str(candidate)
        .ok()
        .map(|id| id.to_string())
}
