//! Identifier utilities.
//!
//! Provides functions for turning human-readable labels (scale names,
//! scenario names, test case names) into stable kebab-case identifiers
//! suitable for file names.

/// Normalize a label to lowercase kebab-case.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Treats underscores and any other non-alphanumeric character
///    (except `-`) as a word separator
/// 4. Collapses runs of separators into single hyphens
///
/// # Examples
///
/// ```
/// use rankscape_core::util::slugify;
///
/// assert_eq!(slugify("XS Range"), "xs-range");
/// assert_eq!(slugify("Seconds Range"), "seconds-range");
/// assert_eq!(slugify("embed_top_asc"), "embed-top-asc");
/// assert_eq!(slugify("  Mixed   Case / Stuff "), "mixed-case-stuff");
/// ```
pub fn slugify(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect::<String>()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join("-")
}

/// Build the file name used for one scale of a scenario, e.g.
/// `EmbedTopAsc_xs-range.csv`.
pub fn scale_file_name(scenario: &str, label: &str, extension: &str) -> String {
    format!("{scenario}_{}.{extension}", slugify(label))
}
