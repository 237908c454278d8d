use arbor_css::ParsedSelector;
use arbor_dom::{DomTree, NodeId};
use serde::Deserialize;

use crate::error::PipelineError;

/// A parameter given either as a single value or as a list.
///
/// `"selectors": "a"` and `"selectors": ["a", "b"]` are both accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// A list of values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Flatten into a list.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Whether `id` matches at least one of `selectors`.
///
/// Selectors are tried in order and the first match wins, so an unsupported
/// operator in a later selector is never evaluated.
pub(crate) fn matches_any(
    selectors: &[ParsedSelector],
    tree: &DomTree,
    id: NodeId,
) -> Result<bool, PipelineError> {
    for selector in selectors {
        if selector.matches_in_tree(tree, id)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_or_many_accepts_both_shapes() {
        let one: OneOrMany<String> = serde_json::from_str(r#""a""#).unwrap();
        let many: OneOrMany<String> = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(one.into_vec(), vec!["a"]);
        assert_eq!(many.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_matches_any_stops_at_first_match() {
        let tree = arbor_html::parse(r#"<p lang="en"></p>"#).unwrap();
        let p = tree.child_elements(tree.body().unwrap())[0];
        let selectors: Vec<ParsedSelector> = vec![
            "p".parse().unwrap(),
            "[lang|=en]".parse().unwrap(),
        ];
        assert!(matches_any(&selectors, &tree, p).unwrap());
        assert!(matches_any(&selectors[1..], &tree, p).is_err());
        assert!(!matches_any(&[], &tree, p).unwrap());
    }
}
