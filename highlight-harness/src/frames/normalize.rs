//! Normalization of raw frames into typed [`Frame`]s

use super::{Frame, RawFrame};
use crate::error::{HarnessError, Result};
use crate::partition::{Category, Dimension, WILDCARD};

/// Resolve aliases and wildcards and parse every dimension.
///
/// For each dimension the alias column is consulted first and the canonical
/// column only when the alias is absent or blank; a dimension with neither
/// takes its default, as does the wildcard. Any other unrecognised value is
/// a [`HarnessError::Config`].
pub fn normalize(raw: &RawFrame) -> Result<Frame> {
    for key in raw.keys() {
        if !Dimension::all().iter().any(|d| d.key() == key || d.alias() == key) {
            tracing::debug!("Ignoring unknown column `{}`", key);
        }
    }

    Ok(Frame {
        file_existence: resolve(raw)?,
        file_content: resolve(raw)?,
        lexer: resolve(raw)?,
        formatter: resolve(raw)?,
        output: resolve(raw)?,
    })
}

/// Raw cell for a dimension after alias resolution, if any.
///
/// When both are filled the alias column wins over the canonical one, the
/// reverse of a canonical-first `get(key) or get(alias)` lookup.
pub fn lookup<'a>(raw: &'a RawFrame, dimension: Dimension) -> Option<&'a str> {
    let present = |key: &str| {
        raw.get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    };
    present(dimension.alias()).or_else(|| present(dimension.key()))
}

fn resolve<C: Category>(raw: &RawFrame) -> Result<C> {
    match lookup(raw, C::DIMENSION) {
        None => Ok(C::default()),
        Some(WILDCARD) => Ok(C::default()),
        Some(value) => value.parse::<C>().map_err(|_| {
            HarnessError::config(format!(
                "unrecognized {} category `{}` (expected one of: {})",
                C::DIMENSION,
                value,
                C::DIMENSION.categories().join(", ")
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::generate_exhaustive;
    use crate::partition::{FileContent, FileExistence, FormatterChoice, LexerChoice, OutputMode};
    use proptest::prelude::*;

    fn raw(pairs: &[(&str, &str)]) -> RawFrame {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_keys() {
        let frame = normalize(&raw(&[
            ("file_existence", "exists"),
            ("file_content", "valid_syntax"),
            ("lexer", "valid_match"),
            ("formatter", "valid"),
            ("output", "stdout"),
        ]))
        .unwrap();
        assert_eq!(frame.file_existence, FileExistence::Exists);
        assert_eq!(frame.file_content, FileContent::ValidSyntax);
        assert_eq!(frame.lexer, LexerChoice::ValidMatch);
        assert_eq!(frame.formatter, FormatterChoice::Valid);
        assert_eq!(frame.output, OutputMode::Stdout);
    }

    #[test]
    fn test_alias_keys() {
        let frame = normalize(&raw(&[
            ("file", "exists"),
            ("content", "random_text"),
            ("lexer_flag", "invalid"),
            ("formatter_flag", "invalid"),
        ]))
        .unwrap();
        assert_eq!(frame.file_existence, FileExistence::Exists);
        assert_eq!(frame.file_content, FileContent::RandomText);
        assert_eq!(frame.lexer, LexerChoice::Invalid);
        assert_eq!(frame.formatter, FormatterChoice::Invalid);
        assert_eq!(frame.output, OutputMode::Stdout);
    }

    #[test]
    fn test_alias_wins_over_canonical() {
        let frame = normalize(&raw(&[("file_existence", "missing"), ("file", "exists")])).unwrap();
        assert_eq!(frame.file_existence, FileExistence::Exists);
    }

    #[test]
    fn test_blank_alias_falls_back_to_canonical() {
        let frame = normalize(&raw(&[("file", ""), ("file_existence", "exists")])).unwrap();
        assert_eq!(frame.file_existence, FileExistence::Exists);
    }

    #[test]
    fn test_wildcards_become_defaults() {
        let frame = normalize(&raw(&[
            ("file_existence", "*"),
            ("file_content", "*"),
            ("lexer", "*"),
            ("formatter", "*"),
            ("output", "*"),
        ]))
        .unwrap();
        assert_eq!(frame, Frame::default());
    }

    #[test]
    fn test_absent_dimensions_become_defaults() {
        assert_eq!(normalize(&RawFrame::new()).unwrap(), Frame::default());
    }

    #[test]
    fn test_unknown_value_is_config_error() {
        let err = normalize(&raw(&[("lexer", "sometimes")])).unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
        let msg = err.to_string();
        assert!(msg.contains("lexer"), "{}", msg);
        assert!(msg.contains("sometimes"), "{}", msg);
    }

    #[test]
    fn test_unknown_columns_ignored() {
        let frame = normalize(&raw(&[("notes", "whatever"), ("lexer", "invalid")])).unwrap();
        assert_eq!(frame.lexer, LexerChoice::Invalid);
    }

    #[test]
    fn test_exhaustive_frames_normalize() {
        for raw in generate_exhaustive() {
            let frame = normalize(&raw).unwrap();
            assert!(frame.is_consistent());
            assert_eq!(frame.to_raw(), raw);
        }
    }

    fn arb_cell(dimension: Dimension) -> impl Strategy<Value = Option<String>> {
        let mut values: Vec<String> = dimension.categories().iter().map(|c| c.to_string()).collect();
        values.push(WILDCARD.to_string());
        values.push(String::new());
        proptest::option::of(proptest::sample::select(values))
    }

    fn arb_raw_frame() -> impl Strategy<Value = RawFrame> {
        let cells: Vec<_> = Dimension::all()
            .into_iter()
            .map(|d| (arb_cell(d), any::<bool>()))
            .collect();
        cells.prop_map(|cells| {
            let mut raw = RawFrame::new();
            for (dim, (cell, use_alias)) in Dimension::all().into_iter().zip(cells) {
                if let Some(value) = cell {
                    let key = if use_alias { dim.alias() } else { dim.key() };
                    raw.insert(key.to_string(), value);
                }
            }
            raw
        })
    }

    proptest! {
        #[test]
        fn prop_normalization_is_total(raw in arb_raw_frame()) {
            let frame = normalize(&raw).unwrap();
            let rendered = frame.to_raw();
            for dim in Dimension::all() {
                let value = &rendered[dim.key()];
                prop_assert_ne!(value.as_str(), WILDCARD);
                prop_assert!(dim.categories().contains(&value.as_str()));
            }
        }

        #[test]
        fn prop_normalization_is_deterministic(raw in arb_raw_frame()) {
            prop_assert_eq!(normalize(&raw).unwrap(), normalize(&raw).unwrap());
        }
    }
}
