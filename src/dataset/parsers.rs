//! Reference field parsers for tab-separated dataset rows.
//!
//! Both parsers expect rows shaped as
//! `<features><delim><label>[<delim><weight>]` and differ only in how the
//! feature field is encoded.

use thiserror::Error;

/// Dimension bound applied when [`TextFormat::max_dimension`] is unset.
pub const DEFAULT_MAX_DIMENSION: usize = 1 << 24;

/// Errors reported by a [`FieldParser`] for a single row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The label field is missing or blank.
    #[error("row has no label field")]
    MissingLabel,

    /// More fields than `features`, `label` and `weight`.
    #[error("expected at most 3 fields, found {found}")]
    TooManyFields {
        /// Number of fields present in the row.
        found: usize,
    },

    /// A field could not be read as a number.
    #[error("invalid {field} '{text}'")]
    InvalidNumber {
        /// Which field was being read.
        field: &'static str,
        /// Offending text.
        text: String,
    },

    /// A sparse entry is not of the form `index:value`.
    #[error("malformed sparse entry '{entry}'")]
    MalformedEntry {
        /// Offending entry.
        entry: String,
    },

    /// A sparse index is smaller than the configured index base.
    #[error("feature index {index} is below index base {base}")]
    IndexBelowBase {
        /// Index as written in the row.
        index: usize,
        /// Configured smallest index.
        base: usize,
    },

    /// A feature position exceeds the configured maximum dimension.
    #[error("feature position {position} exceeds maximum dimension {max}")]
    DimensionExceeded {
        /// Zero-based feature position.
        position: usize,
        /// Configured maximum dimension.
        max: usize,
    },
}

/// Label and weight parsed from a row; the features go to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelWeight {
    /// Target value.
    pub label: f64,
    /// Importance weight.
    pub weight: f64,
}

/// Converts one raw row into features, a label and a weight.
///
/// Features are written to `features`, which the caller hands over empty.
pub trait FieldParser {
    /// Parse `row`, pushing its dense features into `features`.
    fn parse(&self, row: &str, features: &mut Vec<f64>) -> Result<LabelWeight, ParseError>;
}

impl<F> FieldParser for F
where
    F: Fn(&str, &mut Vec<f64>) -> Result<LabelWeight, ParseError>,
{
    fn parse(&self, row: &str, features: &mut Vec<f64>) -> Result<LabelWeight, ParseError> {
        self(row, features)
    }
}

/// Row layout settings shared by the reference parsers.
#[derive(Debug, Clone)]
pub struct TextFormat {
    /// Separator between the features, label and weight fields.
    pub field_delimiter: char,
    /// Index of the first feature in sparse rows.
    pub index_base: usize,
    /// Weight used when a row omits it.
    pub default_weight: f64,
    /// Upper bound on the dense vector length; [`DEFAULT_MAX_DIMENSION`]
    /// when `None`.
    pub max_dimension: Option<usize>,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            field_delimiter: '\t',
            index_base: 1,
            default_weight: 1.0,
            max_dimension: None,
        }
    }
}

impl TextFormat {
    /// Set the field delimiter.
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    /// Set the sparse index base (commonly 0 or 1).
    pub fn with_index_base(mut self, index_base: usize) -> Self {
        self.index_base = index_base;
        self
    }

    /// Set the weight assumed for rows without a weight field.
    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    /// Reject rows whose dense vector would exceed `max` entries.
    pub fn with_max_dimension(mut self, max: usize) -> Self {
        self.max_dimension = Some(max);
        self
    }

    fn dimension_limit(&self) -> usize {
        self.max_dimension.unwrap_or(DEFAULT_MAX_DIMENSION)
    }

    fn check_position(&self, position: usize) -> Result<(), ParseError> {
        let max = self.dimension_limit();
        if position >= max {
            return Err(ParseError::DimensionExceeded { position, max });
        }
        Ok(())
    }

    /// Split a row into its feature field and parsed label/weight.
    fn split<'r>(&self, row: &'r str) -> Result<(&'r str, LabelWeight), ParseError> {
        let mut fields = row.split(self.field_delimiter);
        let features = fields.next().unwrap_or_default();
        let label = fields
            .next()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or(ParseError::MissingLabel)?;
        let weight = fields.next().map(str::trim).filter(|text| !text.is_empty());

        let extra = fields.count();
        if extra > 0 {
            return Err(ParseError::TooManyFields { found: 3 + extra });
        }

        let label = parse_number("label", label)?;
        let weight = match weight {
            Some(text) => parse_number("weight", text)?,
            None => self.default_weight,
        };
        Ok((features, LabelWeight { label, weight }))
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, ParseError> {
    text.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        text: text.to_string(),
    })
}

/// Parser for sparse `index:value` feature lists (SVMLight style).
///
/// Gaps are zero-filled; a repeated index keeps its last value.
#[derive(Debug, Clone, Default)]
pub struct SparseEntryParser {
    format: TextFormat,
}

impl SparseEntryParser {
    /// Create a parser for the given layout.
    pub fn new(format: TextFormat) -> Self {
        Self { format }
    }

    /// Row layout in use.
    pub fn format(&self) -> &TextFormat {
        &self.format
    }

    fn parse_entry(&self, entry: &str) -> Result<(usize, f64), ParseError> {
        let malformed = || ParseError::MalformedEntry {
            entry: entry.to_string(),
        };
        let (index, value) = entry.split_once(':').ok_or_else(malformed)?;
        let index: usize = index.parse().map_err(|_| malformed())?;
        if index < self.format.index_base {
            return Err(ParseError::IndexBelowBase {
                index,
                base: self.format.index_base,
            });
        }
        let position = index - self.format.index_base;
        self.format.check_position(position)?;
        Ok((position, parse_number("feature value", value)?))
    }
}

impl FieldParser for SparseEntryParser {
    fn parse(&self, row: &str, features: &mut Vec<f64>) -> Result<LabelWeight, ParseError> {
        let (entries, target) = self.format.split(row)?;
        for entry in entries.split_whitespace() {
            let (position, value) = self.parse_entry(entry)?;
            if position >= features.len() {
                let exceeded = || ParseError::DimensionExceeded {
                    position,
                    max: self.format.dimension_limit(),
                };
                let len = position.checked_add(1).ok_or_else(exceeded)?;
                features
                    .try_reserve(len - features.len())
                    .map_err(|_| exceeded())?;
                features.resize(len, 0.0);
            }
            features[position] = value;
        }
        Ok(target)
    }
}

/// Parser for dense feature lists separated by commas and/or whitespace.
#[derive(Debug, Clone, Default)]
pub struct DenseEntryParser {
    format: TextFormat,
}

impl DenseEntryParser {
    /// Create a parser for the given layout.
    pub fn new(format: TextFormat) -> Self {
        Self { format }
    }

    /// Row layout in use.
    pub fn format(&self) -> &TextFormat {
        &self.format
    }
}

impl FieldParser for DenseEntryParser {
    fn parse(&self, row: &str, features: &mut Vec<f64>) -> Result<LabelWeight, ParseError> {
        let (values, target) = self.format.split(row)?;
        let tokens = values
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());
        for token in tokens {
            self.format.check_position(features.len())?;
            features.push(parse_number("feature value", token)?);
        }
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sparse(row: &str) -> Result<(Vec<f64>, LabelWeight), ParseError> {
        let mut features = Vec::new();
        let target = SparseEntryParser::default().parse(row, &mut features)?;
        Ok((features, target))
    }

    #[test]
    fn test_sparse_basic_row() {
        let (features, target) = sparse("1:3.0 2:1.5\t0\t1.0").unwrap();
        assert_eq!(features, vec![3.0, 1.5]);
        assert_eq!(target, LabelWeight { label: 0.0, weight: 1.0 });
    }

    #[test]
    fn test_sparse_zero_fills_gaps_and_last_value_wins() {
        let (features, _) = sparse("4:2.0 2:1.0 2:7.0\t1").unwrap();
        assert_eq!(features, vec![0.0, 7.0, 0.0, 2.0]);
    }

    #[test]
    fn test_default_weight_when_omitted() {
        let (_, target) = sparse("1:1\t-1").unwrap();
        assert_eq!(target.weight, 1.0);

        let parser = SparseEntryParser::new(TextFormat::default().with_default_weight(0.25));
        let mut features = Vec::new();
        let target = parser.parse("1:1\t-1\t", &mut features).unwrap();
        assert_eq!(target.weight, 0.25);
    }

    #[test]
    fn test_empty_feature_field() {
        let (features, target) = sparse("\t3.5").unwrap();
        assert!(features.is_empty());
        assert_eq!(target.label, 3.5);
    }

    #[test]
    fn test_sparse_errors() {
        assert_eq!(sparse("1:1.0").unwrap_err(), ParseError::MissingLabel);
        assert_eq!(sparse("1:1.0\t ").unwrap_err(), ParseError::MissingLabel);
        assert_eq!(
            sparse("1:1.0\t0\t1\textra").unwrap_err(),
            ParseError::TooManyFields { found: 4 }
        );
        assert_eq!(
            sparse("1=1.0\t0").unwrap_err(),
            ParseError::MalformedEntry {
                entry: "1=1.0".to_string()
            }
        );
        assert_eq!(
            sparse("0:1.0\t0").unwrap_err(),
            ParseError::IndexBelowBase { index: 0, base: 1 }
        );
        assert_eq!(
            sparse("1:abc\t0").unwrap_err(),
            ParseError::InvalidNumber {
                field: "feature value",
                text: "abc".to_string()
            }
        );
        assert_eq!(
            sparse("1:1\tyes").unwrap_err(),
            ParseError::InvalidNumber {
                field: "label",
                text: "yes".to_string()
            }
        );
    }

    #[test]
    fn test_zero_based_index() {
        let parser = SparseEntryParser::new(TextFormat::default().with_index_base(0));
        let mut features = Vec::new();
        parser.parse("0:5 2:1\t1", &mut features).unwrap();
        assert_eq!(features, vec![5.0, 0.0, 1.0]);
    }

    #[test]
    fn test_max_dimension() {
        let format = TextFormat::default().with_max_dimension(2);
        let mut features = Vec::new();
        let err = SparseEntryParser::new(format.clone())
            .parse("3:1\t0", &mut features)
            .unwrap_err();
        assert_eq!(err, ParseError::DimensionExceeded { position: 2, max: 2 });

        let mut features = Vec::new();
        let err = DenseEntryParser::new(format)
            .parse("1,2,3\t0", &mut features)
            .unwrap_err();
        assert_eq!(err, ParseError::DimensionExceeded { position: 2, max: 2 });
    }

    #[test]
    fn test_huge_sparse_index_is_rejected() {
        let row = format!("{}:1\t0", usize::MAX);
        for base in [0, 1] {
            let parser = SparseEntryParser::new(TextFormat::default().with_index_base(base));
            let mut features = Vec::new();
            let err = parser.parse(&row, &mut features).unwrap_err();
            assert_eq!(
                err,
                ParseError::DimensionExceeded {
                    position: usize::MAX - base,
                    max: DEFAULT_MAX_DIMENSION,
                }
            );
            assert!(features.is_empty());
        }

        let err = sparse("4000000000:1\t0").unwrap_err();
        assert!(matches!(err, ParseError::DimensionExceeded { position: 3_999_999_999, .. }));
    }

    #[test]
    fn test_unbounded_dimension_never_overflows() {
        let format = TextFormat::default()
            .with_index_base(0)
            .with_max_dimension(usize::MAX);
        let parser = SparseEntryParser::new(format);
        let mut features = Vec::new();
        let err = parser
            .parse(&format!("{}:1\t0", usize::MAX - 1), &mut features)
            .unwrap_err();
        assert!(matches!(err, ParseError::DimensionExceeded { .. }));
    }

    #[test]
    fn test_dense_invalid_value() {
        let mut features = Vec::new();
        let err = DenseEntryParser::default()
            .parse("1.0,two,3\t0", &mut features)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: "feature value",
                text: "two".to_string()
            }
        );
    }

    #[test]
    fn test_dense_separators() {
        let parser = DenseEntryParser::default();
        let mut features = Vec::new();
        let target = parser.parse("1.0, 2.5 -3\t2\t0.5", &mut features).unwrap();
        assert_eq!(features, vec![1.0, 2.5, -3.0]);
        assert_eq!(target, LabelWeight { label: 2.0, weight: 0.5 });
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = DenseEntryParser::new(TextFormat::default().with_field_delimiter('|'));
        let mut features = Vec::new();
        let target = parser.parse("1 2|0|3", &mut features).unwrap();
        assert_eq!(features, vec![1.0, 2.0]);
        assert_eq!(target.weight, 3.0);
    }

    #[test]
    fn test_closure_parser() {
        let parser = |row: &str, features: &mut Vec<f64>| -> Result<LabelWeight, ParseError> {
            features.push(row.len() as f64);
            Ok(LabelWeight {
                label: 1.0,
                weight: 1.0,
            })
        };
        let mut features = Vec::new();
        parser.parse("abcd", &mut features).unwrap();
        assert_eq!(features, vec![4.0]);
    }
}
