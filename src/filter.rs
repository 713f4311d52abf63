//filter.rs

use std::fmt;
use std::str::FromStr;

use crate::error::NovelError;
use crate::records::ComparisonRecord;

/// The supported comparison kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Gt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl Comparison {
    /// Evaluate `left <op> right`.
    pub fn holds<T: PartialOrd + ?Sized>(&self, left: &T, right: &T) -> bool {
        match self {
            Comparison::Lt => left < right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Le => left <= right,
            Comparison::Eq => left == right,
            Comparison::Ne => left != right,
        }
    }
}

impl FromStr for Comparison {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "lt" => Ok(Comparison::Lt),
            "gt" => Ok(Comparison::Gt),
            "ge" => Ok(Comparison::Ge),
            "le" => Ok(Comparison::Le),
            "eq" => Ok(Comparison::Eq),
            "ne" => Ok(Comparison::Ne),
            _ => Err(format!("unknown comparison '{}' (use lt, gt, ge, le, eq or ne)", input)),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Comparison::Lt => "lt",
            Comparison::Gt => "gt",
            Comparison::Ge => "ge",
            Comparison::Le => "le",
            Comparison::Eq => "eq",
            Comparison::Ne => "ne",
        };
        write!(f, "{}", name)
    }
}

/// Numeric columns of a comparison record that can be filtered on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FilterField {
    Distance,
    CleavageSite,
    Score,
    MedianLeft,
    MedianRight,
    MedianDiff,
}

impl FilterField {
    pub fn value_of(&self, record: &ComparisonRecord) -> f64 {
        match self {
            FilterField::Distance => record.distance,
            FilterField::CleavageSite => record.cleavage_site as f64,
            FilterField::Score => record.score,
            FilterField::MedianLeft => record.median_left,
            FilterField::MedianRight => record.median_right,
            FilterField::MedianDiff => record.median_diff,
        }
    }
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "distance" | "dist" => Ok(FilterField::Distance),
            "cleavage_site" | "cs" => Ok(FilterField::CleavageSite),
            "score" => Ok(FilterField::Score),
            "median_left" | "med_left" => Ok(FilterField::MedianLeft),
            "median_right" | "med_right" => Ok(FilterField::MedianRight),
            "median_diff" | "med_diff" => Ok(FilterField::MedianDiff),
            _ => Err(format!("unknown field '{}'", input)),
        }
    }
}

/// An exclusion rule: records where `field <op> threshold` holds are dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Predicate {
    pub field: FilterField,
    pub op: Comparison,
    pub threshold: f64,
}

impl Predicate {
    pub fn new(field: FilterField, op: Comparison, threshold: f64) -> Self {
        Self { field, op, threshold }
    }

    pub fn matches(&self, record: &ComparisonRecord) -> bool {
        self.op.holds(&self.field.value_of(record), &self.threshold)
    }
}

/// Parses `field:op:threshold`, e.g. `median_diff:lt:80`.
impl FromStr for Predicate {
    type Err = NovelError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = input.split(':').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(NovelError::Predicate(
                input.to_string(),
                "expected field:op:threshold".to_string(),
            ));
        }
        let field = parts[0]
            .parse::<FilterField>()
            .map_err(|e| NovelError::Predicate(input.to_string(), e))?;
        let op = parts[1]
            .parse::<Comparison>()
            .map_err(|e| NovelError::Predicate(input.to_string(), e))?;
        let threshold = parts[2].parse::<f64>().map_err(|_| {
            NovelError::Predicate(input.to_string(), format!("'{}' is not a number", parts[2]))
        })?;
        Ok(Predicate { field, op, threshold })
    }
}

/// Drop every record for which ANY predicate holds.
pub fn filter_records(records: Vec<ComparisonRecord>, predicates: &[Predicate]) -> Vec<ComparisonRecord> {
    if predicates.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|record| !predicates.iter().any(|p| p.matches(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_names() {
        for name in ["lt", "gt", "ge", "le", "eq", "ne"] {
            let op: Comparison = name.parse().unwrap();
            assert_eq!(op.to_string(), name);
        }
        assert!("approx".parse::<Comparison>().is_err());
    }

    #[test]
    fn test_comparison_on_strings() {
        assert!(Comparison::Eq.holds("kidney", "kidney"));
        assert!(Comparison::Lt.holds("brain", "kidney"));
        assert!(Comparison::Ne.holds("brain", "kidney"));
    }

    #[test]
    fn test_predicate_parse() {
        let p: Predicate = "med_diff:lt:80".parse().unwrap();
        assert_eq!(p, Predicate::new(FilterField::MedianDiff, Comparison::Lt, 80.0));

        assert!("score:lt".parse::<Predicate>().is_err());
        assert!("height:lt:3".parse::<Predicate>().is_err());
        assert!("score:lt:ten".parse::<Predicate>().is_err());
    }
}
