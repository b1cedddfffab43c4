//! Deep structural diff between two JSON payloads

use std::fmt;

use serde_json::{Number, Value};

/// One difference between the baseline and candidate payloads
#[derive(Debug, Clone, PartialEq)]
pub struct DiffEntry {
    pub kind: DiffKind,
    /// Dotted path to the differing node, `[i]` for array indices
    pub path: String,
    pub baseline: String,
    pub candidate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// Key present only on the candidate side
    Added,
    /// Key present only on the baseline side
    Removed,
    /// Same type, different value
    Changed,
    /// Different JSON types at the same path
    TypeChanged,
    /// Arrays of different lengths
    LengthChanged,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Added => write!(f, "ADDED"),
            DiffKind::Removed => write!(f, "REMOVED"),
            DiffKind::Changed => write!(f, "CHANGED"),
            DiffKind::TypeChanged => write!(f, "TYPE"),
            DiffKind::LengthChanged => write!(f, "LENGTH"),
        }
    }
}

/// Options controlling the diff
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Leading digits two numbers must share to count as equal
    pub significant_digits: u32,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            significant_digits: 5,
        }
    }
}

/// Compare two payloads, returning every difference found
///
/// Never fails: both inputs are already-parsed JSON values.
pub fn diff_values(baseline: &Value, candidate: &Value, options: &DiffOptions) -> Vec<DiffEntry> {
    let mut entries = Vec::new();
    diff_at("", baseline, candidate, options, &mut entries);
    entries
}

fn diff_at(
    path: &str,
    baseline: &Value,
    candidate: &Value,
    options: &DiffOptions,
    entries: &mut Vec<DiffEntry>,
) {
    match (baseline, candidate) {
        (Value::Object(base_obj), Value::Object(cand_obj)) => {
            for (key, base_value) in base_obj {
                let child = join_path(path, key);
                match cand_obj.get(key) {
                    Some(cand_value) => diff_at(&child, base_value, cand_value, options, entries),
                    None => entries.push(DiffEntry {
                        kind: DiffKind::Removed,
                        path: child,
                        baseline: base_value.to_string(),
                        candidate: "(missing)".to_string(),
                    }),
                }
            }

            for (key, cand_value) in cand_obj {
                if !base_obj.contains_key(key) {
                    entries.push(DiffEntry {
                        kind: DiffKind::Added,
                        path: join_path(path, key),
                        baseline: "(missing)".to_string(),
                        candidate: cand_value.to_string(),
                    });
                }
            }
        }
        (Value::Array(base_arr), Value::Array(cand_arr)) => {
            if base_arr.len() != cand_arr.len() {
                entries.push(DiffEntry {
                    kind: DiffKind::LengthChanged,
                    path: join_path(path, "length"),
                    baseline: base_arr.len().to_string(),
                    candidate: cand_arr.len().to_string(),
                });
            }

            // Elements are compared positionally over the common prefix.
            for (i, (base_elem, cand_elem)) in base_arr.iter().zip(cand_arr.iter()).enumerate() {
                let child = format!("{path}[{i}]");
                diff_at(&child, base_elem, cand_elem, options, entries);
            }
        }
        (Value::Number(base_num), Value::Number(cand_num)) => {
            if !numbers_equal(base_num, cand_num, options.significant_digits) {
                entries.push(DiffEntry {
                    kind: DiffKind::Changed,
                    path: path.to_string(),
                    baseline: base_num.to_string(),
                    candidate: cand_num.to_string(),
                });
            }
        }
        _ => {
            if std::mem::discriminant(baseline) != std::mem::discriminant(candidate) {
                entries.push(DiffEntry {
                    kind: DiffKind::TypeChanged,
                    path: path.to_string(),
                    baseline: baseline.to_string(),
                    candidate: candidate.to_string(),
                });
            } else if baseline != candidate {
                entries.push(DiffEntry {
                    kind: DiffKind::Changed,
                    path: path.to_string(),
                    baseline: baseline.to_string(),
                    candidate: candidate.to_string(),
                });
            }
        }
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Numeric equality up to a count of significant (leading) digits
///
/// Both values are rounded to the given number of leading digits and
/// compared, absorbing float representation noise past that point.
fn numbers_equal(a: &Number, b: &Number, significant_digits: u32) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        if a == b {
            return true;
        }
    }

    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => {
            let a = round_significant(a, significant_digits);
            let b = round_significant(b, significant_digits);
            a == b || (a.is_nan() && b.is_nan())
        }
        // u64 values above i64::MAX with no f64 representation
        _ => a == b,
    }
}

fn round_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    let exponent = digits as i32 - 1 - magnitude;

    // Near the subnormal range the scale factor would overflow to
    // infinity and poison the comparison with NaN, so split the scaling
    // into two finite steps.
    if exponent > 300 {
        let lifted = value * 10f64.powi(300);
        let factor = 10f64.powi(exponent - 300);
        return (lifted * factor).round() / factor / 10f64.powi(300);
    }

    let factor = 10f64.powi(exponent);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identical_payloads_diff_empty() {
        let payload = json!({
            "id": 7,
            "name": "Bukhari",
            "grades": [{"grade": "sahih", "weight": 0.25}],
            "total": 7563.0,
        });
        assert!(diff_values(&payload, &payload, &DiffOptions::default()).is_empty());
    }

    #[test]
    fn noise_beyond_five_significant_digits_is_equal() {
        let entries = diff_values(
            &json!(1.23456),
            &json!(1.23457),
            &DiffOptions::default(),
        );
        assert!(entries.is_empty());

        // Integers get the same treatment.
        let entries = diff_values(&json!(123456), &json!(123457), &DiffOptions::default());
        assert!(entries.is_empty());
    }

    #[test]
    fn change_within_five_significant_digits_is_reported() {
        let entries = diff_values(&json!(1.2345), &json!(1.2346), &DiffOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Changed);

        let entries = diff_values(&json!(12345), &json!(12346), &DiffOptions::default());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn tiny_magnitudes_still_compare_by_leading_digits() {
        // Differs in the first significant digit; the scale factor for
        // these magnitudes must stay finite for this to be reported.
        let entries = diff_values(
            &json!(1.2345e-305),
            &json!(6.789e-305),
            &DiffOptions::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Changed);

        let entries = diff_values(
            &json!(1.23456e-305),
            &json!(1.23457e-305),
            &DiffOptions::default(),
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn integer_and_float_zero_are_equal() {
        assert!(diff_values(&json!(0), &json!(0.0), &DiffOptions::default()).is_empty());
    }

    #[test]
    fn added_key_reports_one_addition() {
        let baseline = json!({"id": 1, "name": "Bukhari"});
        let candidate = json!({"id": 1, "name": "Bukhari", "extra": true});

        let entries = diff_values(&baseline, &candidate, &DiffOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Added);
        assert_eq!(entries[0].path, "extra");
        assert_eq!(entries[0].candidate, "true");
    }

    #[test]
    fn removed_key_reports_one_removal() {
        let baseline = json!({"id": 1, "name": "Bukhari"});
        let candidate = json!({"id": 1});

        let entries = diff_values(&baseline, &candidate, &DiffOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::Removed);
        assert_eq!(entries[0].path, "name");
    }

    #[test]
    fn type_change_is_distinguished_from_value_change() {
        let entries = diff_values(
            &json!({"number": "52"}),
            &json!({"number": 52}),
            &DiffOptions::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::TypeChanged);
        assert_eq!(entries[0].path, "number");
    }

    #[test]
    fn array_length_mismatch_reports_once_plus_prefix() {
        let entries = diff_values(
            &json!([1, 2, 3]),
            &json!([1, 2]),
            &DiffOptions::default(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiffKind::LengthChanged);
        assert_eq!(entries[0].path, "length");
    }

    #[test]
    fn nested_paths_are_dotted_with_indices() {
        let baseline = json!({"hadiths": [{"grade": "sahih"}]});
        let candidate = json!({"hadiths": [{"grade": "hasan"}]});

        let entries = diff_values(&baseline, &candidate, &DiffOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "hadiths[0].grade");
    }
}
