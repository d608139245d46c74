use super::fields::FieldSpec;
use crate::graph::FieldValue;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Outcome of checking a node's payload against its kind's field rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return write!(f, "ok");
        }
        let lines = self
            .errors
            .iter()
            .map(|e| format!("error: {}", e))
            .chain(self.warnings.iter().map(|w| format!("warning: {}", w)))
            .join("\n");
        write!(f, "{}", lines)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Applies one field's rules to its current value, appending findings to `report`.
pub(super) fn check_field(spec: &FieldSpec, value: Option<&FieldValue>, report: &mut ValidationReport) {
    let rules = &spec.rules;
    let name = &spec.name;

    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => {
            if rules.required {
                report.errors.push(format!("{} is required", name));
            }
            return;
        }
    };

    match value {
        FieldValue::Text(text) => {
            let len = text.chars().count();
            if let Some(min) = rules.min_length {
                if len < min {
                    report
                        .errors
                        .push(format!("{} must be at least {} characters", name, min));
                }
            }
            if let Some(max) = rules.max_length {
                if len > max {
                    report.warnings.push(format!(
                        "{} is longer than recommended {} characters",
                        name, max
                    ));
                }
            }
            if rules.identifier && !is_identifier(text) {
                report.errors.push(format!("{} format is invalid", name));
            }
        }
        FieldValue::List(items) => {
            if let Some(min) = rules.min_items {
                if items.len() < min {
                    report
                        .errors
                        .push(format!("{} must have at least {} items", name, min));
                }
            }
            if let Some(max) = rules.max_items {
                if items.len() > max {
                    report.warnings.push(format!(
                        "{} has more than recommended {} items",
                        name, max
                    ));
                }
            }
        }
        FieldValue::Number(n) => {
            if let Some(min) = rules.min {
                if *n < min {
                    report
                        .errors
                        .push(format!("{} must be at least {}", name, FieldValue::Number(min)));
                }
            }
            if let Some(max) = rules.max {
                if *n > max {
                    report
                        .errors
                        .push(format!("{} cannot exceed {}", name, FieldValue::Number(max)));
                }
            }
        }
        FieldValue::Bool(_) | FieldValue::Null => {}
    }
}
