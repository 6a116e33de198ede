/// Input validation helpers
///
/// Inputs derive `validator::Validate` for their length and format rules.
/// These helpers turn the derive output into [`FieldViolation`]s keyed by the
/// camelCase names clients send, add the "not blank" rule the derive cannot
/// express, and fold everything into a single `ValidationFailed`.

use validator::ValidationErrors;

use crate::error::{FieldViolation, ServiceError, ServiceResult};

/// Collects the violations reported by a `validator` derive
///
/// Violations are sorted by field so responses are stable.
pub fn collect_violations(result: Result<(), ValidationErrors>) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = match result {
        Ok(()) => Vec::new(),
        Err(e) => e
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                let field = to_camel_case(&field.to_string());
                errors.iter().map(move |error| {
                    FieldViolation::new(
                        field.clone(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    )
                })
            })
            .collect(),
    };

    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.reason.cmp(&b.reason)));
    violations
}

/// Records a violation when `value` is non-empty but only whitespace
///
/// Empty values are already caught by the length rules.
pub fn require_not_blank(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    reason: &str,
) {
    if !value.is_empty() && value.trim().is_empty() {
        violations.push(FieldViolation::new(field, reason));
    }
}

/// Turns collected violations into a result
pub fn finish(violations: Vec<FieldViolation>) -> ServiceResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationFailed(violations))
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;

    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}
