//! Shape checks applied before any expense reaches storage.

use spendbook_domain::{ExpenseDraft, ExpensePatch};

use crate::CoreError;

/// Checks every field of a new expense.
pub fn validate_draft(draft: &ExpenseDraft) -> Result<(), CoreError> {
    validate_amount(draft.amount)?;
    validate_description(&draft.description)
}

/// Checks only the fields a patch actually supplies.
pub fn validate_patch(patch: &ExpensePatch) -> Result<(), CoreError> {
    if let Some(amount) = patch.amount {
        validate_amount(amount)?;
    }
    if let Some(description) = patch.description.as_deref() {
        validate_description(description)?;
    }
    Ok(())
}

pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("description is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use spendbook_domain::Category;

    fn draft(amount: f64, description: &str) -> ExpenseDraft {
        ExpenseDraft::new(amount, Category::Other, description, Utc::now())
    }

    #[test]
    fn accepts_positive_amount_and_text() {
        assert!(validate_draft(&draft(0.01, "Gum")).is_ok());
    }

    #[test]
    fn rejects_non_positive_and_non_finite_amounts() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = validate_draft(&draft(amount, "Gum")).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "amount {amount}");
        }
    }

    #[test]
    fn rejects_blank_descriptions() {
        assert!(validate_draft(&draft(3.0, "")).is_err());
        assert!(validate_draft(&draft(3.0, "   ")).is_err());
    }

    #[test]
    fn patch_checks_only_supplied_fields() {
        assert!(validate_patch(&ExpensePatch::default()).is_ok());
        assert!(validate_patch(&ExpensePatch::default().category(Category::Bills)).is_ok());
        assert!(validate_patch(&ExpensePatch::default().amount(0.0)).is_err());
        assert!(validate_patch(&ExpensePatch::default().description(" ")).is_err());
    }
}
