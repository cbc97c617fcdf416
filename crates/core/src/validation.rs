//! Business rules a project form must satisfy before submission.
//!
//! Rules run in a fixed order and the first failure wins:
//!
//! 1. title is non-empty after trimming
//! 2. at least one category is selected
//! 3. the actual (list) price is present and a non-negative number
//! 4. the actual price is not below the sale price (an empty or
//!    unparseable sale price counts as zero, so free items pass)
//! 5. any picked attachment satisfies the file constraints

use crate::error::ValidationError;
use crate::form::ProjectForm;
use crate::types::parse_amount;

/// Check a form against the submission rules.
pub fn validate(form: &ProjectForm) -> Result<(), ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    if form.categories.is_empty() {
        return Err(ValidationError::CategoryRequired);
    }

    if form.actual_price.trim().is_empty() {
        return Err(ValidationError::ActualPriceRequired);
    }
    let actual_price = parse_amount(&form.actual_price)
        .filter(|v| *v >= 0.0)
        .ok_or(ValidationError::InvalidActualPrice)?;

    let price = parse_amount(&form.price).unwrap_or(0.0);
    if actual_price < price {
        return Err(ValidationError::ActualPriceBelowPrice {
            price,
            actual_price,
        });
    }

    for attachment in form.documentation.iter().chain(form.code_files.iter()) {
        attachment.check()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Category;

    fn form(title: &str, price: &str, actual_price: &str) -> ProjectForm {
        ProjectForm {
            title: title.to_string(),
            description: String::new(),
            categories: [Category::Python].into_iter().collect(),
            price: price.to_string(),
            actual_price: actual_price.to_string(),
            documentation: None,
            code_files: None,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert_eq!(validate(&form("ML Pipeline", "499", "999")), Ok(()));
    }

    #[test]
    fn blank_title_rejected() {
        assert_eq!(
            validate(&form("   ", "1", "2")),
            Err(ValidationError::TitleRequired)
        );
    }

    #[test]
    fn empty_categories_rejected_even_when_everything_else_is_valid() {
        let mut f = form("Web App", "10", "20");
        f.categories.clear();
        assert_eq!(validate(&f), Err(ValidationError::CategoryRequired));
    }

    #[test]
    fn title_checked_before_categories() {
        let mut f = form("", "10", "20");
        f.categories.clear();
        assert_eq!(validate(&f), Err(ValidationError::TitleRequired));
    }

    #[test]
    fn missing_actual_price_rejected() {
        assert_eq!(
            validate(&form("Web App", "10", " ")),
            Err(ValidationError::ActualPriceRequired)
        );
    }

    #[test]
    fn non_numeric_or_negative_actual_price_rejected() {
        assert_eq!(
            validate(&form("Web App", "", "lots")),
            Err(ValidationError::InvalidActualPrice)
        );
        assert_eq!(
            validate(&form("Web App", "", "-1")),
            Err(ValidationError::InvalidActualPrice)
        );
    }

    #[test]
    fn actual_price_below_price_rejected() {
        let err = validate(&form("Web App", "200", "150")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::ActualPriceBelowPrice {
                price: 200.0,
                actual_price: 150.0
            }
        );
        assert_eq!(
            err.to_string(),
            "Actual price must be greater than or equal to price"
        );
    }

    #[test]
    fn equal_prices_pass() {
        assert_eq!(validate(&form("Web App", "150", "150")), Ok(()));
    }

    #[test]
    fn comparison_is_numeric_not_lexical() {
        // "90" > "100" lexically; numerically it is smaller.
        assert_eq!(validate(&form("Web App", "90", "100")), Ok(()));
    }

    #[test]
    fn unparseable_price_counts_as_free() {
        assert_eq!(validate(&form("Web App", "", "0")), Ok(()));
        assert_eq!(validate(&form("Web App", "n/a", "5")), Ok(()));
    }

    #[test]
    fn validation_is_deterministic() {
        let f = form("Web App", "300", "100");
        assert_eq!(validate(&f), validate(&f));
    }
}
