//! Pure validation rules for the search and person-info forms

use crate::address::Address;
use crate::error::ValidationError;

/// Minimum accepted postcode length, in digits.
pub const MIN_POSTCODE_LEN: usize = 4;

/// One constraint to check, constructed fresh per validation pass. The
/// `error` payload is what gets surfaced when the rule fails.
pub struct ValidationRule<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub display_name: &'static str,
    pub error: ValidationError,
}

/// True iff `value` is one or more ASCII digits, nothing else. No sign, no
/// whitespace, no leading-zero restriction.
pub fn is_strictly_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// True iff `value` is non-empty. No trimming is applied, so a
/// whitespace-only value counts as present.
pub fn validate_required(value: &str) -> bool {
    !value.is_empty()
}

pub fn validate_numeric_field(rule: ValidationRule) -> Result<(), ValidationError> {
    if is_strictly_numeric(rule.value) {
        Ok(())
    } else {
        Err(rule.error)
    }
}

/// The numeric rules for one search request, in the order they are checked.
pub fn search_rules<'a>(postcode: &'a str, house_number: &'a str) -> [ValidationRule<'a>; 2] {
    [
        ValidationRule {
            field: "postcode",
            value: postcode,
            display_name: "Postcode",
            error: ValidationError::PostcodeNotNumeric,
        },
        ValidationRule {
            field: "streetnumber",
            value: house_number,
            display_name: "Street Number",
            error: ValidationError::StreetNumberNotNumeric,
        },
    ]
}

/// Validate one search request. The first violated rule wins: presence of
/// both fields, then postcode length, then the numeric rules in the
/// [`search_rules`] order.
pub fn validate_search(postcode: &str, house_number: &str) -> Result<(), ValidationError> {
    if !validate_required(postcode) || !validate_required(house_number) {
        return Err(ValidationError::MissingSearchInput);
    }
    if postcode.len() < MIN_POSTCODE_LEN {
        return Err(ValidationError::PostcodeTooShort);
    }
    for rule in search_rules(postcode, house_number) {
        validate_numeric_field(rule)?;
    }

    Ok(())
}

/// Validate the person-info submission against the currently displayed
/// candidates. An empty selection (or an empty candidate list) is reported
/// differently from a selection that no longer matches any candidate.
pub fn validate_person_info<'a>(
    first_name: &str,
    last_name: &str,
    selected: &str,
    candidates: &'a [Address],
) -> Result<&'a Address, ValidationError> {
    if !validate_required(first_name) || !validate_required(last_name) {
        return Err(ValidationError::MissingPersonInfo);
    }
    if !validate_required(selected) || candidates.is_empty() {
        return Err(ValidationError::NoAddressSelected);
    }

    candidates
        .iter()
        .find(|address| address.id == selected)
        .ok_or(ValidationError::SelectedAddressNotFound)
}
