#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Postcode and house number are required!")]
    MissingSearchInput,
    #[error("Postcode must be at least 4 digits!")]
    PostcodeTooShort,
    #[error("Postcode must be all digits and non negative!")]
    PostcodeNotNumeric,
    #[error("Street Number must be all digits and non negative!")]
    StreetNumberNotNumeric,
    #[error("First name and last name fields mandatory!")]
    MissingPersonInfo,
    #[error("No address selected, try to select an address or find one if you haven't")]
    NoAddressSelected,
    #[error("Selected address not found")]
    SelectedAddressNotFound,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No results found!")]
    NoResultsFound,
    #[error("{0}")]
    Rejected(String),
    #[error("Failed to fetch addresses. Please try again.")]
    RequestFailed,
}
