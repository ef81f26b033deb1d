use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating download size variants
    /// Must be a thumbnail width made of digits only
    /// - Valid: "500", "250", "100"
    /// - Invalid: "", "-1", "250px", "../x"
    pub static ref SIZE_VARIANT_REGEX: Regex = Regex::new(r"^[0-9]{1,5}$").unwrap();
}
