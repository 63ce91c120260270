use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating seller phone numbers
    /// Optional leading +, then 7-20 digits/spaces/hyphens
    /// - Valid: "+62 812-3456-789", "02112345678"
    /// - Invalid: "12345", "phone", "+62_812"
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9\s-]{7,20}$").unwrap();

    /// Regex for validating Harmonized System codes
    /// 6 to 10 digits, optionally dot-separated in groups
    /// - Valid: "610910", "6109.10", "6109.10.00"
    /// - Invalid: "61", "cotton", "6109-10"
    pub static ref HS_CODE_REGEX: Regex = Regex::new(r"^[0-9]{4}(?:\.?[0-9]{2}){1,3}$").unwrap();
}
