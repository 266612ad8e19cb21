//! `validate` command.

use spotbridge_core::validate_url;

use crate::error::CliError;

/// Print the validation result for `url`.
pub fn handle_validate(url: &str) -> Result<(), CliError> {
    let result = validate_url(url);
    println!("{}", result.to_json());
    if result.valid {
        Ok(())
    } else {
        Err(CliError::InvalidUrl(url.to_string()))
    }
}
