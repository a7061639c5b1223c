//! Positional argument parsing
//!
//! Transactions arrive as a name plus string arguments. Numeric arguments are
//! decimal strings and are parsed here before a handler runs.

use crate::error::{ContractError, Result};

/// Fail unless `args` has exactly `expected` entries
pub fn expect_arity(function: &str, args: &[String], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(ContractError::invalid_argument(format!(
            "{} expects {} argument(s), got {}",
            function,
            expected,
            args.len()
        )));
    }
    Ok(())
}

/// Parse a decimal-string real. Non-finite values are rejected.
pub fn parse_real(name: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        ContractError::invalid_argument(format!("{} must be a decimal number, got {:?}", name, raw))
    })?;
    if !value.is_finite() {
        return Err(ContractError::invalid_argument(format!(
            "{} must be finite, got {:?}",
            name, raw
        )));
    }
    Ok(value)
}

/// Error for a transaction name the contract does not define
pub fn unknown_function(contract: &str, function: &str) -> ContractError {
    ContractError::invalid_argument(format!(
        "function {:?} is not defined by contract {}",
        function, contract
    ))
}
