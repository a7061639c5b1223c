//! Contract surface
//!
//! A contract is a stateless value that turns a named transaction with
//! positional string arguments into reads and staged writes on a
//! [`LedgerStub`]. Every contract maps each transaction name to exactly one
//! [`Output`] variant.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::{ContractError, Result};
use crate::stub::LedgerStub;

/// Successful transaction results.
///
/// | Variant | Produced by |
/// |---------|-------------|
/// | `Unit` | mutations and bootstrap |
/// | `Bool` | existence checks |
/// | `Payload` | reads: a record, a list of records, or history (JSON) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// No return value
    Unit,
    /// Boolean result
    Bool(bool),
    /// JSON payload in the contract's record schema
    Payload(Vec<u8>),
}

impl Output {
    /// Serialize `value` into a payload
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        Ok(Output::Payload(codec::encode("<output>", value)?))
    }

    /// Payload bytes, if this is a payload
    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Output::Payload(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Output::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Decode the payload into a typed value.
    ///
    /// Fails with `InvalidArgument` when the output carries no payload.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let bytes = self
            .payload()
            .ok_or_else(|| ContractError::invalid_argument(format!("{:?} carries no payload", self)))?;
        codec::decode("<output>", bytes)
    }
}

/// A deployable contract.
///
/// Implementations hold no mutable state: each call is a pure function of
/// its arguments and the stub's snapshot.
pub trait Contract {
    /// Contract name as deployed
    fn name(&self) -> &'static str;

    /// Transaction names this contract accepts
    fn functions(&self) -> &'static [&'static str];

    /// Execute the transaction `function` with positional `args`.
    fn invoke(&self, stub: &mut dyn LedgerStub, function: &str, args: &[String]) -> Result<Output>;
}
