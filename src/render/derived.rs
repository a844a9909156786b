//! Derived values
//!
//! The unused-holiday figure printed in the document is not the raw answer:
//! an externally configured operation and operand are applied to it first.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArithmeticOperation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperation {
    /// `None` on divide by zero or overflow
    pub fn apply(self, value: Decimal, operand: Decimal) -> Option<Decimal> {
        match self {
            ArithmeticOperation::Add => value.checked_add(operand),
            ArithmeticOperation::Subtract => value.checked_sub(operand),
            ArithmeticOperation::Multiply => value.checked_mul(operand),
            ArithmeticOperation::Divide => value.checked_div(operand),
        }
    }
}

impl fmt::Display for ArithmeticOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArithmeticOperation::Add => "add",
            ArithmeticOperation::Subtract => "subtract",
            ArithmeticOperation::Multiply => "multiply",
            ArithmeticOperation::Divide => "divide",
        };
        f.write_str(s)
    }
}

impl FromStr for ArithmeticOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(ArithmeticOperation::Add),
            "subtract" | "-" => Ok(ArithmeticOperation::Subtract),
            "multiply" | "*" | "x" => Ok(ArithmeticOperation::Multiply),
            "divide" | "/" => Ok(ArithmeticOperation::Divide),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Operation applied to the unused-holiday answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DerivedValueConfig {
    #[serde(default)]
    pub operation: Option<ArithmeticOperation>,
    #[serde(default)]
    pub operand: Option<Decimal>,
}

impl DerivedValueConfig {
    pub fn new(operation: ArithmeticOperation, operand: Decimal) -> Self {
        Self {
            operation: Some(operation),
            operand: Some(operand),
        }
    }
}

/// Outcome of deriving a value from an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedValue {
    Value(Decimal),
    /// The operation has no result (divide by zero, overflow)
    NoResult,
}

impl DerivedValue {
    /// Display form, trailing zeros removed
    pub fn display(&self) -> Option<String> {
        match self {
            DerivedValue::Value(v) => Some(v.normalize().to_string()),
            DerivedValue::NoResult => None,
        }
    }
}

/// Derive the printed value from a raw answer.
///
/// `None` when the answer is not a number. Without a configured operation
/// and operand the parsed answer is used as is.
pub fn derive(input: &str, config: &DerivedValueConfig) -> Option<DerivedValue> {
    let value = Decimal::from_str(input.trim()).ok()?;
    let derived = match (config.operation, config.operand) {
        (Some(op), Some(operand)) => op
            .apply(value, operand)
            .map_or(DerivedValue::NoResult, DerivedValue::Value),
        _ => DerivedValue::Value(value),
    };
    Some(derived)
}
