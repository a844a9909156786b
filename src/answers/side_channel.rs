//! Longer-lived store shared with other tools.
//!
//! Supplies the arithmetic applied to the unused-holiday answer and receives
//! the value the renderer derived from it.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::warn;

use super::store::KeyValueStore;
use crate::error::Result;
use crate::render::{ArithmeticOperation, DerivedValueConfig};

pub const KEY_OPERATION_TYPE: &str = "operationType";
pub const KEY_OPERATION_VALUE: &str = "operationValue";
pub const KEY_CALCULATED_VALUE: &str = "calculatedValue";

#[derive(Debug)]
pub struct SideChannel<S> {
    store: S,
}

impl<S: KeyValueStore> SideChannel<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Operation and operand; unreadable entries are ignored with a warning
    pub fn derived_config(&self) -> DerivedValueConfig {
        let operation = self.scalar(KEY_OPERATION_TYPE).and_then(|raw| {
            ArithmeticOperation::from_str(&raw)
                .map_err(|e| warn!(key = KEY_OPERATION_TYPE, error = %e, "Ignoring operation"))
                .ok()
        });
        let operand = self.scalar(KEY_OPERATION_VALUE).and_then(|raw| {
            Decimal::from_str(raw.trim())
                .map_err(|e| warn!(key = KEY_OPERATION_VALUE, error = %e, "Ignoring operand"))
                .ok()
        });
        DerivedValueConfig { operation, operand }
    }

    pub fn set_operation(&mut self, operation: ArithmeticOperation, operand: Decimal) -> Result<()> {
        self.store
            .set(KEY_OPERATION_TYPE, serde_json::to_string(&operation)?)?;
        self.store
            .set(KEY_OPERATION_VALUE, serde_json::to_string(&operand.to_string())?)
    }

    /// Publish the derived value; `None` clears any previous one
    pub fn store_calculated(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self
                .store
                .set(KEY_CALCULATED_VALUE, serde_json::to_string(value)?),
            None => self.store.remove(KEY_CALCULATED_VALUE),
        }
    }

    pub fn calculated(&self) -> Option<String> {
        self.scalar(KEY_CALCULATED_VALUE)
    }

    /// A stored scalar as text: JSON strings and numbers are unwrapped, any
    /// other content is taken literally
    fn scalar(&self, key: &str) -> Option<String> {
        let raw = self.store.get(key)?;
        let text = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::String(s)) => s,
            Ok(serde_json::Value::Number(n)) => n.to_string(),
            _ => raw,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::MemoryStore;

    #[test]
    fn test_empty_side_channel_has_no_operation() {
        let channel = SideChannel::new(MemoryStore::new());
        assert_eq!(channel.derived_config(), DerivedValueConfig::default());
    }

    #[test]
    fn test_reads_plain_and_json_values() {
        let mut store = MemoryStore::new();
        store.set(KEY_OPERATION_TYPE, "divide".to_string()).unwrap();
        store.set(KEY_OPERATION_VALUE, "4".to_string()).unwrap();
        let channel = SideChannel::new(store);
        assert_eq!(
            channel.derived_config(),
            DerivedValueConfig::new(ArithmeticOperation::Divide, Decimal::from(4))
        );
    }

    #[test]
    fn test_set_operation_round_trip() {
        let mut channel = SideChannel::new(MemoryStore::new());
        channel
            .set_operation(ArithmeticOperation::Subtract, Decimal::new(15, 1))
            .unwrap();
        assert_eq!(
            channel.derived_config(),
            DerivedValueConfig::new(ArithmeticOperation::Subtract, Decimal::new(15, 1))
        );
    }

    #[test]
    fn test_bad_operation_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(KEY_OPERATION_TYPE, "\"modulo\"".to_string()).unwrap();
        store.set(KEY_OPERATION_VALUE, "2".to_string()).unwrap();
        let config = SideChannel::new(store).derived_config();
        assert_eq!(config.operation, None);
        assert_eq!(config.operand, Some(Decimal::from(2)));
    }

    #[test]
    fn test_store_and_clear_calculated() {
        let mut channel = SideChannel::new(MemoryStore::new());
        channel.store_calculated(Some("12.5")).unwrap();
        assert_eq!(channel.calculated().as_deref(), Some("12.5"));
        channel.store_calculated(None).unwrap();
        assert_eq!(channel.calculated(), None);
    }
}
