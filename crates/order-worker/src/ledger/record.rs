use crate::ledger::LedgerError;

const DELIMITER: char = '|';

/// Retry count and last payload of one failed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub order_id: String,
    pub retry_count: u32,
    pub payload: String,
}

impl FailureRecord {
    pub fn new(order_id: impl Into<String>, retry_count: u32, payload: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            retry_count,
            payload: payload.into(),
        }
    }

    /// Stored form: `{retry_count}|{payload}`.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.retry_count, DELIMITER, self.payload)
    }

    /// Parses a stored value. Only the first pipe separates the fields, so the
    /// payload itself may contain pipes.
    pub fn decode(order_id: &str, key: &str, value: &str) -> Result<Self, LedgerError> {
        let malformed = || LedgerError::Malformed {
            key: key.to_string(),
            value: value.to_string(),
        };
        let (count, payload) = value.split_once(DELIMITER).ok_or_else(malformed)?;
        let retry_count = count.trim().parse::<u32>().map_err(|_| malformed())?;
        Ok(Self::new(order_id, retry_count, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_splits_on_first_pipe() {
        let record = FailureRecord::decode("o1", "failed-order:o1", "2|a|b").unwrap();
        assert_eq!(record, FailureRecord::new("o1", 2, "a|b"));
        assert_eq!(record.encode(), "2|a|b");
    }

    #[test]
    fn test_decode_rejects_malformed_values() {
        for value in ["no delimiter", "x|payload", "-1|payload", ""] {
            let err = FailureRecord::decode("o1", "failed-order:o1", value).unwrap_err();
            assert!(
                matches!(err, LedgerError::Malformed { ref key, .. } if key == "failed-order:o1"),
                "{value:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_payload_is_valid() {
        let record = FailureRecord::decode("o1", "failed-order:o1", "0|").unwrap();
        assert_eq!(record.retry_count, 0);
        assert_eq!(record.payload, "");
    }
}
