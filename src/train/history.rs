//! Per-epoch training history

use serde::{Deserialize, Serialize};

/// Metrics recorded for one completed epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number
    pub epoch: usize,
    pub train_loss: f32,
    pub train_acc: f32,
    pub val_loss: Option<f32>,
    pub val_acc: Option<f32>,
}

/// Append-only record of completed epochs, one entry per epoch in order.
///
/// Serializable so training curves can be exported for plotting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<EpochRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, record: EpochRecord) {
        self.records.push(record);
    }

    /// All records, in epoch order
    pub fn records(&self) -> &[EpochRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record, if any epoch completed
    pub fn last(&self) -> Option<&EpochRecord> {
        self.records.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(epoch: usize) -> EpochRecord {
        EpochRecord {
            epoch,
            train_loss: 0.5 / epoch as f32,
            train_acc: 0.8,
            val_loss: Some(0.6 / epoch as f32),
            val_acc: Some(0.75),
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut history = History::new();
        history.push(record(1));
        history.push(record(2));
        history.push(record(3));

        assert_eq!(history.len(), 3);
        let epochs: Vec<usize> = history.records().iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![1, 2, 3]);
        assert_eq!(history.last().unwrap().epoch, 3);
    }

    #[test]
    fn test_empty_history() {
        let history = History::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());
    }

    #[test]
    fn test_serializes_round_trip() {
        let mut history = History::new();
        history.push(record(1));

        let json = serde_json::to_string(&history).unwrap();
        let restored: History = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.records(), history.records());
    }
}
