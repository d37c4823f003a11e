use crate::record::LogRecord;

/// Process-local bounded accumulator of pending [`LogRecord`]s.
///
/// `capacity` is the number of records per flush unit. A capacity of 0
/// disables buffering entirely: every [`add`](LogBuffer::add) is rejected
/// and the caller dispatches each record on its own.
///
/// The buffer is not persisted and not shared across processes; whatever is
/// pending when the process exits is lost. That bounds the data-loss window
/// of this best-effort pipeline to `capacity` records.
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    pending: Vec<LogRecord>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        LogBuffer {
            capacity,
            pending: Vec::with_capacity(capacity),
        }
    }

    /// Offer a record to the buffer.
    ///
    /// **Returns**
    /// - `Ok(())` if the record was buffered and no flush is due.
    /// - `Err(record)` if the buffer is full. The record is handed back
    ///   untouched; the caller must [`flush`](LogBuffer::flush) and dispatch
    ///   the drained records together with the rejected one as a single
    ///   batch of exactly `capacity` records.
    pub fn add(&mut self, record: LogRecord) -> Result<(), LogRecord> {
        if self.capacity == 0 || self.pending.len() + 1 >= self.capacity {
            return Err(record);
        }

        self.pending.push(record);
        Ok(())
    }

    /// Drain all pending records in arrival order, leaving the buffer empty.
    ///
    /// Safe to call on an empty buffer; returns an empty vector.
    pub fn flush(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.pending)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
