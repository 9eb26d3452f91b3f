use std::io::Write;

use crate::domain::submission::SubmissionRecord;
use crate::error::Result;

/// Writes the final submission report as CSV, headers included.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    /// Creates a new `ReportWriter` targeting any `Write` destination.
    pub fn new(destination: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(destination),
        }
    }

    /// Serializes all records in the given order and flushes the destination.
    pub fn write_records(&mut self, records: Vec<SubmissionRecord>) -> Result<()> {
        for record in records {
            self.writer.serialize(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
