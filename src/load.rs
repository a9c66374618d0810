//! Building region trees from line-oriented sources.
//!
//! Each line holds one record, `CODE<TAB>DATA`. Only the first tab separates
//! the code from its payload, further tabs belong to the payload. Lines
//! without a tab and lines whose code does not decompose are skipped, they
//! never fail a load. Only errors of the underlying reader do.

use std::fmt;
use std::io::{BufRead, BufReader, Read};

use anybytes::Bytes;

use crate::region::RegionTree;

/// Counters describing what a load did with its input lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Records that were applied to the tree.
    pub records: usize,
    /// Lines without a tab delimiter.
    pub skipped_no_delimiter: usize,
    /// Lines whose code did not land on a level boundary.
    pub skipped_incorrect_code: usize,
}

impl LoadStats {
    pub fn skipped(&self) -> usize {
        self.skipped_no_delimiter + self.skipped_incorrect_code
    }
}

#[derive(Debug)]
pub enum LoadError {
    IoError(std::io::Error),
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::IoError(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::IoError(err) => Some(err),
        }
    }
}

const DELIMITER: u8 = b'\t';

/// Strips the line terminator, accepting both `\n` and `\r\n`.
fn trim_line_end(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
}

impl RegionTree {
    /// Reads records from `reader` into this tree.
    ///
    /// Records are applied in order, so for repeated codes the last record
    /// wins. On error the tree keeps whatever records were applied before the
    /// failure and must not be published.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<LoadStats, LoadError> {
        let mut reader = BufReader::new(reader);
        let mut stats = LoadStats::default();
        let mut line_number = 0usize;

        loop {
            let mut line = Vec::new();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            line_number += 1;
            trim_line_end(&mut line);

            let Some(tab) = line.iter().position(|&b| b == DELIMITER) else {
                tracing::trace!(line = line_number, "skipping record without delimiter");
                stats.skipped_no_delimiter += 1;
                continue;
            };

            let node = match std::str::from_utf8(&line[..tab]) {
                Ok(code) => self.path_to(code).ok(),
                Err(_) => None,
            };
            let Some(node) = node else {
                tracing::trace!(line = line_number, "skipping record with incorrect code");
                stats.skipped_incorrect_code += 1;
                continue;
            };

            let mut data = Bytes::from_source(line);
            let _code = data.take_prefix(tab + 1);
            self.set_data(node, data);
            stats.records += 1;
        }

        tracing::debug!(
            records = stats.records,
            skipped_no_delimiter = stats.skipped_no_delimiter,
            skipped_incorrect_code = stats.skipped_incorrect_code,
            nodes = self.node_count(),
            "loaded region records"
        );
        Ok(stats)
    }
}
