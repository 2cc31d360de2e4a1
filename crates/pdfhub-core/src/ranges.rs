//! Page range parsing
//!
//! A selection string such as `"1-3, 5, 8-10"` describes the pages of one
//! split output. Page numbers are 1-based and ranges are inclusive.

use crate::error::{PdfHubError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    pub fn new(start: u32, end: u32) -> Result<Self> {
        if start == 0 {
            return Err(PdfHubError::InvalidRange(
                "Page numbers must be >= 1".into(),
            ));
        }
        if start > end {
            return Err(PdfHubError::InvalidRange(format!(
                "Start {} > end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(page: u32) -> Result<Self> {
        Self::new(page, page)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// The ordered ranges that make up one split output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<PageRange>,
}

impl PageSelection {
    pub fn new(ranges: Vec<PageRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(PdfHubError::InvalidRange("No pages specified".into()));
        }
        Ok(Self { ranges })
    }

    pub fn ranges(&self) -> &[PageRange] {
        &self.ranges
    }

    /// Check every range against the document length.
    pub fn validate(&self, page_count: u32) -> Result<()> {
        for range in &self.ranges {
            if range.end > page_count {
                return Err(PdfHubError::InvalidRange(format!(
                    "Invalid range: {} (PDF has {} pages)",
                    range, page_count
                )));
            }
        }
        Ok(())
    }

    /// Page numbers in listed order, each page at most once.
    pub fn pages(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        self.ranges
            .iter()
            .flat_map(|r| r.start..=r.end)
            .filter(|p| seen.insert(*p))
            .collect()
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for PageSelection {
    type Err = PdfHubError;

    fn from_str(input: &str) -> Result<Self> {
        let mut ranges = Vec::new();

        for part in input.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            if let Some((start, end)) = part.split_once('-') {
                // Range like "1-3"
                let start: u32 = start
                    .trim()
                    .parse()
                    .map_err(|_| PdfHubError::InvalidRange(format!("Invalid start: {}", start)))?;
                let end: u32 = end
                    .trim()
                    .parse()
                    .map_err(|_| PdfHubError::InvalidRange(format!("Invalid end: {}", end)))?;
                ranges.push(PageRange::new(start, end)?);
            } else {
                // Single page like "5"
                let page: u32 = part
                    .parse()
                    .map_err(|_| PdfHubError::InvalidRange(format!("Invalid page: {}", part)))?;
                ranges.push(PageRange::single(page)?);
            }
        }

        PageSelection::new(ranges)
    }
}

/// Parse a selection string like "1-3, 5, 8-10"
pub fn parse_selection(input: &str) -> Result<PageSelection> {
    input.parse()
}
