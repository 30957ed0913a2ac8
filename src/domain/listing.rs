// src/domain/listing.rs
//
// Shared building blocks for filtered, paginated listings.
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Date constraints evaluated on the date portion only. All supplied
/// bounds apply together, so a single date outside the range matches
/// nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateWindow {
    pub on: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateWindow {
    pub fn is_empty(&self) -> bool {
        self.on.is_none() && self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(on) = self.on
            && date != on
        {
            return false;
        }
        if let Some(from) = self.from
            && date < from
        {
            return false;
        }
        if let Some(to) = self.to
            && date > to
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let per_page = match per_page {
            None | Some(0) => DEFAULT_PER_PAGE,
            Some(value) => value.min(MAX_PER_PAGE),
        };
        Self { page, per_page }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            ((total - 1) / u64::from(request.per_page) + 1) as u32
        };
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages: self.total_pages,
        }
    }
}

/// Merges grouped counts onto a fixed key set so absent categories report
/// zero instead of being omitted.
pub fn zero_filled_stats(
    known: &[&str],
    counts: impl IntoIterator<Item = (String, u64)>,
) -> BTreeMap<String, u64> {
    let mut stats: BTreeMap<String, u64> = known.iter().map(|key| ((*key).to_string(), 0)).collect();
    for (key, total) in counts {
        stats.insert(key, total);
    }
    stats
}
