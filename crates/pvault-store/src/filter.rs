//! Client-side filtering and statistics over decrypted records.

use std::collections::{BTreeMap, BTreeSet};

use pvault_core::Record;

/// Filter applied over a decrypted record list. All criteria are ANDed.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Case-insensitive substring match across field values, tags, and the
    /// category id.
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub only_favorites: bool,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(category) = &self.category {
            if &record.category != category {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !record.tags.contains(tag) {
                return false;
            }
        }
        if self.only_favorites && !record.is_favorite {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_fields = record
                .fields
                .values()
                .any(|v| v.render().to_lowercase().contains(&needle));
            let in_tags = record.tags.iter().any(|t| t.to_lowercase().contains(&needle));
            if !in_fields && !in_tags && !record.category.to_lowercase().contains(&needle) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStats {
    pub total: usize,
    pub favorites: usize,
    pub by_category: BTreeMap<String, usize>,
}

pub fn vault_stats(records: &[Record]) -> VaultStats {
    let mut by_category = BTreeMap::new();
    for record in records {
        *by_category.entry(record.category.clone()).or_insert(0) += 1;
    }
    VaultStats {
        total: records.len(),
        favorites: records.iter().filter(|r| r.is_favorite).count(),
        by_category,
    }
}

/// Every distinct tag across the given records, sorted.
pub fn all_tags(records: &[Record]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect()
}
