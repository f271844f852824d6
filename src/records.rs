//! Joins a resolved boundary and its parent against the representative
//! record stores.

use hashbrown::HashMap;
use serde::Serialize;
use tracing::debug;

use crate::models::{RecordEntry, RepresentativeRecord};
use crate::parent::ParentName;

/// Records keyed by exact constituency name
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    entries: HashMap<String, RecordEntry>,
}

impl RecordStore {
    pub fn new(entries: HashMap<String, RecordEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&RecordEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RecordEntry)> for RecordStore {
    fn from_iter<I: IntoIterator<Item = (K, RecordEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub boundary_name: String,
    pub parent_name: String,
    /// MLA for the assembly constituency
    pub boundary_record: RepresentativeRecord,
    /// MP for the parliamentary constituency
    pub parent_record: RepresentativeRecord,
}

/// Builds [`Resolution`]s from the two record stores
#[derive(Debug, Clone, Default)]
pub struct RecordAssembler {
    boundary_records: RecordStore,
    parent_records: RecordStore,
}

impl RecordAssembler {
    pub fn new(boundary_records: RecordStore, parent_records: RecordStore) -> Self {
        Self {
            boundary_records,
            parent_records,
        }
    }

    /// Pair the boundary and parent records, substituting placeholders for
    /// whichever store has no entry.
    pub fn assemble(
        &self,
        boundary_name: &str,
        boundary_number: Option<&str>,
        parent: ParentName<'_>,
    ) -> Resolution {
        let boundary_record = match self.boundary_records.get(boundary_name) {
            Some(entry) => entry.to_record(boundary_name, boundary_number),
            None => {
                debug!("No boundary record for '{}'", boundary_name);
                RepresentativeRecord::placeholder(boundary_name, boundary_number)
            }
        };

        let parent_name = parent.as_str();
        let parent_record = match parent {
            ParentName::Known(name) => match self.parent_records.get(name) {
                Some(entry) => entry.to_record(name, None),
                None => {
                    debug!("No parent record for '{}'", name);
                    RepresentativeRecord::placeholder(name, None)
                }
            },
            ParentName::Unknown => RepresentativeRecord::placeholder(parent_name, None),
        };

        Resolution {
            boundary_name: boundary_name.to_string(),
            parent_name: parent_name.to_string(),
            boundary_record,
            parent_record,
        }
    }

    pub fn boundary_records(&self) -> &RecordStore {
        &self.boundary_records
    }

    pub fn parent_records(&self) -> &RecordStore {
        &self.parent_records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DATA_NOT_AVAILABLE;

    fn mp_entry() -> RecordEntry {
        RecordEntry {
            name: Some("PC Mohan".into()),
            party: Some("BJP".into()),
            constituency_number: Some("25".into()),
            contact: Some("+91-11-23034660".into()),
            email: Some("pcmohan@sansad.nic.in".into()),
            office_address: Some("335-C, Parliament House Annexe, New Delhi - 110001".into()),
        }
    }

    fn mla_entry() -> RecordEntry {
        RecordEntry {
            name: Some("Rizwan Arshad".into()),
            party: Some("INC".into()),
            constituency_number: Some("157".into()),
            contact: Some("+91-80-22866530".into()),
            email: None,
            office_address: None,
        }
    }

    #[test]
    fn test_missing_boundary_record_gets_placeholder() {
        let assembler = RecordAssembler::new(
            RecordStore::default(),
            [("Bangalore Central", mp_entry())].into_iter().collect(),
        );

        let result = assembler.assemble(
            "Shivajinagar",
            Some("157"),
            ParentName::Known("Bangalore Central"),
        );

        assert_eq!(result.boundary_name, "Shivajinagar");
        assert_eq!(result.parent_name, "Bangalore Central");
        assert!(result.boundary_record.is_placeholder());
        assert_eq!(result.boundary_record.constituency, "Shivajinagar");
        assert_eq!(result.boundary_record.constituency_number.as_deref(), Some("157"));

        assert_eq!(result.parent_record.name, "PC Mohan");
        assert_eq!(result.parent_record.party, "BJP");
        assert_eq!(result.parent_record.constituency, "Bangalore Central");
        assert_eq!(result.parent_record.constituency_number.as_deref(), Some("25"));
        assert!(result.parent_record.office_address.is_some());
    }

    #[test]
    fn test_both_records_present() {
        let assembler = RecordAssembler::new(
            [("Shivajinagar", mla_entry())].into_iter().collect(),
            [("Bangalore Central", mp_entry())].into_iter().collect(),
        );
        let result = assembler.assemble("Shivajinagar", None, ParentName::Known("Bangalore Central"));
        assert_eq!(result.boundary_record.name, "Rizwan Arshad");
        assert_eq!(result.parent_record.name, "PC Mohan");
    }

    #[test]
    fn test_record_lookup_is_exact() {
        let assembler = RecordAssembler::new(
            [("Shivajinagar", mla_entry())].into_iter().collect(),
            RecordStore::default(),
        );
        let result = assembler.assemble("SHIVAJINAGAR", None, ParentName::Unknown);
        assert!(result.boundary_record.is_placeholder());
    }

    #[test]
    fn test_unknown_parent_gets_placeholder() {
        let assembler = RecordAssembler::new(
            RecordStore::default(),
            [("Bangalore Central", mp_entry())].into_iter().collect(),
        );
        let result = assembler.assemble("Atlantis", None, ParentName::Unknown);
        assert_eq!(result.parent_name, "Unknown");
        assert_eq!(result.parent_record.name, DATA_NOT_AVAILABLE);
        assert_eq!(result.parent_record.constituency, "Unknown");
        assert!(result.boundary_record.constituency_number.is_none());
    }
}
