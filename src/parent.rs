//! Static assembly constituency -> parliamentary constituency mapping.
//!
//! Parents are determined by this table, never by a second containment
//! test against the (overlapping) parent polygons.

use hashbrown::HashMap;
use tracing::warn;

/// Inverted table: parent name -> boundary names it is composed of
pub type ParentTable<'a> = &'a [(&'a str, &'a [&'a str])];

/// 2008 ECI delimitation for the Bangalore parliamentary constituencies.
///
/// The assembly constituency named "Bangalore South" belongs to the
/// Bangalore Rural PC, not to the Bangalore South PC.
pub const BANGALORE_PARENTS: ParentTable<'static> = &[
    (
        "Bangalore North",
        &[
            "K.R.Pura",
            "Byatarayanapura",
            "Yeshvanthapura",
            "Dasarahalli",
            "Mahalakshmi Layout",
            "Malleshwaram",
            "Hebbal",
            "Pulakeshinagar(SC)",
            "Yelahanka",
        ],
    ),
    (
        "Bangalore Central",
        &[
            "Shivajinagar",
            "Shanti Nagar",
            "Gandhi Nagar",
            "Rajaji Nagar",
            "Chamrajpet",
            "Chickpet",
            "Sarvagnanagar",
            "C.V. Raman Nagar(SC)",
            "Mahadevapura",
        ],
    ),
    (
        "Bangalore South",
        &[
            "Govindraj Nagar",
            "Vijay Nagar",
            "Basavanagudi",
            "Padmanaba Nagar",
            "B.T.M Layout",
            "Jayanagar",
            "Bommanahalli",
        ],
    ),
    (
        "Bangalore Rural",
        &[
            "Rajarajeshwarinagar",
            "Bangalore South",
            "Anekal (SC)",
            "Magadi",
            "Ramanagaram",
            "Kanakapura",
            "Channapatna",
            "Hosakote",
            "Doddaballapur",
            "Devanahalli (SC)",
            "Nelamangala (SC)",
        ],
    ),
];

/// Parent of a boundary, or the sentinel for boundaries missing from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentName<'a> {
    Known(&'a str),
    Unknown,
}

impl<'a> ParentName<'a> {
    pub const UNKNOWN: &'static str = "Unknown";

    pub fn as_str(&self) -> &'a str {
        match *self {
            ParentName::Known(name) => name,
            ParentName::Unknown => Self::UNKNOWN,
        }
    }
}

impl std::fmt::Display for ParentName<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// O(1) boundary -> parent lookup, flattened once from a [`ParentTable`]
#[derive(Debug, Clone)]
pub struct ParentMapper {
    /// Lower-cased boundary name -> parent name
    parents_by_boundary: HashMap<String, String>,
    /// Distinct parent names in table order
    parents: Vec<String>,
}

impl ParentMapper {
    pub fn new(table: ParentTable<'_>) -> Self {
        let mut parents_by_boundary: HashMap<String, String> = HashMap::new();
        let mut parents: Vec<String> = Vec::with_capacity(table.len());

        for (parent, boundaries) in table {
            if !parents.iter().any(|p| p == parent) {
                parents.push(parent.to_string());
            }

            for boundary in boundaries.iter() {
                let key = boundary.to_lowercase();
                if let Some(existing) = parents_by_boundary.get(&key) {
                    warn!(
                        "Boundary '{}' listed under both '{}' and '{}'; keeping '{}'",
                        boundary, existing, parent, existing
                    );
                    continue;
                }
                parents_by_boundary.insert(key, parent.to_string());
            }
        }

        Self {
            parents_by_boundary,
            parents,
        }
    }

    /// Mapper over the built-in Bangalore delimitation table
    pub fn bangalore() -> Self {
        Self::new(BANGALORE_PARENTS)
    }

    /// Parent of `boundary`; [`ParentName::Unknown`] when it is not in the table.
    pub fn parent_of(&self, boundary: &str) -> ParentName<'_> {
        match self.parents_by_boundary.get(&boundary.to_lowercase()) {
            Some(parent) => ParentName::Known(parent),
            None => {
                warn!("No parent mapping for boundary '{}'", boundary);
                ParentName::Unknown
            }
        }
    }

    /// Names from `boundaries` that have no table entry.
    pub fn unmapped<'n>(&self, boundaries: impl IntoIterator<Item = &'n str>) -> Vec<&'n str> {
        boundaries
            .into_iter()
            .filter(|name| !self.parents_by_boundary.contains_key(&name.to_lowercase()))
            .collect()
    }

    /// Distinct parent names in table order
    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    /// Number of boundaries covered by the table
    pub fn len(&self) -> usize {
        self.parents_by_boundary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents_by_boundary.is_empty()
    }
}

impl Default for ParentMapper {
    fn default() -> Self {
        Self::bangalore()
    }
}
