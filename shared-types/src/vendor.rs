use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A `(company code, vendor number, name)` triplet lifted from a message body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorRecord {
    /// Two uppercase letters followed by two digits, e.g. `SG80`
    pub company_code: String,
    pub vendor_number: String,
    pub name: String,
}

impl VendorRecord {
    pub fn new(
        company_code: impl Into<String>,
        vendor_number: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            company_code: company_code.into(),
            vendor_number: vendor_number.into(),
            name: name.into(),
        }
    }
}

/// Ordered, duplicate-free collection of vendor records.
///
/// Insertion order is kept; a record equal in all three fields to one already
/// present is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<VendorRecord>,
    #[serde(skip)]
    seen: HashSet<VendorRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = VendorRecord>,
    {
        let mut set = Self::new();
        set.extend(records);
        set
    }

    /// Returns `false` when an identical record was already present.
    pub fn push(&mut self, record: VendorRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VendorRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[VendorRecord] {
        &self.records
    }

    pub fn company_codes(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.company_code.as_str()).collect()
    }

    pub fn vendor_numbers(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.vendor_number.as_str()).collect()
    }
}

impl Extend<VendorRecord> for ResultSet {
    fn extend<I: IntoIterator<Item = VendorRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

impl FromIterator<VendorRecord> for ResultSet {
    fn from_iter<I: IntoIterator<Item = VendorRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl IntoIterator for ResultSet {
    type Item = VendorRecord;
    type IntoIter = std::vec::IntoIter<VendorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a VendorRecord;
    type IntoIter = std::slice::Iter<'a, VendorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
