//! Pack index parsing

use crate::pack::error::{PackError, Result};
use binrw::BinRead;
use binrw::io::Cursor;
use std::collections::HashMap;

/// Size of the name field in an index record
pub const PACK_NAME_LEN: usize = 20;

/// Size of one index record: offset (4) + name (20) + size (4)
pub const PACK_RECORD_SIZE: usize = 4 + PACK_NAME_LEN + 4;

/// Raw index record as stored on disk
#[derive(Debug, Clone, BinRead)]
#[br(little)]
struct PackRecord {
    offset: u32,
    name: [u8; PACK_NAME_LEN],
    size: u32,
}

impl PackRecord {
    /// Decode the NUL-terminated name field, lower-cased
    fn decoded_name(&self) -> String {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(PACK_NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).to_lowercase()
    }
}

/// A named byte range within the pack data file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackEntry {
    /// Lower-cased entry name
    pub name: String,
    /// Byte offset into the data file
    pub offset: u32,
    /// Byte length in the data file
    pub size: u32,
}

impl PackEntry {
    /// Exclusive end of the entry's byte range
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }
}

/// Parsed pack index
///
/// Entries keep their on-disk order. Lookups are case-insensitive; when the
/// same name appears more than once the last record wins.
#[derive(Debug, Clone, Default)]
pub struct PackIndex {
    entries: Vec<PackEntry>,
    by_name: HashMap<String, usize>,
}

impl PackIndex {
    /// Parse an index from its raw bytes
    ///
    /// Fails with [`PackError::Truncated`] when the data is shorter than
    /// `4 + 28 * count` bytes. Bytes past the last record are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let actual = data.len() as u64;
        if actual < 4 {
            return Err(PackError::Truncated {
                expected: 4,
                actual,
            });
        }

        let mut cursor = Cursor::new(data);
        let count = u32::read_le(&mut cursor)?;

        let expected = 4 + PACK_RECORD_SIZE as u64 * u64::from(count);
        if actual < expected {
            return Err(PackError::Truncated { expected, actual });
        }

        let mut entries = Vec::with_capacity(count as usize);
        let mut by_name = HashMap::with_capacity(count as usize);

        for _ in 0..count {
            let record = PackRecord::read(&mut cursor)?;
            let entry = PackEntry {
                name: record.decoded_name(),
                offset: record.offset,
                size: record.size,
            };
            by_name.insert(entry.name.clone(), entries.len());
            entries.push(entry);
        }

        Ok(Self { entries, by_name })
    }

    /// Look up an entry by name, ignoring case
    pub fn get(&self, name: &str) -> Option<&PackEntry> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&index| &self.entries[index])
    }

    /// Check whether a name is present, ignoring case
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All records in on-disk order
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    /// Number of records in the index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index has no records
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(offset: u32, name: &[u8], size: u32) -> Vec<u8> {
        let mut out = offset.to_le_bytes().to_vec();
        let mut field = [0u8; PACK_NAME_LEN];
        field[..name.len()].copy_from_slice(name);
        out.extend_from_slice(&field);
        out.extend_from_slice(&size.to_le_bytes());
        out
    }

    fn index(records: &[Vec<u8>]) -> Vec<u8> {
        let mut out = (records.len() as u32).to_le_bytes().to_vec();
        for r in records {
            out.extend_from_slice(r);
        }
        out
    }

    #[test]
    fn test_parse_entries() {
        let data = index(&[record(0, b"1.til", 100), record(100, b"Map.DAT", 20)]);
        let parsed = PackIndex::parse(&data).expect("Operation should succeed");

        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed.entries()[1],
            PackEntry {
                name: "map.dat".to_string(),
                offset: 100,
                size: 20,
            }
        );
        assert_eq!(parsed.entries()[1].end(), 120);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let data = index(&[record(8, b"Foo.Til", 4)]);
        let parsed = PackIndex::parse(&data).expect("Operation should succeed");

        assert_eq!(parsed.get("Foo.Til"), parsed.get("foo.til"));
        assert_eq!(parsed.get("FOO.TIL").map(|e| e.offset), Some(8));
        assert!(parsed.get("bar.til").is_none());
        assert!(parsed.contains("foo.TIL"));
    }

    #[test]
    fn test_name_stops_at_nul() {
        // Garbage after the terminator must not leak into the name
        let mut name = [0u8; PACK_NAME_LEN];
        name[..5].copy_from_slice(b"a.til");
        name[6..9].copy_from_slice(b"xyz");
        let data = index(&[record(0, &name, 1)]);
        let parsed = PackIndex::parse(&data).expect("Operation should succeed");
        assert_eq!(parsed.entries()[0].name, "a.til");
    }

    #[test]
    fn test_full_width_name() {
        let data = index(&[record(0, b"abcdefghijklmnop.til", 1)]);
        let parsed = PackIndex::parse(&data).expect("Operation should succeed");
        assert_eq!(parsed.entries()[0].name, "abcdefghijklmnop.til");
    }

    #[test]
    fn test_duplicate_name_last_wins() {
        let data = index(&[record(0, b"x.til", 1), record(50, b"X.TIL", 2)]);
        let parsed = PackIndex::parse(&data).expect("Operation should succeed");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.get("x.til").map(|e| e.offset), Some(50));
    }

    #[test]
    fn test_truncated_records() {
        let mut data = index(&[record(0, b"1.til", 1), record(1, b"2.til", 1)]);
        data.truncate(data.len() - 1);

        let err = PackIndex::parse(&data).unwrap_err();
        assert!(matches!(
            err,
            PackError::Truncated {
                expected: 60,
                actual: 59
            }
        ));
    }

    #[test]
    fn test_truncated_count() {
        assert!(matches!(
            PackIndex::parse(&[1, 0]),
            Err(PackError::Truncated {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_huge_count_rejected_without_allocating() {
        let data = u32::MAX.to_le_bytes();
        assert!(matches!(
            PackIndex::parse(&data),
            Err(PackError::Truncated { .. })
        ));
    }

    #[test]
    fn test_empty_index() {
        let parsed = PackIndex::parse(&0u32.to_le_bytes()).expect("Operation should succeed");
        assert!(parsed.is_empty());
    }
}
