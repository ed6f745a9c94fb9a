//! Pack archive access
//!
//! The index is read once when the pack is opened. Entry bytes are read from
//! the data file on every request; nothing is cached here.

use crate::{Result, StorageError};
use isoworld_formats::pack::{PackEntry, PackIndex};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// An opened pack: parsed index plus the path of its data file
#[derive(Debug)]
pub struct ArchivePack {
    index: PackIndex,
    index_path: PathBuf,
    data_path: PathBuf,
}

impl ArchivePack {
    /// Read and parse the index at `index_path`
    ///
    /// The data file is only opened when entry contents are requested.
    ///
    /// # Errors
    ///
    /// Returns error if the index cannot be read or is truncated
    pub fn open(index_path: impl AsRef<Path>, data_path: impl AsRef<Path>) -> Result<Self> {
        let index_path = index_path.as_ref().to_path_buf();
        let data_path = data_path.as_ref().to_path_buf();

        let raw = std::fs::read(&index_path)?;
        let index = PackIndex::parse(&raw)?;

        debug!(
            "Opened pack {} with {} entries",
            index_path.display(),
            index.len()
        );

        Ok(Self {
            index,
            index_path,
            data_path,
        })
    }

    /// Bytes of the entry called `name`, matched case-insensitively
    ///
    /// An unknown name is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the data file cannot be read or the entry's range
    /// runs past its end
    pub fn raw_file_contents(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self.index.get(name) else {
            trace!("Pack entry {} not present", name);
            return Ok(None);
        };

        let mut file = File::open(&self.data_path)?;
        let data_len = file.metadata()?.len();
        if entry.end() > data_len {
            return Err(StorageError::Archive(format!(
                "Entry {} spans bytes {}..{} but {} is {} bytes",
                entry.name,
                entry.offset,
                entry.end(),
                self.data_path.display(),
                data_len
            )));
        }

        file.seek(SeekFrom::Start(u64::from(entry.offset)))?;
        let mut buf = vec![0u8; entry.size as usize];
        file.read_exact(&mut buf)?;

        trace!("Read {} bytes for {}", buf.len(), entry.name);
        Ok(Some(buf))
    }

    /// Entry metadata for `name`, matched case-insensitively
    pub fn entry(&self, name: &str) -> Option<&PackEntry> {
        self.index.get(name)
    }

    /// Check whether the index lists `name`
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// All entries in index order
    pub fn entries(&self) -> &[PackEntry] {
        self.index.entries()
    }

    /// Number of index records
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the index has no records
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Path of the index file
    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Path of the data file
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use isoworld_test_utils::{PackBuilder, WorldFixture};

    fn fixture(pack: &PackBuilder) -> WorldFixture {
        let fixture = WorldFixture::new().expect("Operation should succeed");
        fixture.write_pack(pack).expect("Operation should succeed");
        fixture
    }

    #[test]
    fn test_read_entry() {
        let fixture = fixture(
            &PackBuilder::new()
                .entry("1.TIL", b"first".to_vec())
                .entry("map.dat", b"second".to_vec()),
        );
        let pack = ArchivePack::open(fixture.index_path(), fixture.data_path())
            .expect("Operation should succeed");

        assert_eq!(pack.len(), 2);
        assert_eq!(
            pack.raw_file_contents("MAP.DAT").expect("Operation should succeed"),
            Some(b"second".to_vec())
        );
        assert_eq!(
            pack.raw_file_contents("1.til").expect("Operation should succeed"),
            Some(b"first".to_vec())
        );
    }

    #[test]
    fn test_absent_entry() {
        let fixture = fixture(&PackBuilder::new().entry("a", vec![1]));
        let pack = ArchivePack::open(fixture.index_path(), fixture.data_path())
            .expect("Operation should succeed");

        assert!(
            pack.raw_file_contents("b")
                .expect("Operation should succeed")
                .is_none()
        );
        assert!(!pack.contains("b"));
    }

    #[test]
    fn test_empty_entry() {
        let fixture = fixture(&PackBuilder::new().entry("empty", Vec::new()));
        let pack = ArchivePack::open(fixture.index_path(), fixture.data_path())
            .expect("Operation should succeed");
        assert_eq!(
            pack.raw_file_contents("empty").expect("Operation should succeed"),
            Some(Vec::new())
        );
    }

    #[test]
    fn test_entry_past_end_of_data() {
        let fixture = fixture(&PackBuilder::new().entry("a", vec![1, 2, 3, 4]));
        std::fs::write(fixture.data_path(), [1, 2]).unwrap();

        let pack = ArchivePack::open(fixture.index_path(), fixture.data_path())
            .expect("Operation should succeed");
        assert!(matches!(
            pack.raw_file_contents("a"),
            Err(StorageError::Archive(_))
        ));
    }

    #[test]
    fn test_missing_index() {
        let fixture = WorldFixture::new().unwrap();
        assert!(matches!(
            ArchivePack::open(fixture.index_path(), fixture.data_path()),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_truncated_index() {
        let fixture = WorldFixture::new().unwrap();
        std::fs::write(fixture.index_path(), 3u32.to_le_bytes()).unwrap();
        assert!(matches!(
            ArchivePack::open(fixture.index_path(), fixture.data_path()),
            Err(StorageError::Pack(_))
        ));
    }
}
