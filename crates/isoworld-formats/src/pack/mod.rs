//! Pack index format
//!
//! # Binary Layout
//!
//! ```text
//! u32 count
//! count × {
//!     u32      offset   // byte offset into the data file
//!     [u8; 20] name     // NUL-terminated, NUL-padded
//!     u32      size     // byte length in the data file
//! }
//! ```
//!
//! All integers are little-endian. The data file itself has no structure;
//! entries are simply byte ranges of it.
//!
//! # Usage
//!
//! ```rust
//! use isoworld_formats::pack::PackIndex;
//!
//! let mut data = 1u32.to_le_bytes().to_vec();
//! data.extend_from_slice(&0u32.to_le_bytes());
//! let mut name = [0u8; 20];
//! name[..5].copy_from_slice(b"1.TIL");
//! data.extend_from_slice(&name);
//! data.extend_from_slice(&64u32.to_le_bytes());
//!
//! let index = PackIndex::parse(&data)?;
//! let entry = index.get("1.til").expect("entry");
//! assert_eq!(entry.name, "1.til");
//! assert_eq!(entry.size, 64);
//! # Ok::<(), isoworld_formats::pack::PackError>(())
//! ```

mod error;
mod index;

pub use error::{PackError, Result};
pub use index::{PACK_NAME_LEN, PACK_RECORD_SIZE, PackEntry, PackIndex};
