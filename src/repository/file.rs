// Copyright 2025 Adobe. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.
//
// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use object_store::ObjectMeta;

/// A named file with its full content
///
/// Constructed by the caller before an [`add`](crate::FileRepository::add)
/// operation, or by the repository when returning
/// [`fetch`](crate::FileRepository::fetch) results. Immutable once
/// constructed; the repository never retains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    name: String,
    content: Bytes,
}

impl StoredFile {
    /// Create a new file value from a name and its content.
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The file name (base name, no directory portion).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Metadata about a blob in storage
#[derive(Debug, Clone)]
pub struct BlobItem {
    /// Path of the blob, relative to its container
    pub path: String,

    /// Blob size in bytes
    pub size: u64,

    /// Last modified timestamp (if available)
    pub last_modified: Option<DateTime<Utc>>,
}

impl From<ObjectMeta> for BlobItem {
    fn from(meta: ObjectMeta) -> Self {
        Self {
            path: meta.location.to_string(),
            size: meta.size,
            last_modified: Some(meta.last_modified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_creation() {
        let file = StoredFile::new("a.txt", "hi");

        assert_eq!(file.name(), "a.txt");
        assert_eq!(file.content().as_ref(), b"hi");
        assert_eq!(file.len(), 2);
        assert!(!file.is_empty());
    }

    #[test]
    fn test_stored_file_empty_content() {
        let file = StoredFile::new("empty.bin", Vec::new());

        assert_eq!(file.len(), 0);
        assert!(file.is_empty());
    }

    #[test]
    fn test_stored_file_clone_eq() {
        let file1 = StoredFile::new("a.txt", vec![1u8, 2, 3]);
        let file2 = file1.clone();

        assert_eq!(file1, file2);
    }

    #[test]
    fn test_blob_item_creation() {
        let item = BlobItem {
            path: "2024/01/a.txt".to_string(),
            size: 1024,
            last_modified: None,
        };

        assert_eq!(item.path, "2024/01/a.txt");
        assert_eq!(item.size, 1024);
        assert!(item.last_modified.is_none());
    }

    #[test]
    fn test_blob_item_with_timestamp() {
        let now = Utc::now();
        let item = BlobItem {
            path: "a.txt".to_string(),
            size: 2048,
            last_modified: Some(now),
        };

        assert_eq!(item.last_modified.unwrap(), now);
    }

    #[test]
    fn test_blob_item_debug() {
        let item = BlobItem {
            path: "a.txt".to_string(),
            size: 100,
            last_modified: None,
        };

        let debug_str = format!("{:?}", item);
        assert!(debug_str.contains("BlobItem"));
        assert!(debug_str.contains("a.txt"));
        assert!(debug_str.contains("100"));
    }
}
