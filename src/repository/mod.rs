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

//! File-repository facade
//!
//! [`FileRepository`] maps file-semantics operations onto the hierarchical
//! container/directory/blob addressing scheme of the external object store.
//! Blob addresses are absolute URLs; path composition always uses `/`-joined
//! segments.

pub(crate) mod address;
pub mod file;
pub mod file_repository;

// Public exports
pub use file::{BlobItem, StoredFile};
pub use file_repository::FileRepository;
