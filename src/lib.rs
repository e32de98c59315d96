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

//! # Blob Depot
//!
//! A file-repository facade over cloud object storage.
//!
//! Blob Depot exposes simple file-semantics operations — add, fetch, list,
//! copy, move, delete, resolve URL/path — and maps them onto the
//! container/directory/blob addressing scheme of a remote object store. It
//! supports multiple storage providers (AWS S3, Azure Blob Storage, Google
//! Cloud Storage) and local filesystems through the `object_store` crate,
//! which owns authentication, the wire protocol, retry/backoff and
//! connection pooling.
//!
//! ## Features
//!
//! - **File semantics**: named files with byte content, addressed by
//!   container and `/`-joined directory segments
//! - **Cloud storage**: AWS S3, Azure Blob Storage, Google Cloud Storage,
//!   Local filesystem
//! - **Absolute URLs**: every blob resolves to an absolute URL and back
//! - **Flat listing**: enumerate every blob at any depth under a prefix
//! - **Stateless operations**: per-container clients are initialized lazily
//!   and cached; all operations are safely callable concurrently
//!
//! ## Quick Start
//!
//! ### Local Filesystem Example
//!
//! ```rust,no_run
//! use blob_depot::{FileRepository, StorageConfig, StoredFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! // Configure storage for local filesystem
//! let config = StorageConfig::local()
//!     .with_option("path", "./data");
//!
//! let repo = FileRepository::new(config)?;
//!
//! // Upload a file and get its absolute URL back
//! let url = repo
//!     .add("docs", &StoredFile::new("a.txt", "hi"), &["2024", "01"])
//!     .await?;
//!
//! // Fetch it back by address or by URL
//! let file = repo.fetch("docs", "a.txt", &["2024", "01"]).await?;
//! let text = repo.fetch_text(&url).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### AWS S3 Example
//!
//! ```rust,no_run
//! use blob_depot::{FileRepository, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::aws()
//!     .with_option("region", "us-east-1")
//!     .with_option("access_key_id", "ACCESS_KEY")
//!     .with_option("secret_access_key", "SECRET_KEY");
//!
//! let repo = FileRepository::new(config)?;
//! let items = repo.list("my-bucket", &[]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Azure Blob Storage Example
//!
//! ```rust,no_run
//! use blob_depot::{FileRepository, StorageConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = StorageConfig::azure()
//!     .with_option("account_name", "my-account")
//!     .with_option("tenant_id", "TENANT_ID")
//!     .with_option("client_id", "CLIENT_ID")
//!     .with_option("client_secret", "CLIENT_SECRET");
//!
//! let repo = FileRepository::new(config)?;
//! let url = repo.resolve_url("docs", "a.txt", &["2024"])?;
//! let bytes = repo.fetch_bytes(&url).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`repository`] - The file-repository facade and its data model
//! - [`storage`] - Storage configuration and per-container client construction

pub mod repository;
pub mod storage;

// Re-export commonly used types
pub use repository::{BlobItem, FileRepository, StoredFile};
pub use storage::{StorageConfig, StorageError, StorageResult, StorageType};
