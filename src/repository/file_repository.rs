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

use super::address::{self, Endpoint};
use super::file::{BlobItem, StoredFile};
use crate::storage::client;
use crate::storage::config::StorageConfig;
use crate::storage::error::{StorageError, StorageResult};
use futures::stream::StreamExt;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectStore, PutPayload};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// File-semantics facade over a cloud object store.
///
/// Translates file-level operations (add, fetch, list, copy, move, delete,
/// resolve URL/path) into addressed-object operations against the external
/// store. Blobs are addressed by container name, optional directory
/// segments, and a file name; segments are always joined with `/`
/// regardless of the host platform.
///
/// The repository holds no state beyond a lazily-populated per-container
/// client cache; all operations are independently and concurrently callable.
/// Retry, backoff, timeouts and credentials are owned by the underlying
/// `object_store` client (configured through [`StorageConfig`]), never by
/// this layer.
pub struct FileRepository {
    config: StorageConfig,
    endpoint: Endpoint,
    stores: RwLock<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl FileRepository {
    /// Create a repository from account-level configuration.
    ///
    /// Validates required configuration (Azure `account_name`, local `path`)
    /// up front; no network I/O is performed and no container client is
    /// built until first use.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required options are missing or the local
    /// base path does not resolve to an existing directory.
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        let endpoint = Endpoint::from_config(&config)?;
        Ok(Self {
            config,
            endpoint,
            stores: RwLock::new(HashMap::new()),
        })
    }

    /// Compute the absolute URL of a file without performing any I/O.
    ///
    /// With no directory segments the file resolves directly under the
    /// container; otherwise all segments are joined with `/` to form the
    /// directory path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the container name, file name, or any
    /// directory segment is empty.
    pub fn resolve_url(
        &self,
        container: &str,
        file_name: &str,
        directories: &[&str],
    ) -> StorageResult<String> {
        ensure_not_blank("container name", container)?;
        ensure_not_blank("file name", file_name)?;
        ensure_directories(directories)?;
        Ok(format!(
            "{}/{}",
            self.endpoint.container_url(container),
            address::join_blob_path(file_name, directories)
        ))
    }

    /// Extract the directory portion of an absolute URL, relative to its
    /// container.
    ///
    /// Empty or blank input is returned unchanged. A URL addressing a blob
    /// directly under the container yields the empty string.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedUrl` for URLs outside this repository's endpoint.
    pub fn resolve_directory_name(&self, url: &str) -> StorageResult<String> {
        if url.trim().is_empty() {
            return Ok(url.to_string());
        }
        let (_container, relative) = self.endpoint.parse(url)?;
        Ok(address::directory_name(&relative))
    }

    /// Upload a file, overwriting any existing blob at the resolved address.
    ///
    /// # Arguments
    ///
    /// * `container` - The container to upload into
    /// * `file` - The file name and content to upload
    /// * `directories` - Directory segments under the container (may be empty)
    ///
    /// # Returns
    ///
    /// The absolute URL of the uploaded blob.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` before any I/O if the container name, file
    /// name, or a directory segment is empty; store failures propagate
    /// unmodified.
    pub async fn add(
        &self,
        container: &str,
        file: &StoredFile,
        directories: &[&str],
    ) -> StorageResult<String> {
        let url = self.resolve_url(container, file.name(), directories)?;
        let store = self.container_store(container).await?;
        let path = blob_path(file.name(), directories);

        store
            .put(&path, PutPayload::from(file.content().clone()))
            .await?;

        debug!(
            "Uploaded blob container={}, path={}, size={}",
            container,
            path,
            file.len()
        );
        Ok(url)
    }

    /// Download a file addressed by container, file name and directory
    /// segments.
    ///
    /// The returned file's name is the base name of the requested file name.
    ///
    /// # Errors
    ///
    /// A missing blob surfaces as the store's not-found error, unmodified.
    pub async fn fetch(
        &self,
        container: &str,
        file_name: &str,
        directories: &[&str],
    ) -> StorageResult<StoredFile> {
        ensure_not_blank("file name", file_name)?;
        ensure_directories(directories)?;
        let store = self.container_store(container).await?;
        let path = blob_path(file_name, directories);

        let bytes = store.get(&path).await?.bytes().await?;
        Ok(StoredFile::new(address::base_name(file_name), bytes))
    }

    /// Download the full content of the blob at an absolute URL.
    ///
    /// Two-step fetch: blob metadata first to learn the exact size, then
    /// the content downloaded into a buffer pre-sized to that many bytes.
    pub async fn fetch_bytes(&self, url: &str) -> StorageResult<Vec<u8>> {
        let (store, path) = self.resolve_store(url).await?;

        let meta = store.head(&path).await?;
        let mut buffer = Vec::with_capacity(meta.size as usize);
        let mut stream = store.get(&path).await?.into_stream();
        while let Some(chunk) = stream.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer)
    }

    /// Download the blob at an absolute URL and decode it as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns `Utf8Error` if the content is not valid UTF-8.
    pub async fn fetch_text(&self, url: &str) -> StorageResult<String> {
        Ok(String::from_utf8(self.fetch_bytes(url).await?)?)
    }

    /// Download the blob at an absolute URL to a local file.
    ///
    /// Create-new semantics: the call fails with the filesystem's
    /// already-exists error if a file is present at `local_path`; an
    /// existing file is never overwritten.
    pub async fn save_to_path(
        &self,
        url: &str,
        local_path: impl AsRef<std::path::Path>,
    ) -> StorageResult<()> {
        let (store, path) = self.resolve_store(url).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(local_path.as_ref())
            .await?;

        let mut stream = store.get(&path).await?.into_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }

    /// List every blob under the container, or under the resolved directory
    /// if segments are given.
    ///
    /// Flat listing: blobs at any depth under the prefix are enumerated, not
    /// just immediate children. Re-listing re-queries the store; ordering is
    /// whatever the store's listing API returns.
    pub async fn list(&self, container: &str, directories: &[&str]) -> StorageResult<Vec<BlobItem>> {
        ensure_directories(directories)?;
        let store = self.container_store(container).await?;

        let prefix = if directories.is_empty() {
            None
        } else {
            Some(ObjectPath::from(directories.join("/").as_str()))
        };

        let mut items = Vec::new();
        let mut stream = store.list(prefix.as_ref());
        while let Some(meta) = stream.next().await {
            items.push(BlobItem::from(meta?));
        }

        info!(
            "Listed container={}, found count={} blobs",
            container,
            items.len()
        );
        Ok(items)
    }

    /// Copy the blob at `source_url` into `dest_container`, keeping its base
    /// name.
    ///
    /// Read-then-write copy: the full content is downloaded and re-uploaded,
    /// transiting this process. Never a server-side copy.
    ///
    /// # Returns
    ///
    /// The absolute URL of the destination blob.
    pub async fn copy_to(
        &self,
        source_url: &str,
        dest_container: &str,
        directories: &[&str],
    ) -> StorageResult<String> {
        let (_source_container, source_relative) = self.endpoint.parse(source_url)?;
        let file_name = address::base_name(&source_relative).to_string();
        ensure_not_blank("file name", &file_name)?;

        let content = self.fetch_bytes(source_url).await?;
        let file = StoredFile::new(file_name, content);
        let dest_url = self.add(dest_container, &file, directories).await?;

        debug!("Copied blob source={}, dest={}", source_url, dest_url);
        Ok(dest_url)
    }

    /// Move the blob at `source_url` into `dest_container`: copy, then
    /// delete the source.
    ///
    /// Not atomic: if the delete fails after a successful copy (or the
    /// process dies between the two steps), the blob remains at both
    /// addresses. No compensation or rollback is attempted.
    ///
    /// # Returns
    ///
    /// The absolute URL of the destination blob.
    pub async fn move_to(
        &self,
        source_url: &str,
        dest_container: &str,
        directories: &[&str],
    ) -> StorageResult<String> {
        let dest_url = self.copy_to(source_url, dest_container, directories).await?;
        self.delete_url(source_url).await?;
        Ok(dest_url)
    }

    /// Delete the blob addressed by container, file name and directory
    /// segments.
    ///
    /// Idempotent: deleting a blob that does not exist is not an error.
    pub async fn delete(
        &self,
        container: &str,
        file_name: &str,
        directories: &[&str],
    ) -> StorageResult<()> {
        ensure_not_blank("file name", file_name)?;
        ensure_directories(directories)?;
        let store = self.container_store(container).await?;
        delete_at(store.as_ref(), &blob_path(file_name, directories)).await
    }

    /// Delete the blob at an absolute URL.
    ///
    /// Idempotent: deleting a blob that does not exist is not an error.
    pub async fn delete_url(&self, url: &str) -> StorageResult<()> {
        let (store, path) = self.resolve_store(url).await?;
        delete_at(store.as_ref(), &path).await
    }

    /// Check whether a blob exists at the resolved address.
    pub async fn exists(
        &self,
        container: &str,
        file_name: &str,
        directories: &[&str],
    ) -> StorageResult<bool> {
        ensure_not_blank("file name", file_name)?;
        ensure_directories(directories)?;
        let store = self.container_store(container).await?;

        match store.head(&blob_path(file_name, directories)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch metadata (path, size, last modified) for the blob at an
    /// absolute URL.
    pub async fn metadata(&self, url: &str) -> StorageResult<BlobItem> {
        let (store, path) = self.resolve_store(url).await?;
        Ok(BlobItem::from(store.head(&path).await?))
    }

    /// Get or lazily build the client for one container.
    ///
    /// Initialization is idempotent and race-safe: concurrent first calls
    /// may each build a client, but exactly one is retained in the cache and
    /// every caller observes a usable handle.
    async fn container_store(&self, container: &str) -> StorageResult<Arc<dyn ObjectStore>> {
        ensure_not_blank("container name", container)?;
        {
            let stores = self.stores.read().await;
            if let Some(store) = stores.get(container) {
                return Ok(Arc::clone(store));
            }
        }

        let store = client::build_container_store(&self.config, container)?;
        let mut stores = self.stores.write().await;
        Ok(Arc::clone(
            stores.entry(container.to_string()).or_insert(store),
        ))
    }

    /// Resolve an absolute URL to a container client and object path.
    async fn resolve_store(&self, url: &str) -> StorageResult<(Arc<dyn ObjectStore>, ObjectPath)> {
        let (container, relative) = self.endpoint.parse(url)?;
        if relative.is_empty() {
            return Err(StorageError::UnsupportedUrl(format!(
                "{} does not address an object",
                url
            )));
        }
        let store = self.container_store(&container).await?;
        Ok((store, ObjectPath::from(relative.as_str())))
    }
}

impl Debug for FileRepository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FileRepository(provider={})",
            self.config.storage_type_str()
        )
    }
}

fn blob_path(file_name: &str, directories: &[&str]) -> ObjectPath {
    ObjectPath::from(address::join_blob_path(file_name, directories).as_str())
}

async fn delete_at(store: &dyn ObjectStore, path: &ObjectPath) -> StorageResult<()> {
    match store.delete(path).await {
        Ok(()) => Ok(()),
        // Deleting a missing blob is a no-op
        Err(object_store::Error::NotFound { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn ensure_not_blank(what: &str, value: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::InvalidArgument(format!(
            "{} must not be empty",
            what
        )));
    }
    Ok(())
}

fn ensure_directories(directories: &[&str]) -> StorageResult<()> {
    for segment in directories {
        if segment.trim().is_empty() {
            return Err(StorageError::InvalidArgument(
                "directory segments must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
