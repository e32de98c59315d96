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

use super::config::{StorageConfig, StorageType};
use super::error::{StorageError, StorageResult};
use object_store::{
    aws::AmazonS3Builder, azure::MicrosoftAzureBuilder, gcp::GoogleCloudStorageBuilder,
    local::LocalFileSystem, ClientOptions, ObjectStore, RetryConfig,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Resolve the local base directory from configuration.
///
/// # Errors
///
/// This function will return an error if:
/// * The 'path' option is missing from configuration
/// * The path cannot be canonicalized (doesn't exist or permission denied)
/// * The path is not a directory
pub(crate) fn local_base_dir(config: &StorageConfig) -> StorageResult<PathBuf> {
    let path = config.options.get("path").ok_or_else(|| {
        StorageError::ConfigError("Local storage requires 'path' option".to_string())
    })?;
    let base_path = PathBuf::from(path);

    // Canonicalize the path (handles both relative and absolute paths, resolves symlinks)
    let canonical_path = base_path.canonicalize().map_err(|e| {
        StorageError::ConfigError(format!(
            "Failed to resolve path '{}': {} (path must exist)",
            path, e
        ))
    })?;

    if !canonical_path.is_dir() {
        return Err(StorageError::ConfigError(format!(
            "Base path is not a directory: {}",
            canonical_path.display()
        )));
    }

    Ok(canonical_path)
}

/// Build an object store client scoped to a single container.
///
/// The container maps to a bucket (S3/GCS), a blob container (Azure), or a
/// subdirectory of the configured base path (local, created on demand).
///
/// # Arguments
///
/// * `config` - Account-level storage configuration
/// * `container` - The container name to scope the client to
///
/// # Returns
///
/// A `Result` containing:
/// * `Ok(Arc<dyn ObjectStore>)` - A client addressing objects inside the container
/// * `Err(StorageError)` - If the client cannot be built
///
/// # Errors
///
/// This function will return an error if:
/// * Required configuration options are missing for the storage type
/// * The store backend cannot be created (e.g., invalid credentials)
pub(crate) fn build_container_store(
    config: &StorageConfig,
    container: &str,
) -> StorageResult<Arc<dyn ObjectStore>> {
    match config.storage_type {
        StorageType::Local => build_local_store(config, container),
        StorageType::Aws => build_aws_store(config, container),
        StorageType::Azure => build_azure_store(config, container),
        StorageType::Gcs => build_gcs_store(config, container),
    }
}

/// Build a local filesystem store rooted at `<base>/<container>`.
///
/// The container directory is created if it does not exist yet, mirroring
/// the create-if-not-exists behavior of cloud containers.
fn build_local_store(
    config: &StorageConfig,
    container: &str,
) -> StorageResult<Arc<dyn ObjectStore>> {
    let container_dir = local_base_dir(config)?.join(container);
    std::fs::create_dir_all(&container_dir)?;

    let store = LocalFileSystem::new_with_prefix(&container_dir)
        .map_err(|e| StorageError::ConfigError(format!("Failed to create local store: {}", e)))?;

    Ok(Arc::new(store))
}

/// Build connection options from configuration.
///
/// # Returns
///
/// A `ClientOptions` instance configured with timeout and connection settings
/// from the config.
fn build_connection_options(config: &StorageConfig) -> ClientOptions {
    let mut client_options = ClientOptions::default();
    if let Some(timeout_str) = config.options.get("timeout") {
        if timeout_str == "0" || timeout_str == "disabled" {
            client_options = client_options.with_timeout_disabled();
        } else if let Ok(sec) = timeout_str.parse::<u64>() {
            client_options = client_options.with_timeout(Duration::from_secs(sec))
        }
    };
    if let Some(connect_timeout_str) = config.options.get("connect_timeout") {
        if connect_timeout_str == "0" || connect_timeout_str == "disabled" {
            client_options = client_options.with_connect_timeout_disabled();
        } else if let Ok(sec) = connect_timeout_str.parse::<u64>() {
            client_options = client_options.with_connect_timeout(Duration::from_secs(sec))
        }
    }
    if let Some(pool_idle_timeout_str) = config.options.get("pool_idle_timeout") {
        if let Ok(sec) = pool_idle_timeout_str.parse::<u64>() {
            client_options = client_options.with_pool_idle_timeout(Duration::from_secs(sec))
        }
    }
    if let Some(pool_max_idle_per_host_str) = config.options.get("pool_max_idle_per_host") {
        if let Ok(max_idle) = pool_max_idle_per_host_str.parse::<usize>() {
            client_options = client_options.with_pool_max_idle_per_host(max_idle)
        }
    }
    client_options
}

/// Build retry options from configuration.
///
/// Retry and backoff are owned by the object_store client; this layer only
/// forwards the settings.
fn build_retry_options(config: &StorageConfig) -> RetryConfig {
    let default_retry_config = RetryConfig::default();
    let max_retries = config
        .options
        .get("max_retries")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default_retry_config.max_retries);
    let retry_timeout = config
        .options
        .get("retry_timeout")
        .and_then(|s| Some(Duration::from_secs(s.parse::<u64>().ok()?)))
        .unwrap_or(default_retry_config.retry_timeout);
    RetryConfig {
        backoff: Default::default(),
        max_retries,
        retry_timeout,
    }
}

/// Build an AWS S3 store for one bucket.
///
/// # Errors
///
/// This function will return an error if:
/// * Required S3 configuration options are missing
/// * The S3 store cannot be initialized
fn build_aws_store(config: &StorageConfig, container: &str) -> StorageResult<Arc<dyn ObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_client_options(build_connection_options(config))
        .with_retry(build_retry_options(config))
        .with_bucket_name(container);

    // Apply configuration options
    for (key, value) in &config.options {
        match key.as_str() {
            "region" => builder = builder.with_region(value),
            "access_key_id" => builder = builder.with_access_key_id(value),
            "secret_access_key" => builder = builder.with_secret_access_key(value),
            "session_token" | "token" => builder = builder.with_token(value),
            "endpoint" => builder = builder.with_endpoint(value),
            "allow_http" => {
                if value.to_lowercase() == "true" {
                    builder = builder.with_allow_http(true);
                }
            }
            // Already handled by `build_connection_options` and `build_retry_options`
            "timeout"
            | "connect_timeout"
            | "max_retries"
            | "retry_timeout"
            | "pool_idle_timeout"
            | "pool_max_idle_per_host" => (),
            _ => {
                // Ignore unknown options or log a warning
                tracing::warn!("Unknown AWS S3 option: {}", key);
            }
        }
    }

    let store = builder
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Failed to create S3 store: {}", e)))?;

    Ok(Arc::new(store))
}

/// Build an Azure Blob Storage store for one container.
///
/// # Errors
///
/// This function will return an error if:
/// * The 'account_name' option is missing
/// * Azure credentials are invalid
/// * The Azure store cannot be initialized
fn build_azure_store(
    config: &StorageConfig,
    container: &str,
) -> StorageResult<Arc<dyn ObjectStore>> {
    let mut builder = MicrosoftAzureBuilder::new()
        .with_client_options(build_connection_options(config))
        .with_retry(build_retry_options(config))
        .with_container_name(container);

    // Account name is required for Azure
    let account_name = config.get_option("account_name").ok_or_else(|| {
        StorageError::ConfigError("Azure requires 'account_name' option".to_string())
    })?;
    builder = builder.with_account(account_name);

    // Apply configuration options
    for (key, value) in &config.options {
        match key.as_str() {
            "account_name" => builder = builder.with_account(value),
            "access_key" | "account_key" => builder = builder.with_access_key(value),
            "sas_token" => {
                // Parse SAS token query parameters
                let pairs: Vec<(String, String)> = value
                    .trim_start_matches('?')
                    .split('&')
                    .filter_map(|pair| {
                        let mut parts = pair.split('=');
                        match (parts.next(), parts.next()) {
                            (Some(k), Some(v)) => Some((k.to_string(), v.to_string())),
                            _ => None,
                        }
                    })
                    .collect();
                builder = builder.with_sas_authorization(pairs);
            }
            "tenant_id" => builder = builder.with_tenant_id(value),
            "client_id" => builder = builder.with_client_id(value),
            "client_secret" => builder = builder.with_client_secret(value),
            "endpoint" => builder = builder.with_endpoint(value.clone()),
            // Already handled by `build_connection_options` and `build_retry_options`
            "timeout"
            | "connect_timeout"
            | "max_retries"
            | "retry_timeout"
            | "pool_idle_timeout"
            | "pool_max_idle_per_host" => (),
            _ => {
                // Ignore unknown options or log a warning
                tracing::info!("Unknown Azure option: {}", key);
            }
        }
    }

    let store = builder
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Failed to create Azure store: {}", e)))?;

    Ok(Arc::new(store))
}

/// Build a GCS store for one bucket.
///
/// # Errors
///
/// This function will return an error if:
/// * Required GCS configuration options are missing
/// * The GCS store cannot be initialized
fn build_gcs_store(config: &StorageConfig, container: &str) -> StorageResult<Arc<dyn ObjectStore>> {
    let mut builder = GoogleCloudStorageBuilder::new()
        .with_client_options(build_connection_options(config))
        .with_retry(build_retry_options(config))
        .with_bucket_name(container);

    // Apply configuration options
    for (key, value) in &config.options {
        match key.as_str() {
            "service_account_key_path" => builder = builder.with_service_account_path(value),
            "service_account_key" => builder = builder.with_service_account_key(value),
            // Already handled by `build_connection_options` and `build_retry_options`
            "timeout"
            | "connect_timeout"
            | "max_retries"
            | "retry_timeout"
            | "pool_idle_timeout"
            | "pool_max_idle_per_host" => (),
            _ => {
                // Ignore unknown options or log a warning
                tracing::warn!("Unknown GCS option: {}", key);
            }
        }
    }

    let store = builder
        .build()
        .map_err(|e| StorageError::ConfigError(format!("Failed to create GCS store: {}", e)))?;

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_connection_options_default() {
        let config = StorageConfig::local();
        let _options = build_connection_options(&config);
        // No assertion, just make sure it does not panic
    }

    #[test]
    fn test_build_connection_options_with_timeout() {
        let config = StorageConfig::local()
            .with_option("timeout", "60")
            .with_option("connect_timeout", "10");

        let _options = build_connection_options(&config);
        // No assertion, just make sure it does not panic
    }

    #[test]
    fn test_build_connection_options_disabled_timeout() {
        let config = StorageConfig::local()
            .with_option("timeout", "disabled")
            .with_option("connect_timeout", "0");

        let _options = build_connection_options(&config);
        // No assertion, just make sure it does not panic
    }

    #[test]
    fn test_build_connection_options_invalid_values() {
        let config = StorageConfig::local()
            .with_option("timeout", "invalid")
            .with_option("pool_max_idle_per_host", "not_a_number");

        // Should handle invalid values gracefully
        let _options = build_connection_options(&config);
        // No assertion, just make sure it does not panic
    }

    #[test]
    fn test_build_retry_options_custom() {
        let config = StorageConfig::local()
            .with_option("max_retries", "5")
            .with_option("retry_timeout", "300");

        let retry_config = build_retry_options(&config);
        assert_eq!(retry_config.max_retries, 5);
        assert_eq!(retry_config.retry_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_build_retry_options_invalid_values() {
        let config = StorageConfig::local()
            .with_option("max_retries", "invalid")
            .with_option("retry_timeout", "not_a_number");

        let retry_config = build_retry_options(&config);
        // Should fall back to defaults
        assert!(retry_config.max_retries > 0);
    }

    #[test]
    fn test_local_base_dir_missing_path() {
        let config = StorageConfig::local();
        let result = local_base_dir(&config);

        assert!(result.is_err());
        match result {
            Err(StorageError::ConfigError(msg)) => {
                assert!(msg.contains("path"));
            }
            _ => panic!("Expected ConfigError for missing path"),
        }
    }

    #[test]
    fn test_local_base_dir_invalid_path() {
        let config = StorageConfig::local().with_option("path", "/nonexistent/invalid/path");
        let result = local_base_dir(&config);

        assert!(result.is_err());
        match result {
            Err(StorageError::ConfigError(msg)) => {
                assert!(msg.contains("Failed to resolve path"));
            }
            _ => panic!("Expected ConfigError"),
        }
    }

    #[test]
    fn test_local_base_dir_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_file.txt");
        fs::write(&file_path, "test content").unwrap();

        let config = StorageConfig::local().with_option("path", file_path.to_str().unwrap());
        let result = local_base_dir(&config);

        assert!(result.is_err());
        match result {
            Err(StorageError::ConfigError(msg)) => {
                assert!(msg.contains("not a directory"));
            }
            _ => panic!("Expected ConfigError for file instead of directory"),
        }
    }

    #[test]
    fn test_build_local_store_creates_container_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());

        let store = build_container_store(&config, "docs");
        assert!(store.is_ok());
        assert!(temp_dir.path().join("docs").is_dir());
    }

    #[test]
    fn test_build_local_store_existing_container_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("docs")).unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());

        let store = build_container_store(&config, "docs");
        assert!(store.is_ok());
    }

    #[test]
    fn test_build_azure_store_missing_account_name() {
        let config = StorageConfig::azure();
        let result = build_container_store(&config, "docs");

        assert!(result.is_err());
        match result {
            Err(StorageError::ConfigError(msg)) => {
                assert!(msg.contains("account_name"));
            }
            _ => panic!("Expected ConfigError for missing account name"),
        }
    }

    #[test]
    fn test_build_aws_store() {
        let config = StorageConfig::aws()
            .with_option("region", "us-east-1")
            .with_option("access_key_id", "KEY")
            .with_option("secret_access_key", "SECRET");

        let result = build_container_store(&config, "my-bucket");
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_azure_store() {
        let config = StorageConfig::azure()
            .with_option("account_name", "acct")
            .with_option("access_key", "bm90LWEtcmVhbC1rZXk=");

        let result = build_container_store(&config, "docs");
        assert!(result.is_ok());
    }
}
