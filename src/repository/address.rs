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

use crate::storage::client;
use crate::storage::config::{StorageConfig, StorageType};
use crate::storage::error::{StorageError, StorageResult};
use url::Url;

/// Account-level address endpoint for one storage provider.
///
/// Determines the absolute-URL shape of every blob address the repository
/// exposes, and resolves such URLs back to a (container, relative path)
/// pair. Path composition always uses `/`, regardless of the host platform.
#[derive(Debug, Clone)]
pub(crate) enum Endpoint {
    /// `file://{base}/{container}/{path}`
    Local { base: String },
    /// `s3://{container}/{path}`
    Aws,
    /// `gs://{container}/{path}`
    Gcs,
    /// `{base}/{container}/{path}`, e.g. `https://acct.blob.core.windows.net/...`
    Azure { base: String },
}

impl Endpoint {
    /// Derive the endpoint from account-level configuration.
    ///
    /// Fails fast on missing required options (local `path`, Azure
    /// `account_name`) without performing any network I/O.
    pub(crate) fn from_config(config: &StorageConfig) -> StorageResult<Self> {
        match config.storage_type {
            StorageType::Local => {
                let canonical = client::local_base_dir(config)?;
                // Normalize to forward slashes and drop the Windows
                // extended-length prefix added by canonicalize()
                let base = canonical.to_string_lossy().replace('\\', "/");
                let base = base.strip_prefix("//?/").unwrap_or(&base).to_string();
                Ok(Endpoint::Local {
                    base: base.trim_end_matches('/').to_string(),
                })
            }
            StorageType::Aws => Ok(Endpoint::Aws),
            StorageType::Gcs => Ok(Endpoint::Gcs),
            StorageType::Azure => {
                let account_name = config.get_option("account_name").ok_or_else(|| {
                    StorageError::ConfigError("Azure requires 'account_name' option".to_string())
                })?;
                let base = match config.get_option("endpoint") {
                    Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
                    None => format!("https://{}.blob.core.windows.net", account_name),
                };
                Ok(Endpoint::Azure { base })
            }
        }
    }

    /// Absolute URL of a container root (no trailing slash).
    pub(crate) fn container_url(&self, container: &str) -> String {
        match self {
            Endpoint::Local { base } => format!("file://{}/{}", base, container),
            Endpoint::Aws => format!("s3://{}", container),
            Endpoint::Gcs => format!("gs://{}", container),
            Endpoint::Azure { base } => format!("{}/{}", base, container),
        }
    }

    /// Resolve an absolute URL to a (container, container-relative path) pair.
    ///
    /// The relative path is empty when the URL addresses the container root.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedUrl` for URLs that this endpoint cannot address
    /// and `UrlParseError` for malformed URLs.
    pub(crate) fn parse(&self, url: &str) -> StorageResult<(String, String)> {
        match self {
            Endpoint::Local { base } => {
                let prefix = format!("file://{}/", base);
                let rest = url
                    .strip_prefix(&prefix)
                    .ok_or_else(|| StorageError::UnsupportedUrl(url.to_string()))?;
                split_container(rest, url)
            }
            Endpoint::Aws | Endpoint::Gcs => {
                let expected_scheme = if matches!(self, Endpoint::Aws) {
                    "s3"
                } else {
                    "gs"
                };
                let parsed = Url::parse(url)?;
                if parsed.scheme() != expected_scheme {
                    return Err(StorageError::UnsupportedUrl(url.to_string()));
                }
                let container = parsed
                    .host_str()
                    .ok_or_else(|| StorageError::UnsupportedUrl(url.to_string()))?
                    .to_string();
                let relative = parsed.path().trim_matches('/').to_string();
                Ok((container, relative))
            }
            Endpoint::Azure { base } => {
                let prefix = format!("{}/", base);
                let rest = url
                    .strip_prefix(&prefix)
                    .ok_or_else(|| StorageError::UnsupportedUrl(url.to_string()))?;
                split_container(rest, url)
            }
        }
    }
}

/// Split `container/rest-of-path` into its parts.
fn split_container(rest: &str, url: &str) -> StorageResult<(String, String)> {
    let (container, relative) = match rest.split_once('/') {
        Some((container, relative)) => (container, relative.trim_matches('/')),
        None => (rest, ""),
    };
    if container.is_empty() {
        return Err(StorageError::UnsupportedUrl(url.to_string()));
    }
    Ok((container.to_string(), relative.to_string()))
}

/// Join directory segments and a file name into a container-relative path.
pub(crate) fn join_blob_path(file_name: &str, directories: &[&str]) -> String {
    if directories.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", directories.join("/"), file_name)
    }
}

/// Directory portion of a container-relative path.
///
/// A path with a single segment has no directory and yields the empty string.
pub(crate) fn directory_name(relative: &str) -> String {
    let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 1 {
        String::new()
    } else {
        segments[..segments.len() - 1].join("/")
    }
}

/// Base name (final path segment) of a container-relative path or file name.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn azure_endpoint() -> Endpoint {
        Endpoint::from_config(&StorageConfig::azure().with_option("account_name", "acct")).unwrap()
    }

    #[test]
    fn test_azure_endpoint_default_host() {
        let endpoint = azure_endpoint();
        assert_eq!(
            endpoint.container_url("docs"),
            "https://acct.blob.core.windows.net/docs"
        );
    }

    #[test]
    fn test_azure_endpoint_custom_host() {
        let config = StorageConfig::azure()
            .with_option("account_name", "acct")
            .with_option("endpoint", "https://acct.example.com/");
        let endpoint = Endpoint::from_config(&config).unwrap();

        assert_eq!(
            endpoint.container_url("docs"),
            "https://acct.example.com/docs"
        );
    }

    #[test]
    fn test_azure_endpoint_missing_account_name() {
        let result = Endpoint::from_config(&StorageConfig::azure());
        match result {
            Err(StorageError::ConfigError(msg)) => assert!(msg.contains("account_name")),
            _ => panic!("Expected ConfigError for missing account name"),
        }
    }

    #[test]
    fn test_azure_parse() {
        let endpoint = azure_endpoint();
        let (container, relative) = endpoint
            .parse("https://acct.blob.core.windows.net/docs/2024/01/a.txt")
            .unwrap();

        assert_eq!(container, "docs");
        assert_eq!(relative, "2024/01/a.txt");
    }

    #[test]
    fn test_azure_parse_container_root() {
        let endpoint = azure_endpoint();
        let (container, relative) = endpoint
            .parse("https://acct.blob.core.windows.net/docs")
            .unwrap();

        assert_eq!(container, "docs");
        assert_eq!(relative, "");
    }

    #[test]
    fn test_azure_parse_foreign_host() {
        let endpoint = azure_endpoint();
        let result = endpoint.parse("https://other.blob.core.windows.net/docs/a.txt");
        assert!(matches!(result, Err(StorageError::UnsupportedUrl(_))));
    }

    #[test]
    fn test_aws_endpoint() {
        let endpoint = Endpoint::from_config(&StorageConfig::aws()).unwrap();
        assert_eq!(endpoint.container_url("docs"), "s3://docs");

        let (container, relative) = endpoint.parse("s3://docs/2024/a.txt").unwrap();
        assert_eq!(container, "docs");
        assert_eq!(relative, "2024/a.txt");
    }

    #[test]
    fn test_gcs_endpoint() {
        let endpoint = Endpoint::from_config(&StorageConfig::gcs()).unwrap();
        assert_eq!(endpoint.container_url("docs"), "gs://docs");

        let (container, relative) = endpoint.parse("gs://docs/a.txt").unwrap();
        assert_eq!(container, "docs");
        assert_eq!(relative, "a.txt");
    }

    #[test]
    fn test_aws_parse_wrong_scheme() {
        let endpoint = Endpoint::from_config(&StorageConfig::aws()).unwrap();
        let result = endpoint.parse("gs://docs/a.txt");
        assert!(matches!(result, Err(StorageError::UnsupportedUrl(_))));
    }

    #[test]
    fn test_local_endpoint_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());
        let endpoint = Endpoint::from_config(&config).unwrap();

        let url = format!("{}/2024/a.txt", endpoint.container_url("docs"));
        assert!(url.starts_with("file://"));
        assert!(!url.contains('\\'));

        let (container, relative) = endpoint.parse(&url).unwrap();
        assert_eq!(container, "docs");
        assert_eq!(relative, "2024/a.txt");
    }

    #[test]
    fn test_local_parse_foreign_base() {
        let temp_dir = TempDir::new().unwrap();
        let config = StorageConfig::local().with_option("path", temp_dir.path().to_str().unwrap());
        let endpoint = Endpoint::from_config(&config).unwrap();

        let result = endpoint.parse("file:///somewhere/else/docs/a.txt");
        assert!(matches!(result, Err(StorageError::UnsupportedUrl(_))));
    }

    #[test]
    fn test_join_blob_path() {
        assert_eq!(join_blob_path("a.txt", &[]), "a.txt");
        assert_eq!(join_blob_path("a.txt", &["2024"]), "2024/a.txt");
        assert_eq!(join_blob_path("a.txt", &["2024", "01"]), "2024/01/a.txt");
    }

    #[test]
    fn test_directory_name() {
        assert_eq!(directory_name(""), "");
        assert_eq!(directory_name("a.txt"), "");
        assert_eq!(directory_name("2024/a.txt"), "2024");
        assert_eq!(directory_name("2024/01/a.txt"), "2024/01");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a.txt"), "a.txt");
        assert_eq!(base_name("2024/01/a.txt"), "a.txt");
    }
}
