//! Azure Blob REST client over blocking HTTP

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use sha2::Sha256;
use url::Url;

use super::connection::{ConnectionString, Credential};
use super::traits::{prepare_destination, BlobContainerClient, BlobObject, StorageError, StorageResult};

/// REST API version sent with every request
pub const API_VERSION: &str = "2021-08-06";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Container reached through the Blob service REST API
pub struct HttpBlobContainer {
    client: Client,
    endpoint: Url,
    credential: Credential,
    container: String,
}

impl HttpBlobContainer {
    /// Create a client with its own HTTP connection pool
    pub fn new(
        connection: &ConnectionString,
        container: impl Into<String>,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, connection, container))
    }

    /// Create a client reusing an existing `reqwest` client
    pub fn with_client(client: Client, connection: &ConnectionString, container: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: connection.blob_endpoint().clone(),
            credential: connection.credential().clone(),
            container: container.into(),
        }
    }

    fn url_for(&self, blob: Option<&str>, params: &[(&str, &str)]) -> StorageResult<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| StorageError::Unsupported(self.endpoint.to_string()))?;
            segments.pop_if_empty().push(&self.container);
            if let Some(blob) = blob {
                // Virtual directories keep their slashes
                for part in blob.split('/') {
                    segments.push(part);
                }
            }
        }

        let mut query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        if let Credential::SharedAccessSignature(sas) = &self.credential {
            query.push(sas.clone());
        }
        url.set_query((!query.is_empty()).then(|| query.join("&")).as_deref());
        Ok(url)
    }

    fn get(&self, url: Url) -> StorageResult<Response> {
        let date = chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let mut request = self
            .client
            .get(url.clone())
            .header("x-ms-version", API_VERSION)
            .header("x-ms-date", &date);

        if let Credential::SharedKey { account, key } = &self.credential {
            let signature = sign(key, &string_to_sign("GET", account, &url, &date))?;
            request = request.header("Authorization", format!("SharedKey {}:{}", account, signature));
        }

        crate::logging::debug("http_blob", &format!("GET {}{}", url.origin().ascii_serialization(), url.path()));
        Ok(request.send()?)
    }
}

impl std::fmt::Debug for HttpBlobContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBlobContainer")
            .field("endpoint", &self.endpoint.as_str())
            .field("container", &self.container)
            .field("credential", &self.credential)
            .finish()
    }
}

impl BlobContainerClient for HttpBlobContainer {
    fn name(&self) -> &str {
        &self.container
    }

    fn exists(&self) -> bool {
        let response = self
            .url_for(None, &[("restype", "container")])
            .and_then(|url| self.get(url));

        match response {
            Ok(r) if r.status().is_success() => true,
            Ok(r) => {
                crate::logging::warn(
                    "http_blob",
                    &format!("Container {} check returned {}", self.container, r.status()),
                );
                false
            }
            Err(e) => {
                crate::logging::warn(
                    "http_blob",
                    &format!("Container {} unreachable: {}", self.container, e),
                );
                false
            }
        }
    }

    fn get_object<'a>(&'a self, name: &str) -> Box<dyn BlobObject + 'a> {
        Box::new(HttpBlob {
            container: self,
            name: name.to_string(),
        })
    }
}

struct HttpBlob<'a> {
    container: &'a HttpBlobContainer,
    name: String,
}

impl BlobObject for HttpBlob<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn download_to_file(&self, path: &Path, overwrite: bool) -> StorageResult<u64> {
        let url = self.container.url_for(Some(&self.name), &[])?;
        let mut response = self.container.get(url)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(self.name.clone()));
        }
        if !status.is_success() {
            let mut message = response.text().unwrap_or_default();
            message.truncate(512);
            return Err(StorageError::Service {
                status: status.as_u16(),
                message,
            });
        }

        prepare_destination(path, overwrite)?;

        // Stream into a sibling file so an interrupted transfer never leaves
        // a truncated file under the final name
        let partial = partial_path(path);
        let mut file = File::create(&partial)?;
        let written = match response.copy_to(&mut file) {
            Ok(n) => n,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&partial);
                return Err(e.into());
            }
        };
        drop(file);
        fs::rename(&partial, path)?;
        Ok(written)
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Canonical SharedKey string-to-sign for a body-less request
fn string_to_sign(method: &str, account: &str, url: &Url, date: &str) -> String {
    let mut resource = format!("/{}{}", account, url.path());
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.to_lowercase(), v.into_owned()))
        .collect();
    params.sort();
    for (key, value) in params {
        resource.push_str(&format!("\n{}:{}", key, value));
    }

    // VERB, then eleven empty standard headers, then the x-ms-* headers
    format!(
        "{}\n{}x-ms-date:{}\nx-ms-version:{}\n{}",
        method,
        "\n".repeat(11),
        date,
        API_VERSION,
        resource
    )
}

fn sign(key: &[u8], string_to_sign: &str) -> StorageResult<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| StorageError::InvalidConnectionString(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
