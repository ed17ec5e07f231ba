//! Azure-style storage connection strings

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use super::traits::{StorageError, StorageResult};

/// Account name of the local storage emulator
pub const DEV_STORAGE_ACCOUNT: &str = "devstoreaccount1";
/// Published key of the local storage emulator
pub const DEV_STORAGE_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
const DEV_STORAGE_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// How requests against the endpoint are authorized
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Anonymous,
    /// Query string appended to every request
    SharedAccessSignature(String),
    /// Account name plus the decoded account key
    SharedKey { account: String, key: Vec<u8> },
}

// Keys and signatures stay out of logs
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credential::Anonymous => write!(f, "Anonymous"),
            Credential::SharedAccessSignature(_) => write!(f, "SharedAccessSignature(***)"),
            Credential::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"***")
                .finish(),
        }
    }
}

/// Parsed `Key=Value;Key=Value` connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    blob_endpoint: Url,
    credential: Credential,
}

impl ConnectionString {
    /// Parse a connection string
    ///
    /// Recognized keys (case-insensitive): `DefaultEndpointsProtocol`,
    /// `AccountName`, `AccountKey`, `EndpointSuffix`, `BlobEndpoint`,
    /// `SharedAccessSignature`, `UseDevelopmentStorage`. Unknown keys are
    /// ignored.
    pub fn parse(input: &str) -> StorageResult<Self> {
        let mut protocol = None;
        let mut account_name = None;
        let mut account_key = None;
        let mut endpoint_suffix = None;
        let mut blob_endpoint = None;
        let mut sas = None;
        let mut dev_storage = false;

        for segment in input.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                StorageError::InvalidConnectionString(format!("segment without '=' ({})", redact_segment(segment)))
            })?;
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "defaultendpointsprotocol" => protocol = Some(value),
                "accountname" => account_name = Some(value),
                "accountkey" => account_key = Some(value),
                "endpointsuffix" => endpoint_suffix = Some(value),
                "blobendpoint" => blob_endpoint = Some(value),
                "sharedaccesssignature" => sas = Some(value),
                "usedevelopmentstorage" => dev_storage = value.eq_ignore_ascii_case("true"),
                other => crate::logging::debug(
                    "connection_string",
                    &format!("Ignoring unknown connection string key '{}'", other),
                ),
            }
        }

        if dev_storage {
            return Ok(Self {
                blob_endpoint: parse_endpoint(DEV_STORAGE_BLOB_ENDPOINT)?,
                credential: Credential::SharedKey {
                    account: DEV_STORAGE_ACCOUNT.to_string(),
                    key: decode_key(DEV_STORAGE_KEY)?,
                },
            });
        }

        let blob_endpoint = match (blob_endpoint, &account_name) {
            (Some(endpoint), _) => parse_endpoint(&endpoint)?,
            (None, Some(account)) => parse_endpoint(&format!(
                "{}://{}.blob.{}",
                protocol.as_deref().unwrap_or("https"),
                account,
                endpoint_suffix.as_deref().unwrap_or(DEFAULT_ENDPOINT_SUFFIX),
            ))?,
            (None, None) => {
                return Err(StorageError::InvalidConnectionString(
                    "neither BlobEndpoint nor AccountName given".to_string(),
                ))
            }
        };

        let credential = match (sas, account_name, account_key) {
            (Some(sas), _, _) => Credential::SharedAccessSignature(sas.trim_start_matches('?').to_string()),
            (None, Some(account), Some(key)) => Credential::SharedKey {
                account,
                key: decode_key(&key)?,
            },
            _ => Credential::Anonymous,
        };

        Ok(Self {
            blob_endpoint,
            credential,
        })
    }

    /// Base URL of the blob service
    pub fn blob_endpoint(&self) -> &Url {
        &self.blob_endpoint
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

fn parse_endpoint(raw: &str) -> StorageResult<Url> {
    Url::parse(raw)
        .map_err(|e| StorageError::InvalidConnectionString(format!("bad blob endpoint '{}': {}", raw, e)))
}

fn decode_key(raw: &str) -> StorageResult<Vec<u8>> {
    STANDARD
        .decode(raw)
        .map_err(|_| StorageError::InvalidConnectionString("AccountKey is not valid base64".to_string()))
}

fn redact_segment(segment: &str) -> String {
    segment.chars().take(12).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_key_form() {
        let cs = ConnectionString::parse(
            "DefaultEndpointsProtocol=https;AccountName=acme;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net",
        )
        .unwrap();
        assert_eq!(cs.blob_endpoint().as_str(), "https://acme.blob.core.windows.net/");
        assert_eq!(
            cs.credential(),
            &Credential::SharedKey {
                account: "acme".to_string(),
                key: b"secret".to_vec()
            }
        );
    }

    #[test]
    fn test_sas_form() {
        let cs = ConnectionString::parse(
            "BlobEndpoint=https://acme.blob.core.windows.net/;SharedAccessSignature=?sv=2022-11-02&sig=abc%3D",
        )
        .unwrap();
        assert_eq!(
            cs.credential(),
            &Credential::SharedAccessSignature("sv=2022-11-02&sig=abc%3D".to_string())
        );
    }

    #[test]
    fn test_keys_are_case_insensitive_and_suffix_defaults() {
        let cs = ConnectionString::parse("accountname=acme;defaultendpointsprotocol=http").unwrap();
        assert_eq!(cs.blob_endpoint().as_str(), "http://acme.blob.core.windows.net/");
        assert_eq!(cs.credential(), &Credential::Anonymous);
    }

    #[test]
    fn test_development_storage() {
        let cs = ConnectionString::parse("UseDevelopmentStorage=true").unwrap();
        assert_eq!(cs.blob_endpoint().as_str(), "http://127.0.0.1:10000/devstoreaccount1");
        assert!(matches!(cs.credential(), Credential::SharedKey { account, .. } if account == DEV_STORAGE_ACCOUNT));
    }

    #[test]
    fn test_file_endpoint() {
        let cs = ConnectionString::parse("BlobEndpoint=file:///srv/blobs").unwrap();
        assert_eq!(cs.blob_endpoint().scheme(), "file");
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            ConnectionString::parse(""),
            Err(StorageError::InvalidConnectionString(_))
        ));
        assert!(matches!(
            ConnectionString::parse("AccountName=acme;garbage"),
            Err(StorageError::InvalidConnectionString(_))
        ));
        assert!(matches!(
            ConnectionString::parse("AccountName=acme;AccountKey=not*base64"),
            Err(StorageError::InvalidConnectionString(_))
        ));
        assert!(matches!(
            ConnectionString::parse("BlobEndpoint=not a url"),
            Err(StorageError::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let cs = ConnectionString::parse("AccountName=acme;AccountKey=c2VjcmV0").unwrap();
        let rendered = format!("{:?}", cs);
        assert!(rendered.contains("acme"));
        assert!(!rendered.contains("115")); // 's' as a byte
    }
}
