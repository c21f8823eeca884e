use serde::{Deserialize, Serialize};
use serde_with::{base64::Base64, serde_as};

use super::digest::{SignedFields, PROTOCOL_VERSION};

fn default_version() -> u32 {
    PROTOCOL_VERSION
}

/// The unit exchanged through the relay
///
/// Everything except `original_name` and `plaintext_size` is bound by the
/// signature; changing any bound field after signing makes `open_package` fail.
///
/// # Wire Format
///
/// JSON, binary fields as padded standard base64:
///
/// ```text
/// {
///   "version": 1,
///   "file_id": "3f0c…",
///   "sender_id": "alice",
///   "receiver_id": "bob",
///   "nonce_b64": "…",          // 12 bytes
///   "ciphertext_b64": "…",     // plaintext length + 16 byte tag
///   "wrapped_key_b64": "…",    // modulus length
///   "signature_b64": "…",      // modulus length
///   "original_name": "report.pdf",   // optional, NOT authenticated
///   "plaintext_size": 1234           // optional, NOT authenticated
/// }
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Assigned by the sender; the relay fills in a UUID when empty
    #[serde(default)]
    pub file_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde_as(as = "Base64")]
    #[serde(rename = "nonce_b64")]
    pub nonce: Vec<u8>,
    #[serde_as(as = "Base64")]
    #[serde(rename = "ciphertext_b64")]
    pub ciphertext: Vec<u8>,
    #[serde_as(as = "Base64")]
    #[serde(rename = "wrapped_key_b64")]
    pub wrapped_key: Vec<u8>,
    #[serde_as(as = "Base64")]
    #[serde(rename = "signature_b64")]
    pub signature: Vec<u8>,

    // Attached after signing; a relay can rewrite these undetected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaintext_size: Option<u64>,
}

impl Package {
    /// The fields covered by the signature, in canonical order
    pub fn signed_fields(&self) -> SignedFields<'_> {
        SignedFields {
            sender_id: &self.sender_id,
            receiver_id: &self.receiver_id,
            file_id: &self.file_id,
            nonce: &self.nonce,
            ciphertext: &self.ciphertext,
            wrapped_key: &self.wrapped_key,
        }
    }

    /// Attach the unauthenticated display metadata
    pub fn with_metadata(mut self, original_name: Option<String>, plaintext_size: Option<u64>) -> Self {
        self.original_name = original_name;
        self.plaintext_size = plaintext_size;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Package {
        Package {
            version: PROTOCOL_VERSION,
            file_id: "f1".into(),
            sender_id: "alice".into(),
            receiver_id: "bob".into(),
            nonce: vec![0u8; 12],
            ciphertext: b"ciphertext".to_vec(),
            wrapped_key: vec![7u8; 4],
            signature: vec![9u8; 4],
            original_name: None,
            plaintext_size: None,
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["nonce_b64"], "AAAAAAAAAAAAAAAA");
        assert_eq!(json["ciphertext_b64"], "Y2lwaGVydGV4dA==");
        assert!(json.get("original_name").is_none());
        assert!(json.get("plaintext_size").is_none());
    }

    #[test]
    fn test_json_defaults() {
        let json = serde_json::json!({
            "sender_id": "alice",
            "receiver_id": "bob",
            "nonce_b64": "AAAAAAAAAAAAAAAA",
            "ciphertext_b64": "",
            "wrapped_key_b64": "",
            "signature_b64": "",
        });
        let package: Package = serde_json::from_value(json).unwrap();
        assert_eq!(package.version, PROTOCOL_VERSION);
        assert_eq!(package.file_id, "");
        assert_eq!(package.original_name, None);
    }

    #[test]
    fn test_json_rejects_bad_base64() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json["signature_b64"] = serde_json::Value::String("not base64!".into());
        assert!(serde_json::from_value::<Package>(json).is_err());
    }
}
