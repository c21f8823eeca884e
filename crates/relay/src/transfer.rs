//! Client-side send and receive flows
//!
//! Everything cryptographic happens here, on the client. The relay only ever
//! sees the finished package and the public keys users register.

use std::path::{Path, PathBuf};

use common::crypto::{KeyError, KeyPair, PublicKey};
use common::envelope::{build_package, open_package, EnvelopeError, StaticDirectory};
use uuid::Uuid;

use crate::http_server::api::client::{ApiClient, ApiError};
use crate::http_server::api::download::DownloadRequest;
use crate::http_server::api::list::ListRequest;
use crate::http_server::api::register::RegisterRequest;
use crate::http_server::api::upload::UploadRequest;

/// Name used when a package carries no usable file name
const FALLBACK_EXTENSION: &str = "bin";

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("relay request failed: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    #[error("receiver '{0}' has not registered a public key")]
    UnknownReceiver(String),
    #[error("no files waiting for '{0}'")]
    NoFiles(String),
    #[error("{0} is not a file")]
    NotAFile(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a successful send produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub file_id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub original_name: Option<String>,
    pub plaintext_size: u64,
    pub ciphertext_size: u64,
}

/// What a successful receive produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveOutcome {
    pub file_id: String,
    pub sender_id: String,
    pub original_name: Option<String>,
    pub saved_to: PathBuf,
    pub plaintext_size: u64,
}

/// Publish `keypair`'s public key under its identity
pub async fn register(client: &ApiClient, keypair: &KeyPair) -> Result<(), TransferError> {
    let request = RegisterRequest {
        user_id: keypair.identity().to_string(),
        public_key_pem: keypair.encode_public_key()?,
    };
    client.call(request).await?;
    tracing::debug!(identity = keypair.identity(), "registered public key with relay");
    Ok(())
}

/// Encrypt the file at `path` for `receiver_id` and upload it
///
/// The sender is registered first so the receiver can verify the signature.
///  A fresh UUID file id is assigned before signing unless one is given.
pub async fn send_file(
    client: &ApiClient,
    keypair: &KeyPair,
    receiver_id: &str,
    path: &Path,
    file_id: Option<String>,
) -> Result<SendOutcome, TransferError> {
    if !path.is_file() {
        return Err(TransferError::NotAFile(path.to_path_buf()));
    }
    let plaintext = tokio::fs::read(path).await?;
    let original_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    register(client, keypair).await?;

    let receiver_pem = client
        .public_key_pem(receiver_id)
        .await?
        .ok_or_else(|| TransferError::UnknownReceiver(receiver_id.to_string()))?;
    let receiver_public = PublicKey::from_pem(&receiver_pem)?;

    let file_id = file_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let package = build_package(
        &plaintext,
        keypair.identity(),
        receiver_id,
        &file_id,
        keypair.secret(),
        &receiver_public,
    )?
    .with_metadata(original_name.clone(), Some(plaintext.len() as u64));
    let ciphertext_size = package.ciphertext.len() as u64;

    let response = client.call(UploadRequest { package }).await?;
    if response.file_id != file_id {
        tracing::warn!(
            expected = %file_id,
            assigned = %response.file_id,
            "relay stored the package under a different file id"
        );
    }

    Ok(SendOutcome {
        file_id: response.file_id,
        sender_id: keypair.identity().to_string(),
        receiver_id: receiver_id.to_string(),
        original_name,
        plaintext_size: plaintext.len() as u64,
        ciphertext_size,
    })
}

/// Download, verify and decrypt a package addressed to `keypair`
///
/// With no `file_id` the oldest waiting package is taken. The plaintext is
///  written to `<out_dir>/<identity>/<name>` only after it verified and decrypted.
pub async fn receive_file(
    client: &ApiClient,
    keypair: &KeyPair,
    file_id: Option<&str>,
    out_dir: &Path,
) -> Result<ReceiveOutcome, TransferError> {
    let identity = keypair.identity();
    register(client, keypair).await?;

    let file_id = match file_id {
        Some(file_id) => file_id.to_string(),
        None => {
            let listing = client
                .call(ListRequest {
                    receiver_id: identity.to_string(),
                })
                .await?;
            listing
                .files
                .into_iter()
                .next()
                .map(|summary| summary.file_id)
                .ok_or_else(|| TransferError::NoFiles(identity.to_string()))?
        }
    };

    let package = client
        .call(DownloadRequest {
            file_id: file_id.clone(),
        })
        .await?
        .package;

    let mut directory = StaticDirectory::new();
    if let Some(pem) = client.public_key_pem(&package.sender_id).await? {
        directory.insert(package.sender_id.clone(), pem);
    }

    let plaintext = open_package(&package, keypair.secret(), &directory)?;

    if let Some(claimed) = package.plaintext_size {
        if claimed != plaintext.len() as u64 {
            tracing::warn!(
                %file_id,
                claimed,
                actual = plaintext.len(),
                "package metadata size does not match decrypted size"
            );
        }
    }

    let target_dir = out_dir.join(identity);
    tokio::fs::create_dir_all(&target_dir).await?;
    let saved_to = target_dir.join(safe_file_name(package.original_name.as_deref(), &file_id));
    tokio::fs::write(&saved_to, &plaintext).await?;

    tracing::info!(%file_id, sender_id = %package.sender_id, path = %saved_to.display(), "saved received file");
    Ok(ReceiveOutcome {
        file_id,
        sender_id: package.sender_id,
        original_name: package.original_name,
        saved_to,
        plaintext_size: plaintext.len() as u64,
    })
}

/// Turn the unauthenticated `original_name` into a name that stays inside the
/// output directory, falling back to `<file_id>.bin`
pub fn safe_file_name(original_name: Option<&str>, file_id: &str) -> String {
    original_name
        .and_then(path_component)
        .or_else(|| path_component(&format!("{}.{}", file_id, FALLBACK_EXTENSION)))
        .unwrap_or_else(|| format!("package.{}", FALLBACK_EXTENSION))
}

/// The last `/` or `\` separated component, if it is a plain file name
fn path_component(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();
    if base.is_empty() || base == "." || base == ".." || base.chars().any(char::is_control) {
        return None;
    }
    Some(base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_keeps_plain_names() {
        assert_eq!(safe_file_name(Some("report.pdf"), "f1"), "report.pdf");
        assert_eq!(safe_file_name(Some("my notes.txt"), "f1"), "my notes.txt");
    }

    #[test]
    fn test_safe_file_name_strips_directories() {
        assert_eq!(safe_file_name(Some("../../etc/passwd"), "f1"), "passwd");
        assert_eq!(safe_file_name(Some("/abs/path/x.txt"), "f1"), "x.txt");
        assert_eq!(safe_file_name(Some("C:\\Users\\a\\b.doc"), "f1"), "b.doc");
    }

    #[test]
    fn test_safe_file_name_falls_back_to_file_id() {
        assert_eq!(safe_file_name(None, "abc"), "abc.bin");
        assert_eq!(safe_file_name(Some(""), "abc"), "abc.bin");
        assert_eq!(safe_file_name(Some(".."), "abc"), "abc.bin");
        assert_eq!(safe_file_name(Some("dir/"), "abc"), "abc.bin");
        assert_eq!(safe_file_name(Some("bad\nname"), "abc"), "abc.bin");
    }

    #[test]
    fn test_safe_file_name_distrusts_file_id_too() {
        assert_eq!(safe_file_name(None, "../../x"), "x.bin");
        assert_eq!(safe_file_name(None, "bad\nid"), "package.bin");
    }
}
