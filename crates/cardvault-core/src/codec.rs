//! Reversible blob codec for sensitive fields
//!
//! Sensitive fields are serialized to JSON and base64-encoded before they
//! reach the store. This is an opaque transport encoding and provides no
//! confidentiality whatsoever.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::record::{
    CardRecord, CardSecrets, DocumentRecord, DocumentSecrets, RecordMeta, SecuredRecord,
};

/// Serialize and encode a secrets value into an opaque blob
pub fn encode_secrets<T: Serialize>(secrets: &T) -> Result<String> {
    let json = Zeroizing::new(serde_json::to_vec(secrets)?);
    Ok(STANDARD.encode(json.as_slice()))
}

/// Decode and deserialize an opaque blob back into a secrets value
pub fn decode_secrets<T: DeserializeOwned>(blob: &str) -> Result<T> {
    let bytes = Zeroizing::new(
        STANDARD
            .decode(blob.trim())
            .map_err(|e| VaultError::Decode(e.to_string()))?,
    );
    serde_json::from_slice(&bytes).map_err(|e| VaultError::Decode(e.to_string()))
}

/// A record in its at-rest shape: clear metadata plus the encoded secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedRecord {
    pub meta: RecordMeta,
    pub blob: String,
}

impl SealedRecord {
    /// Seal a validated record for storage
    pub fn seal(record: &SecuredRecord) -> Result<Self> {
        record.validate()?;
        let sealed = match record {
            SecuredRecord::Card(card) => Self {
                meta: RecordMeta::Card(card.meta.clone()),
                blob: encode_secrets(&card.secrets)?,
            },
            SecuredRecord::Document(doc) => Self {
                meta: RecordMeta::Document(doc.meta.clone()),
                blob: encode_secrets(&doc.secrets)?,
            },
        };
        Ok(sealed)
    }

    /// Decode the blob and rebuild the record, re-running validation
    pub fn open(&self) -> Result<SecuredRecord> {
        let record = match &self.meta {
            RecordMeta::Card(meta) => {
                let secrets: CardSecrets = decode_secrets(&self.blob)?;
                SecuredRecord::Card(CardRecord::new(meta.clone(), secrets)?)
            }
            RecordMeta::Document(meta) => {
                let secrets: DocumentSecrets = decode_secrets(&self.blob)?;
                SecuredRecord::Document(DocumentRecord::new(meta.clone(), secrets)?)
            }
        };
        Ok(record)
    }
}
