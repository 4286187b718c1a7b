// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF standard security handler, revisions 2 and 3 (RC4, 40 and 128 bit),
// backed by lopdf's encryption support.

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, StringFormat};
use tracing::{debug, info, instrument};

use pressbind_core::error::{PressbindError, Result};

use crate::policy::{EncryptionPolicy, KeyLength};

/// Whether `document` carries an encryption dictionary reference in its
/// trailer.
pub fn is_encrypted(document: &Document) -> bool {
    document.trailer.has(b"Encrypt")
}

/// Encrypts a lopdf document in place according to an [`EncryptionPolicy`].
pub struct StandardSecurityHandler {
    policy: EncryptionPolicy,
}

impl StandardSecurityHandler {
    pub fn new(policy: EncryptionPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &EncryptionPolicy {
        &self.policy
    }

    /// Encrypt every string and stream of `document` and attach the /Encrypt
    /// dictionary. A trailer without an /ID gets `file_id` for both halves
    /// before the keys are derived from it.
    ///
    /// Fails with `EncryptionError` if the document is already encrypted.
    #[instrument(
        skip_all,
        fields(bits = self.policy.key_length.bits(), objects = document.objects.len())
    )]
    pub fn encrypt_document(&self, document: &mut Document, file_id: &[u8; 16]) -> Result<()> {
        if is_encrypted(document) {
            return Err(PressbindError::EncryptionError(
                "document is already encrypted".into(),
            ));
        }

        if !document.trailer.has(b"ID") {
            document.trailer.set(
                "ID",
                Object::Array(vec![
                    Object::String(file_id.to_vec(), StringFormat::Hexadecimal),
                    Object::String(file_id.to_vec(), StringFormat::Hexadecimal),
                ]),
            );
        }

        let state = self.encryption_state(document)?;
        document.encrypt(&state).map_err(|err| {
            PressbindError::EncryptionError(format!("failed to encrypt document: {err}"))
        })?;

        info!(revision = self.policy.key_length.revision(), "document encrypted");
        Ok(())
    }

    fn encryption_state(&self, document: &Document) -> Result<EncryptionState> {
        let owner_password = self.policy.effective_owner_password();
        let user_password = self.policy.user_password.as_str();
        let key_length = self.policy.key_length;
        let permissions = self.policy.permissions.to_pdf(key_length.revision());

        let version = match key_length {
            KeyLength::Bits40 => EncryptionVersion::V1 {
                document,
                owner_password,
                user_password,
                permissions,
            },
            KeyLength::Bits128 => EncryptionVersion::V2 {
                document,
                owner_password,
                user_password,
                key_length: key_length.bits() as usize,
                permissions,
            },
        };

        EncryptionState::try_from(version).map_err(|err| {
            PressbindError::EncryptionError(format!("failed to derive encryption keys: {err}"))
        })
    }

    /// Check `password` against an encrypted document as either the user or
    /// the owner password.
    ///
    /// Fails with `DecryptionError` when the password is wrong or the
    /// document is not encrypted with the standard handler.
    pub fn authenticate(document: &Document, password: &str) -> Result<()> {
        if !is_encrypted(document) {
            return Err(PressbindError::DecryptionError(
                "document is not encrypted".into(),
            ));
        }
        document.authenticate_password(password).map_err(|err| {
            PressbindError::DecryptionError(format!("incorrect password: {err}"))
        })?;
        debug!("password accepted");
        Ok(())
    }

    /// Authenticate and reverse [`encrypt_document`](Self::encrypt_document),
    /// leaving an unencrypted document.
    #[instrument(skip_all)]
    pub fn decrypt_document(document: &mut Document, password: &str) -> Result<()> {
        Self::authenticate(document, password)?;
        document.decrypt(password).map_err(|err| {
            PressbindError::DecryptionError(format!("failed to decrypt document: {err}"))
        })?;
        info!("document decrypted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permissions;
    use lopdf::{Stream, dictionary};

    const FILE_ID: [u8; 16] = *b"0123456789abcdef";
    const CONTENT: &[u8] = b"q 10 0 0 10 0 0 cm /Im0 Do Q";

    fn sample_document() -> Document {
        let mut doc = Document::with_version("1.5");
        let content = Stream::new(dictionary! {}, CONTENT.to_vec());
        let content_id = doc.add_object(content);
        doc.add_object(dictionary! {
            "Title" => Object::string_literal("Holiday receipts"),
            "Contents" => content_id,
        });
        doc
    }

    fn stream_content(doc: &Document) -> Vec<u8> {
        doc.objects
            .values()
            .find_map(|object| match object {
                Object::Stream(stream) => Some(stream.content.clone()),
                _ => None,
            })
            .unwrap()
    }

    fn title(doc: &Document) -> Vec<u8> {
        doc.objects
            .values()
            .find_map(|object| match object {
                Object::Dictionary(dict) => match dict.get(b"Title") {
                    Ok(Object::String(bytes, _)) => Some(bytes.clone()),
                    _ => None,
                },
                _ => None,
            })
            .unwrap()
    }

    fn encrypted(policy: EncryptionPolicy) -> Document {
        let mut doc = sample_document();
        StandardSecurityHandler::new(policy)
            .unwrap()
            .encrypt_document(&mut doc, &FILE_ID)
            .unwrap();
        doc
    }

    fn integer(dict: &lopdf::Dictionary, key: &[u8]) -> i64 {
        dict.get(key).and_then(Object::as_i64).unwrap()
    }

    #[test]
    fn encryption_hides_content_and_adds_dictionary() {
        let doc = encrypted(EncryptionPolicy::single_password("s3cret"));
        assert!(is_encrypted(&doc));
        assert_ne!(stream_content(&doc), CONTENT.to_vec());
        assert_ne!(title(&doc), b"Holiday receipts".to_vec());

        let dict = doc.get_encrypted().unwrap();
        assert_eq!(integer(dict, b"V"), 2);
        assert_eq!(integer(dict, b"R"), 3);
        assert_eq!(integer(dict, b"Length"), 128);
        assert_eq!(integer(dict, b"P"), -4);

        let id = doc.trailer.get(b"ID").and_then(Object::as_array).unwrap();
        assert_eq!(id[0].as_str().unwrap(), FILE_ID.as_slice());
    }

    #[test]
    fn forty_bit_keys_use_revision_two() {
        let policy =
            EncryptionPolicy::single_password("s3cret").with_key_length(KeyLength::Bits40);
        let doc = encrypted(policy);
        let dict = doc.get_encrypted().unwrap();
        assert_eq!(integer(dict, b"V"), 1);
        assert_eq!(integer(dict, b"R"), 2);
        assert_eq!(integer(dict, b"P"), -3844);
    }

    #[test]
    fn existing_file_identifier_is_kept() {
        let mut doc = sample_document();
        let original = Object::Array(vec![
            Object::String(b"first-id-0000000".to_vec(), StringFormat::Hexadecimal),
            Object::String(b"second-id-000000".to_vec(), StringFormat::Hexadecimal),
        ]);
        doc.trailer.set("ID", original);
        StandardSecurityHandler::new(EncryptionPolicy::single_password("pw"))
            .unwrap()
            .encrypt_document(&mut doc, &FILE_ID)
            .unwrap();

        let id = doc.trailer.get(b"ID").and_then(Object::as_array).unwrap();
        assert_eq!(id[0].as_str().unwrap(), b"first-id-0000000");
        StandardSecurityHandler::decrypt_document(&mut doc, "pw").unwrap();
        assert_eq!(stream_content(&doc), CONTENT.to_vec());
    }

    #[test]
    fn correct_password_restores_content() {
        for key_length in [KeyLength::Bits40, KeyLength::Bits128] {
            let policy = EncryptionPolicy::single_password("s3cret").with_key_length(key_length);
            let mut doc = encrypted(policy);
            StandardSecurityHandler::decrypt_document(&mut doc, "s3cret").unwrap();
            assert!(!is_encrypted(&doc));
            assert_eq!(stream_content(&doc), CONTENT.to_vec());
            assert_eq!(title(&doc), b"Holiday receipts".to_vec());
        }
    }

    #[test]
    fn wrong_password_is_rejected() {
        for key_length in [KeyLength::Bits40, KeyLength::Bits128] {
            let policy = EncryptionPolicy::single_password("s3cret").with_key_length(key_length);
            let mut doc = encrypted(policy);
            for attempt in ["", "S3CRET", "s3cret "] {
                let err = StandardSecurityHandler::authenticate(&doc, attempt).unwrap_err();
                assert!(matches!(err, PressbindError::DecryptionError(_)));
            }
            let err = StandardSecurityHandler::decrypt_document(&mut doc, "guess").unwrap_err();
            assert!(matches!(err, PressbindError::DecryptionError(_)));
            assert!(is_encrypted(&doc));
        }
    }

    #[test]
    fn owner_password_also_authenticates() {
        let policy = EncryptionPolicy {
            owner_password: "owner".into(),
            ..EncryptionPolicy::single_password("user")
        };
        let mut doc = encrypted(policy);
        StandardSecurityHandler::authenticate(&doc, "user").unwrap();
        StandardSecurityHandler::authenticate(&doc, "owner").unwrap();
        StandardSecurityHandler::decrypt_document(&mut doc, "owner").unwrap();
        assert_eq!(stream_content(&doc), CONTENT.to_vec());
    }

    #[test]
    fn restricted_permissions_are_recorded() {
        let policy = EncryptionPolicy {
            permissions: Permissions::from_bits(Permissions::PRINT),
            ..EncryptionPolicy::single_password("pw")
        };
        let doc = encrypted(policy);
        let p = integer(doc.get_encrypted().unwrap(), b"P");
        assert_eq!(p & 0xFFF, 0x0C4);
    }

    #[test]
    fn already_encrypted_documents_are_refused() {
        let mut doc = encrypted(EncryptionPolicy::single_password("one"));
        let handler =
            StandardSecurityHandler::new(EncryptionPolicy::single_password("two")).unwrap();
        let err = handler.encrypt_document(&mut doc, &FILE_ID).unwrap_err();
        assert!(matches!(err, PressbindError::EncryptionError(_)));
    }

    #[test]
    fn plain_documents_cannot_be_decrypted() {
        let mut doc = sample_document();
        let err = StandardSecurityHandler::decrypt_document(&mut doc, "anything").unwrap_err();
        assert!(matches!(err, PressbindError::DecryptionError(_)));
    }

    #[test]
    fn empty_password_policy_is_refused() {
        assert!(StandardSecurityHandler::new(EncryptionPolicy::single_password("")).is_err());
    }
}
