// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encryption policy: passwords, cipher strength, and user permissions.

use pressbind_core::error::{PressbindError, Result};

use crate::permissions::Permissions;

/// RC4 key strength. 40-bit keys use lopdf's /V 1 handler, 128-bit keys /V 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyLength {
    /// Revision 2.
    Bits40,
    /// Revision 3.
    #[default]
    Bits128,
}

impl KeyLength {
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            40 => Ok(Self::Bits40),
            128 => Ok(Self::Bits128),
            other => Err(PressbindError::EncryptionError(format!(
                "unsupported key length {other} bits (expected 40 or 128)"
            ))),
        }
    }

    pub fn bits(&self) -> u32 {
        match self {
            Self::Bits40 => 40,
            Self::Bits128 => 128,
        }
    }

    /// Standard security handler revision (/R).
    pub fn revision(&self) -> u8 {
        match self {
            Self::Bits40 => 2,
            Self::Bits128 => 3,
        }
    }
}

/// How a document is to be protected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionPolicy {
    /// Grants full access. Empty means "same as the user password".
    pub owner_password: String,
    /// Required to open the document.
    pub user_password: String,
    pub key_length: KeyLength,
    pub permissions: Permissions,
}

impl EncryptionPolicy {
    /// One password to open the document, 128-bit key, everything allowed.
    pub fn single_password(password: impl Into<String>) -> Self {
        Self {
            owner_password: String::new(),
            user_password: password.into(),
            key_length: KeyLength::Bits128,
            permissions: Permissions::all(),
        }
    }

    pub fn with_key_length(mut self, key_length: KeyLength) -> Self {
        self.key_length = key_length;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.user_password.is_empty() {
            return Err(PressbindError::EncryptionError(
                "password must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// The owner password actually used for key derivation.
    pub fn effective_owner_password(&self) -> &str {
        if self.owner_password.is_empty() {
            &self.user_password
        } else {
            &self.owner_password
        }
    }
}
