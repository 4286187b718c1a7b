// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pressbind-security: Password protection and fingerprints for composed
// documents.
//
// The standard security handler maps a password policy onto lopdf's RC4
// encryption, encrypting every string and stream of a document in place, and
// can authenticate and reverse that encryption for verification.

pub mod handler;
pub mod integrity;
pub mod permissions;
pub mod policy;

pub use handler::{StandardSecurityHandler, is_encrypted};
pub use integrity::{file_identifier, hash_bytes};
pub use permissions::Permissions;
pub use policy::{EncryptionPolicy, KeyLength};
