// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document fingerprints: SHA-256 of output bytes and the trailer file
// identifier.

use pressbind_core::DocumentId;
use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
///
/// Logged for every document written so that output files can be matched
/// against a run.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// The 16-byte file identifier written to the trailer /ID array.
///
/// Derived from the document id, so it is stable for one document and also
/// feeds encryption key derivation.
pub fn file_identifier(id: &DocumentId) -> [u8; 16] {
    let mut hasher = Sha256::new();
    hasher.update(b"pressbind-file-id");
    hasher.update(id.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0u8; 16];
    out.copy_from_slice(&digest[..16]);
    out
}
