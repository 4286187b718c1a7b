// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User access permissions, encoded as the /P entry of the encryption
// dictionary.

use serde::{Deserialize, Serialize};

/// Permission bits granted to a user who opens the document with the user
/// password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permissions(u32);

impl Permissions {
    pub const PRINT: u32 = 1 << 2;
    pub const MODIFY: u32 = 1 << 3;
    pub const COPY: u32 = 1 << 4;
    pub const ANNOTATE: u32 = 1 << 5;
    // Revision 3 only.
    pub const FILL_FORMS: u32 = 1 << 8;
    pub const EXTRACT_FOR_ACCESSIBILITY: u32 = 1 << 9;
    pub const ASSEMBLE: u32 = 1 << 10;
    pub const PRINT_HIGH_QUALITY: u32 = 1 << 11;

    const REVISION_2_MASK: u32 = Self::PRINT | Self::MODIFY | Self::COPY | Self::ANNOTATE;
    const REVISION_3_MASK: u32 = Self::REVISION_2_MASK
        | Self::FILL_FORMS
        | Self::EXTRACT_FOR_ACCESSIBILITY
        | Self::ASSEMBLE
        | Self::PRINT_HIGH_QUALITY;

    /// Everything allowed.
    pub fn all() -> Self {
        Self(Self::REVISION_3_MASK)
    }

    /// Nothing allowed beyond viewing.
    pub fn none() -> Self {
        Self(0)
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits & Self::REVISION_3_MASK)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn allows(&self, flag: u32) -> bool {
        self.0 & flag == flag
    }

    /// The lopdf permission set for the given security handler revision.
    /// Revision 2 ignores the extended bits; lopdf fills in the reserved ones.
    pub fn to_pdf(&self, revision: u8) -> lopdf::Permissions {
        let mask = if revision >= 3 {
            Self::REVISION_3_MASK
        } else {
            Self::REVISION_2_MASK
        };
        lopdf::Permissions::from_bits_truncate(u64::from(self.0 & mask))
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::all()
    }
}
