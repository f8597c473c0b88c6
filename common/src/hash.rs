use std::fmt;

use sha1::{Digest, Sha1};

use crate::consts::{PREFIX_LEN, SHA1_HEX_LEN};

/// SHA-1 of a password split for a k-anonymity range query.
///
/// Only `prefix` is meant to be sent over the wire, the `suffix` is matched locally
/// against the range returned by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct HashRange {
    prefix: String,
    suffix: String,
}

impl HashRange {
    pub fn of(password: &str) -> Self {
        // &str is always UTF-8, so this hashes the UTF-8 encoding
        let hash = data_encoding::HEXUPPER.encode(Sha1::digest(password.as_bytes()).as_slice());
        debug_assert_eq!(hash.len(), SHA1_HEX_LEN);

        let (prefix, suffix) = hash.split_at(PREFIX_LEN);
        Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

// never print the suffix, logs are not a safe place for it
impl fmt::Debug for HashRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRange")
            .field("prefix", &self.prefix)
            .field("suffix", &"<redacted>")
            .finish()
    }
}
