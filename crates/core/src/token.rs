//! Opaque token generation for share links, signing links, verification
//! codes, and OAuth state parameters.
//!
//! Tokens are unguessable random strings; they carry no embedded claims and
//! are matched by exact database lookup.

use rand::distr::{Alphanumeric, SampleString};

/// Length of proposal share tokens and contract signing tokens.
pub const LINK_TOKEN_LEN: usize = 32;

/// Length of OAuth `state` tokens.
pub const OAUTH_STATE_LEN: usize = 24;

/// Number of groups in a certificate verification code.
const CODE_GROUPS: usize = 3;

/// Characters per verification-code group.
const CODE_GROUP_LEN: usize = 4;

/// Generate a random alphanumeric token of the given length.
pub fn random_token(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

/// Token for a public proposal share link or contract signing link.
pub fn link_token() -> String {
    random_token(LINK_TOKEN_LEN)
}

/// Random `state` parameter for the ads OAuth redirect flow.
pub fn oauth_state() -> String {
    random_token(OAUTH_STATE_LEN)
}

/// Human-readable certificate verification code, e.g. `K3QF-9ZT2-M8XW`.
///
/// Uppercase alphanumerics grouped for readability; regenerated on every
/// certificate render (the code is printed, not persisted).
pub fn verification_code() -> String {
    (0..CODE_GROUPS)
        .map(|_| random_token(CODE_GROUP_LEN).to_uppercase())
        .collect::<Vec<_>>()
        .join("-")
}
