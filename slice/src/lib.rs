//! # Slice
//!
//! Routing tokens for the verification backend.
//!
//! Every routed request names its target as a `{controller, function}` pair.
//! The pair is serialized to compact JSON and passed through a fixed
//! substitution table before it goes out in the `X-Slice` header, so no
//! controller names travel as plain text.
//!
//! ## Notes
//!
//! - Not encryption. The table is public and static.
//! - Characters outside the table pass through untouched, in both directions.
//!   Callers mixing opaque and plain content rely on this.
//! - Tokens are rebuilt by splitting on `8`, which is why no token carries an
//!   `8` before its end.

use serde::Serialize;

pub mod table;

use table::{DELIMITER, SPACE_KEY, key_for, token_for};

/// Target of a routed backend call.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Slice<'a> {
    pub controller: &'a str,
    pub function: &'a str,
}

impl Slice<'_> {
    pub fn encode(&self) -> String {
        // two string fields, serialization cannot fail
        let json = serde_json::to_string(self).unwrap_or_default();

        encode(&json)
    }
}

pub fn make_slice(controller: &str, function: &str) -> String {
    Slice {
        controller,
        function,
    }
    .encode()
}

pub fn encode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 6);
    let mut buf = [0u8; 4];

    for c in input.chars() {
        let key: &str = if c == ' ' {
            SPACE_KEY
        } else {
            c.encode_utf8(&mut buf)
        };

        match token_for(key) {
            Some(token) => result.push_str(token),
            None => result.push(c),
        }
    }

    result
}

pub fn decode(input: &str) -> String {
    let mut result = String::with_capacity(input.len() / 4);

    for part in input.split(DELIMITER).filter(|part| !part.is_empty()) {
        let fragment = format!("{part}{DELIMITER}");

        match key_for(&fragment) {
            Some(SPACE_KEY) => result.push(' '),
            Some(key) => result.push_str(key),
            None => result.push_str(&fragment),
        }
    }

    result
}
