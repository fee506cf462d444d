//! # Table
//!
//! Symbol to token pairs shared with the backend. Every token ends with
//! [`DELIMITER`] and carries no other delimiter, so a token stream can be split
//! back into tokens without a length prefix.
//!
//! Must stay byte-for-byte in sync with the backend copy, otherwise routed
//! requests land on the wrong controller.

pub const DELIMITER: char = '8';

/// Key standing in for the space character.
pub const SPACE_KEY: &str = "s_PPX1";

pub const TABLE: [(&str, &str); 77] = [
    ("a", "ssp8"),
    ("b", "s21s48"),
    ("c", "xopA8"),
    ("d", "poxik8"),
    ("e", "Tak8"),
    ("f", "MkNixy8"),
    ("g", "IdPN8"),
    ("h", "OtuYx8"),
    ("i", "OtiX8"),
    ("j", "Z23x8"),
    ("k", "Zaee8"),
    ("l", "Rx38"),
    ("m", "R418"),
    ("n", "CapR8"),
    ("o", "Mui8"),
    ("p", "DtBy8"),
    ("q", "YxBi8"),
    ("r", "BiBG8"),
    ("s", "muxYb8"),
    ("t", "MZx8"),
    ("u", "mnz8"),
    ("v", "mzn8"),
    ("w", "MnCC8"),
    ("x", "BnM8"),
    ("y", "BVc8"),
    ("z", "BBc8"),
    ("A", "AAxY8"),
    ("B", "IojX8"),
    ("C", "XFhG8"),
    ("D", "XH8"),
    ("E", "xG8"),
    ("F", "GGJj8"),
    ("G", "Dx8"),
    ("H", "PR8"),
    ("I", "ER8"),
    ("J", "losp8"),
    ("K", "Hgk8"),
    ("L", "Jh8"),
    ("M", "Oxlao8"),
    ("N", "OOyx8"),
    ("O", "o00xY8"),
    ("P", "0xP18"),
    ("Q", "0xP8"),
    ("R", "sd208"),
    ("S", "JS08"),
    ("T", "KC8"),
    ("U", "qYkW8"),
    ("V", "qqQw8"),
    ("W", "Yuxq8"),
    ("X", "UUixYY8"),
    ("Y", "WWppxY8"),
    ("Z", "pxWW8"),
    ("0", "iiiY8"),
    ("1", "dxUYY8"),
    ("2", "SxTy8"),
    ("3", "G98"),
    ("4", "YuuI8"),
    ("5", "xITY8"),
    ("6", "DSYC8"),
    ("7", "CS28"),
    ("8", "PCSR8"),
    ("9", "OOS8"),
    (SPACE_KEY, "S8"),
    (",", "sadP8"),
    (".", "xpsd198"),
    ("[", "DTxDTp8"),
    ("]", "OPOP18"),
    ("(", "PlIcq8"),
    (")", "FPOSx8"),
    ("'", "4PxxX8"),
    ("\"", "DSTe8"),
    ("\\", "KaMP8"),
    ("?", "XPOS8"),
    (":", "DPs8"),
    (";", "TE38"),
    ("{", "xYaD8"),
    ("}", "xXDD918"),
];

pub fn token_for(key: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(symbol, _)| *symbol == key)
        .map(|(_, token)| *token)
}

pub fn key_for(token: &str) -> Option<&'static str> {
    TABLE
        .iter()
        .find(|(_, candidate)| *candidate == token)
        .map(|(symbol, _)| *symbol)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{DELIMITER, TABLE, key_for, token_for};

    #[test]
    fn test_tokens_unique() {
        let tokens: HashSet<_> = TABLE.iter().map(|(_, token)| *token).collect();
        let keys: HashSet<_> = TABLE.iter().map(|(key, _)| *key).collect();

        assert_eq!(tokens.len(), TABLE.len());
        assert_eq!(keys.len(), TABLE.len());
    }

    #[test]
    fn test_single_trailing_delimiter() {
        for (key, token) in TABLE {
            assert!(token.ends_with(DELIMITER), "{key} -> {token}");
            assert_eq!(token.matches(DELIMITER).count(), 1, "{key} -> {token}");
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(token_for("a"), Some("ssp8"));
        assert_eq!(token_for("8"), Some("PCSR8"));
        assert_eq!(key_for("xXDD918"), Some("}"));
        assert_eq!(token_for("é"), None);
        assert_eq!(key_for("nope8"), None);
    }
}
