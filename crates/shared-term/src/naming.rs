// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Name freshening
//!
//! Fresh names are produced by bumping a trailing numeric suffix textually:
//! `x` -> `x1` -> `x2` ... `x9` -> `x10`. A name is only bumped when it collides.

/// Next textual variant of a name
pub fn next_variant(name: &str) -> String {
    let stem_len = name.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let (stem, digits) = name.split_at(stem_len);
    if digits.is_empty() {
        return format!("{}1", stem);
    }

    // Increment the digit string with carry
    let mut bumped: Vec<u8> = digits.bytes().collect();
    let mut carry = true;
    for digit in bumped.iter_mut().rev() {
        if !carry {
            break;
        }
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
        }
    }
    if carry {
        bumped.insert(0, b'1');
    }
    format!("{}{}", stem, String::from_utf8_lossy(&bumped))
}

/// First variant of `base` (starting with `base` itself) not rejected by `is_taken`
pub fn fresh_variant<F>(base: &str, is_taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut name = base.to_string();
    while is_taken(&name) {
        name = next_variant(&name);
    }
    name
}

/// Turn an arbitrary source name into a valid target identifier.
///
/// Characters other than ASCII alphanumerics, `_` and `'` become `_`; names that
/// are empty, a lone `_`, or start with a digit or `'` get a letter prefix.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '\'' { c } else { '_' })
        .collect();
    if cleaned.is_empty() || cleaned == "_" {
        return "x".to_string();
    }
    match cleaned.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '\'' => format!("x{}", cleaned),
        _ => cleaned,
    }
}
