// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Card field validation and normalisation.
//
// Validation is a hard gate in front of layout: name and post are checked
// first, then the phone number. Messages are the exact text shown on the
// form.

use crate::error::{CardwerkError, Result};
use crate::types::{CardFields, NormalizedFields};

pub const NAME_EMPTY: &str = "Name cannot be empty.";
pub const NAME_FORMAT: &str = "Name must be in the format '{First-Name} {Middle-Name*} {Last-Name}'.\n * [Middle-Name] is optional";
pub const POST_EMPTY: &str = "Post cannot be empty.";
pub const PHONE_FORMAT: &str = "Phone number must be exactly 10 digits.";

/// Number of digits in a phone number.
pub const PHONE_DIGITS: usize = 10;

/// Strip spaces from `phone` and split the 10 digits into two groups of 5.
pub fn format_phone(phone: &str) -> Result<String> {
    let digits: String = phone.trim().chars().filter(|c| *c != ' ').collect();

    if digits.len() != PHONE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CardwerkError::InvalidPhone(PHONE_FORMAT.into()));
    }

    Ok(format!("{} {}", &digits[..5], &digits[5..]))
}

/// Validate a name of two or three words and title-case it.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CardwerkError::InvalidName(NAME_EMPTY.into()));
    }

    let words = trimmed.split_whitespace().count();
    if !(2..=3).contains(&words) {
        return Err(CardwerkError::InvalidName(NAME_FORMAT.into()));
    }

    Ok(title_case(trimmed))
}

/// Validate a non-empty post and title-case it.
pub fn validate_post(post: &str) -> Result<String> {
    let trimmed = post.trim();
    if trimmed.is_empty() {
        return Err(CardwerkError::InvalidPost(POST_EMPTY.into()));
    }
    Ok(title_case(trimmed))
}

/// Run all field checks in form order and return the normalised fields.
pub fn normalize(fields: &CardFields) -> Result<NormalizedFields> {
    let name = validate_name(&fields.name)?;
    let post = validate_post(&fields.post)?;
    let phone = format_phone(&fields.phone)?;
    Ok(NormalizedFields { name, phone, post })
}

/// Upper-case the first letter of every alphabetic run and lower-case the
/// rest, so `"o'neil mc-DONALD"` becomes `"O'Neil Mc-Donald"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_cased {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(ch);
            prev_cased = false;
        }
    }

    out
}
