// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use validator::ValidateEmail;

pub const MAX_EMAIL_CHARS: usize = 128;
pub const MAX_NAME_CHARS: usize = 256;
pub const MAX_TITLE_CHARS: usize = 256;
pub const MAX_BODY_CHARS: usize = 100_000;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;
const MAX_HANDLE_CHARS: usize = 64;

/// Validate user email input
pub fn validate_email_field(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err("Email is required".to_string());
    }
    if trimmed.chars().count() > MAX_EMAIL_CHARS {
        return Err(format!(
            "Email must be at most {} characters",
            MAX_EMAIL_CHARS
        ));
    }
    if !trimmed.validate_email() {
        return Err("Email format is invalid".to_string());
    }
    Ok(())
}

/// Length bounds only; strength rules belong to the auth provider.
pub fn validate_password_field(password: &str) -> Result<(), String> {
    let count = password.chars().count();
    if count == 0 {
        return Err("Password is required".to_string());
    }
    if !(MIN_PASSWORD_CHARS..=MAX_PASSWORD_CHARS).contains(&count) {
        return Err(format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_CHARS, MAX_PASSWORD_CHARS
        ));
    }
    Ok(())
}

/// Returns the trimmed value of a required free-text field.
pub fn require_text(label: &str, value: Option<&str>, max_chars: usize) -> Result<String, String> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(format!("{} is required", label));
    }
    if trimmed.chars().count() > max_chars {
        return Err(format!(
            "{} must be at most {} characters",
            label, max_chars
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate and sanitize user names for display safety
/// Allows letters, numbers, spaces, apostrophes, hyphens, and periods
/// Replaces invalid characters with spaces and collapses multiple spaces
pub fn validate_and_sanitize_user_name(name: &str) -> Result<String, String> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    let sanitized = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '\'' || c == '-' || c == '.' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>();

    let sanitized = sanitized
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    let sanitized_len = sanitized.chars().count();
    if !(2..=MAX_NAME_CHARS).contains(&sanitized_len) {
        return Err(format!(
            "Name must be between 2 and {} characters",
            MAX_NAME_CHARS
        ));
    }

    Ok(sanitized)
}

/// Normalizes a social handle (`@name` or `name`). Blank input yields `Ok(None)`.
pub fn normalize_handle(handle: Option<&str>) -> Result<Option<String>, String> {
    let trimmed = handle.map(str::trim).unwrap_or_default();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_HANDLE_CHARS {
        return Err(format!(
            "Handles must be at most {} characters",
            MAX_HANDLE_CHARS
        ));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("Handles can only contain letters, numbers, dots, dashes and underscores"
            .to_string());
    }
    Ok(Some(trimmed.to_string()))
}
