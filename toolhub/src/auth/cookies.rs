// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Relays `Set-Cookie` directives received from the auth provider to the client.

use actix_web::cookie::time::{Duration, OffsetDateTime};
use actix_web::cookie::{Cookie, SameSite};
use chrono::NaiveDateTime;

const EXPIRES_FORMATS: [&str; 3] = [
    "%d %b %Y %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%y %H:%M:%S",
];

/// Attribute values applied before the directive's own attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieDefaults {
    pub secure: bool,
}

/// Converts every directive found in `set_cookie` into an outbound cookie.
pub fn propagate_cookies(set_cookie: &[String], defaults: CookieDefaults) -> Vec<Cookie<'static>> {
    let directives = collect_directives(set_cookie);
    if directives.is_empty() {
        log::warn!("Auth provider response carried no Set-Cookie directives");
        return Vec::new();
    }

    directives
        .iter()
        .filter_map(|directive| {
            let cookie = parse_directive(directive, defaults);
            if cookie.is_none() {
                log::debug!("Skipping Set-Cookie directive without name or value");
            }
            cookie
        })
        .collect()
}

pub fn collect_directives(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| split_set_cookie_header(value))
        .collect()
}

/// Splits a folded header on the commas that start a new `name=value` pair.
/// Commas inside attribute values such as `Expires` are kept.
pub fn split_set_cookie_header(header: &str) -> Vec<String> {
    let mut directives = Vec::new();
    let mut start = 0;
    for (index, ch) in header.char_indices() {
        if ch == ',' && starts_directive(&header[index + 1..]) {
            push_trimmed(&mut directives, &header[start..index]);
            start = index + 1;
        }
    }
    push_trimmed(&mut directives, &header[start..]);
    directives
}

fn starts_directive(rest: &str) -> bool {
    let rest = rest.trim_start();
    match rest.find('=') {
        Some(eq) => {
            let name = &rest[..eq];
            !name.is_empty() && name.chars().all(is_token_char)
        }
        None => false,
    }
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic()
        && !matches!(
            c,
            '(' | ')'
                | '<'
                | '>'
                | '@'
                | ','
                | ';'
                | ':'
                | '\\'
                | '"'
                | '/'
                | '['
                | ']'
                | '?'
                | '='
                | '{'
                | '}'
        )
}

fn push_trimmed(directives: &mut Vec<String>, part: &str) {
    let part = part.trim();
    if !part.is_empty() {
        directives.push(part.to_string());
    }
}

pub fn parse_directive(directive: &str, defaults: CookieDefaults) -> Option<Cookie<'static>> {
    let mut parts = directive.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return None;
    }

    let mut cookie = Cookie::new(name.to_string(), decode_value(value));
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(defaults.secure);

    for attribute in parts.map(str::trim).filter(|part| !part.is_empty()) {
        let (key, val) = match attribute.split_once('=') {
            Some((key, val)) => (key.trim(), val.trim()),
            None => (attribute, ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "path" if !val.is_empty() => cookie.set_path(val.to_string()),
            "domain" if !val.is_empty() => cookie.set_domain(val.to_string()),
            "max-age" => match val.parse::<i64>() {
                Ok(seconds) => cookie.set_max_age(Duration::seconds(seconds)),
                Err(_) => log::debug!("Ignoring invalid Max-Age '{}' on {}", val, name),
            },
            "expires" => match parse_expires(val) {
                Some(at) => cookie.set_expires(at),
                None => log::debug!("Ignoring invalid Expires '{}' on {}", val, name),
            },
            "httponly" => cookie.set_http_only(true),
            "secure" => cookie.set_secure(true),
            "samesite" => {
                if let Some(same_site) = parse_same_site(val) {
                    cookie.set_same_site(same_site);
                }
            }
            _ => {}
        }
    }

    Some(cookie)
}

fn decode_value(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

/// Accepts RFC 1123 (`Wed, 09 Jun 2025 10:18:14 GMT`) and RFC 850 style dates.
/// The weekday is not checked.
fn parse_expires(value: &str) -> Option<OffsetDateTime> {
    let without_weekday = value
        .split_once(',')
        .map(|(_, rest)| rest)
        .unwrap_or(value)
        .trim();
    let without_zone = without_weekday
        .strip_suffix("GMT")
        .or_else(|| without_weekday.strip_suffix("UTC"))
        .unwrap_or(without_weekday)
        .trim();

    let parsed = EXPIRES_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(without_zone, format).ok())?;
    OffsetDateTime::from_unix_timestamp(parsed.and_utc().timestamp()).ok()
}
