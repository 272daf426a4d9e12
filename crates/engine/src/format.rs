//! Conversion of stored payees into their display form.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{DisplayRecord, PayIdKind, PayeeRecord};

const MOBILE_NUMBER_LENGTH: usize = 10;
const MOBILE_NUMBER_PREFIX: char = '0';

/// Keep only the ASCII digits of `value`.
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Render an Australian mobile number as `0XXX XXX XXX`.
///
/// Anything that is not exactly ten digits starting with `0` (once
/// punctuation is stripped) is returned unchanged.
pub fn format_mobile(value: &str) -> String {
    let digits = digits(value);
    if digits.len() != MOBILE_NUMBER_LENGTH || !digits.starts_with(MOBILE_NUMBER_PREFIX) {
        return value.to_string();
    }
    format!("{} {} {}", &digits[..4], &digits[4..7], &digits[7..])
}

/// PayID as shown to the user.
pub fn format_pay_id(pay_id: &str, kind: PayIdKind) -> String {
    match kind {
        PayIdKind::Mobile => format_mobile(pay_id),
        PayIdKind::Email | PayIdKind::Abn => pay_id.to_string(),
    }
}

pub fn format_payee(record: &PayeeRecord) -> DisplayRecord {
    DisplayRecord {
        id: record.id.clone(),
        display_name: record.display_name(),
        formatted_pay_id: format_pay_id(&record.pay_id, record.kind),
        raw_pay_id: record.pay_id.clone(),
        kind: record.kind,
    }
}

/// Sort by name and map every record to its display form.
pub fn format_payees(mut records: Vec<PayeeRecord>) -> Vec<DisplayRecord> {
    sort_by_name(&mut records);
    records.iter().map(format_payee).collect()
}

/// Stable sort by name, ignoring case and accents first.
pub fn sort_by_name(records: &mut [PayeeRecord]) {
    records.sort_by_cached_key(|record| (collation_key(&record.name), tie_key(&record.name)));
}

/// Compare two names the way [`sort_by_name`] orders them.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| tie_key(a).cmp(&tie_key(b)))
}

fn collation_key(name: &str) -> String {
    name.trim()
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tie breaker for names with the same collation key: lower case sorts
/// before upper case, unaccented before accented.
fn tie_key(name: &str) -> String {
    name.chars()
        .flat_map(|ch| {
            if ch.is_lowercase() {
                ch.to_uppercase().collect::<Vec<_>>()
            } else {
                ch.to_lowercase().collect::<Vec<_>>()
            }
        })
        .collect()
}
