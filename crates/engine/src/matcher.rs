//! Free-text matching of a query against a stored payee.
//!
//! Checks run in priority order and stop at the first hit:
//!
//! 1. exact (case-insensitive) display name, so that picking a suggestion
//!    finds exactly that payee;
//! 2. substring of the name;
//! 3. substring of the nickname;
//! 4. PayID, dispatched on the PayID kind.
//!
//! Names are compared with the same markup stripping as the query, so a name
//! containing `'` still matches its own text.

use crate::{PayIdKind, PayeeRecord, format::digits, search::strip_markup};

pub fn matches(record: &PayeeRecord, query: &str) -> bool {
    let query = strip_markup(query).to_lowercase();
    matches_display_name(record, &query)
        || matches_name(record, &query)
        || matches_nickname(record, &query)
        || matches_pay_id(record, &query)
}

fn matches_display_name(record: &PayeeRecord, query: &str) -> bool {
    comparable(&record.display_name()) == query
}

fn matches_name(record: &PayeeRecord, query: &str) -> bool {
    comparable(&record.name).contains(query)
}

fn matches_nickname(record: &PayeeRecord, query: &str) -> bool {
    record
        .nickname()
        .is_some_and(|nickname| comparable(nickname).contains(query))
}

fn comparable(text: &str) -> String {
    strip_markup(text).to_lowercase()
}

fn matches_pay_id(record: &PayeeRecord, query: &str) -> bool {
    match record.kind {
        PayIdKind::Mobile => {
            let query = digits(query);
            !query.is_empty() && digits(&record.pay_id).contains(&query)
        }
        PayIdKind::Email | PayIdKind::Abn => record.pay_id.to_lowercase().contains(query),
    }
}
