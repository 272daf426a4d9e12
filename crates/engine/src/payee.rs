use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Kind of alias a PayID is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayIdKind {
    Email,
    Mobile,
    Abn,
}

impl PayIdKind {
    /// Canonical lowercase name, as used in stored records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PayIdKind::Email => "email",
            PayIdKind::Mobile => "mobile",
            PayIdKind::Abn => "abn",
        }
    }
}

impl core::fmt::Display for PayIdKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PayIdKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Ok(PayIdKind::Email),
            "mobile" => Ok(PayIdKind::Mobile),
            "abn" => Ok(PayIdKind::Abn),
            other => Err(EngineError::InvalidPayee(format!(
                "unsupported PayID kind: {other}"
            ))),
        }
    }
}

impl core::str::FromStr for PayIdKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A saved address-book entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayeeRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(rename = "payid")]
    pub pay_id: String,
    #[serde(rename = "payidType")]
    pub kind: PayIdKind,
}

impl PayeeRecord {
    /// Nickname, ignoring an empty one.
    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref().filter(|nick| !nick.is_empty())
    }

    /// `name`, or `name (nickname)` when a nickname is set.
    pub fn display_name(&self) -> String {
        match self.nickname() {
            Some(nickname) => format!("{} ({nickname})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Payee data before an id has been assigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPayee {
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(rename = "payid")]
    pub pay_id: String,
    #[serde(rename = "payidType")]
    pub kind: PayIdKind,
}

impl NewPayee {
    pub fn new(name: &str, pay_id: &str, kind: PayIdKind) -> Self {
        Self {
            name: name.to_string(),
            nickname: None,
            pay_id: pay_id.to_string(),
            kind,
        }
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub(crate) fn into_record(self, id: String) -> PayeeRecord {
        PayeeRecord {
            id,
            name: self.name,
            nickname: self.nickname,
            pay_id: self.pay_id,
            kind: self.kind,
        }
    }
}

/// Read-only projection of a [`PayeeRecord`] shown to the user.
///
/// Built on demand from the raw record and never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: String,
    pub display_name: String,
    pub formatted_pay_id: String,
    pub raw_pay_id: String,
    pub kind: PayIdKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Mobile".parse::<PayIdKind>().unwrap(), PayIdKind::Mobile);
        assert_eq!(" ABN ".parse::<PayIdKind>().unwrap(), PayIdKind::Abn);
        assert!("iban".parse::<PayIdKind>().is_err());
    }

    #[test]
    fn empty_nickname_is_ignored() {
        let mut record = NewPayee::new("Alice Brown", "alice@x.com", PayIdKind::Email)
            .with_nickname("")
            .into_record("1".to_string());
        assert_eq!(record.display_name(), "Alice Brown");

        record.nickname = Some("Ali".to_string());
        assert_eq!(record.display_name(), "Alice Brown (Ali)");
    }

    #[test]
    fn record_reads_wire_field_names() {
        let record: PayeeRecord = serde_json::from_str(
            r#"{"id":"7","name":"Bob","payid":"0412345678","payidType":"mobile"}"#,
        )
        .unwrap();
        assert_eq!(record.kind, PayIdKind::Mobile);
        assert_eq!(record.nickname, None);
    }
}
