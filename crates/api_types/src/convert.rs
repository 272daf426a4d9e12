//! Conversions between wire types and engine types, shared by the server
//! and the client.

use engine::{PayIdKind, PayeeRecord, ResolvedPayee};

use crate::{payee, payid};

impl From<PayIdKind> for payee::PayIdType {
    fn from(kind: PayIdKind) -> Self {
        match kind {
            PayIdKind::Email => Self::Email,
            PayIdKind::Mobile => Self::Mobile,
            PayIdKind::Abn => Self::Abn,
        }
    }
}

impl From<payee::PayIdType> for PayIdKind {
    fn from(kind: payee::PayIdType) -> Self {
        match kind {
            payee::PayIdType::Email => Self::Email,
            payee::PayIdType::Mobile => Self::Mobile,
            payee::PayIdType::Abn => Self::Abn,
        }
    }
}

impl From<PayeeRecord> for payee::Payee {
    fn from(record: PayeeRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            payid: record.pay_id,
            payid_type: record.kind.into(),
            nickname: record.nickname,
        }
    }
}

impl From<payee::Payee> for PayeeRecord {
    fn from(payee: payee::Payee) -> Self {
        Self {
            id: payee.id,
            name: payee.name,
            nickname: payee.nickname,
            pay_id: payee.payid,
            kind: payee.payid_type.into(),
        }
    }
}

impl From<PayIdKind> for payid::PayIdType {
    fn from(kind: PayIdKind) -> Self {
        match kind {
            PayIdKind::Email => Self::Email,
            PayIdKind::Mobile => Self::Telephone,
            PayIdKind::Abn => Self::IndividualAustralian,
        }
    }
}

/// Unknown external types fall back to email.
impl From<payid::PayIdType> for PayIdKind {
    fn from(kind: payid::PayIdType) -> Self {
        match kind {
            payid::PayIdType::Telephone => Self::Mobile,
            payid::PayIdType::IndividualAustralian => Self::Abn,
            payid::PayIdType::Email | payid::PayIdType::Unknown => Self::Email,
        }
    }
}

impl From<engine::PayIdStatus> for payid::PayIdStatus {
    fn from(status: engine::PayIdStatus) -> Self {
        match status {
            engine::PayIdStatus::Active => Self::Active,
            engine::PayIdStatus::Disabled => Self::Disabled,
            engine::PayIdStatus::Unknown => Self::Unknown,
        }
    }
}

impl From<payid::PayIdStatus> for engine::PayIdStatus {
    fn from(status: payid::PayIdStatus) -> Self {
        match status {
            payid::PayIdStatus::Active => Self::Active,
            payid::PayIdStatus::Disabled => Self::Disabled,
            payid::PayIdStatus::Unknown => Self::Unknown,
        }
    }
}

impl From<ResolvedPayee> for payid::ResolvedPayId {
    fn from(entry: ResolvedPayee) -> Self {
        Self {
            pay_id: entry.pay_id,
            pay_id_type: entry.kind.into(),
            pay_id_owner_common_name: entry.owner_name,
            status: entry.status.into(),
            npp_reachable: entry.npp_reachable,
        }
    }
}

impl From<payid::ResolvedPayId> for ResolvedPayee {
    fn from(body: payid::ResolvedPayId) -> Self {
        Self {
            pay_id: body.pay_id,
            kind: body.pay_id_type.into(),
            owner_name: body.pay_id_owner_common_name,
            status: body.status.into(),
            npp_reachable: body.npp_reachable,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn records_survive_the_wire() {
        let record = PayeeRecord {
            id: "1".to_string(),
            name: "Bob Charlie".to_string(),
            nickname: Some("Bobby".to_string()),
            pay_id: "0412345678".to_string(),
            kind: PayIdKind::Mobile,
        };
        let wire = payee::Payee::from(record.clone());
        assert_eq!(wire.payid_type, payee::PayIdType::Mobile);
        assert_eq!(PayeeRecord::from(wire), record);
    }

    #[test]
    fn external_kinds_map_both_ways() {
        for kind in [PayIdKind::Email, PayIdKind::Mobile, PayIdKind::Abn] {
            assert_eq!(PayIdKind::from(payid::PayIdType::from(kind)), kind);
        }
        assert_eq!(PayIdKind::from(payid::PayIdType::Unknown), PayIdKind::Email);
        assert_eq!(
            serde_json::to_value(payid::PayIdType::from(PayIdKind::Abn)).unwrap(),
            json!("INDIVIDUAL_AUSTRALIAN")
        );
    }

    #[test]
    fn resolved_entries_keep_owner_and_status() {
        let entry = ResolvedPayee {
            pay_id: "51824753556".to_string(),
            kind: PayIdKind::Abn,
            owner_name: "Acme Pty Ltd".to_string(),
            status: engine::PayIdStatus::Disabled,
            npp_reachable: true,
        };
        let wire = payid::ResolvedPayId::from(entry.clone());
        assert_eq!(wire.pay_id_type, payid::PayIdType::IndividualAustralian);
        assert_eq!(wire.status, payid::PayIdStatus::Disabled);
        assert_eq!(ResolvedPayee::from(wire), entry);
    }
}
