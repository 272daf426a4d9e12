use serde::{Deserialize, Serialize};

mod convert;

/// Body returned by every non-2xx response that carries a message.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub mod payee {
    use super::*;

    /// PayID kind as stored in the address book.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum PayIdType {
        Email,
        Mobile,
        Abn,
    }

    /// A saved payee.
    ///
    /// Older backends send `payeeName`, `payID` and `payIDType`; they are
    /// accepted as aliases of the canonical field names.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Payee {
        pub id: String,
        #[serde(alias = "payeeName")]
        pub name: String,
        #[serde(rename = "payid", alias = "payID")]
        pub payid: String,
        #[serde(rename = "payidType", alias = "payIDType")]
        pub payid_type: PayIdType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub nickname: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PayeeListResponse {
        #[serde(default)]
        pub payees: Vec<Payee>,
    }

    /// Query string of `GET /api/payees/search`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PayeeSearch {
        pub q: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PayeeSearchResponse {
        pub results: Vec<Payee>,
    }
}

pub mod payid {
    use super::*;

    /// PayID type vocabulary of the external resolution service.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum PayIdType {
        Email,
        Telephone,
        IndividualAustralian,
        #[serde(other)]
        Unknown,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum PayIdStatus {
        Active,
        Disabled,
        #[serde(other)]
        Unknown,
    }

    /// Body of `POST /api/payids/resolve`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResolveRequest {
        pub pay_id: String,
        pub pay_id_type: PayIdType,
    }

    /// Successful resolution of a PayID.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResolvedPayId {
        pub pay_id: String,
        pub pay_id_type: PayIdType,
        pub pay_id_owner_common_name: String,
        pub status: PayIdStatus,
        pub npp_reachable: bool,
    }

    /// Body of a `400` answer: the PayID is malformed for its type.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResolveRejected {
        pub error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub expected_format: Option<String>,
    }

    pub const INVALID_PAYID_FORMAT: &str = "INVALID_PAYID_FORMAT";
    pub const PAYID_NOT_FOUND: &str = "PAYID_NOT_FOUND";
}
