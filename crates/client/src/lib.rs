//! Remote backend for the payee engine: a thin `reqwest` client for the
//! address-book REST API and for the external PayID resolution service.

use api_types::{
    ErrorResponse,
    payee::{self, Payee},
    payid::{ResolveRejected, ResolveRequest, ResolvedPayId},
};
use engine::{
    PayIdKind, PayIdResolver, PayeeRecord, PayeeStore, Resolution, ResolverError, StoreError,
};
use reqwest::{Response, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base_url: {0}")]
    BaseUrl(String),
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },
    #[error("Invalid API response format: {0}")]
    InvalidResponse(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl From<ClientError> for StoreError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Transport(err) if err.is_decode() => {
                StoreError::InvalidResponse(err.to_string())
            }
            ClientError::Transport(err) => StoreError::Transport(err.to_string()),
            ClientError::InvalidResponse(message) => StoreError::InvalidResponse(message),
            ClientError::NotFound => StoreError::Backend {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: "not found".to_string(),
            },
            ClientError::Conflict(message) => StoreError::Backend {
                status: StatusCode::CONFLICT.as_u16(),
                message,
            },
            ClientError::Validation(message) => StoreError::Backend {
                status: StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
                message,
            },
            ClientError::Server { status, message } => StoreError::Backend { status, message },
            ClientError::BaseUrl(message) => StoreError::Transport(message),
        }
    }
}

type ResultClient<T> = Result<T, ClientError>;

/// HTTP client for the payee API.
///
/// Implements [`PayeeStore`] and [`PayIdResolver`], so the same value can
/// back both halves of a [`engine::PayeeBook`] once cloned.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> ResultClient<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| ClientError::BaseUrl(err.to_string()))?;
        // Endpoints are joined as relative paths, so the base must end in `/`
        // to keep any path prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> ResultClient<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::BaseUrl(err.to_string()))
    }

    pub async fn payees(&self) -> ResultClient<Vec<Payee>> {
        let res = self
            .http
            .get(self.endpoint("api/payees")?)
            .send()
            .await?;
        let body = success(res).await?.json::<Value>().await?;
        parse_payee_list(body)
    }

    pub async fn search_payees(&self, query: &str) -> ResultClient<Vec<Payee>> {
        let res = self
            .http
            .get(self.endpoint("api/payees/search")?)
            .query(&payee::PayeeSearch {
                q: query.to_string(),
            })
            .send()
            .await?;
        let body = success(res).await?.json::<Value>().await?;
        parse_search_results(body)
    }

    pub async fn create_payee(&self, payload: &Payee) -> ResultClient<Payee> {
        let res = self
            .http
            .post(self.endpoint("api/payees")?)
            .json(payload)
            .send()
            .await?;
        Ok(success(res).await?.json::<Payee>().await?)
    }

    pub async fn resolve_pay_id(&self, payload: &ResolveRequest) -> ResultClient<Resolution> {
        let res = self
            .http
            .post(self.endpoint("api/payids/resolve")?)
            .json(payload)
            .send()
            .await?;

        let status = res.status();
        if status.is_success() {
            let body = res.json::<ResolvedPayId>().await?;
            return Ok(Resolution::Found(body.into()));
        }
        match status {
            StatusCode::BAD_REQUEST => {
                let expected_format = res
                    .json::<ResolveRejected>()
                    .await
                    .ok()
                    .and_then(|body| body.expected_format);
                Ok(Resolution::Rejected { expected_format })
            }
            StatusCode::NOT_FOUND => Ok(Resolution::NotFound),
            other => Ok(Resolution::Failed {
                status: other.as_u16(),
            }),
        }
    }
}

/// Turn a non-2xx response into the matching [`ClientError`].
async fn success(res: Response) -> ResultClient<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }

    let body = res
        .json::<ErrorResponse>()
        .await
        .map(|err| err.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());

    let err = match status {
        StatusCode::NOT_FOUND => ClientError::NotFound,
        StatusCode::CONFLICT => ClientError::Conflict(body),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ClientError::Validation(body)
        }
        other => ClientError::Server {
            status: other.as_u16(),
            message: body,
        },
    };
    Err(err)
}

const REQUIRED_FIELDS: [&[&str]; 4] = [
    &["id"],
    &["name", "payeeName"],
    &["payid", "payID"],
    &["payidType", "payIDType"],
];

/// Check the shape of a search answer before trusting it.
///
/// `results` must be a list and every item must carry a non-null id, name,
/// PayID and PayID type under one of the accepted field names.
fn parse_search_results(body: Value) -> ResultClient<Vec<Payee>> {
    let results = match body.get("results") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(ClientError::InvalidResponse(
                "results is not a list".to_string(),
            ));
        }
    };

    let invalid = results
        .iter()
        .filter(|item| {
            !REQUIRED_FIELDS.iter().all(|names| {
                names
                    .iter()
                    .any(|name| item.get(name).is_some_and(|value| !value.is_null()))
            })
        })
        .count();
    if invalid > 0 {
        return Err(ClientError::InvalidResponse(format!(
            "Invalid payee data found: {invalid} items"
        )));
    }

    results.iter().cloned().map(decode_payee).collect()
}

/// Decode the body of `GET /api/payees`. A missing list is empty.
fn parse_payee_list(body: Value) -> ResultClient<Vec<Payee>> {
    match body.get("payees") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().cloned().map(decode_payee).collect(),
        Some(_) => Err(ClientError::InvalidResponse(
            "payees is not a list".to_string(),
        )),
    }
}

/// Legacy spelling first, canonical second.
const FIELD_SPELLINGS: [(&str, &str); 3] = [
    ("payeeName", "name"),
    ("payID", "payid"),
    ("payIDType", "payidType"),
];

/// Fold the legacy field spellings into the canonical ones, preferring the
/// legacy value when an item carries both.
fn decode_payee(mut item: Value) -> ResultClient<Payee> {
    if let Some(fields) = item.as_object_mut() {
        for (legacy, canonical) in FIELD_SPELLINGS {
            if let Some(value) = fields.remove(legacy)
                && !value.is_null()
            {
                fields.insert(canonical.to_string(), value);
            }
        }
    }
    serde_json::from_value(item).map_err(|err| ClientError::InvalidResponse(err.to_string()))
}

impl PayeeStore for Client {
    async fn list_all(&self) -> Result<Vec<PayeeRecord>, StoreError> {
        let payees = self.payees().await?;
        Ok(payees.into_iter().map(PayeeRecord::from).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<PayeeRecord>, StoreError> {
        let payees = self.search_payees(query).await?;
        Ok(payees.into_iter().map(PayeeRecord::from).collect())
    }

    async fn add(&self, payee: PayeeRecord) -> Result<PayeeRecord, StoreError> {
        let created = self.create_payee(&Payee::from(payee)).await?;
        Ok(created.into())
    }
}

impl PayIdResolver for Client {
    async fn resolve(&self, pay_id: &str, kind: PayIdKind) -> Result<Resolution, ResolverError> {
        let payload = ResolveRequest {
            pay_id: pay_id.trim().to_string(),
            pay_id_type: kind.into(),
        };
        self.resolve_pay_id(&payload)
            .await
            .map_err(|err| ResolverError::Transport(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn search_results_accept_legacy_field_names() {
        let body = json!({
            "results": [
                {"id": "1", "payeeName": "Alice", "payID": "alice@x.com", "payIDType": "email"},
                {"id": "2", "name": "Bob", "payid": "0412345678", "payidType": "mobile", "nickname": "Bobby"}
            ]
        });
        let payees = parse_search_results(body).unwrap();
        assert_eq!(payees.len(), 2);
        assert_eq!(payees[0].name, "Alice");
        assert_eq!(payees[1].payid_type, payee::PayIdType::Mobile);
    }

    #[test]
    fn search_results_must_be_a_list_of_complete_items() {
        let err = parse_search_results(json!({"results": {"id": "1"}})).unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));

        let err = parse_search_results(json!({
            "results": [
                {"id": "1", "name": "Alice", "payid": "a@x.com", "payidType": "email"},
                {"id": "2", "name": null, "payid": "b@x.com", "payidType": "email"},
                {"name": "Carol", "payid": "c@x.com", "payidType": "email"}
            ]
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid API response format: Invalid payee data found: 2 items"
        );
    }

    #[test]
    fn missing_results_is_empty() {
        assert!(parse_search_results(json!({})).unwrap().is_empty());
    }

    #[test]
    fn items_with_both_spellings_prefer_the_legacy_one() {
        let body = json!({
            "results": [{
                "id": "1",
                "name": "Alice",
                "payeeName": "Alice Brown",
                "payid": "alice@x.com",
                "payID": "alice@x.com",
                "payidType": "email",
                "payIDType": "email"
            }]
        });
        let payees = parse_search_results(body).unwrap();
        assert_eq!(payees.len(), 1);
        assert_eq!(payees[0].name, "Alice Brown");

        let body = json!({
            "payees": [
                {"id": "1", "name": "Alice", "payeeName": "Alice Brown", "payid": "a@x.com", "payidType": "email"},
                {"id": "2", "name": "Bob", "payeeName": null, "payid": "b@x.com", "payidType": "email"}
            ]
        });
        let payees = parse_payee_list(body).unwrap();
        assert_eq!(payees[0].name, "Alice Brown");
        assert_eq!(payees[1].name, "Bob");
    }

    #[test]
    fn payee_list_must_be_a_list() {
        assert!(parse_payee_list(json!({})).unwrap().is_empty());
        assert!(matches!(
            parse_payee_list(json!({"payees": "nope"})),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let client = Client::new("http://host/payid").unwrap();
        assert_eq!(
            client.endpoint("api/payees").unwrap().as_str(),
            "http://host/payid/api/payees"
        );

        let client = Client::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            client.endpoint("api/payids/resolve").unwrap().as_str(),
            "http://127.0.0.1:3000/api/payids/resolve"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            Client::new("not a url"),
            Err(ClientError::BaseUrl(_))
        ));
    }
}
