use std::fmt;

use grc_types::{Network, Operation};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const PROTOCOL_VERSION: u32 = 1;

/// Body of `POST /calldata-proxy`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallDataProxyRequest {
    pub space_id: String,
    pub cid: String,
    /// Falls back to the server's configured network.
    #[serde(default)]
    pub network: Option<Network>,
}

/// Body sent to the remote `/space/{id}/edit/calldata` endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDataApiRequest {
    pub cid: String,
    pub network: Network,
}

/// Body sent to the remote content-addressed publish endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PublishEditRequest {
    pub name: String,
    pub author: String,
    pub network: Network,
    pub ops: Vec<Operation>,
}

/// Query of `GET /verify-transaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyQuery {
    pub tx_hash: String,
    #[serde(default)]
    pub space_id: Option<String>,
}

/// On-chain status of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Mined and succeeded.
    Confirmed,
    /// Mined and reverted.
    Failed,
    /// Not mined yet.
    Pending,
    /// No receipt source available.
    Unknown,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Whether the edit carried by a transaction shows up in the indexer.
/// Serialized as `true`, `false`, or `"unknown"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indexed {
    Yes,
    No,
    Unknown,
}

impl Serialize for Indexed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Yes => serializer.serialize_bool(true),
            Self::No => serializer.serialize_bool(false),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for Indexed {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Str(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(true) => Self::Yes,
            Repr::Bool(false) => Self::No,
            Repr::Str(s) if s.eq_ignore_ascii_case("unknown") => Self::Unknown,
            Repr::Str(s) => {
                return Err(de::Error::invalid_value(
                    Unexpected::Str(&s),
                    &"true, false or \"unknown\"",
                ))
            }
        })
    }
}

/// Response of `GET /verify-transaction`.
///
/// `success` is true only when a receipt shows the transaction succeeded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub status: TxStatus,
    pub indexed: Indexed,
    pub tx_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<String>,
    pub message: String,
}

/// JSON error body returned by every endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    /// Upstream HTTP status, when the failure came from a remote call.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
    /// Raw upstream body, for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            upstream_status: None,
            upstream_body: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn proxy_request_uses_camel_case() {
        let req: CallDataProxyRequest =
            serde_json::from_value(json!({"spaceId": "s1", "cid": "ipfs://x", "network": "TESTNET"}))
                .unwrap();
        assert_eq!(req.space_id, "s1");
        assert_eq!(req.network, Some(Network::Testnet));

        let req: CallDataProxyRequest =
            serde_json::from_value(json!({"spaceId": "s1", "cid": "ipfs://x"})).unwrap();
        assert_eq!(req.network, None);
    }

    #[test]
    fn indexed_wire_shape() {
        assert_eq!(serde_json::to_value(Indexed::Yes).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(Indexed::No).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(Indexed::Unknown).unwrap(), json!("unknown"));
        let parsed: Indexed = serde_json::from_value(json!("unknown")).unwrap();
        assert_eq!(parsed, Indexed::Unknown);
        let parsed: Indexed = serde_json::from_value(json!(true)).unwrap();
        assert_eq!(parsed, Indexed::Yes);
        let parsed: Indexed = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(parsed, Indexed::No);
    }

    #[test]
    fn indexed_rejects_other_strings() {
        let parsed: Indexed = serde_json::from_value(json!("UNKNOWN")).unwrap();
        assert_eq!(parsed, Indexed::Unknown);
        assert!(serde_json::from_value::<Indexed>(json!("yes")).is_err());
        assert!(serde_json::from_value::<Indexed>(json!(1)).is_err());
    }

    #[test]
    fn verify_response_shape() {
        let resp = VerifyResponse {
            success: false,
            status: TxStatus::Pending,
            indexed: Indexed::Unknown,
            tx_hash: "0x1".into(),
            space_id: None,
            message: "pending".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["txHash"], "0x1");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["indexed"], "unknown");
        assert!(json.get("spaceId").is_none());
    }

    #[test]
    fn error_body_skips_empty_upstream() {
        let json = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(json, json!({"error": "boom"}));
    }
}
