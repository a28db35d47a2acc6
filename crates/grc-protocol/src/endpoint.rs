/// HTTP endpoint paths served by the local server.
pub mod endpoints {
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
    pub const CALLDATA_PROXY: &str = "/calldata-proxy";
    pub const VERIFY_TRANSACTION: &str = "/verify-transaction";
    pub const GENERIC_PROXY: &str = "/generic-proxy";
    pub const OPERATIONS: &str = "/v1/operations";
    pub const OPERATION: &str = "/v1/operations/:id";
    pub const ENTITIES: &str = "/v1/entities";
    pub const PUBLISHING: &str = "/v1/publishing";
    pub const PUBLISHING_PUBLISH: &str = "/v1/publishing/publish";
    pub const PUBLISHING_CALLDATA: &str = "/v1/publishing/calldata";
    pub const PUBLISHING_SEND: &str = "/v1/publishing/send";
    pub const PUBLISHING_ONE_CLICK: &str = "/v1/publishing/one-click";
    pub const PUBLISHING_RESET: &str = "/v1/publishing/reset";
}

/// Paths on the remote GRC-20 API, relative to the per-network base URL.
pub mod remote {
    use crate::error::{ProtocolError, ProtocolResult};

    /// Content-addressed publish of an edit batch.
    pub const UPLOAD_EDIT: &str = "/ipfs/upload-edit";

    /// Call data for publishing `cid` into `space_id`.
    ///
    /// The id becomes a path segment, so anything other than ASCII
    /// alphanumerics, `-` and `_` is refused.
    pub fn calldata(space_id: &str) -> ProtocolResult<String> {
        if !is_space_id(space_id) {
            return Err(ProtocolError::InvalidSpaceId(space_id.to_string()));
        }
        Ok(format!("/space/{space_id}/edit/calldata"))
    }

    pub fn is_space_id(s: &str) -> bool {
        !s.is_empty()
            && s
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ProtocolError;

    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn remote_calldata_path() {
        assert_eq!(remote::calldata("abc").unwrap(), "/space/abc/edit/calldata");
        assert_eq!(
            remote::calldata("2f4c8e1a-0b9d-4c3e-8f7a-1d2e3f4a5b6c").unwrap(),
            "/space/2f4c8e1a-0b9d-4c3e-8f7a-1d2e3f4a5b6c/edit/calldata"
        );
    }

    #[test]
    fn space_id_cannot_escape_its_segment() {
        for id in [
            "",
            "../ipfs/upload-edit?",
            "a/b",
            "space?x=1",
            "space#frag",
            "sp ace",
            "%2e%2e",
            "..",
        ] {
            assert!(
                matches!(remote::calldata(id), Err(ProtocolError::InvalidSpaceId(_))),
                "{id:?} accepted"
            );
        }
    }

    #[test]
    fn proxy_paths() {
        assert_eq!(endpoints::CALLDATA_PROXY, "/calldata-proxy");
        assert_eq!(endpoints::VERIFY_TRANSACTION, "/verify-transaction");
        assert_eq!(endpoints::GENERIC_PROXY, "/generic-proxy");
    }
}
