// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, Request};
use log::{debug, info};
use serde_json::Value;

use cdnpurge_core::retry::RetryPolicy;
use cdnpurge_core::{Error, Result, Signer};

use crate::constants::*;
use crate::{Config, Credential, RefreshRequest};

/// Envelope of every DogeCloud API response.
///
/// The envelope is read leniently: a `code` that is not an integer, or a body
/// that is not an object at all, is kept as a rejection instead of failing
/// to decode.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    /// `200` on success, an error code otherwise.
    pub code: Option<i64>,
    /// Human readable error, read from `msg` and then `message`.
    pub msg: Option<String>,
    /// Payload, opaque to us.
    pub data: Value,
}

impl ApiResult {
    /// Decode a response body. Only invalid JSON is an error.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            Error::unexpected(format!("failed to parse response: {e}")).with_source(e)
        })?;
        Ok(Self::from(value))
    }

    /// Convert into the payload, or a [`Rejected`](cdnpurge_core::ErrorKind::Rejected)
    /// error carrying `msg`.
    pub fn into_data(self) -> Result<Value> {
        if self.code == Some(CODE_OK) {
            return Ok(self.data);
        }

        let msg = self.msg.unwrap_or_else(|| "API Error".to_string());
        Err(Error::rejected(msg))
    }
}

impl From<Value> for ApiResult {
    fn from(mut value: Value) -> Self {
        let code = value.get("code").and_then(Value::as_i64);
        let msg = ["msg", "message"]
            .iter()
            .filter_map(|k| value.get(*k).and_then(Value::as_str))
            .find(|m| !m.is_empty())
            .map(str::to_string);
        let data = value.get_mut("data").map(Value::take).unwrap_or_default();

        Self { code, msg, data }
    }
}

/// RefreshClient submits refresh tasks to the DogeCloud CDN.
#[derive(Debug, Clone)]
pub struct RefreshClient {
    signer: Signer<Credential>,
    endpoint: String,
    policy: RetryPolicy,
}

impl RefreshClient {
    /// Create a client that talks to the default endpoint with the default retry policy.
    pub fn new(signer: Signer<Credential>) -> Self {
        Self {
            signer,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            policy: RetryPolicy::default(),
        }
    }

    /// Create a client from config. Credentials are not read from `config`,
    /// they are the signer's business.
    pub fn from_config(signer: Signer<Credential>, config: &Config) -> Self {
        Self::new(signer)
            .with_endpoint(config.endpoint())
            .with_retry_policy(config.retry_policy())
    }

    /// Set the endpoint, e.g. `https://api.dogecloud.com`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Submit a refresh task and return the `data` of the response.
    ///
    /// Transport failures, timeouts and 5xx responses are retried per the
    /// retry policy. Any other failure is returned at once.
    pub async fn refresh(&self, req: &RefreshRequest) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, REFRESH_PATH);
        let body = Bytes::from(req.to_form()?);

        info!(
            "submitting {} refresh for {} item(s) to {}",
            req.rtype(),
            req.urls().len(),
            url
        );
        self.policy
            .retry(|attempt| self.send(&url, body.clone(), attempt))
            .await
    }

    async fn send(&self, url: &str, body: Bytes, attempt: u32) -> Result<Value> {
        let (mut parts, body) = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)?
            .into_parts();
        self.signer.sign(&mut parts, &body).await?;

        debug!("sending refresh request, attempt {}", attempt + 1);
        let resp = self
            .signer
            .context()
            .http_send(Request::from_parts(parts, body))
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::from_status(status));
        }

        ApiResult::from_slice(resp.body())?.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdnpurge_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    fn parse(body: &str) -> ApiResult {
        ApiResult::from_slice(body.as_bytes()).expect("body must be valid json")
    }

    #[test]
    fn test_api_result_success() {
        let result = parse(r#"{"code":200,"msg":"","data":{"task_id":1}}"#);
        assert_eq!(result.into_data().unwrap(), json!({"task_id": 1}));
    }

    #[test]
    fn test_api_result_missing_data() {
        assert_eq!(parse(r#"{"code":200}"#).into_data().unwrap(), Value::Null);
    }

    #[test_case(r#"{"code":500,"msg":"bad token"}"#, "bad token"; "msg")]
    #[test_case(r#"{"code":401,"message":"signature mismatch"}"#, "signature mismatch"; "message")]
    #[test_case(r#"{"code":401,"msg":"bad token","message":"other"}"#, "bad token"; "msg before message")]
    #[test_case(r#"{"code":401,"msg":"","message":"other"}"#, "other"; "empty msg")]
    #[test_case(r#"{"code":403}"#, "API Error"; "no message")]
    #[test_case(r#"{"msg":""}"#, "API Error"; "no code")]
    #[test_case(r#"{"code":"200","data":1}"#, "API Error"; "string code")]
    #[test_case(r#"{"code":401,"msg":42}"#, "API Error"; "non string msg")]
    #[test_case(r#"[200]"#, "API Error"; "array body")]
    #[test_case(r#""ok""#, "API Error"; "string body")]
    #[test_case("null", "API Error"; "null body")]
    fn test_api_result_rejected(body: &str, message: &str) {
        let err = parse(body).into_data().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_api_result_invalid_json() {
        let err = ApiResult::from_slice(b"<html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
    }
}
