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

use std::time::Duration;

use anyhow::Result;
use cdnpurge_core::hash::hex_hmac_sha1;
use cdnpurge_core::retry::RetryPolicy;
use cdnpurge_core::ErrorKind;
use cdnpurge_dogecloud_cdn::{RefreshRequest, RefreshType};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::time::Instant;

use crate::mock::{client, MockHttpSend, Reply};

const OK_BODY: &str = r#"{"code":200,"msg":"","data":{"x":1}}"#;

fn request() -> RefreshRequest {
    RefreshRequest::new(RefreshType::Path, ["/static/", "/index.html"]).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_refresh_success_first_attempt() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::new([Reply::Status(200, OK_BODY)]);
    let data = client(&mock).refresh(&request()).await?;

    assert_eq!(data, json!({"x": 1}));
    assert_eq!(mock.attempts(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_sends_signed_form() -> Result<()> {
    let mock = MockHttpSend::new([Reply::Status(200, OK_BODY)]);
    client(&mock).refresh(&request()).await?;

    let seen = mock.seen().remove(0);
    let body = "rtype=path&urls=%5B%22%2Fstatic%2F%22%2C%22%2Findex.html%22%5D";
    assert_eq!(seen.method, http::Method::POST);
    assert_eq!(seen.uri, "https://api.dogecloud.com/cdn/refresh/add.json");
    assert_eq!(seen.body, body);
    assert_eq!(
        seen.headers[CONTENT_TYPE],
        "application/x-www-form-urlencoded"
    );

    let expected = {
        use hmac::{Hmac, Mac};
        let mut mac = Hmac::<sha1::Sha1>::new_from_slice(b"test_secret_key")
            .expect("hmac accepts any key length");
        mac.update(format!("/cdn/refresh/add.json\n{body}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    };
    assert_eq!(
        seen.headers[AUTHORIZATION].to_str()?,
        format!("TOKEN test_access_key:{expected}")
    );
    assert_eq!(
        expected,
        hex_hmac_sha1(
            b"test_secret_key",
            format!("/cdn/refresh/add.json\n{body}").as_bytes()
        )
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_retries_server_errors_with_linear_backoff() -> Result<()> {
    let mock = MockHttpSend::new([
        Reply::Status(500, ""),
        Reply::Status(500, ""),
        Reply::Status(200, OK_BODY),
    ]);

    let start = Instant::now();
    let data = client(&mock).refresh(&request()).await?;
    let elapsed = start.elapsed();

    assert_eq!(data, json!({"x": 1}));
    assert_eq!(mock.attempts(), 3);
    assert!(elapsed >= Duration::from_millis(1500), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1600), "elapsed: {elapsed:?}");

    // Every attempt carries the same signature.
    let seen = mock.seen();
    assert_eq!(seen[0].headers[AUTHORIZATION], seen[2].headers[AUTHORIZATION]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_server_errors_exhausted() {
    let mock = MockHttpSend::new([Reply::Status(502, ""), Reply::Status(503, "")]);

    let err = client(&mock).refresh(&request()).await.unwrap_err();

    assert_eq!(mock.attempts(), 3);
    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.to_string(), "503 Service Unavailable");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_client_error_not_retried() {
    let mock = MockHttpSend::new([Reply::Status(400, r#"{"code":400}"#)]);

    let start = Instant::now();
    let err = client(&mock).refresh(&request()).await.unwrap_err();

    assert_eq!(mock.attempts(), 1);
    assert_eq!(err.kind(), ErrorKind::ClientError);
    assert_eq!(err.to_string(), "400 Bad Request");
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_rejected_not_retried() {
    let mock = MockHttpSend::new([
        Reply::Status(200, r#"{"code":500,"msg":"bad token"}"#),
        Reply::Status(200, OK_BODY),
    ]);

    let err = client(&mock).refresh(&request()).await.unwrap_err();

    assert_eq!(mock.attempts(), 1);
    assert_eq!(err.kind(), ErrorKind::Rejected);
    assert_eq!(err.to_string(), "bad token");
}

#[tokio::test(start_paused = true)]
async fn test_refresh_loose_envelope_is_rejected() {
    for (body, message) in [
        (r#"{"code":"200","data":1}"#, "API Error"),
        (r#"{"code":401,"msg":"bad token","message":"bad token"}"#, "bad token"),
        (r#"["not", "an", "object"]"#, "API Error"),
    ] {
        let mock = MockHttpSend::new([Reply::Status(200, body)]);

        let err = client(&mock).refresh(&request()).await.unwrap_err();

        assert_eq!(mock.attempts(), 1, "body: {body}");
        assert_eq!(err.kind(), ErrorKind::Rejected, "body: {body}");
        assert_eq!(err.to_string(), message, "body: {body}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_refresh_transport_error_retried() -> Result<()> {
    let mock = MockHttpSend::new([Reply::Reset, Reply::Status(200, OK_BODY)]);

    let data = client(&mock).refresh(&request()).await?;

    assert_eq!(data, json!({"x": 1}));
    assert_eq!(mock.attempts(), 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_timeout_retried() -> Result<()> {
    let mock = MockHttpSend::new([Reply::Hang, Reply::Status(200, OK_BODY)]);

    let start = Instant::now();
    let data = client(&mock).refresh(&request()).await?;

    assert_eq!(data, json!({"x": 1}));
    assert_eq!(mock.attempts(), 2);
    // 30s timeout plus the first backoff.
    assert_eq!(start.elapsed(), Duration::from_millis(30_500));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_refresh_timeout_exhausted() {
    let mock = MockHttpSend::new([Reply::Hang]);
    let policy = RetryPolicy::default().with_timeout(Duration::from_secs(2));

    let err = client(&mock)
        .with_retry_policy(policy)
        .refresh(&request())
        .await
        .unwrap_err();

    assert_eq!(mock.attempts(), 3);
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_invalid_json_not_retried() {
    let mock = MockHttpSend::new([Reply::Status(200, "<html>oops</html>")]);

    let err = client(&mock).refresh(&request()).await.unwrap_err();

    assert_eq!(mock.attempts(), 1);
    assert_eq!(err.kind(), ErrorKind::Unexpected);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_custom_endpoint() -> Result<()> {
    let mock = MockHttpSend::new([Reply::Status(200, OK_BODY)]);

    client(&mock)
        .with_endpoint("http://127.0.0.1:8080/")
        .refresh(&request())
        .await?;

    assert_eq!(
        mock.seen()[0].uri,
        "http://127.0.0.1:8080/cdn/refresh/add.json"
    );
    Ok(())
}
