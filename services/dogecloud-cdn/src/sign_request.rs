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

//! DogeCloud API request signer
use std::fmt::Write;

use http::header::AUTHORIZATION;
use http::HeaderValue;
use log::debug;

use cdnpurge_core::hash::hex_hmac_sha1;
use cdnpurge_core::{Context, Error, Result, SignRequest, SigningCredential, SigningRequest};

use super::credential::Credential;

/// RequestSigner that implement DogeCloud API Authorization.
///
/// - [API Authentication](https://docs.dogecloud.com/cdn/api-access-token)
#[derive(Debug, Default)]
pub struct RequestSigner;

impl RequestSigner {
    /// Create a signer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SignRequest for RequestSigner {
    type Credential = Credential;

    async fn sign_request(
        &self,
        _ctx: &Context,
        parts: &mut http::request::Parts,
        body: &[u8],
        credential: Option<&Self::Credential>,
    ) -> Result<()> {
        let k = credential
            .filter(|k| k.is_valid())
            .ok_or_else(|| Error::credential_invalid("missing credential"))?;

        let mut ctx = SigningRequest::build(parts)?;

        let string_to_sign = string_to_sign(&ctx, body)?;
        let signature = hex_hmac_sha1(k.secret_key.as_bytes(), string_to_sign.as_bytes());

        ctx.headers.insert(AUTHORIZATION, {
            let mut value: HeaderValue = format!("TOKEN {}:{}", k.access_key, signature).parse()?;
            value.set_sensitive(true);

            value
        });

        ctx.apply(parts)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// PathAndQuery + "\n" +
/// Body
/// ```
fn string_to_sign(ctx: &SigningRequest, body: &[u8]) -> Result<String> {
    let body = std::str::from_utf8(body)
        .map_err(|e| Error::request_invalid("request body must be utf-8").with_source(e))?;

    let mut s = String::with_capacity(ctx.path.len() + body.len() + 1);
    writeln!(&mut s, "{}", ctx.path_and_query())?;
    s.write_str(body)?;

    debug!("string to sign: {}", &s);
    Ok(s)
}
