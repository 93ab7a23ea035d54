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

use cdnpurge_core::{Context, Error, OsEnv, Result};
use cdnpurge_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

/// Context reading the process env and sending with reqwest.
///
/// Timeouts are left to the retry policy, the client itself never gives up.
pub fn default_context() -> Result<Context> {
    let client = Client::builder()
        .user_agent(concat!("cdnpurge/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::unexpected("failed to build http client").with_source(e))?;

    Ok(Context::new()
        .with_env(OsEnv)
        .with_http_send(ReqwestHttpSend::new(client)))
}
