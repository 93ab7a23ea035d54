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

//! Refresh DogeCloud CDN caches.
//!
//! ```no_run
//! use cdnpurge_core::{Context, OsEnv, Signer};
//! use cdnpurge_dogecloud_cdn::{DefaultCredentialProvider, RefreshClient, RefreshRequest, RequestSigner};
//! use cdnpurge_http_send_reqwest::ReqwestHttpSend;
//!
//! # async fn example() -> cdnpurge_core::Result<()> {
//! let ctx = Context::new()
//!     .with_env(OsEnv)
//!     .with_http_send(ReqwestHttpSend::default());
//! let signer = Signer::new(ctx, DefaultCredentialProvider::new(), RequestSigner::new());
//!
//! let req = RefreshRequest::parse("path", "/static/\n/index.html")?;
//! let data = RefreshClient::new(signer).refresh(&req).await?;
//! println!("{data}");
//! # Ok(())
//! # }
//! ```

mod constants;
pub use constants::{DEFAULT_ENDPOINT, REFRESH_PATH};

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, StaticCredentialProvider,
};

mod normalize;
pub use normalize::normalize_urls;

mod refresh;
pub use refresh::{RefreshRequest, RefreshType};

mod sign_request;
pub use sign_request::RequestSigner;

mod client;
pub use client::{ApiResult, RefreshClient};
