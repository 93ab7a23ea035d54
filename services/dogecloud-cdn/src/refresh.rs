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

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use cdnpurge_core::{Error, Result};

use crate::normalize::normalize_urls;

/// Whether the refreshed items are full urls or site relative paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshType {
    /// Refresh everything under a path prefix.
    Path,
    /// Refresh exact urls.
    Url,
}

impl RefreshType {
    /// The value sent as `rtype`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshType::Path => "path",
            RefreshType::Url => "url",
        }
    }
}

impl fmt::Display for RefreshType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RefreshType {
    type Err = Error;

    /// Parse case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "path" => Ok(RefreshType::Path),
            "url" => Ok(RefreshType::Url),
            _ => Err(Error::request_invalid(r#"type must be "path" or "url""#)),
        }
    }
}

/// A validated refresh task.
///
/// `urls` is never empty, holds no blank item and no duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    rtype: RefreshType,
    urls: Vec<String>,
}

impl RefreshRequest {
    /// Create a new refresh request.
    ///
    /// Items are trimmed and duplicates dropped, keeping the first occurrence.
    pub fn new(rtype: RefreshType, urls: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for url in urls {
            let url: String = url.into();
            let url = url.trim();
            if url.is_empty() {
                return Err(Error::request_invalid("urls must not contain empty items"));
            }
            if seen.insert(url.to_string()) {
                items.push(url.to_string());
            }
        }

        if items.is_empty() {
            return Err(Error::request_invalid("urls must not be empty"));
        }

        Ok(Self { rtype, urls: items })
    }

    /// Build a request from the raw `type` and `urls` inputs.
    ///
    /// `rtype` is validated first so that a bad type is reported even if
    /// `urls` is empty too.
    pub fn parse(rtype: &str, urls: &str) -> Result<Self> {
        let rtype = rtype.parse()?;
        Self::new(rtype, normalize_urls(urls))
    }

    /// The refresh type.
    pub fn rtype(&self) -> RefreshType {
        self.rtype
    }

    /// The items to refresh.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Encode as `application/x-www-form-urlencoded` body.
    ///
    /// ```text
    /// rtype=path&urls=%5B%22%2Fa%22%5D
    /// ```
    pub fn to_form(&self) -> Result<String> {
        let urls = serde_json::to_string(&self.urls)
            .map_err(|e| Error::unexpected("failed to serialize urls").with_source(e))?;

        Ok(form_urlencoded::Serializer::new(String::new())
            .append_pair("rtype", self.rtype.as_str())
            .append_pair("urls", &urls)
            .finish())
    }
}
