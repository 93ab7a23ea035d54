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

use cdnpurge_core::retry::RetryPolicy;
use cdnpurge_core::Context;

use super::constants::*;

/// Config carries all the configuration for the dogecloud refresh client.
///
/// Credentials are not part of it, they are resolved by a credential
/// provider such as [`DefaultCredentialProvider`](crate::DefaultCredentialProvider).
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`DOGECLOUD_ENDPOINT`]
    /// - default to [`DEFAULT_ENDPOINT`]
    pub endpoint: Option<String>,
    /// Deadline for a single attempt, 30s if unset.
    pub timeout: Option<Duration>,
    /// Retries after the first attempt, 2 if unset.
    pub max_retries: Option<u32>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max_retries
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(DOGECLOUD_ENDPOINT) {
            self.endpoint.get_or_insert(v);
        }

        self
    }

    /// The endpoint to send requests to, without trailing slash.
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim_end_matches('/')
    }

    /// The retry policy described by this config.
    pub fn retry_policy(&self) -> RetryPolicy {
        let mut policy = RetryPolicy::default();
        if let Some(timeout) = self.timeout {
            policy = policy.with_timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            policy = policy.with_max_retries(max_retries);
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdnpurge_core::StaticEnv;
    use std::collections::HashMap;

    fn endpoint_env() -> Context {
        Context::new().with_env(StaticEnv {
            envs: HashMap::from([(
                DOGECLOUD_ENDPOINT.to_string(),
                "https://env.example.com/".to_string(),
            )]),
        })
    }

    #[test]
    fn test_from_env_fills_endpoint() {
        let config = Config::new().from_env(&endpoint_env());

        assert_eq!(config.endpoint(), "https://env.example.com");
    }

    #[test]
    fn test_from_env_keeps_explicit_endpoint() {
        let config = Config::new()
            .with_endpoint("https://explicit.example.com")
            .from_env(&endpoint_env());

        assert_eq!(config.endpoint(), "https://explicit.example.com");
    }

    #[test]
    fn test_defaults() {
        let config = Config::new();

        assert_eq!(config.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_retry_policy_overrides() {
        let policy = Config::new()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0)
            .retry_policy();

        assert_eq!(policy.timeout, Duration::from_secs(5));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
    }
}
