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

//! Bounded retry with linear backoff and a per-attempt timeout.

use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::{Error, Result};

/// RetryPolicy carries everything the retry loop needs as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Backoff unit: the n-th retry waits `base_delay * n`.
    pub base_delay: Duration,
    /// Deadline for a single attempt.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Set max retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total number of attempts allowed, the first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the given retry, `retry` starting at 1.
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Run `f` until it succeeds, fails with a non-retryable error, or the
    /// attempts are exhausted.
    ///
    /// `f` receives the zero-based attempt number. An attempt that exceeds
    /// `timeout` is dropped and counted as a retryable [`Error::timeout`].
    /// The last error is returned when every attempt failed.
    pub async fn retry<T, F, Fut>(&self, mut f: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last_err = None;

        for attempt in 0..self.max_attempts() {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                warn!(
                    "retry attempt {}/{}, waiting {:?}",
                    attempt, self.max_retries, delay
                );
                tokio::time::sleep(delay).await;
            }

            let err = match tokio::time::timeout(self.timeout, f(attempt)).await {
                Ok(Ok(v)) => return Ok(v),
                Ok(Err(err)) => err,
                Err(elapsed) => Error::timeout(format!(
                    "request timed out after {:?}",
                    self.timeout
                ))
                .with_source(elapsed),
            };

            if !err.is_retryable() {
                return Err(err);
            }
            warn!("attempt {} failed: {}", attempt + 1, err);
            last_err = Some(err);
        }

        Err(last_err.unwrap_or_else(|| Error::unexpected("retry policy allows no attempt")))
    }
}
