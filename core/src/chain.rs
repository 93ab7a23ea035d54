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

use crate::{Context, ProvideCredential, Result};
use async_trait::async_trait;
use std::fmt::{self, Debug};

/// A chain of credential providers that will be tried in order.
pub struct ProvideCredentialChain<C> {
    providers: Vec<Box<dyn ProvideCredential<Credential = C>>>,
}

impl<C: Send + Sync + Unpin + 'static> ProvideCredentialChain<C> {
    /// Create a new empty credential provider chain.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Add a credential provider to the end of the chain.
    pub fn push(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Add a credential provider to the front of the chain.
    pub fn push_front(mut self, provider: impl ProvideCredential<Credential = C>) -> Self {
        self.providers.insert(0, Box::new(provider));
        self
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the chain holds no provider.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<C: Send + Sync + Unpin + 'static> Default for ProvideCredentialChain<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Debug for ProvideCredentialChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvideCredentialChain")
            .field("providers", &self.providers)
            .finish()
    }
}

#[async_trait]
impl<C: Send + Sync + Unpin + 'static> ProvideCredential for ProvideCredentialChain<C> {
    type Credential = C;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        for provider in &self.providers {
            log::debug!("trying credential provider: {provider:?}");

            match provider.provide_credential(ctx).await {
                Ok(Some(cred)) => {
                    log::debug!("loaded credential from provider: {provider:?}");
                    return Ok(Some(cred));
                }
                Ok(None) => {
                    log::debug!("no credential found in provider: {provider:?}");
                    continue;
                }
                Err(e) => {
                    log::warn!("error loading credential from provider {provider:?}: {e:?}");
                    // Continue to next provider on error
                    continue;
                }
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[derive(Debug)]
    struct Fixed(&'static str);

    #[async_trait]
    impl ProvideCredential for Fixed {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[derive(Debug)]
    struct Empty;

    #[async_trait]
    impl ProvideCredential for Empty {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl ProvideCredential for Broken {
        type Credential = String;

        async fn provide_credential(&self, _: &Context) -> Result<Option<String>> {
            Err(Error::unexpected("provider failed"))
        }
    }

    #[tokio::test]
    async fn test_chain_skips_empty_and_failing() {
        let _ = env_logger::builder().is_test(true).try_init();

        let chain = ProvideCredentialChain::new()
            .push(Empty)
            .push(Broken)
            .push(Fixed("third"));

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert_eq!(cred.as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn test_chain_push_front_wins() {
        let chain = ProvideCredentialChain::new()
            .push(Fixed("default"))
            .push_front(Fixed("explicit"));
        assert_eq!(chain.len(), 2);

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert_eq!(cred.as_deref(), Some("explicit"));
    }

    #[tokio::test]
    async fn test_empty_chain() {
        let chain: ProvideCredentialChain<String> = ProvideCredentialChain::default();
        assert!(chain.is_empty());

        let cred = chain.provide_credential(&Context::new()).await.unwrap();
        assert!(cred.is_none());
    }
}
