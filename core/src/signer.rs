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

use crate::{Context, ProvideCredential, Result, SignRequest, SigningCredential};
use std::sync::{Arc, Mutex};

/// Signer is the main struct used to sign the request.
///
/// The credential is loaded on first use and cached until it becomes invalid.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context this signer was built with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut http::request::Parts, body: &[u8]) -> Result<()> {
        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let cred = self.loader.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = cred.clone();
            cred
        };

        self.builder
            .sign_request(&self.ctx, req, body, credential.as_ref())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use async_trait::async_trait;
    use http::header::AUTHORIZATION;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    struct Token(String);

    impl SigningCredential for Token {
        fn is_valid(&self) -> bool {
            !self.0.is_empty()
        }
    }

    #[derive(Debug, Default)]
    struct CountingLoader {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProvideCredential for CountingLoader {
        type Credential = Token;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Token("secret".to_string())))
        }
    }

    #[derive(Debug)]
    struct BodyLenSigner;

    #[async_trait]
    impl SignRequest for BodyLenSigner {
        type Credential = Token;

        async fn sign_request(
            &self,
            _: &Context,
            req: &mut http::request::Parts,
            body: &[u8],
            credential: Option<&Token>,
        ) -> Result<()> {
            let cred = credential.ok_or_else(|| Error::credential_invalid("missing credential"))?;
            let value = format!("{}:{}", cred.0, body.len());
            req.headers.insert(AUTHORIZATION, value.parse()?);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sign_caches_credential() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loader = CountingLoader {
            calls: calls.clone(),
        };
        let signer = Signer::new(Context::new(), loader, BodyLenSigner);

        for _ in 0..3 {
            let mut parts = http::Request::new(()).into_parts().0;
            signer.sign(&mut parts, b"hello").await.unwrap();
            assert_eq!(parts.headers[AUTHORIZATION], "secret:5");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[derive(Debug)]
    struct NoCredential;

    #[async_trait]
    impl ProvideCredential for NoCredential {
        type Credential = Token;

        async fn provide_credential(&self, _: &Context) -> Result<Option<Token>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_sign_without_credential() {
        let signer = Signer::new(Context::new(), NoCredential, BodyLenSigner);
        let mut parts = http::Request::new(()).into_parts().0;

        let err = signer.sign(&mut parts, b"").await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::CredentialInvalid);
    }
}
