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

//! Glue between the CI runner and the refresh client.
//!
//! Inputs come from `INPUT_<NAME>` env vars, outputs go to the file named by
//! `GITHUB_OUTPUT` and failures are reported with workflow commands.

use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use tokio::io::AsyncWriteExt;

use cdnpurge_core::utils::Redact;
use cdnpurge_core::{Context, Error, Result, Signer};
use cdnpurge_dogecloud_cdn::{
    Config, DefaultCredentialProvider, RefreshClient, RefreshRequest, RequestSigner,
    StaticCredentialProvider,
};

/// Env var naming the file that collects step outputs.
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";

/// Name of the output holding the api response.
pub const OUTPUT_RESULT: &str = "result";

/// Env var holding the value of input `name`.
///
/// ```
/// assert_eq!(cdnpurge::action::input_env_name("access_key"), "INPUT_ACCESS_KEY");
/// assert_eq!(cdnpurge::action::input_env_name("max retries"), "INPUT_MAX_RETRIES");
/// ```
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read input `name`, trimmed. Empty values count as absent.
pub fn get_input(ctx: &Context, name: &str) -> Option<String> {
    ctx.env_var(&input_env_name(name))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read input `name`, failing if it is absent.
pub fn get_required_input(ctx: &Context, name: &str) -> Result<String> {
    get_input(ctx, name).ok_or_else(|| {
        Error::config_invalid(format!("Input required and not supplied: {name}"))
    })
}

fn get_parsed_input<T: FromStr>(ctx: &Context, name: &str) -> Result<Option<T>> {
    get_input(ctx, name)
        .map(|v| {
            v.parse().map_err(|_| {
                Error::config_invalid(format!("Input {name} is not a valid number: {v}"))
            })
        })
        .transpose()
}

/// Inputs of the refresh step.
#[derive(Clone)]
pub struct Inputs {
    /// DogeCloud access key.
    pub access_key: String,
    /// DogeCloud secret key.
    pub secret_key: String,
    /// Raw `type`, validated when the request is built.
    pub rtype: String,
    /// Raw `urls`, normalized when the request is built.
    pub urls: String,
    /// Api base url override.
    pub endpoint: Option<String>,
    /// Per attempt timeout.
    pub timeout: Option<Duration>,
    /// Retries after the first attempt.
    pub max_retries: Option<u32>,
}

impl Inputs {
    /// Read all inputs from the context env.
    pub fn from_context(ctx: &Context) -> Result<Self> {
        Ok(Self {
            access_key: get_required_input(ctx, "access_key")?,
            secret_key: get_required_input(ctx, "secret_key")?,
            rtype: get_required_input(ctx, "type")?,
            urls: get_required_input(ctx, "urls")?,
            endpoint: get_input(ctx, "endpoint"),
            timeout: get_parsed_input::<u64>(ctx, "timeout")?.map(Duration::from_secs),
            max_retries: get_parsed_input(ctx, "max_retries")?,
        })
    }

    /// Client config described by these inputs.
    pub fn config(&self) -> Config {
        let mut config = Config::new();
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(max_retries) = self.max_retries {
            config = config.with_max_retries(max_retries);
        }
        config
    }
}

impl Debug for Inputs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inputs")
            .field("access_key", &Redact::from(&self.access_key))
            .field("secret_key", &Redact::from(&self.secret_key))
            .field("rtype", &self.rtype)
            .field("urls", &self.urls)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Reporter surfaces progress, outputs and failures to the runner.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    output_file: Option<PathBuf>,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter writing commands to `out`, and outputs to the file
    /// named by `GITHUB_OUTPUT` if set.
    pub fn new(out: W, ctx: &Context) -> Self {
        Self {
            out,
            output_file: ctx
                .env_var(GITHUB_OUTPUT)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Print an informational line.
    pub fn info(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "{msg}")?;
        Ok(())
    }

    /// Set output `name` to `value`.
    pub async fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let Some(path) = &self.output_file else {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            )?;
            return Ok(());
        };

        let block = file_command(name, value)?;
        let mut f = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        f.write_all(block.as_bytes()).await?;
        f.flush().await?;
        Ok(())
    }

    /// Report a failure, the step must then exit non-zero.
    pub fn set_failed(&mut self, msg: &str) -> Result<()> {
        writeln!(self.out, "::error::{}", escape_data(msg))?;
        Ok(())
    }

    /// Consume the reporter, returning the command writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render `name<<DELIM\nvalue\nDELIM\n` for the output file.
fn file_command(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{:032x}", rand::random::<u128>());
    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(Error::unexpected(format!(
            "unexpected input: output {name} contains the delimiter {delimiter}"
        )));
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Escape message data of a workflow command.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a property value of a workflow command.
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

/// Run the refresh step: read inputs, submit, report the result.
///
/// Errors are returned to the caller, which reports them with
/// [`Reporter::set_failed`].
pub async fn run<W: Write>(ctx: &Context, reporter: &mut Reporter<W>) -> Result<()> {
    let inputs = Inputs::from_context(ctx)?;
    debug!("loaded inputs: {inputs:?}");

    let req = RefreshRequest::parse(&inputs.rtype, &inputs.urls)?;
    reporter.info(&format!(
        "Refreshing CDN cache for {} URL(s)",
        req.urls().len()
    ))?;

    let config = inputs.config().from_env(ctx);
    let provider = DefaultCredentialProvider::new().push_front(StaticCredentialProvider::new(
        &inputs.access_key,
        &inputs.secret_key,
    ));
    let signer = Signer::new(ctx.clone(), provider, RequestSigner::new());
    let data = RefreshClient::from_config(signer, &config)
        .refresh(&req)
        .await?;

    let result = serde_json::to_string(&data)
        .map_err(|e| Error::unexpected("failed to serialize result").with_source(e))?;
    reporter.set_output(OUTPUT_RESULT, &result).await?;
    reporter.info("Refresh submitted, please wait for edge nodes to sync!")?;
    Ok(())
}
