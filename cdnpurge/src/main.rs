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

use std::io::{self, Write};
use std::process::ExitCode;

use cdnpurge::action::{self, Reporter};
use cdnpurge::{default_context, Context, Error, OsEnv};
use log::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ctx = match default_context() {
        Ok(ctx) => ctx,
        Err(err) => {
            let ctx = Context::new().with_env(OsEnv);
            return fail(&mut Reporter::new(io::stdout(), &ctx), err);
        }
    };

    let mut reporter = Reporter::new(io::stdout(), &ctx);
    match action::run(&ctx, &mut reporter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&mut reporter, err),
    }
}

fn fail<W: Write>(reporter: &mut Reporter<W>, err: Error) -> ExitCode {
    debug!("refresh failed: {err:?}");
    if let Err(e) = reporter.set_failed(err.message()) {
        error!("failed to report failure: {e}");
    }
    ExitCode::FAILURE
}
