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

// Env values used in dogecloud services.
pub const DOGECLOUD_ACCESS_KEY: &str = "DOGECLOUD_ACCESS_KEY";
pub const DOGECLOUD_SECRET_KEY: &str = "DOGECLOUD_SECRET_KEY";
pub const DOGECLOUD_ENDPOINT: &str = "DOGECLOUD_ENDPOINT";

// Refresh API.
pub const DEFAULT_ENDPOINT: &str = "https://api.dogecloud.com";
pub const REFRESH_PATH: &str = "/cdn/refresh/add.json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// `code` returned by the api on success.
pub const CODE_OK: i64 = 200;
