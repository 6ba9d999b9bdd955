//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bosh.
//! The Bosh project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client};
use tokio_util::io::ReaderStream;

use crate::config::BoConfig;
use crate::errors::{BoError, Result};
use crate::ingest::BoFormatDetector;

/// Uploads a script file to `POST /script/<basename>` and returns the
/// daemon's reply. The file is streamed, not buffered.
pub async fn upload_script(config: &BoConfig, path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| BoError::config(format!("{} is not a script file", path.display())))?;
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| BoError::config(format!("cannot open {}: {}", path.display(), e)))?;
    let content_type = BoFormatDetector::new().detect_from_path(path);

    let url = config.http_url(&format!("script/{}", name));
    log::debug!("uploading {} as {}", path.display(), content_type.mime());
    let response = Client::new()
        .post(&url)
        .header(CONTENT_TYPE, content_type.mime())
        .body(Body::wrap_stream(ReaderStream::new(file)))
        .send()
        .await
        .map_err(|e| BoError::fatal("script", format!("POST {}: {}", url, e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BoError::fatal("script", format!("reading response: {}", e)))?;
    if !status.is_success() {
        return Err(BoError::Http {
            status: status.as_u16(),
            message: text.trim().to_string(),
        });
    }
    Ok(text)
}
