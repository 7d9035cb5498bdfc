// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowgen-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowgen and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use reqwest::{Client, Url};

use super::{parse_generate_response, GenerateRequest, GenerationClient, GenerationError};

/// HTTP implementation of [`GenerationClient`].
///
/// No retries and no client-side timeout: a request runs until the service answers or the
/// transport gives up.
#[derive(Debug, Clone)]
pub struct HttpGenerationClient {
    client: Client,
    endpoint: Url,
}

impl HttpGenerationClient {
    pub fn new(endpoint: Url) -> Result<Self, GenerationError> {
        let client = Client::builder().build().map_err(GenerationError::transport)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl GenerationClient for HttpGenerationClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationError> {
        tracing::debug!(endpoint = %self.endpoint, has_context = request.context.is_some(), "posting generation request");

        // `.json` sets `Content-Type: application/json`.
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(GenerationError::transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GenerationError::transport)?;

        if !status.is_success() {
            return Err(GenerationError::status(status.as_u16(), &body));
        }

        let source = parse_generate_response(&body)?;
        tracing::debug!(bytes = source.len(), "generation response received");
        Ok(source)
    }
}
