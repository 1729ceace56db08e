use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use ring::signature::RsaKeyPair;
use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{DashboardError, Result};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Serialize)]
struct JwtHeader {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub exp: u64,
    pub iat: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Signs JWT assertions for a service account.
pub struct ServiceAccount<'a> {
    credentials: &'a Credentials,
}

impl<'a> ServiceAccount<'a> {
    pub fn new(credentials: &'a Credentials) -> Self {
        ServiceAccount { credentials }
    }

    fn key_pair(&self) -> Result<RsaKeyPair> {
        let mut reader = std::io::Cursor::new(self.credentials.private_key.as_bytes());
        let item = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| DashboardError::InvalidPrivateKey(e.to_string()))?;

        match item {
            Some(rustls_pemfile::Item::Pkcs8Key(der)) => {
                RsaKeyPair::from_pkcs8(der.secret_pkcs8_der()).map_err(|e| {
                    DashboardError::InvalidPrivateKey(format!("bad pkcs8 rsa key: {}", e))
                })
            }
            Some(rustls_pemfile::Item::Pkcs1Key(der)) => {
                RsaKeyPair::from_der(der.secret_pkcs1_der()).map_err(|e| {
                    DashboardError::InvalidPrivateKey(format!("bad pkcs1 rsa key: {}", e))
                })
            }
            _ => Err(DashboardError::InvalidPrivateKey(
                "no RSA private key found in PEM data".to_string(),
            )),
        }
    }

    /// Build a signed RS256 assertion valid for one hour from `now`.
    pub fn signed_assertion(&self, scope: &str, audience: &str, now: DateTime<Utc>) -> Result<String> {
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: scope.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp() as u64,
            exp: (now + Duration::hours(1)).timestamp() as u64,
        };
        let header = JwtHeader {
            alg: "RS256",
            typ: "JWT",
        };

        let header_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_string(&header)?);
        let claims_b64 = BASE64_URL_SAFE_NO_PAD.encode(serde_json::to_string(&claims)?);
        let signing_input = format!("{}.{}", header_b64, claims_b64);

        let key_pair = self.key_pair()?;
        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| DashboardError::InvalidPrivateKey("failed to sign assertion".to_string()))?;

        Ok(format!(
            "{}.{}",
            signing_input,
            BASE64_URL_SAFE_NO_PAD.encode(&signature)
        ))
    }

    /// Fetch an access token for `scope` from the token endpoint.
    pub async fn fetch_access_token(
        &self,
        http: &reqwest::Client,
        token_uri: &str,
        scope: &str,
    ) -> Result<AccessToken> {
        let assertion = self.signed_assertion(scope, token_uri, Utc::now())?;
        debug!(
            "Requesting access token for {} ({})",
            self.credentials.client_email, scope
        );

        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
        let response = http.post(token_uri).form(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let detail = match serde_json::from_str::<TokenErrorBody>(&body) {
                Ok(parsed) => parsed.error_description.unwrap_or(parsed.error),
                Err(_) => format!("status {}: {}", status, body),
            };
            warn!("Token exchange rejected: {}", detail);
            return Err(DashboardError::Auth(detail));
        }

        Ok(serde_json::from_str(&body)?)
    }
}
