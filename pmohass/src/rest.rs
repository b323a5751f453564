//! Home Assistant REST adapter for [`HassBus`].
//!
//! - `GET  <base>/api/states/<entity_id>` reads a state (404 = absent entity)
//! - `POST <base>/api/services/<domain>/<service>` invokes a service
//!
//! Every request carries the long-lived access token as a bearer token and is
//! bounded by a global timeout.

use std::time::Duration;

use tracing::{debug, warn};
use ureq::Agent;

use crate::bus::{EntityState, HassBus, ServiceData, split_service};
use crate::error::{HassError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking REST client for one Home Assistant instance.
#[derive(Clone)]
pub struct HassRestClient {
    base_url: String,
    token: String,
    agent: Agent,
}

impl std::fmt::Debug for HassRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HassRestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

impl HassRestClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(HassError::configuration(format!(
                "invalid Home Assistant URL '{}'",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            token: token.to_string(),
            agent: build_agent(timeout),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl HassBus for HassRestClient {
    fn observe_state(&self, entity_id: &str) -> Result<Option<EntityState>> {
        let url = format!("{}/api/states/{}", self.base_url, entity_id);
        debug!(%url, "Reading entity state");

        let mut response = self
            .agent
            .get(&url)
            .header("Authorization", self.bearer().as_str())
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;

        match status {
            200..=299 => Ok(Some(serde_json::from_str(&body)?)),
            404 => {
                debug!(entity_id, "Entity not found");
                Ok(None)
            }
            code => {
                warn!(entity_id, code, "State read failed");
                Err(HassError::Remote {
                    code,
                    message: body,
                })
            }
        }
    }

    fn invoke_service(&self, service: &str, data: ServiceData) -> Result<()> {
        let (domain, name) = split_service(service)?;
        let url = format!("{}/api/services/{}/{}", self.base_url, domain, name);
        let payload = serde_json::to_string(&data)?;
        debug!(service, %payload, "Calling service");

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", self.bearer().as_str())
            .header("Content-Type", "application/json")
            .send(payload)?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }

        let message = response.body_mut().read_to_string().unwrap_or_default();
        warn!(service, code = status, "Service call failed");
        Err(HassError::Remote {
            code: status,
            message,
        })
    }
}
