use std::sync::Arc;

use honeycomb_client::{HoneycombApi, PollConfig};

/// What a tool gets to work with: the Honeycomb API and the query polling budget.
#[derive(Clone)]
pub struct ToolContext {
    client: Arc<dyn HoneycombApi>,
    poll_config: PollConfig,
}

impl ToolContext {
    pub fn new(client: Arc<dyn HoneycombApi>, poll_config: PollConfig) -> Self {
        Self {
            client,
            poll_config,
        }
    }

    pub fn client(&self) -> &dyn HoneycombApi {
        self.client.as_ref()
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll_config
    }
}
