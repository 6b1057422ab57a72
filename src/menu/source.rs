use std::time::Duration;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{MacroError, Result};

/// Where raw per-location menus come from.
pub trait MenuSource: Send + Sync {
    /// Fetch the raw menu payload for one location on one date.
    fn fetch_menu(&self, location: &str, date: NaiveDate) -> Result<Value>;
}

const MENU_QUERY: &str = r#"
query GetMenu($courtName: String!, $date: Date!) {
  diningCourtByName(name: $courtName) {
    name
    dailyMenu(date: $date) {
      meals { name, stations { name, items { displayName, item { traits { name }, nutritionFacts { name, label } } } } }
    }
  }
}
"#;

/// GraphQL client for the campus dining menu API.
pub struct GraphQlMenuClient {
    url: String,
    agent: ureq::Agent,
}

impl GraphQlMenuClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl MenuSource for GraphQlMenuClient {
    fn fetch_menu(&self, location: &str, date: NaiveDate) -> Result<Value> {
        let body = json!({
            "query": MENU_QUERY,
            "variables": {
                "courtName": location,
                "date": date.format("%Y-%m-%d").to_string(),
            },
        });

        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(body)?;

        response
            .into_json()
            .map_err(|e| MacroError::MalformedResponse(e.to_string()))
    }
}
