//! Operations exposed to the protocol server

mod args;
mod details;
mod search;

use std::sync::Arc;

use schemars::schema::RootSchema;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{ScraperError, ScraperResult};
use crate::execution::Tool;
use crate::factory::ScraperFactory;

pub use details::{DetailRequest, GetListingDetailsArgs, GetListingDetailsTool};
pub use search::{SearchListingsArgs, SearchListingsTool};

/// Name, description and input schema of one tool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: RootSchema,
}

impl ToolDescriptor {
    fn of<T: Tool>() -> Self {
        Self {
            name: T::NAME,
            description: T::DESCRIPTION,
            input_schema: T::input_schema(),
        }
    }
}

/// Both tools over one shared factory.
pub struct ListingTools {
    search: SearchListingsTool,
    details: GetListingDetailsTool,
}

impl ListingTools {
    pub fn new(factory: Arc<ScraperFactory>) -> Self {
        Self {
            search: SearchListingsTool::new(Arc::clone(&factory)),
            details: GetListingDetailsTool::new(factory),
        }
    }

    pub fn descriptors() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::of::<SearchListingsTool>(),
            ToolDescriptor::of::<GetListingDetailsTool>(),
        ]
    }

    pub fn search(&self) -> &SearchListingsTool {
        &self.search
    }

    pub fn details(&self) -> &GetListingDetailsTool {
        &self.details
    }

    /// Dispatches a call by tool name and returns the JSON result.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Validation`] for an unknown tool name, otherwise
    /// whatever the tool returns.
    pub async fn call(&self, name: &str, args: Value, token: Option<&CancellationToken>) -> ScraperResult<Value> {
        match name {
            SearchListingsTool::NAME => to_json(self.search.execute(args, token).await?),
            GetListingDetailsTool::NAME => to_json(self.details.execute(args, token).await?),
            other => Err(ScraperError::Validation {
                violations: vec![format!(
                    "tool: unknown tool \"{other}\" (expected {} or {})",
                    SearchListingsTool::NAME,
                    GetListingDetailsTool::NAME
                )],
            }),
        }
    }
}

fn to_json<T: Serialize>(value: T) -> ScraperResult<Value> {
    serde_json::to_value(value).map_err(|e| ScraperError::internal("serialize result", e.to_string()))
}
