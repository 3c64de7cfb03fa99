//! MCP server exposing the comparison as a tool.
//!
//! The server owns no state beyond a shared [`CompareDesign`] handle. Each
//! tool call runs on the blocking pool, so concurrent calls never share
//! buffers.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::Error;
use crate::image::format_name;
use crate::pipeline::{CompareDesign, ComparisonRequest};

/// Arguments of the `compare_design_implementation` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CompareArgs {
    /// Path to the design mockup image.
    pub design_path: String,

    /// Path to the implementation screenshot. Must have the same width and height as the design.
    pub implementation_path: String,

    /// Where to write the diff image. When omitted the diff is returned inline as base64 PNG.
    #[serde(default)]
    pub output_diff_path: Option<String>,

    /// Matching threshold from 0 to 1 (default 0.1). Smaller values are stricter.
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl From<CompareArgs> for ComparisonRequest {
    fn from(args: CompareArgs) -> Self {
        Self {
            design_path: PathBuf::from(args.design_path),
            implementation_path: PathBuf::from(args.implementation_path),
            output_diff_path: args.output_diff_path.map(PathBuf::from),
            threshold: args.threshold,
        }
    }
}

/// MCP server wrapping a comparison backend.
#[derive(Clone)]
pub struct DesignCompareServer {
    comparer: Arc<dyn CompareDesign>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DesignCompareServer {
    #[must_use]
    pub fn new(comparer: Arc<dyn CompareDesign>) -> Self {
        Self {
            comparer,
            tool_router: Self::tool_router(),
        }
    }

    /// Compare a design image with an implementation screenshot.
    #[tool(
        description = "Compare a design image with an implementation screenshot pixel by pixel. Returns totalPixels, differentPixels, differencePercentage and either diffImagePath (when output_diff_path is given) or diffImageEncodedBytes (base64 PNG)."
    )]
    pub async fn compare_design_implementation(
        &self,
        Parameters(args): Parameters<CompareArgs>,
    ) -> Result<CallToolResult, McpError> {
        let request = ComparisonRequest::from(args);
        let comparer = Arc::clone(&self.comparer);

        let outcome = tokio::task::spawn_blocking(move || comparer.compare(&request))
            .await
            .map_err(|err| McpError::internal_error(format!("comparison task failed: {err}"), None))?;

        match outcome {
            Ok(result) => Ok(CallToolResult::success(vec![Content::json(&result)?])),
            Err(err) => {
                tracing::warn!("Comparison failed: {err}");
                Ok(tool_error(&err))
            }
        }
    }

    /// List the accepted input formats.
    #[tool(description = "List the image formats accepted by compare_design_implementation.")]
    pub async fn list_supported_formats(&self) -> Result<CallToolResult, McpError> {
        let formats: Vec<&str> = self
            .comparer
            .supported_formats()
            .iter()
            .map(|format| format_name(*format))
            .collect();

        Ok(CallToolResult::success(vec![Content::json(
            serde_json::json!({ "formats": formats }),
        )?]))
    }
}

#[tool_handler]
impl ServerHandler for DesignCompareServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Compares a design mockup against an implementation screenshot of the same size \
                 and reports how many pixels differ, with a highlighted diff image."
                    .to_string(),
            ),
        }
    }
}

/// Wrap a domain error as an `isError` tool result: kind and message only.
fn tool_error(err: &Error) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{}: {err}", err.kind()))])
}
