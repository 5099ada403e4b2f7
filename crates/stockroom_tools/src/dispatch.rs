//! Tool call dispatch.
//!
//! # Responsibility
//! - Decode tool arguments into core request models.
//! - Call the shared inventory service and encode its result as JSON.
//!
//! # Invariants
//! - Inventory failures are returned as [`ToolError::Inventory`] so the
//!   session can report them as tool errors, not protocol errors.

use crate::catalog::{
    TOOL_ADD_NEW_PRODUCT, TOOL_ADJUST_STOCK_QUANTITY, TOOL_GET_INVENTORY_STATUS,
    TOOL_REMOVE_PRODUCT,
};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use stockroom_core::{
    AdjustmentRequest, InventoryError, InventoryService, NewProductRequest, ProductRepository,
};

/// Failure of a single tool call.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool `{0}`")]
    UnknownTool(String),
    #[error("invalid arguments for `{tool}`: {message}")]
    InvalidArguments { tool: String, message: String },
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error("failed to encode tool result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::Inventory(InventoryError::NotFound { .. })
            | Self::Inventory(InventoryError::ProductNotFound(_)) => "not_found",
            Self::Inventory(InventoryError::Ambiguous { .. }) => "ambiguous",
            Self::Inventory(InventoryError::InvalidAdjustment { .. }) => "invalid_adjustment",
            Self::Inventory(InventoryError::Validation(_)) => "validation",
            Self::Inventory(InventoryError::Repo(_)) => "storage",
            Self::Encode(_) => "encode",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct StatusArgs {
    #[serde(default)]
    product_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RemoveArgs {
    product_name: String,
}

/// Routes tool calls to one shared inventory service.
pub struct ToolDispatcher<R: ProductRepository> {
    service: Arc<InventoryService<R>>,
}

impl<R: ProductRepository> Clone for ToolDispatcher<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R: ProductRepository> ToolDispatcher<R> {
    pub fn new(service: Arc<InventoryService<R>>) -> Self {
        Self { service }
    }

    /// Invokes tool `name` with a JSON `arguments` object.
    ///
    /// `Value::Null` is treated as an empty argument object.
    pub fn call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let started_at = Instant::now();
        let result = self.call_inner(name, arguments);

        match &result {
            Ok(_) => info!(
                "event=tool_call module=tools status=ok tool={} duration_ms={}",
                name,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=tool_call module=tools status=error tool={} error_code={} duration_ms={}",
                name,
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }
        result
    }

    fn call_inner(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        match name {
            TOOL_GET_INVENTORY_STATUS => {
                let args: StatusArgs = decode_args(name, arguments)?;
                let products = self.service.list_or_search(args.product_name.as_deref())?;
                Ok(serde_json::to_value(products)?)
            }
            TOOL_ADD_NEW_PRODUCT => {
                let request: NewProductRequest = decode_args(name, arguments)?;
                let product = self.service.create_from_request(&request)?;
                Ok(serde_json::to_value(product)?)
            }
            TOOL_ADJUST_STOCK_QUANTITY => {
                let request: AdjustmentRequest = decode_args(name, arguments)?;
                let product = self
                    .service
                    .adjust(&request.product_name, request.quantity_change)?;
                Ok(serde_json::to_value(product)?)
            }
            TOOL_REMOVE_PRODUCT => {
                let args: RemoveArgs = decode_args(name, arguments)?;
                let removed = self.service.remove(&args.product_name)?;
                Ok(json!({
                    "status": "success",
                    "message": format!(
                        "Product '{}' (ID: {}) has been removed from inventory.",
                        args.product_name, removed.product_id
                    ),
                    "product_id": removed.product_id,
                    "name": removed.name,
                }))
            }
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

fn decode_args<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    let arguments = match arguments {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|err| ToolError::InvalidArguments {
        tool: tool.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{ToolDispatcher, ToolError};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use stockroom_core::{InventoryService, MemoryProductRepository};

    fn dispatcher() -> ToolDispatcher<MemoryProductRepository> {
        ToolDispatcher::new(Arc::new(InventoryService::new(MemoryProductRepository::new())))
    }

    #[test]
    fn status_accepts_null_arguments() {
        let tools = dispatcher();
        assert_eq!(
            tools.call("get_inventory_status", Value::Null).unwrap(),
            json!([])
        );
    }

    #[test]
    fn missing_required_argument_is_invalid_arguments() {
        let tools = dispatcher();
        let err = tools
            .call("adjust_stock_quantity", json!({"product_name": "Widget"}))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert_eq!(err.code(), "invalid_arguments");
    }

    #[test]
    fn unknown_tool_is_reported() {
        let err = dispatcher().call("drop_table", json!({})).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(name) if name == "drop_table"));
    }
}
