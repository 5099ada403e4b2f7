//! Tool declarations advertised through `tools/list`.

use serde::Serialize;
use serde_json::{json, Value};

pub const TOOL_GET_INVENTORY_STATUS: &str = "get_inventory_status";
pub const TOOL_ADD_NEW_PRODUCT: &str = "add_new_product";
pub const TOOL_ADJUST_STOCK_QUANTITY: &str = "adjust_stock_quantity";
pub const TOOL_REMOVE_PRODUCT: &str = "remove_product";

/// One advertised tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema for the `arguments` object.
    pub input_schema: Value,
}

/// Returns every tool in a stable order.
pub fn tool_catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: TOOL_GET_INVENTORY_STATUS,
            description: "Retrieves inventory status for all products, or for products whose \
                          name contains the given text (case-insensitive).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_name": {
                        "type": "string",
                        "description": "The name or partial name of the product to search for."
                    }
                }
            }),
        },
        ToolDescriptor {
            name: TOOL_ADD_NEW_PRODUCT,
            description: "Adds a new product with a generated ID in the format P-XXXXXXXX.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "The name of the product to add."
                    },
                    "initial_quantity": {
                        "type": "integer",
                        "description": "The initial stock quantity."
                    },
                    "unit_price": {
                        "type": "number",
                        "description": "The price per unit."
                    }
                },
                "required": ["name", "initial_quantity", "unit_price"]
            }),
        },
        ToolDescriptor {
            name: TOOL_ADJUST_STOCK_QUANTITY,
            description: "Adjusts the stock of one product. The name must match exactly one \
                          product; stock can never go below zero.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_name": {
                        "type": "string",
                        "description": "The name of the product to adjust."
                    },
                    "quantity_change": {
                        "type": "integer",
                        "description": "Positive number to increase stock, negative number to decrease stock."
                    }
                },
                "required": ["product_name", "quantity_change"]
            }),
        },
        ToolDescriptor {
            name: TOOL_REMOVE_PRODUCT,
            description: "Permanently removes one product. The name must match exactly one product.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "product_name": {
                        "type": "string",
                        "description": "The name of the product to remove."
                    }
                },
                "required": ["product_name"]
            }),
        },
    ]
}
