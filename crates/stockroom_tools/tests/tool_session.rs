use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;
use stockroom_core::{open_inventory, FileInventoryService, JsonFileProductRepository};
use stockroom_tools::{ToolDispatcher, ToolSession, SERVER_NAME};
use tempfile::TempDir;

type FileSession = ToolSession<JsonFileProductRepository>;

fn session(dir: &TempDir) -> (FileSession, Arc<FileInventoryService>) {
    let (service, _) = open_inventory(dir.path().join("inventory.json")).unwrap();
    let service = Arc::new(service);
    let session = ToolSession::new(ToolDispatcher::new(Arc::clone(&service)));
    (session, service)
}

fn call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    })
    .to_string()
}

fn run_lines(session: &FileSession, lines: &[String]) -> Vec<Value> {
    let input = lines.join("\n");
    let mut output = Vec::new();
    session.run(Cursor::new(input), &mut output).unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn initialize_and_list_tools() {
    let dir = TempDir::new().unwrap();
    let (session, _) = session(&dir);

    let responses = run_lines(
        &session,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "2025-03-26"}})
            .to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        ],
    );

    assert_eq!(responses.len(), 2, "notifications must not be answered");
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["protocolVersion"], "2025-03-26");
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], SERVER_NAME);

    let names: Vec<&str> = responses[1]["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "get_inventory_status",
            "add_new_product",
            "adjust_stock_quantity",
            "remove_product"
        ]
    );
}

#[test]
fn widget_scenario_over_the_session() {
    let dir = TempDir::new().unwrap();
    let (session, service) = session(&dir);

    let responses = run_lines(
        &session,
        &[
            call(1, "add_new_product", json!({"name": "Widget", "initial_quantity": 10, "unit_price": 2.5})),
            call(2, "adjust_stock_quantity", json!({"product_name": "widget", "quantity_change": -3})),
            call(3, "adjust_stock_quantity", json!({"product_name": "Widget", "quantity_change": -100})),
            call(4, "get_inventory_status", json!({"product_name": "WIDGET"})),
            call(5, "remove_product", json!({"product_name": "Widget"})),
            call(6, "get_inventory_status", json!({})),
        ],
    );
    assert_eq!(responses.len(), 6);

    let created = &responses[0]["result"]["structuredContent"]["result"];
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["quantity"], 10);
    let product_id = created["product_id"].as_str().unwrap().to_string();

    assert_eq!(responses[1]["result"]["structuredContent"]["result"]["quantity"], 7);

    assert_eq!(responses[2]["result"]["isError"], true);
    assert_eq!(
        responses[2]["result"]["content"][0]["text"],
        "Cannot process adjustment. Stock level for 'Widget' would be negative (-93)."
    );

    let status = &responses[3]["result"]["structuredContent"]["result"];
    assert_eq!(status.as_array().unwrap().len(), 1);
    assert_eq!(status[0]["quantity"], 7);

    let removed = &responses[4]["result"]["structuredContent"]["result"];
    assert_eq!(removed["status"], "success");
    assert_eq!(
        removed["message"],
        format!("Product 'Widget' (ID: {product_id}) has been removed from inventory.")
    );

    assert_eq!(responses[5]["result"]["structuredContent"]["result"], json!([]));
    assert!(service.list_or_search(None).unwrap().is_empty());
}

#[test]
fn ambiguous_adjustment_is_a_tool_error() {
    let dir = TempDir::new().unwrap();
    let (session, service) = session(&dir);
    service.create("Blue Pen", 5, 1.0).unwrap();
    service.create("Blue Pencil", 3, 0.5).unwrap();

    let responses = run_lines(
        &session,
        &[
            call(1, "adjust_stock_quantity", json!({"product_name": "Blue", "quantity_change": 1})),
            call(2, "adjust_stock_quantity", json!({"product_name": "Pencil", "quantity_change": 1})),
        ],
    );

    assert_eq!(responses[0]["result"]["isError"], true);
    let text = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("'Blue Pen'") && text.contains("'Blue Pencil'"), "{text}");
    assert_eq!(responses[1]["result"]["structuredContent"]["result"]["quantity"], 4);
}

#[test]
fn status_with_unmatched_name_is_a_tool_error() {
    let dir = TempDir::new().unwrap();
    let (session, _) = session(&dir);

    let response = session
        .handle_line(&call(9, "get_inventory_status", json!({"product_name": "chair"})))
        .unwrap();
    assert_eq!(response["result"]["isError"], true);
    assert_eq!(
        response["result"]["content"][0]["text"],
        "No products found matching 'chair'."
    );
}

#[test]
fn protocol_errors_use_json_rpc_codes() {
    let dir = TempDir::new().unwrap();
    let (session, _) = session(&dir);

    let parse = session.handle_line("{not json").unwrap();
    assert_eq!(parse["error"]["code"], -32700);
    assert_eq!(parse["id"], Value::Null);

    let unknown_method = session
        .handle_line(&json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}).to_string())
        .unwrap();
    assert_eq!(unknown_method["error"]["code"], -32601);

    let unknown_tool = session.handle_line(&call(2, "drop_table", json!({}))).unwrap();
    assert_eq!(unknown_tool["error"]["code"], -32602);

    let bad_args = session
        .handle_line(&call(3, "add_new_product", json!({"name": "Widget"})))
        .unwrap();
    assert_eq!(bad_args["error"]["code"], -32602);
    assert_eq!(bad_args["id"], 3);

    let ping = session
        .handle_line(&json!({"jsonrpc": "2.0", "id": "p", "method": "ping"}).to_string())
        .unwrap();
    assert_eq!(ping["result"], json!({}));
    assert_eq!(ping["id"], "p");
}

#[test]
fn null_id_is_answered_but_missing_id_is_not() {
    let dir = TempDir::new().unwrap();
    let (session, _) = session(&dir);

    let answered = session
        .handle_line(&json!({"jsonrpc": "2.0", "id": null, "method": "ping"}).to_string())
        .unwrap();
    assert_eq!(answered.get("id"), Some(&Value::Null));
    assert_eq!(answered["result"], json!({}));

    let silent = session.handle_line(&json!({"jsonrpc": "2.0", "method": "ping"}).to_string());
    assert!(silent.is_none());
}
