use std::fs;
use stockroom_core::{
    match_products, open_inventory, InventoryError, InventoryService,
    JsonFileProductRepository, LoadStatus, MemoryProductRepository, Product, ProductRepository,
};
use tempfile::TempDir;

#[test]
fn widget_lifecycle_scenario() {
    let dir = TempDir::new().unwrap();
    let (service, status) = open_inventory(dir.path().join("inventory.json")).unwrap();
    assert_eq!(status, LoadStatus::Missing);

    let widget = service.create("Widget", 10, 2.5).unwrap();
    let all = service.list_or_search(None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].quantity, 10);

    let adjusted = service.adjust("Widget", -3).unwrap();
    assert_eq!(adjusted.product_id, widget.product_id);
    assert_eq!(adjusted.quantity, 7);

    let err = service.adjust("Widget", -100).unwrap_err();
    assert!(matches!(err, InventoryError::InvalidAdjustment { .. }));
    assert_eq!(
        err.to_string(),
        "Cannot process adjustment. Stock level for 'Widget' would be negative (-93)."
    );
    assert_eq!(service.get_product(&widget.product_id).unwrap().quantity, 7);

    let removed = service.remove("Widget").unwrap();
    assert_eq!(removed.product_id, widget.product_id);
    assert_eq!(removed.name, "Widget");
    assert!(service.list_or_search(None).unwrap().is_empty());
}

#[test]
fn ambiguous_names_block_mutations_until_disambiguated() {
    let service = InventoryService::new(MemoryProductRepository::new());
    let pen = service.create("Blue Pen", 5, 1.0).unwrap();
    let pencil = service.create("Blue Pencil", 3, 0.5).unwrap();

    let err = service.adjust("Blue", 1).unwrap_err();
    match &err {
        InventoryError::Ambiguous { query, names } => {
            assert_eq!(query, "Blue");
            assert_eq!(names, &vec!["Blue Pen".to_string(), "Blue Pencil".to_string()]);
        }
        other => panic!("expected ambiguous error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "Ambiguous product name: 'Blue' matched multiple items: ['Blue Pen', 'Blue Pencil']. Please clarify."
    );
    assert!(matches!(
        service.remove("blue"),
        Err(InventoryError::Ambiguous { .. })
    ));
    assert_eq!(service.get_product(&pen.product_id).unwrap().quantity, 5);
    assert_eq!(service.get_product(&pencil.product_id).unwrap().quantity, 3);

    let updated = service.adjust("Pencil", 1).unwrap();
    assert_eq!(updated.product_id, pencil.product_id);
    assert_eq!(updated.quantity, 4);

    // Reads list every match instead of failing.
    assert_eq!(service.list_or_search(Some("blue")).unwrap().len(), 2);
}

#[test]
fn rejected_adjustment_leaves_file_byte_identical() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    let (service, _) = open_inventory(&path).unwrap();
    service.create("Widget", 2, 2.5).unwrap();
    service.create("Gadget", 9, 4.0).unwrap();
    let before = fs::read(&path).unwrap();

    assert!(service.adjust("Widget", -3).is_err());
    assert!(service.adjust("g", -1).is_err());
    assert!(service.remove("missing").is_err());

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn created_product_is_retrievable_by_id_and_name() {
    let service = InventoryService::new(MemoryProductRepository::new());
    let created = service.create("Coffee Mugs (Black)", 25, 8.0).unwrap();

    assert!(created.product_id.starts_with("P-"));
    assert_eq!(created.product_id.len(), 10);
    assert_eq!(service.get_product(&created.product_id).unwrap(), created);
    assert_eq!(
        service.list_or_search(Some("coffee mugs")).unwrap(),
        vec![created.clone()]
    );

    let other = service.create("Coffee Mugs (Black)", 1, 8.0).unwrap();
    assert_ne!(other.product_id, created.product_id);
}

#[test]
fn negative_initial_values_are_accepted_on_create() {
    let service = InventoryService::new(MemoryProductRepository::new());
    let created = service.create("Backorder", -2, -1.5).unwrap();
    assert_eq!(created.quantity, -2);
    assert_eq!(created.unit_price, -1.5);

    // A restock that stays negative is still rejected.
    assert!(matches!(
        service.adjust("Backorder", 1),
        Err(InventoryError::InvalidAdjustment { .. })
    ));
    assert_eq!(service.adjust("Backorder", 2).unwrap().quantity, 0);
}

#[test]
fn quantities_stay_non_negative_after_each_successful_adjustment() {
    let service = InventoryService::new(MemoryProductRepository::new());
    service.create("Widget", 3, 1.0).unwrap();

    for change in [-1, -1, -5, 4, -6, -2, 10, -12, -1] {
        let _ = service.adjust("Widget", change);
        for product in service.list_or_search(None).unwrap() {
            assert!(product.quantity >= 0, "negative stock after change {change}");
        }
    }
}

#[test]
fn every_operation_sees_changes_written_by_another_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    let (first, _) = open_inventory(&path).unwrap();
    let (second, _) = open_inventory(&path).unwrap();

    let created = first.create("Widget", 10, 2.5).unwrap();
    assert_eq!(second.adjust("widget", 5).unwrap().quantity, 15);
    assert_eq!(first.get_product(&created.product_id).unwrap().quantity, 15);

    second.remove("Widget").unwrap();
    assert!(first.list_or_search(None).unwrap().is_empty());
}

#[test]
fn corrupt_file_is_discarded_and_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    fs::write(&path, "not json").unwrap();

    let (service, status) = open_inventory(&path).unwrap();
    assert!(status.is_recovered());
    assert!(service.refresh().unwrap().is_recovered());
    assert!(service.list_or_search(None).unwrap().is_empty());

    service.create("Widget", 1, 1.0).unwrap();
    assert_eq!(service.refresh().unwrap(), LoadStatus::Loaded { count: 1 });
}

#[test]
fn fatal_load_error_fails_the_operation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.json");
    let (service, _) = open_inventory(&path).unwrap();
    service.create("Widget", 1, 1.0).unwrap();

    fs::write(&path, r#"{"P-1": {"name": "half a record"}}"#).unwrap();
    assert!(matches!(
        service.list_or_search(None),
        Err(InventoryError::Repo(_))
    ));
    assert!(matches!(
        service.create("Gadget", 1, 1.0),
        Err(InventoryError::Repo(_))
    ));
    // The broken file is not overwritten by the failed create.
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        r#"{"P-1": {"name": "half a record"}}"#
    );
}

#[test]
fn resolver_empty_query_equals_all() {
    let mut repo = JsonFileProductRepository::new("unused.json");
    repo.table_mut()
        .insert(Product::with_id("P-1", "Widget", 1, 1.0));
    repo.table_mut()
        .insert(Product::with_id("P-2", "widget XL", 1, 1.0));

    assert_eq!(match_products(repo.table(), Some("")), repo.all());
    assert_eq!(match_products(repo.table(), Some("WIDGET")).len(), 2);
    assert_eq!(match_products(repo.table(), Some("xl")).len(), 1);
}

#[test]
fn health_counts_products() {
    let service = InventoryService::new(MemoryProductRepository::new());
    service.create("Widget", 1, 1.0).unwrap();
    service.create("Gadget", 1, 1.0).unwrap();

    let health = service.health().unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.total_products, 2);
}

#[test]
fn created_products_never_share_an_id() {
    let service = InventoryService::new(MemoryProductRepository::new());
    for index in 0..200 {
        service.create(format!("Item {index}"), 1, 1.0).unwrap();
    }

    let mut ids: Vec<String> = service
        .list_or_search(None)
        .unwrap()
        .into_iter()
        .map(|product| product.product_id)
        .collect();
    assert_eq!(ids.len(), 200);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
}
