//! Catalog reads against a live Postgres.
//!
//! Run with `RELMAP_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

use pretty_assertions::assert_eq;
use relmap_adapter_pg::{PgCatalog, PgCatalogOptions};
use relmap_relations::{
    find_relationships, CatalogBrowser, CatalogReader, TableFilter, Tier,
};

const SCHEMA: &str = "relmap_it";

const FIXTURE: &[&str] = &[
    "DROP SCHEMA IF EXISTS relmap_it CASCADE",
    "CREATE SCHEMA relmap_it",
    "CREATE TABLE relmap_it.customers (id integer PRIMARY KEY, name text)",
    "CREATE TABLE relmap_it.customer (id integer PRIMARY KEY)",
    "CREATE TABLE relmap_it.regions (code text, zone integer, PRIMARY KEY (code, zone))",
    "CREATE TABLE relmap_it.vendors (id integer PRIMARY KEY)",
    "CREATE TABLE relmap_it.orders (
        id integer PRIMARY KEY,
        customer_id integer CONSTRAINT fk_party REFERENCES relmap_it.customers (id),
        region_code text,
        region_zone integer,
        note varchar(40) DEFAULT 'none',
        CONSTRAINT orders_region_fkey FOREIGN KEY (region_code, region_zone)
            REFERENCES relmap_it.regions (code, zone)
    )",
    "CREATE TABLE relmap_it.invoices (
        id integer PRIMARY KEY,
        vendor_id integer CONSTRAINT fk_party REFERENCES relmap_it.vendors (id)
    )",
    "CREATE VIEW relmap_it.order_totals AS SELECT id FROM relmap_it.orders",
];

async fn catalog() -> Option<PgCatalog> {
    let url = std::env::var("RELMAP_TEST_DATABASE_URL").ok()?;
    let catalog = PgCatalog::connect(&url, PgCatalogOptions::default())
        .await
        .expect("connect");
    for statement in FIXTURE {
        sqlx::query(statement)
            .execute(catalog.pool())
            .await
            .expect("fixture");
    }
    Some(catalog)
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn lists_columns_in_declaration_order() {
    let Some(catalog) = catalog().await else { return };

    let columns = catalog.list_columns(SCHEMA, "orders").await.unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "customer_id", "region_code", "region_zone", "note"]
    );
    assert_eq!(columns[1].data_type, "integer");

    assert!(catalog.list_columns(SCHEMA, "missing").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn pairs_multi_column_foreign_keys_by_position() {
    let Some(catalog) = catalog().await else { return };

    let fks = catalog.list_explicit_foreign_keys(SCHEMA, "orders").await.unwrap();
    let mapped: Vec<_> = fks
        .iter()
        .map(|fk| {
            (
                fk.source_column.as_str(),
                fk.target_table.as_str(),
                fk.target_column.as_str(),
                fk.position,
            )
        })
        .collect();

    assert_eq!(
        mapped,
        vec![
            ("customer_id", "customers", "id", 1),
            ("region_code", "regions", "code", 1),
            ("region_zone", "regions", "zone", 2),
        ]
    );
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn shared_constraint_names_stay_with_their_table() {
    let Some(catalog) = catalog().await else { return };

    let orders = catalog.list_explicit_foreign_keys(SCHEMA, "orders").await.unwrap();
    let party: Vec<_> = orders
        .iter()
        .filter(|fk| fk.constraint_name == "fk_party")
        .map(|fk| (fk.source_column.as_str(), fk.target_table.as_str()))
        .collect();
    assert_eq!(party, vec![("customer_id", "customers")]);

    let invoices = catalog.list_explicit_foreign_keys(SCHEMA, "invoices").await.unwrap();
    let mapped: Vec<_> = invoices
        .iter()
        .map(|fk| {
            (
                fk.constraint_name.as_str(),
                fk.source_column.as_str(),
                fk.target_schema.as_str(),
                fk.target_table.as_str(),
                fk.target_column.as_str(),
            )
        })
        .collect();
    assert_eq!(mapped, vec![("fk_party", "vendor_id", SCHEMA, "vendors", "id")]);
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn lists_relations_with_filter() {
    let Some(catalog) = catalog().await else { return };

    let all = catalog
        .list_relations(SCHEMA, &TableFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 7);

    let orders = catalog
        .list_relations(SCHEMA, &TableFilter::name_like("ORDER*"))
        .await
        .unwrap();
    let names: Vec<_> = orders.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["order_totals", "orders"]);
    assert_eq!(orders[0].table_type, "VIEW");

    let sensitive = catalog
        .list_relations(SCHEMA, &TableFilter::name_like("ORDER*").case_sensitive(true))
        .await
        .unwrap();
    assert!(sensitive.is_empty());

    assert!(catalog.list_schemas().await.unwrap().contains(&SCHEMA.to_string()));
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn describes_columns() {
    let Some(catalog) = catalog().await else { return };

    let columns = catalog.describe_table(SCHEMA, "orders").await.unwrap();
    let note = columns.iter().find(|c| c.name == "note").unwrap();
    assert!(note.is_nullable);
    assert_eq!(note.character_maximum_length, Some(40));
    assert!(note.column_default.as_deref().unwrap().contains("none"));

    let id = columns.iter().find(|c| c.name == "id").unwrap();
    assert!(!id.is_nullable);
}

#[tokio::test]
#[ignore = "requires RELMAP_TEST_DATABASE_URL"]
async fn finds_relationships_end_to_end() {
    let Some(catalog) = catalog().await else { return };

    let report = find_relationships(&catalog, SCHEMA, "orders").await.unwrap();
    assert_eq!(report.explicit().len(), 3);
    assert!(report
        .implied()
        .iter()
        .any(|c| c.source_column == "customer_id"
            && c.target_table == "customer"
            && c.tier == Tier::ExactMatch));
}
