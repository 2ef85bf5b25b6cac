//! End-to-end: extract a schema document, start the server from config, and
//! call both tools in-process.

use dbquery_mcp::{extract::extract_schema, DbQueryConfig, DbQueryMcpServer};
use mcp_common::{first_text, EmbeddableMcp};
use rusqlite::Connection;
use std::path::Path;

fn create_chinook_subset(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE Artist (
            ArtistId INTEGER PRIMARY KEY,
            Name TEXT NOT NULL
        );
        CREATE TABLE Album (
            AlbumId INTEGER PRIMARY KEY,
            Title NVARCHAR(160) NOT NULL,
            ArtistId INTEGER NOT NULL,
            FOREIGN KEY (ArtistId) REFERENCES Artist (ArtistId)
        );
        CREATE TABLE Genre (
            GenreId INTEGER PRIMARY KEY,
            Name NVARCHAR(120)
        );
        INSERT INTO Artist (ArtistId, Name) VALUES (1, 'AC/DC'), (2, 'Accept');
        INSERT INTO Album (AlbumId, Title, ArtistId) VALUES
            (1, 'For Those About To Rock We Salute You', 1),
            (2, 'Balls to the Wall', 2),
            (3, 'Restless and Wild', 2);
        INSERT INTO Genre (GenreId, Name) VALUES (1, NULL);
        "#,
    )
    .unwrap();
}

async fn call(server: &DbQueryMcpServer, tool: &str, params: serde_json::Value) -> String {
    let result = server.call_tool(tool, params).await.unwrap();
    first_text(&result).unwrap().to_string()
}

#[tokio::test]
async fn extracted_schema_is_served_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("chinook.db");
    let schema = dir.path().join("SCHEMA.md");
    create_chinook_subset(&db);

    let summary = extract_schema(&db, &schema).unwrap();
    assert_eq!(summary.tables, 3);

    let config = DbQueryConfig::with_paths(&db, &schema);
    let server = DbQueryMcpServer::from_config(&config).unwrap();

    let text = call(&server, "get_database_schema", serde_json::json!({})).await;
    assert_eq!(text, std::fs::read_to_string(&schema).unwrap());

    assert!(text.contains(
        "## Artist\n\n\
         | Column | Type | Not Null | Default | Primary Key |\n\
         |--------|------|----------|---------|-------------|\n\
         | ArtistId | INTEGER | No | NULL | Yes |\n\
         | Name | TEXT | Yes | NULL | No |\n\n"
    ));
    assert!(text.contains("**Foreign Keys:**\n- ArtistId -> Artist.ArtistId\n"));
    // Artist and Genre have no foreign keys
    assert_eq!(text.matches("**Foreign Keys:**").count(), 1);
}

#[tokio::test]
async fn queries_render_markdown_tables() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("chinook.db");
    let schema = dir.path().join("SCHEMA.md");
    create_chinook_subset(&db);
    extract_schema(&db, &schema).unwrap();

    let server = DbQueryMcpServer::from_config(&DbQueryConfig::with_paths(&db, &schema)).unwrap();

    let text = call(
        &server,
        "execute_sql_query",
        serde_json::json!({
            "sql_query": "SELECT ar.Name, COUNT(*) AS Albums FROM Album al \
                          JOIN Artist ar ON ar.ArtistId = al.ArtistId \
                          GROUP BY ar.Name ORDER BY ar.Name"
        }),
    )
    .await;
    assert_eq!(
        text,
        "| Name | Albums |\n| --- | --- |\n| AC/DC | 1 |\n| Accept | 2 |\n\n*2 row(s) returned*"
    );

    let text = call(
        &server,
        "execute_sql_query",
        serde_json::json!({ "sql_query": "SELECT GenreId, Name FROM Genre" }),
    )
    .await;
    assert!(text.contains("| 1 | NULL |"));

    let text = call(
        &server,
        "execute_sql_query",
        serde_json::json!({ "sql_query": "SELECT * FROM NoSuchTable" }),
    )
    .await;
    assert!(text.starts_with("Error:"));
}

#[tokio::test]
async fn concurrent_queries_use_independent_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("chinook.db");
    let schema = dir.path().join("SCHEMA.md");
    create_chinook_subset(&db);
    extract_schema(&db, &schema).unwrap();

    let server = DbQueryMcpServer::from_config(&DbQueryConfig::with_paths(&db, &schema)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let server = server.clone();
            tokio::spawn(async move { server.run_query("SELECT COUNT(*) AS n FROM Album").await })
        })
        .collect();

    for handle in handles {
        let table = handle.await.unwrap().unwrap();
        assert!(table.contains("| 3 |"));
    }
}

#[test]
fn server_refuses_to_start_without_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("chinook.db");
    create_chinook_subset(&db);

    let config = DbQueryConfig::with_paths(&db, dir.path().join("SCHEMA.md"));
    assert!(DbQueryMcpServer::from_config(&config).is_err());
}
