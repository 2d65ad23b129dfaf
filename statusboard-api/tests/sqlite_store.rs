//! Tests for the SQLite-backed status store.
//!
//! Each test uses its own temporary database file.

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;

use statusboard_api::config::DEFAULT_STATUS_KEY;
use statusboard_api::models::StatusRecord;
use statusboard_api::orm::{establish_connection, kv};
use statusboard_api::testing::{temp_database_url, test_rocket_with_sqlite};

async fn post_status(client: &Client, body: &'static str) -> Status {
    client
        .post("/api/status")
        .header(ContentType::JSON)
        .body(body)
        .dispatch()
        .await
        .status()
}

async fn read_status(client: &Client) -> StatusRecord {
    let response = client.get("/api/status").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("valid StatusRecord JSON")
}

#[tokio::test]
async fn test_sqlite_empty_database_reads_default() {
    let url = temp_database_url();
    let client = Client::tracked(test_rocket_with_sqlite(&url))
        .await
        .expect("valid rocket instance");

    assert_eq!(read_status(&client).await.status, "unknown");
}

#[tokio::test]
async fn test_sqlite_write_survives_restart() {
    let url = temp_database_url();

    {
        let client = Client::tracked(test_rocket_with_sqlite(&url))
            .await
            .expect("valid rocket instance");
        assert_eq!(
            post_status(&client, r#"{"status":"ONLINE","message":"persisted"}"#).await,
            Status::Ok
        );
    }

    let client = Client::tracked(test_rocket_with_sqlite(&url))
        .await
        .expect("valid rocket instance");
    let record = read_status(&client).await;
    assert_eq!(record.status, "ONLINE");
    assert_eq!(record.message, "persisted");
}

#[tokio::test]
async fn test_sqlite_write_replaces_single_row() {
    let url = temp_database_url();
    let client = Client::tracked(test_rocket_with_sqlite(&url))
        .await
        .expect("valid rocket instance");

    post_status(&client, r#"{"status":"ONLINE","message":"one"}"#).await;
    post_status(&client, r#"{"status":"OFFLINE","message":"two"}"#).await;

    let mut conn = establish_connection(&url).expect("database connection");
    let raw = kv::get_value(&mut conn, DEFAULT_STATUS_KEY)
        .expect("query")
        .expect("stored value");
    assert_eq!(raw, r#"{"status":"OFFLINE","message":"two"}"#);
    assert_eq!(read_status(&client).await.message, "two");
}

#[tokio::test]
async fn test_sqlite_value_written_outside_the_service_is_served() {
    let url = temp_database_url();
    {
        let mut conn = establish_connection(&url).expect("database connection");
        kv::put_value(
            &mut conn,
            DEFAULT_STATUS_KEY,
            r#"{"status":"OFFLINE","message":"set by operator"}"#,
        )
        .expect("direct write");
    }

    let client = Client::tracked(test_rocket_with_sqlite(&url))
        .await
        .expect("valid rocket instance");
    assert_eq!(read_status(&client).await.message, "set by operator");
}

#[tokio::test]
async fn test_sqlite_corrupt_value_returns_500() {
    let url = temp_database_url();
    {
        let mut conn = establish_connection(&url).expect("database connection");
        kv::put_value(&mut conn, DEFAULT_STATUS_KEY, "{\"status\":").expect("direct write");
    }

    let client = Client::tracked(test_rocket_with_sqlite(&url))
        .await
        .expect("valid rocket instance");
    let response = client.get("/api/status").dispatch().await;
    assert_eq!(response.status(), Status::InternalServerError);

    // Writing a valid record repairs it
    assert_eq!(
        post_status(&client, r#"{"status":"ONLINE","message":"fixed"}"#).await,
        Status::Ok
    );
    assert_eq!(read_status(&client).await.message, "fixed");
}
