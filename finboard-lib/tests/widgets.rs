//! Integration tests for widget refreshes driven by filter changes.

mod common;

use std::time::Duration;

use common::MockServer;
use common::Reply;
use finboard_lib::DashboardClient;
use finboard_lib::WidgetLoader;
use finboard_lib::WidgetState;
use finboard_lib::filter::FilterBoard;
use finboard_lib::filter::FilterDescriptor;
use finboard_lib::filter::FilterKind;
use finboard_lib::filter::FilterTarget;
use finboard_lib::filter::FilterValue;
use finboard_lib::model::Value;
use finboard_lib::query::QueryParams;
use serde_json::json;

/// Echoes the search term back; the term "slow" is answered late.
async fn echo_server() -> MockServer {
    MockServer::start(|seen| {
        let widget = seen.path.split('/').nth(4).unwrap_or_default().to_string();
        let term = seen.param("invoices.memo__icontains").unwrap_or_default().to_string();
        let reply = Reply::json(json!([{ "widget": widget, "term": term }]));
        if term == "slow" {
            reply.after(Duration::from_millis(300))
        } else {
            reply
        }
    })
    .await
}

fn client(server: &MockServer) -> DashboardClient {
    DashboardClient::builder().url(server.url()).build().unwrap()
}

fn board() -> FilterBoard {
    FilterBoard::new(vec![
        FilterDescriptor::new("q", "Search", FilterKind::Search)
            .target(FilterTarget::new("invoices", "memo"))
            .widget("w-invoices")
            .widget("w-summary"),
        FilterDescriptor::new("ccy", "Currency", FilterKind::SingleSelect)
            .target(FilterTarget::new("payments", "ccy"))
            .widget("w-payments"),
    ])
    .unwrap()
}

fn term_of(state: &WidgetState) -> Option<Value> {
    state.rows().and_then(|rows| rows.first()).and_then(|row| row.get("term").cloned())
}

#[tokio::test]
async fn test_refresh_loads_every_widget_in_scope() {
    let server = echo_server().await;
    let client = client(&server);
    let loader = WidgetLoader::new();
    let mut board = board();

    let plan = board.set("q", FilterValue::Text("taxi".into())).unwrap();
    let updated = loader.refresh(&client, &board, &plan).await;

    assert_eq!(updated, 2);
    assert_eq!(term_of(&loader.state("w-invoices")), Some(Value::from("taxi")));
    assert_eq!(term_of(&loader.state("w-summary")), Some(Value::from("taxi")));
    assert_eq!(loader.state("w-payments"), WidgetState::Idle);

    let seen = server.seen();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|s| s.param("payments.ccy__exact").is_none()));
}

#[tokio::test]
async fn test_late_response_does_not_overwrite_newer_one() {
    let server = echo_server().await;
    let client = client(&server);
    let loader = WidgetLoader::new();

    let slow_params = QueryParams::new().with("invoices.memo__icontains", "slow");
    let fast_params = QueryParams::new().with("invoices.memo__icontains", "fast");

    let slow = loader.load("w-invoices", || client.widget_data("w-invoices", &slow_params));
    let fast = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        loader
            .load("w-invoices", || client.widget_data("w-invoices", &fast_params))
            .await
    };

    let (slow_applied, fast_applied) = tokio::join!(slow, fast);
    assert!(!slow_applied);
    assert!(fast_applied);
    assert_eq!(term_of(&loader.state("w-invoices")), Some(Value::from("fast")));

    // Give the abandoned request time to finish; the state must not change.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(term_of(&loader.state("w-invoices")), Some(Value::from("fast")));
}

#[tokio::test]
async fn test_debounced_changes_collapse_into_one_fetch() {
    let server = echo_server().await;
    let client = client(&server);
    let loader = WidgetLoader::new();
    let mut board = FilterBoard::new(vec![
        FilterDescriptor::new("q", "Search", FilterKind::Search)
            .debounce(100)
            .target(FilterTarget::new("invoices", "memo"))
            .widget("w-invoices"),
    ])
    .unwrap();

    let first_plan = board.set("q", FilterValue::Text("ta".into())).unwrap();
    let first_board = board.clone();
    let second_plan = board.set("q", FilterValue::Text("taxi".into())).unwrap();

    let first = loader.refresh(&client, &first_board, &first_plan);
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        loader.refresh(&client, &board, &second_plan).await
    };

    let (first_updated, second_updated) = tokio::join!(first, second);
    assert_eq!(first_updated, 0);
    assert_eq!(second_updated, 1);
    assert_eq!(server.seen().len(), 1);
    assert_eq!(term_of(&loader.state("w-invoices")), Some(Value::from("taxi")));
}

#[tokio::test]
async fn test_failed_fetch_is_scoped_to_widget() {
    let server = MockServer::start(|seen| {
        if seen.path.contains("w-broken") {
            Reply::status(500, "boom")
        } else {
            Reply::json(json!([]))
        }
    })
    .await;
    let client = client(&server);
    let loader = WidgetLoader::new();
    let params = QueryParams::new();

    loader
        .load("w-broken", || client.widget_data("w-broken", &params))
        .await;
    loader.load("w-ok", || client.widget_data("w-ok", &params)).await;

    assert!(matches!(loader.state("w-broken"), WidgetState::Failed { .. }));
    assert_eq!(loader.state("w-ok").rows().map(<[_]>::len), Some(0));
}
