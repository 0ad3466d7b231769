use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use engine::{CurrencyCode, CurrencyService, FixedRate, Ledger};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{AppState, Gateway, router};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};
use tower::ServiceExt;

const DATE: &str = "2024-05-14";

async fn state() -> AppState {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let ledger = Ledger::builder().database(db).build().await.unwrap();
    let currency = CurrencyService::new(
        CurrencyCode::try_from("USD").unwrap(),
        CurrencyCode::try_from("INR").unwrap(),
        true,
        Arc::new(FixedRate(83.5)),
    );
    AppState {
        ledger,
        currency: Arc::new(currency),
    }
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn expense(price: &str, kind: &str, mode: &str) -> Value {
    json!({
        "date": DATE,
        "personName": "Asha",
        "bankName": "Cash-Wallet",
        "additionalInfo": "",
        "category": "Home Expenses",
        "itemName": "Vegetables",
        "quantity": "1",
        "unit": "KG",
        "price": price,
        "type": kind,
        "paymentMode": mode,
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_both_land() {
    let app = router(state().await);
    let before = json_body(send(&app, get(&format!("/api/expenses?date={DATE}"))).await).await;
    assert_eq!(before.as_array().unwrap().len(), 0);

    let mut tasks = Vec::new();
    for price in ["10", "20"] {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            send(&app, post("/api/addExpense", expense(price, "DEBIT", "Cash"))).await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap().status(), StatusCode::OK);
    }

    let after = json_body(send(&app, get(&format!("/api/expenses?date={DATE}"))).await).await;
    assert_eq!(after.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn wallet_scenario_summary() {
    let app = router(state().await);
    let res = send(
        &app,
        post(
            "/api/addBank",
            json!({ "date": DATE, "bankName": "Cash-Wallet", "opCash": 100, "opCheque": "0", "opCard": "" }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    for body in [
        expense("50", "CREDIT", "Cash"),
        expense("20", "DEBIT", "cash"),
        expense("30", "CREDIT", "Cheque"),
    ] {
        assert_eq!(send(&app, post("/api/addExpense", body)).await.status(), StatusCode::OK);
    }

    let summary = json_body(send(&app, get(&format!("/api/summary?date={DATE}"))).await).await;
    assert_eq!(summary["grand_total"]["total"], "160.00");
    assert_eq!(summary["grand_total"]["per_channel"]["cash"], "130.00");
    assert_eq!(summary["grand_total"]["per_channel"]["cheque"], "30.00");
    assert_eq!(summary["grand_total"]["per_channel"]["card"], "0.00");

    let banks = json_body(send(&app, get(&format!("/api/banks?date={DATE}"))).await).await;
    assert_eq!(banks[0]["bankName"], "Cash-Wallet");
    assert_eq!(banks[0]["openingCash"], "100.00");
}

#[tokio::test]
async fn invalid_channel_is_a_request_error() {
    let app = router(state().await);
    let res = send(&app, post("/api/addExpense", expense("10", "DEBIT", "Barter"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("Barter"));

    let res = send(&app, post("/api/addExpense", expense("10", "SIDEWAYS", "Cash"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let listed = json_body(send(&app, get(&format!("/api/expenses?date={DATE}"))).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn oversized_amounts_do_not_poison_the_day() {
    let app = router(state().await);
    for body in [
        expense("1e300", "CREDIT", "Cash"),
        expense("1e300", "CREDIT", "Cash"),
        expense("92233720368547758.07", "DEBIT", "Cash"),
        expense("10", "CREDIT", "Cash"),
    ] {
        assert_eq!(send(&app, post("/api/addExpense", body)).await.status(), StatusCode::OK);
    }
    let mut numeric = expense("0", "CREDIT", "Cash");
    numeric["price"] = json!(1e300);
    assert_eq!(send(&app, post("/api/addExpense", numeric)).await.status(), StatusCode::OK);

    let res = send(&app, get(&format!("/api/summary?date={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let summary = json_body(res).await;
    assert_eq!(summary["grand_total"]["total"], "10.00");

    let listed = json_body(send(&app, get(&format!("/api/expenses?date={DATE}"))).await).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 5);
    let zeroed = listed.iter().filter(|entry| entry["totalPrice"] == "0.00").count();
    assert_eq!(zeroed, 4);

    let res = send(&app, get(&format!("/api/history?start={DATE}&end={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["net"], "10.00");
    let res = send(&app, get(&format!("/api/export?type=pdf&screen=daily&date={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn history_span_is_capped() {
    let app = router(state().await);
    let res = send(&app, get("/api/history?start=1900-01-01&end=2099-12-31")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].as_str().unwrap().contains("days"));

    let res = send(
        &app,
        post("/api/history/clear", json!({ "start": "0001-01-01", "end": "9999-12-31" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = send(
        &app,
        get("/api/export?type=csv&screen=hist&start=2000-01-01&end=2024-12-31"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = send(&app, get("/api/history?start=2024-01-01&end=2024-12-31")).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_fields_and_routes_are_rejected() {
    let app = router(state().await);
    let res = send(
        &app,
        post("/api/addBank", json!({ "bankName": "City", "opBitcoin": 1 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(res).await["error"].is_string());

    let res = send(&app, get("/api/nothing")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(&app, get("/api/expenses?date=yesterday")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_twice_succeeds() {
    let app = router(state().await);
    let created = json_body(send(&app, post("/api/addExpense", expense("10", "DEBIT", "Card/UPI"))).await).await;
    let id = created["id"].as_i64().unwrap();

    let first = json_body(send(&app, post("/api/deleteExpense", json!({ "id": id }))).await).await;
    assert_eq!(first["deleted"], true);
    let res = send(&app, post("/api/deleteExpense", json!({ "id": id.to_string() }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["deleted"], false);
}

#[tokio::test]
async fn empty_export_is_no_content() {
    let app = router(state().await);
    for screen in ["daily", "acc", "hist"] {
        let res = send(
            &app,
            get(&format!("/api/export?type=pdf&screen={screen}&date={DATE}")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT, "{screen}");
    }
}

#[tokio::test]
async fn export_is_an_attachment() {
    let app = router(state().await);
    send(&app, post("/api/addExpense", expense("12.50", "DEBIT", "Cash"))).await;

    let res = send(&app, get(&format!("/api/export?type=csv&screen=daily&date={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Daily_14-05-2024.csv\""
    );
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Daily Expense Report"));
    assert!(text.contains("GRAND TOTAL,"));

    let res = send(&app, get(&format!("/api/export?type=pdf&screen=hist&date={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");

    let res = send(&app, get(&format!("/api/export?type=xls&date={DATE}"))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_merges_and_clears() {
    let app = router(state().await);
    send(&app, post("/api/addExpense", expense("10", "DEBIT", "Cash"))).await;
    let transfer = json!({
        "date": DATE, "holder": "Asha", "bank": "City Bank", "accNum": "01",
        "benName": "Ravi", "toBank": "Metro Bank", "toAccNum": "02",
        "amount": "25", "type": "CREDIT", "paymentMode": "Card",
    });
    assert_eq!(send(&app, post("/api/addAccount", transfer)).await.status(), StatusCode::OK);

    let page = json_body(send(&app, get(&format!("/api/history?start={DATE}&end={DATE}"))).await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["net"], "15.00");

    let cleared = json_body(
        send(&app, post("/api/history/clear", json!({ "start": DATE, "end": DATE }))).await,
    )
    .await;
    assert_eq!(cleared["deleted"], 2);
    let accounts = json_body(send(&app, get(&format!("/api/accounts?date={DATE}"))).await).await;
    assert_eq!(accounts.as_array().unwrap().len(), 0);

    let res = send(&app, get("/api/history?start=2024-05-20&end=2024-05-01")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn currency_settings_round_trip() {
    let app = router(state().await);
    let current = json_body(send(&app, get("/api/currency")).await).await;
    assert_eq!(current["base"], "USD");
    assert_eq!(current["available"].as_array().unwrap().len(), 8);

    let res = send(&app, post("/api/setCurrency", json!({ "base": "EUR", "target": "EUR" }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["rate"], 1.0);
    assert_eq!(body["rate_stale"], false);

    let res = send(&app, post("/api/setCurrency", json!({ "base": "E1", "target": "INR" }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = json_body(send(&app, post("/api/conversion", json!({ "enabled": false }))).await).await;
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn gateway_serves_until_stopped() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let gateway = Gateway::start(state().await, listener).await.unwrap();
    let addr = gateway.local_addr();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /api/categories HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("Home Expenses"));

    gateway.stop().await.unwrap();
    assert!(TcpStream::connect(addr).await.is_err());
}
