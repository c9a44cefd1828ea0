mod common;

use axum::http::Method;
use serde_json::json;

use caducados_client::Reviewer;
use caducados_core::ChangeId;
use caducados_inventory::ReviewProgress;

use common::{FAMILY, Fake, TestServer, change, login};

fn changes(records: Vec<serde_json::Value>) -> Fake {
    Fake {
        changes: records,
        ..Fake::default()
    }
}

#[tokio::test]
async fn advancing_reconciles_most_recent_first_then_completes() {
    let server = TestServer::spawn(changes(vec![
        change(1, "2024-06-06T08:00:00Z", false),
        change(2, "2024-06-06T10:00:00Z", false),
        change(3, "2024-06-06T09:00:00Z", false),
    ]))
    .await;
    let backend = server.backend();
    let session = login(&backend).await;
    server.forget_calls();
    let mut reviewer = Reviewer::open(&backend, &session, FAMILY).await.unwrap();
    assert_eq!(reviewer.progress(), ReviewProgress::Browsing { index: 0, total: 3 });
    assert_eq!(reviewer.current().unwrap().id, ChangeId::new(2));

    assert_eq!(reviewer.advance().await.unwrap(), ReviewProgress::Browsing { index: 1, total: 3 });
    assert_eq!(reviewer.advance().await.unwrap(), ReviewProgress::Browsing { index: 2, total: 3 });
    assert_eq!(reviewer.advance().await.unwrap(), ReviewProgress::Complete);

    let writes = server.writes();
    let paths: Vec<&str> = writes.iter().map(|c| c.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/api/contrastar/2/contrastado",
            "/api/contrastar/3/contrastado",
            "/api/contrastar/1/contrastado",
        ]
    );
    assert!(writes.iter().all(|c| c.method == Method::PUT));
    assert!(writes.iter().all(|c| c.body == Some(json!({ "contrastado": true }))));
    assert!(reviewer.records().iter().all(|r| r.is_reconciled()));
}

#[tokio::test]
async fn skip_and_already_reconciled_records_send_nothing() {
    let server = TestServer::spawn(changes(vec![
        change(1, "2024-06-06T08:00:00Z", false),
        change(2, "2024-06-06T09:00:00Z", true),
    ]))
    .await;
    let backend = server.backend();
    let session = login(&backend).await;
    let mut reviewer = Reviewer::open(&backend, &session, FAMILY).await.unwrap();

    assert_eq!(reviewer.advance().await.unwrap(), ReviewProgress::Browsing { index: 1, total: 2 });
    assert_eq!(reviewer.skip(), ReviewProgress::Complete);
    assert!(server.writes().iter().all(|c| c.path == "/api/auth/login"));
    assert!(!reviewer.records()[1].is_reconciled());
}

#[tokio::test]
async fn failed_reconcile_keeps_the_current_record() {
    let mut fake = changes(vec![change(7, "2024-06-06T08:00:00Z", false)]);
    fake.fail_reconcile.insert(7);
    let server = TestServer::spawn(fake).await;
    let backend = server.backend();
    let session = login(&backend).await;
    let mut reviewer = Reviewer::open(&backend, &session, FAMILY).await.unwrap();

    assert!(reviewer.advance().await.is_err());
    assert_eq!(reviewer.progress(), ReviewProgress::Browsing { index: 0, total: 1 });
    assert!(!reviewer.current().unwrap().is_reconciled());
}

#[tokio::test]
async fn family_path_is_percent_encoded() {
    let server = TestServer::spawn(Fake::default()).await;
    let backend = server.backend();
    let session = login(&backend).await;
    let reviewer = Reviewer::open(&backend, &session, FAMILY).await.unwrap();

    assert_eq!(reviewer.progress(), ReviewProgress::Complete);
    let last = server.calls().pop().unwrap();
    assert_eq!(last.path, "/api/contrastar/tienda/3718/familia/L%C3%A1cteos%20Mural/hoy");
}
