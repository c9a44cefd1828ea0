#![allow(dead_code)]

//! In-process fake of the inventory backend.
//!
//! Serves canned items and change records, applies writes to its own copy and
//! records every call (method, raw path, body) in arrival order.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Days;
use serde_json::{Value, json};

use caducados_client::{ClientConfig, HttpBackend, Session};
use caducados_core::{StoreId, calendar};

pub const STORE: u64 = 3718;
pub const PASSWORD: &str = "secret";
pub const FAMILY: &str = "Lácteos Mural";

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Fake {
    pub items: Vec<Value>,
    pub modules: Vec<String>,
    pub changes: Vec<Value>,
    pub fail_relocate: HashSet<u64>,
    pub fail_reconcile: HashSet<u64>,
    pub fail_modules: HashSet<String>,
    pub fail_families: HashSet<String>,
    pub calls: Vec<Call>,
}

impl Fake {
    fn record(&mut self, method: Method, uri: &Uri, body: Option<Value>) {
        self.calls.push(Call {
            method,
            path: uri.path().to_string(),
            body,
        });
    }

    fn item_mut(&mut self, id: u64) -> Option<&mut Value> {
        self.items.iter_mut().find(|i| i["id"] == id)
    }
}

type Shared = Arc<Mutex<Fake>>;

pub struct TestServer {
    pub base_url: String,
    pub state: Shared,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(fake: Fake) -> Self {
        let state = Arc::new(Mutex::new(fake));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, state, handle }
    }

    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(&self.config())
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url).unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Every non-GET call, in order.
    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.method != Method::GET).collect()
    }

    pub fn forget_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn item(&self, id: u64) -> Option<Value> {
        self.state.lock().unwrap().items.iter().find(|i| i["id"] == id).cloned()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn login(backend: &HttpBackend) -> Session {
    Session::login(backend, StoreId::new(STORE), PASSWORD).await.unwrap()
}

pub fn days_from_today(days: i64) -> String {
    let today = calendar::today();
    let date = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    calendar::format_ymd(date.unwrap())
}

pub fn item(id: u64, module: &str, row: u32, column: u32) -> Value {
    json!({
        "id": id,
        "tiendaId": STORE,
        "productoCodigo": 10000 + id,
        "familia": FAMILY,
        "nombreModulo": module,
        "fila": row,
        "columna": column,
        "fechaCaducidad": days_from_today(30),
        "fechaRetirada": days_from_today(28),
        "caducidadDias": 2,
        "nombre": format!("Producto {id}"),
        "imagenUrl": null
    })
}

pub fn change(id: u64, changed_at: &str, reconciled: bool) -> Value {
    json!({
        "id": id,
        "tornilloId": id,
        "productoCodigo": 20000 + id,
        "tiendaId": STORE,
        "familia": FAMILY,
        "fechaAnterior": days_from_today(1),
        "fechaNueva": days_from_today(5),
        "fechaCambio": changed_at,
        "contrastado": reconciled
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/tornillos", post(create_item))
        .route("/api/tornillos/:id", delete(delete_item))
        .route("/api/tornillos/:id/fecha-caducidad", put(update_expiry))
        .route("/api/tornillos/:id/posicion", put(relocate))
        .route("/api/tornillos/editar/:id", put(edit_item))
        .route("/api/tornillos/dto/tienda/:store/producto/:code", get(item_by_product))
        .route(
            "/api/tornillos/dto/tienda/:store/familia/:family/modulo/:module",
            get(module_items),
        )
        .route("/api/tornillos/tienda/:store", get(store_items))
        .route("/api/tornillos/tienda/:store/familia/:family", get(family_items))
        .route("/api/tornillos/tienda/:store/familia/:family/modulos", get(module_names))
        .route("/api/contrastar/tienda/:store/hoy", get(store_changes))
        .route("/api/contrastar/tienda/:store/familia/:family/hoy", get(family_changes))
        .route("/api/contrastar/:id/contrastado", put(reconcile))
        .with_state(state)
}

async fn login_handler(State(s): State<Shared>, uri: Uri, Json(body): Json<Value>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::POST, &uri, Some(body.clone()));
    if body["id"] == STORE && body["password"] == PASSWORD {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn create_item(State(s): State<Shared>, uri: Uri, Json(body): Json<Value>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::POST, &uri, Some(body.clone()));
    let id = fake.items.len() as u64 + 1000;
    let mut item = body;
    item["id"] = json!(id);
    fake.items.push(item);
    StatusCode::CREATED
}

async fn delete_item(State(s): State<Shared>, uri: Uri, Path(id): Path<u64>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::DELETE, &uri, None);
    let before = fake.items.len();
    fake.items.retain(|i| i["id"] != id);
    if fake.items.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn update_expiry(State(s): State<Shared>, uri: Uri, Path(id): Path<u64>, Json(body): Json<Value>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::PUT, &uri, Some(body.clone()));
    match fake.item_mut(id) {
        Some(item) => {
            item["fechaCaducidad"] = body["fechaCaducidad"].clone();
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn relocate(State(s): State<Shared>, uri: Uri, Path(id): Path<u64>, Json(body): Json<Value>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::PUT, &uri, Some(body.clone()));
    if fake.fail_relocate.contains(&id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match fake.item_mut(id) {
        Some(item) => {
            item["nombreModulo"] = body["nombreModulo"].clone();
            item["fila"] = body["fila"].clone();
            item["columna"] = body["columna"].clone();
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn edit_item(State(s): State<Shared>, uri: Uri, Path(_id): Path<u64>, Json(body): Json<Value>) -> StatusCode {
    s.lock().unwrap().record(Method::PUT, &uri, Some(body));
    StatusCode::OK
}

async fn item_by_product(
    State(s): State<Shared>,
    uri: Uri,
    Path((_store, code)): Path<(u64, u64)>,
) -> Result<Json<Value>, StatusCode> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    fake.items
        .iter()
        .find(|i| i["productoCodigo"] == code)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn module_items(
    State(s): State<Shared>,
    uri: Uri,
    Path((_store, family, module)): Path<(u64, String, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    if fake.fail_modules.contains(&module) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(
        fake.items
            .iter()
            .filter(|i| i["familia"] == family.as_str() && i["nombreModulo"] == module.as_str())
            .cloned()
            .collect(),
    ))
}

async fn module_names(State(s): State<Shared>, uri: Uri, Path((_store, _family)): Path<(u64, String)>) -> Json<Vec<String>> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    Json(fake.modules.clone())
}

async fn store_items(State(s): State<Shared>, uri: Uri, Path(_store): Path<u64>) -> Json<Vec<Value>> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    Json(fake.items.clone())
}

async fn family_items(
    State(s): State<Shared>,
    uri: Uri,
    Path((_store, family)): Path<(u64, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    if fake.fail_families.contains(&family) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(
        fake.items.iter().filter(|i| i["familia"] == family.as_str()).cloned().collect(),
    ))
}

async fn store_changes(State(s): State<Shared>, uri: Uri, Path(_store): Path<u64>) -> Json<Vec<Value>> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    Json(fake.changes.clone())
}

async fn family_changes(
    State(s): State<Shared>,
    uri: Uri,
    Path((_store, family)): Path<(u64, String)>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let mut fake = s.lock().unwrap();
    fake.record(Method::GET, &uri, None);
    if fake.fail_families.contains(&family) {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(
        fake.changes.iter().filter(|c| c["familia"] == family.as_str()).cloned().collect(),
    ))
}

async fn reconcile(State(s): State<Shared>, uri: Uri, Path(id): Path<u64>, Json(body): Json<Value>) -> StatusCode {
    let mut fake = s.lock().unwrap();
    fake.record(Method::PUT, &uri, Some(body));
    if fake.fail_reconcile.contains(&id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match fake.changes.iter_mut().find(|c| c["id"] == id) {
        Some(change) => {
            change["contrastado"] = json!(true);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}
