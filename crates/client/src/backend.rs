//! REST access to the inventory backend.
//!
//! [`Backend`] is the seam the drivers talk to; [`HttpBackend`] is the
//! `reqwest` implementation. Path segments are percent-encoded, so family and
//! module names may carry spaces and accents.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use caducados_core::{ChangeId, ItemId, ProductCode, StoreId};
use caducados_inventory::{
    ChangeRecord, ExpiryUpdate, InventoryItem, ItemPatch, NewItem, Position, ReconcileRequest,
};

use crate::config::ClientConfig;
use crate::error::ClientError;

#[async_trait]
pub trait Backend: Send + Sync {
    /// `Ok` on a 2xx reply, [`ClientError::LoginRejected`] on any other status.
    async fn login(&self, store_id: StoreId, password: &str) -> Result<(), ClientError>;

    async fn item_by_product(&self, store_id: StoreId, code: ProductCode) -> Result<InventoryItem, ClientError>;

    async fn module_items(&self, store_id: StoreId, family: &str, module: &str) -> Result<Vec<InventoryItem>, ClientError>;

    async fn module_names(&self, store_id: StoreId, family: &str) -> Result<Vec<String>, ClientError>;

    async fn store_items(&self, store_id: StoreId) -> Result<Vec<InventoryItem>, ClientError>;

    async fn family_items(&self, store_id: StoreId, family: &str) -> Result<Vec<InventoryItem>, ClientError>;

    async fn update_expiry(&self, id: ItemId, update: &ExpiryUpdate) -> Result<(), ClientError>;

    async fn relocate(&self, id: ItemId, to: &Position) -> Result<(), ClientError>;

    async fn edit_item(&self, id: ItemId, patch: &ItemPatch) -> Result<(), ClientError>;

    async fn delete_item(&self, id: ItemId) -> Result<(), ClientError>;

    async fn create_item(&self, item: &NewItem) -> Result<(), ClientError>;

    async fn family_changes_today(&self, store_id: StoreId, family: &str) -> Result<Vec<ChangeRecord>, ClientError>;

    async fn store_changes_today(&self, store_id: StoreId) -> Result<Vec<ChangeRecord>, ClientError>;

    async fn reconcile(&self, id: ChangeId) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    id: StoreId,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base: config.api_base_url().clone(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Address of a family's printable planogram. The PDF is opened by the
    /// user's viewer, never downloaded here.
    pub fn planogram_url(&self, store_id: StoreId, family: &str) -> Result<Url, ClientError> {
        let store = store_id.to_string();
        self.url(&["api", "planogramas", "tienda", &store, "familia", family, "pdf"])
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let resp = req.send().await.map_err(|e| ClientError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.url(segments)?;
        debug!(%url, "GET");
        let resp = self.send(self.http.get(url)).await?;
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn put_json<B: Serialize + Sync>(&self, segments: &[&str], body: &B) -> Result<(), ClientError> {
        let url = self.url(segments)?;
        debug!(%url, "PUT");
        self.send(self.http.put(url).json(body)).await.map(|_| ())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, store_id: StoreId, password: &str) -> Result<(), ClientError> {
        let url = self.url(&["api", "auth", "login"])?;
        debug!(%url, %store_id, "POST");
        let body = LoginRequest { id: store_id, password };
        match self.send(self.http.post(url).json(&body)).await {
            Ok(_) => Ok(()),
            Err(ClientError::Api(..)) => Err(ClientError::LoginRejected),
            Err(e) => Err(e),
        }
    }

    async fn item_by_product(&self, store_id: StoreId, code: ProductCode) -> Result<InventoryItem, ClientError> {
        let (store, code_s) = (store_id.to_string(), code.to_string());
        self.get_json(&["api", "tornillos", "dto", "tienda", &store, "producto", &code_s])
            .await
            .map_err(|e| match e {
                ClientError::Api(404, _) => ClientError::NotFound(format!("Product {code}")),
                other => other,
            })
    }

    async fn module_items(&self, store_id: StoreId, family: &str, module: &str) -> Result<Vec<InventoryItem>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "tornillos", "dto", "tienda", &store, "familia", family, "modulo", module])
            .await
    }

    async fn module_names(&self, store_id: StoreId, family: &str) -> Result<Vec<String>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "tornillos", "tienda", &store, "familia", family, "modulos"])
            .await
    }

    async fn store_items(&self, store_id: StoreId) -> Result<Vec<InventoryItem>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "tornillos", "tienda", &store]).await
    }

    async fn family_items(&self, store_id: StoreId, family: &str) -> Result<Vec<InventoryItem>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "tornillos", "tienda", &store, "familia", family])
            .await
    }

    async fn update_expiry(&self, id: ItemId, update: &ExpiryUpdate) -> Result<(), ClientError> {
        let id = id.to_string();
        self.put_json(&["api", "tornillos", &id, "fecha-caducidad"], update).await
    }

    async fn relocate(&self, id: ItemId, to: &Position) -> Result<(), ClientError> {
        let id = id.to_string();
        self.put_json(&["api", "tornillos", &id, "posicion"], to).await
    }

    async fn edit_item(&self, id: ItemId, patch: &ItemPatch) -> Result<(), ClientError> {
        let id = id.to_string();
        self.put_json(&["api", "tornillos", "editar", &id], patch).await
    }

    async fn delete_item(&self, id: ItemId) -> Result<(), ClientError> {
        let url = self.url(&["api", "tornillos", &id.to_string()])?;
        debug!(%url, "DELETE");
        self.send(self.http.delete(url)).await.map(|_| ())
    }

    async fn create_item(&self, item: &NewItem) -> Result<(), ClientError> {
        let url = self.url(&["api", "tornillos"])?;
        debug!(%url, "POST");
        self.send(self.http.post(url).json(item)).await.map(|_| ())
    }

    async fn family_changes_today(&self, store_id: StoreId, family: &str) -> Result<Vec<ChangeRecord>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "contrastar", "tienda", &store, "familia", family, "hoy"])
            .await
    }

    async fn store_changes_today(&self, store_id: StoreId) -> Result<Vec<ChangeRecord>, ClientError> {
        let store = store_id.to_string();
        self.get_json(&["api", "contrastar", "tienda", &store, "hoy"]).await
    }

    async fn reconcile(&self, id: ChangeId) -> Result<(), ClientError> {
        let id = id.to_string();
        self.put_json(&["api", "contrastar", &id, "contrastado"], &ReconcileRequest::default())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base: &str) -> HttpBackend {
        HttpBackend::new(&ClientConfig::new(base).unwrap())
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        let url = backend("http://localhost:8080")
            .url(&["api", "tornillos", "tienda", "3718", "familia", "Lácteos Mural", "modulos"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/tornillos/tienda/3718/familia/L%C3%A1cteos%20Mural/modulos"
        );
    }

    #[test]
    fn planogram_url_encodes_the_family() {
        let url = backend("http://localhost:8080")
            .planogram_url(StoreId::new(3718), "Platos Preparados Refrigerados Mural")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/planogramas/tienda/3718/familia/Platos%20Preparados%20Refrigerados%20Mural/pdf"
        );
        let url = backend("http://h").planogram_url(StoreId::new(1), "Charcutería").unwrap();
        assert_eq!(url.path(), "/api/planogramas/tienda/1/familia/Charcuter%C3%ADa/pdf");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = backend("https://host/backend/").url(&["api", "tornillos"]).unwrap();
        assert_eq!(url.as_str(), "https://host/backend/api/tornillos");
    }

    #[test]
    fn slashes_inside_a_segment_do_not_split_it() {
        let url = backend("http://h").url(&["modulo", "A/B"]).unwrap();
        assert_eq!(url.path(), "/modulo/A%2FB");
    }
}
