//! Shipment (kargo) endpoints

use super::{
    client::ApiClient,
    errors::{ApiError, ApiResult},
    reference::ShipmentStatus,
    types::{ApiEnvelope, ListPayload, Shipment, ShipmentForm, ShipmentSearchParams},
};
use serde_json::{json, Map, Value};
use tracing::error;

pub const LIST_NOT_FOUND_MESSAGE: &str =
    "Kargo API endpoint'i bulunamadı. Backend sunucusu çalışıyor mu kontrol edin.";
pub const SHIPMENT_NOT_FOUND_MESSAGE: &str = "Kargo bulunamadı";
pub const STATUS_UPDATE_FAILED_MESSAGE: &str = "Kargo durumu güncellenemedi";

pub struct ShipmentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ShipmentsApi<'a> {
    pub(super) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Every shipment the caller can see
    pub async fn list(&self) -> ApiResult<Vec<Shipment>> {
        match self.client.get::<ListPayload<Shipment>>("/kargo/").await {
            Ok(payload) => Ok(payload.into_items()),
            Err(err) => {
                error!(error = %err, "Failed to load shipments");
                Err(match err {
                    ApiError::Status { status: 404, .. } => {
                        ApiError::Message(LIST_NOT_FOUND_MESSAGE.to_string())
                    }
                    err if err.is_network() => err,
                    err => ApiError::Message(format!(
                        "Kargo listesi yüklenirken hata oluştu: {}",
                        err
                    )),
                })
            }
        }
    }

    pub async fn get(&self, id: u64) -> ApiResult<Shipment> {
        let envelope: ApiEnvelope<Shipment> = self.client.get(&format!("/kargo/{}/", id)).await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Missing(SHIPMENT_NOT_FOUND_MESSAGE.to_string()))
    }

    pub async fn create(&self, form: &ShipmentForm) -> ApiResult<Shipment> {
        self.client.post("/kargo/", form).await
    }

    pub async fn update(&self, id: u64, form: &ShipmentForm) -> ApiResult<Shipment> {
        self.client.put(&format!("/kargo/{}/", id), form).await
    }

    pub async fn delete(&self, id: u64) -> ApiResult<()> {
        self.client.delete(&format!("/kargo/{}/", id)).await
    }

    pub async fn update_status(&self, id: u64, status: ShipmentStatus) -> ApiResult<Shipment> {
        let envelope: ApiEnvelope<Shipment> = self
            .client
            .patch(&format!("/kargo/{}/update_status/", id), &json!({ "durum": status }))
            .await?;
        envelope.data.ok_or_else(|| {
            ApiError::Message(
                envelope
                    .message
                    .unwrap_or_else(|| STATUS_UPDATE_FAILED_MESSAGE.to_string()),
            )
        })
    }

    /// Look a shipment up by its tracking number
    pub async fn track(&self, kargo_no: &str) -> ApiResult<Shipment> {
        let envelope: ApiEnvelope<Shipment> = self
            .client
            .get_query("/kargo/track/", &[("kargo_no", kargo_no.to_string())])
            .await?;
        envelope
            .data
            .ok_or_else(|| ApiError::Missing(SHIPMENT_NOT_FOUND_MESSAGE.to_string()))
    }

    /// Dashboard counters. Missing data is an empty map.
    pub async fn statistics(&self) -> ApiResult<Map<String, Value>> {
        let envelope: ApiEnvelope<Map<String, Value>> =
            self.client.get("/kargo/statistics/").await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Shipments a volunteer collects, carries or delivers
    pub async fn by_volunteer(&self, volunteer_id: u64) -> ApiResult<Vec<Shipment>> {
        let payload: ListPayload<Shipment> = self
            .client
            .get_query("/kargo/by_volunteer/", &[("volunteer_id", volunteer_id.to_string())])
            .await?;
        Ok(payload.into_items())
    }

    pub async fn search(&self, params: &ShipmentSearchParams) -> ApiResult<Vec<Shipment>> {
        let payload: ListPayload<Shipment> =
            self.client.get_query("/kargo/", &params.to_query()).await?;
        Ok(payload.into_items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::client_for;
    use crate::api::reference::CargoType;
    use httpmock::prelude::*;

    fn shipment_json(id: u64, durum: &str) -> Value {
        json!({
            "id": id,
            "kargo_no": format!("KRG{:06}", id),
            "anonim_gonderici": false,
            "gonderici_ad": "Zeynep",
            "gonderici_soyad": "Arslan",
            "cikis_yeri": "istanbul",
            "cikis_yeri_display": "İstanbul",
            "ulasacagi_yer": "hatay",
            "ulasacagi_yer_display": "Hatay",
            "agirlik": "12.50",
            "hacim": "0.40",
            "miktar": 3,
            "durum": durum,
            "kargo_tipi": "gida",
            "icerik": "Konserve",
            "toplama_gonullusu": 4
        })
    }

    #[tokio::test]
    async fn test_list_accepts_wrapped_and_bare_bodies() {
        let wrapped = MockServer::start_async().await;
        wrapped
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/");
                then.status(200)
                    .json_body(json!({"success": true, "data": [shipment_json(1, "yolda")]}));
            })
            .await;
        let shipments = client_for(&wrapped).shipments().list().await.unwrap();
        assert_eq!(shipments.len(), 1);
        assert_eq!(shipments[0].durum, ShipmentStatus::Yolda);

        let bare = MockServer::start_async().await;
        bare.mock_async(|when, then| {
            when.method(GET).path("/api/v1/kargo/");
            then.status(200)
                .json_body(json!([shipment_json(1, "yolda"), shipment_json(2, "hazirlaniyor")]));
        })
        .await;
        assert_eq!(client_for(&bare).shipments().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_error_messages() {
        let missing = MockServer::start_async().await;
        missing
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/");
                then.status(404);
            })
            .await;
        let err = client_for(&missing).shipments().list().await.unwrap_err();
        assert_eq!(err.to_string(), LIST_NOT_FOUND_MESSAGE);

        let failing = MockServer::start_async().await;
        failing
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/");
                then.status(500).json_body(json!({"detail": "db down"}));
            })
            .await;
        let err = client_for(&failing).shipments().list().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Kargo listesi yüklenirken hata oluştu: HTTP 500: Internal Server Error - db down"
        );
    }

    #[tokio::test]
    async fn test_get_requires_data() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/1/");
                then.status(200)
                    .json_body(json!({"success": true, "data": shipment_json(1, "yolda")}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/2/");
                then.status(200).json_body(json!({"success": false}));
            })
            .await;

        let client = client_for(&server);
        let shipment = client.shipments().get(1).await.unwrap();
        assert_eq!(shipment.kargo_no, "KRG000001");
        assert_eq!(shipment.sender_name(), "Zeynep Arslan");

        let err = client.shipments().get(2).await.unwrap_err();
        assert_eq!(err.to_string(), SHIPMENT_NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn test_update_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/volunteers/auth/status/");
                then.status(200).header("Set-Cookie", "csrftoken=k; Path=/");
            })
            .await;
        let ok = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/api/v1/kargo/1/update_status/")
                    .json_body(json!({"durum": "teslim_edildi"}));
                then.status(200)
                    .json_body(json!({"success": true, "data": shipment_json(1, "teslim_edildi")}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PATCH).path("/api/v1/kargo/2/update_status/");
                then.status(200).json_body(json!({"success": false}));
            })
            .await;

        let client = client_for(&server);
        let shipment = client
            .shipments()
            .update_status(1, ShipmentStatus::TeslimEdildi)
            .await
            .unwrap();
        ok.assert_async().await;
        assert_eq!(shipment.durum, ShipmentStatus::TeslimEdildi);

        let err = client
            .shipments()
            .update_status(2, ShipmentStatus::Yolda)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), STATUS_UPDATE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_track_by_number() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/kargo/track/")
                    .query_param("kargo_no", "KRG000007");
                then.status(200)
                    .json_body(json!({"success": true, "data": shipment_json(7, "yolda")}));
            })
            .await;

        let shipment = client_for(&server).shipments().track("KRG000007").await.unwrap();
        mock.assert_async().await;
        assert_eq!(shipment.id, 7);
    }

    #[tokio::test]
    async fn test_statistics_default_to_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/kargo/statistics/");
                then.status(200).json_body(json!({"success": true}));
            })
            .await;

        let stats = client_for(&server).shipments().statistics().await.unwrap();
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_filters() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/kargo/")
                    .query_param("kargo_tipi", "gida")
                    .query_param("cikis_yeri", "istanbul");
                then.status(200)
                    .json_body(json!({"success": true, "data": [shipment_json(3, "yolda")]}));
            })
            .await;

        let params = ShipmentSearchParams {
            kargo_tipi: Some(CargoType::Gida),
            cikis_yeri: Some("istanbul".to_string()),
            ..Default::default()
        };
        let shipments = client_for(&server).shipments().search(&params).await.unwrap();
        mock.assert_async().await;
        assert_eq!(shipments[0].origin_name(), "İstanbul");
    }

    #[tokio::test]
    async fn test_by_volunteer_without_data_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/kargo/by_volunteer/")
                    .query_param("volunteer_id", "4");
                then.status(200).json_body(json!({"success": true, "data": null}));
            })
            .await;

        let shipments = client_for(&server).shipments().by_volunteer(4).await.unwrap();
        assert!(shipments.is_empty());
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/volunteers/auth/status/");
                then.status(200).header("Set-Cookie", "csrftoken=k; Path=/");
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/kargo/")
                    .header("X-CSRFToken", "k");
                then.status(201).json_body(shipment_json(10, "hazirlaniyor"));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/api/v1/kargo/10/");
                then.status(204);
            })
            .await;

        let client = client_for(&server);
        let form = ShipmentForm {
            cikis_yeri: "istanbul".into(),
            ulasacagi_yer: "hatay".into(),
            agirlik: "12.50".into(),
            hacim: "0.40".into(),
            miktar: 3,
            kargo_tipi: Some(CargoType::Gida),
            icerik: "Konserve".into(),
            toplama_gonullusu: Some(4),
            ..Default::default()
        };
        let created = client.shipments().create(&form).await.unwrap();
        client.shipments().delete(created.id).await.unwrap();

        create.assert_async().await;
        delete.assert_async().await;
    }
}
