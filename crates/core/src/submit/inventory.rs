//! Inventory lookup and consumption.

use std::sync::Arc;

use punchclock_domain::{
    normalize_bar_code, ApiError, ApiRoute, InventoryConsumptionRequest, InventoryItem,
    SubmissionError,
};
use tracing::{debug, info, instrument};

use crate::gateway::{decode_list, ApiGateway, ApiRequest};

pub struct InventoryConsumptionSubmitter {
    gateway: Arc<dyn ApiGateway>,
    hostname: String,
}

impl InventoryConsumptionSubmitter {
    /// `hostname` identifies this device on every consumption record.
    pub fn new(gateway: Arc<dyn ApiGateway>, hostname: impl Into<String>) -> Self {
        Self { gateway, hostname: hostname.into() }
    }

    /// Find the item carrying a bar code.
    ///
    /// # Errors
    ///
    /// - `Invalid(EmptyBarCode)` for blank input (nothing is sent)
    /// - `NoItemForBarCode` for no match or a 404
    /// - `Api` for any other gateway failure
    #[instrument(skip(self))]
    pub async fn find_item(&self, bar_code: &str) -> Result<InventoryItem, SubmissionError> {
        let bar_code = normalize_bar_code(bar_code)?;
        let request =
            ApiRequest::new(ApiRoute::InventorySearch).with_param("barCodeValue", bar_code.as_str());

        let payload = match self.gateway.request(request).await {
            Ok(payload) => payload,
            Err(ApiError::NotFound) => return Err(SubmissionError::NoItemForBarCode(bar_code)),
            Err(err) => return Err(err.into()),
        };

        let items: Vec<InventoryItem> = decode_list(&payload, "inventory search")?;
        if items.len() > 1 {
            debug!(count = items.len(), "Several items share the bar code; using the first");
        }
        items.into_iter().next().ok_or(SubmissionError::NoItemForBarCode(bar_code))
    }

    /// Record that `quantity` of `item` was used.
    ///
    /// # Errors
    ///
    /// `Invalid(NonPositiveQuantity)` before anything is sent; otherwise the
    /// gateway error.
    pub async fn consume(
        &self,
        item: &InventoryItem,
        quantity: i64,
        unit_of_measure: Option<String>,
    ) -> Result<(), SubmissionError> {
        let request =
            InventoryConsumptionRequest::new(item.id, quantity, self.hostname.clone(), unit_of_measure)?;
        self.submit(&request).await
    }

    /// Submit an already validated consumption.
    ///
    /// # Errors
    ///
    /// Propagates the gateway error.
    #[instrument(skip(self, request), fields(item_id = request.qbd_inventory_item_id(), quantity = request.quantity()))]
    pub async fn submit(&self, request: &InventoryConsumptionRequest) -> Result<(), SubmissionError> {
        self.gateway
            .request(ApiRequest::new(ApiRoute::InventoryConsume).with_query(request.to_query()))
            .await?;
        info!("Inventory consumption recorded");
        Ok(())
    }
}
