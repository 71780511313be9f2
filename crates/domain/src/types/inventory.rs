//! QuickBooks Desktop inventory items and their consumption.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::wire;

/// An inventory record synced from QuickBooks Desktop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InventoryItem {
    #[serde(deserialize_with = "wire::id")]
    pub id: i64,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub bar_code_value: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub list_id: String,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub manufacturer_part_number: String,
    #[serde(default)]
    pub purchase_cost: Option<f64>,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub purchase_description: String,
    #[serde(default)]
    pub sales_price: Option<f64>,
    #[serde(default, deserialize_with = "wire::lenient_string")]
    pub sales_description: String,
}

/// Trim a scanned or typed bar code.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyBarCode`] for a blank value.
pub fn normalize_bar_code(raw: &str) -> Result<String, ValidationError> {
    let normalized = raw.trim_matches(|c: char| c.is_whitespace() || c.is_control());
    if normalized.is_empty() {
        return Err(ValidationError::EmptyBarCode);
    }
    Ok(normalized.to_string())
}

/// A validated consumption of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConsumptionRequest {
    qbd_inventory_item_id: i64,
    quantity: i64,
    hostname: String,
    unit_of_measure: Option<String>,
}

impl InventoryConsumptionRequest {
    /// # Errors
    ///
    /// Rejects a missing item and a quantity below one.
    pub fn new(
        qbd_inventory_item_id: i64,
        quantity: i64,
        hostname: impl Into<String>,
        unit_of_measure: Option<String>,
    ) -> Result<Self, ValidationError> {
        if qbd_inventory_item_id <= 0 {
            return Err(ValidationError::MissingInventoryItem);
        }
        if quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }
        let unit_of_measure =
            unit_of_measure.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        Ok(Self { qbd_inventory_item_id, quantity, hostname: hostname.into(), unit_of_measure })
    }

    pub const fn qbd_inventory_item_id(&self) -> i64 {
        self.qbd_inventory_item_id
    }

    pub const fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("qbdInventoryItemId".to_string(), self.qbd_inventory_item_id.to_string()),
            ("quantity".to_string(), self.quantity.to_string()),
            ("hostname".to_string(), self.hostname.clone()),
        ];
        if let Some(unit) = &self.unit_of_measure {
            query.push(("unitOfMeasure".to_string(), unit.clone()));
        }
        query
    }
}
