// Catalogue entries (`admin/products`).

use serde::{Deserialize, Serialize};

use super::{CellValue, Column, Resource, RowId, StockLevel};

/// Free-form attributes attached to a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductMetadata {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub care: Option<String>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub washable: Option<bool>,
    #[serde(default)]
    pub blouse: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub neckline: Option<String>,
    #[serde(default)]
    pub sleeves: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub state_id: Option<u64>,
    #[serde(default)]
    pub famous_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: u64,
    #[serde(default)]
    pub product_id: u64,
    pub image_url: String,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

/// A product as returned by the admin products endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RowId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub region_id: Option<u64>,
    #[serde(default)]
    pub vendor_id: Option<u64>,
    #[serde(default)]
    pub state_origin: String,
    #[serde(default)]
    pub saree_type: String,
    #[serde(default)]
    pub base_price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub final_price: f64,
    #[serde(default)]
    pub fabric: String,
    #[serde(default)]
    pub weave_type: String,
    #[serde(default)]
    pub occasion: String,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub metadata: ProductMetadata,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.stock_quantity)
    }

    pub fn region_name(&self) -> Option<&str> {
        self.region.as_ref().map(|r| r.name.as_str())
    }

    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|i| i.is_primary)
            .or_else(|| self.images.iter().min_by_key(|i| i.display_order))
    }
}

/// The products collection.
pub struct Products;

const COLUMNS: &[Column] = &[
    Column::text("name", "Name"),
    Column::text("description", "Description"),
    Column::text("product_type", "Type"),
    Column::text("state_origin", "State"),
    Column::text("saree_type", "Saree Type"),
    Column::numeric("base_price", "Price"),
    Column::numeric("discount_percentage", "Discount %"),
    Column::text("fabric", "Fabric"),
    Column::text("weave_type", "Weave"),
    Column::numeric("stock_quantity", "Stock"),
    Column::text("region", "Region"),
];

impl Resource for Products {
    type Row = Product;

    const ENDPOINT: &'static str = "admin/products";
    const LABEL: &'static str = "products";

    fn columns() -> &'static [Column] {
        COLUMNS
    }

    fn row_id(row: &Product) -> RowId {
        row.id
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn cell(row: &Product, key: &str) -> CellValue {
        match key {
            "name" => CellValue::text(&row.name),
            "description" => CellValue::text(&row.description),
            "product_type" => CellValue::text(&row.product_type),
            "state_origin" => CellValue::text(&row.state_origin),
            "saree_type" => CellValue::text(&row.saree_type),
            "base_price" => CellValue::Number(row.base_price),
            "discount_percentage" => CellValue::Number(row.discount_percentage),
            "fabric" => CellValue::text(&row.fabric),
            "weave_type" => CellValue::text(&row.weave_type),
            "stock_quantity" => CellValue::Number(row.stock_quantity as f64),
            "region" => CellValue::opt_text(row.region_name()),
            _ => CellValue::Empty,
        }
    }
}
