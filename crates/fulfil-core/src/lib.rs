//! # Fulfil Core
//!
//! 出貨備貨核心資料模型與類型定義

pub mod bundle;
pub mod classification;
pub mod config;
pub mod filter;
pub mod ledger;
pub mod order;
pub mod product;

// Re-export 主要類型
pub use bundle::{BundleCatalog, BundleComponent, BundleDefinition};
pub use classification::{ClassificationRecord, StockStatus};
pub use config::PassConfig;
pub use filter::OrderFilter;
pub use ledger::StockLedger;
pub use order::{BundleStatus, LineId, OrderId, OrderLine};
pub use product::{normalize_sku, Product, ProductCatalog, ProductId};

/// 備貨錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum FulfilError {
    #[error("無效的數量: 明細 {line_id} 數量 {quantity}")]
    InvalidQuantity { line_id: LineId, quantity: i64 },

    #[error("組合商品沒有可用的子件清單: {0}")]
    EmptyBundle(String),

    #[error("明細重複出現在多個訂單中: {0}")]
    DuplicateLine(LineId),

    #[error("訂單分類不完整: {0}")]
    ClassificationIncomplete(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("存儲錯誤: {0}")]
    Store(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

impl From<serde_json::Error> for FulfilError {
    fn from(err: serde_json::Error) -> Self {
        FulfilError::InvalidConfig(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FulfilError>;
