//! # Fulfil Calculation Engine
//!
//! 組合展開與庫存分配計算引擎
//!
//! 所有計算皆為純函數：輸入為一次載入的記憶體資料（明細、主檔、庫存快照），
//! 輸出為待寫回的結果，讀寫由呼叫端的存儲層負責。

pub mod allocator;
pub mod demand;
pub mod explosion;
pub mod extraction;
pub mod grouping;
pub mod report;

// Re-export 主要類型
pub use allocator::{AllocationResult, AllocationSummary, StockAllocator};
pub use demand::OrderDemand;
pub use explosion::{BundleExploder, Explosion};
pub use extraction::{ExtractionOutcome, ExtractionPass};
pub use grouping::{OrderGroup, OrderGroups};
pub use report::sku_not_found;

/// 計算過程中的警告（主檔缺漏等，不中斷計算）
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PassWarning {
    /// 相關 SKU 或訂單編號
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PassWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
