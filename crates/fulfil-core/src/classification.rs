//! 庫存檢查分類結果

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::order::OrderId;

/// 庫存是否足夠
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// 足夠（cukup）
    Sufficient,
    /// 不足（tidak cukup）
    Insufficient,
}

impl StockStatus {
    /// 介面顯示用標籤
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Sufficient => "cukup",
            StockStatus::Insufficient => "tidak cukup",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 持久化的分類記錄，每次檢查整批替換
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    /// 訂單編號
    pub order_id: OrderId,

    /// 分類
    pub status: StockStatus,

    /// 建立時間
    pub created_at: DateTime<Utc>,
}

impl ClassificationRecord {
    pub fn new(order_id: OrderId, status: StockStatus, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id,
            status,
            created_at,
        }
    }
}
