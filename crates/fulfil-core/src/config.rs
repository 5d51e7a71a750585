//! 批次處理配置

use serde::{Deserialize, Serialize};

use crate::{FulfilError, Result};

/// 組合展開與庫存檢查的共用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PassConfig {
    /// 可處理的付款狀態（不分大小寫比對）
    pub eligible_status: String,

    /// 子件的訂單類型代碼
    /// - Some: 子件統一標記為此類型
    /// - None: 沿用父件的訂單類型
    pub child_order_type: Option<String>,

    /// 展開後是否清空父件的訂單類型
    pub clear_parent_order_type: bool,

    /// 依品牌篩選時限定的訂單類型
    pub brand_order_types: Vec<String>,
}

impl Default for PassConfig {
    fn default() -> Self {
        Self {
            eligible_status: "Lunas".to_string(),
            child_order_type: Some("3".to_string()),
            clear_parent_order_type: true,
            brand_order_types: vec!["1".to_string(), "4".to_string()],
        }
    }
}

impl PassConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 載入（缺少的欄位使用預設值）
    ///
    /// # 範例
    /// ```
    /// # use fulfil_core::PassConfig;
    /// let config = PassConfig::from_json(r#"{ "eligible_status": "Paid" }"#).unwrap();
    /// assert_eq!(config.eligible_status, "Paid");
    /// assert_eq!(config.child_order_type.as_deref(), Some("3"));
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PassConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置付款狀態
    pub fn with_eligible_status(mut self, status: impl Into<String>) -> Self {
        self.eligible_status = status.into();
        self
    }

    /// 建構器模式：設置子件訂單類型
    pub fn with_child_order_type(mut self, order_type: Option<String>) -> Self {
        self.child_order_type = order_type;
        self
    }

    /// 建構器模式：設置是否清空父件訂單類型
    pub fn with_clear_parent_order_type(mut self, clear: bool) -> Self {
        self.clear_parent_order_type = clear;
        self
    }

    /// 建構器模式：設置品牌篩選限定的訂單類型
    pub fn with_brand_order_types(mut self, order_types: Vec<String>) -> Self {
        self.brand_order_types = order_types;
        self
    }

    /// 驗證配置
    pub fn validate(&self) -> Result<()> {
        if self.eligible_status.trim().is_empty() {
            return Err(FulfilError::InvalidConfig(
                "eligible_status 不可為空".to_string(),
            ));
        }
        Ok(())
    }
}
