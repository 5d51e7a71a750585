//! 批次候選明細篩選條件

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PassConfig;
use crate::order::OrderLine;
use crate::product::ProductCatalog;

/// 篩選條件
///
/// 每個非空條件內部為 OR，條件之間為 AND。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    pub store_names: Vec<String>,
    pub brands: Vec<String>,
    pub order_types: Vec<String>,
    pub order_date: Option<NaiveDate>,
    pub couriers: Vec<String>,
    pub ship_before: Vec<String>,
    pub order_ids: Vec<String>,
}

fn any_of(values: &[String], field: Option<&str>) -> bool {
    values.is_empty() || field.is_some_and(|f| values.iter().any(|v| v == f))
}

impl OrderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：店鋪
    pub fn with_store_names(mut self, names: Vec<String>) -> Self {
        self.store_names = names;
        self
    }

    /// 建構器模式：品牌
    pub fn with_brands(mut self, brands: Vec<String>) -> Self {
        self.brands = brands;
        self
    }

    /// 建構器模式：訂單類型
    pub fn with_order_types(mut self, order_types: Vec<String>) -> Self {
        self.order_types = order_types;
        self
    }

    /// 建構器模式：建立日期
    pub fn with_order_date(mut self, date: NaiveDate) -> Self {
        self.order_date = Some(date);
        self
    }

    /// 建構器模式：物流商
    pub fn with_couriers(mut self, couriers: Vec<String>) -> Self {
        self.couriers = couriers;
        self
    }

    /// 建構器模式：最晚出貨時間
    pub fn with_ship_before(mut self, values: Vec<String>) -> Self {
        self.ship_before = values;
        self
    }

    /// 建構器模式：訂單編號
    pub fn with_order_ids(mut self, ids: Vec<String>) -> Self {
        self.order_ids = ids;
        self
    }

    /// 是否沒有任何條件
    pub fn is_empty(&self) -> bool {
        self.store_names.is_empty()
            && self.brands.is_empty()
            && self.order_types.is_empty()
            && self.order_date.is_none()
            && self.couriers.is_empty()
            && self.ship_before.is_empty()
            && self.order_ids.is_empty()
    }

    /// 檢查明細是否符合條件
    ///
    /// 品牌透過商品主檔取得；指定品牌時另外限定
    /// [`PassConfig::brand_order_types`] 內的訂單類型。
    pub fn matches(&self, line: &OrderLine, catalog: &ProductCatalog, config: &PassConfig) -> bool {
        if let Some(date) = self.order_date {
            if line.order_date != Some(date) {
                return false;
            }
        }

        if !self.brands.is_empty() {
            let brand = line.product.and_then(|id| catalog.brand_of(id));
            if !any_of(&self.brands, brand)
                || !any_of(&config.brand_order_types, line.order_type.as_deref())
            {
                return false;
            }
        }

        any_of(&self.store_names, line.store_name.as_deref())
            && any_of(&self.order_types, line.order_type.as_deref())
            && any_of(&self.couriers, line.courier.as_deref())
            && any_of(&self.ship_before, line.ship_before.as_deref())
            && any_of(&self.order_ids, Some(line.order_id.as_str()))
    }
}
