//! 訂單明細模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::PassConfig;
use crate::product::ProductId;

/// 訂單編號（id_pesanan），多筆明細以此歸為同一張訂單
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// 明細ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineId(pub Uuid);

impl LineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 組合展開狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BundleStatus {
    /// 尚未處理
    #[default]
    Pending,
    /// 組合父件，已展開為子件
    Exploded,
    /// 由展開產生的子件，不再展開
    Component,
    /// 找不到商品也找不到組合定義
    Failed,
}

/// 訂單明細
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// 明細ID
    pub id: LineId,

    /// 訂單編號
    pub order_id: OrderId,

    /// SKU
    pub sku: String,

    /// 需求數量
    pub quantity: i64,

    /// 對應商品（None 表示主檔找不到）
    pub product: Option<ProductId>,

    /// 付款狀態（如 "Lunas"）
    pub status: String,

    /// 建立日期
    pub order_date: Option<NaiveDate>,

    /// 銷售通路
    pub channel: Option<String>,

    /// 店鋪名稱
    pub store_name: Option<String>,

    /// 訂單種類
    pub order_kind: Option<String>,

    /// 訂單類型代碼
    pub order_type: Option<String>,

    /// 促銷價
    pub promo_price: Option<Decimal>,

    /// 買家備註
    pub buyer_note: Option<String>,

    /// 物流商
    pub courier: Option<String>,

    /// 物流單號
    pub tracking_no: Option<String>,

    /// 配送方式
    pub shipping_method: Option<String>,

    /// 最晚出貨時間
    pub ship_before: Option<String>,

    /// 所屬批次（空表示尚未進批次）
    pub batch_name: Option<String>,

    /// 組合展開狀態
    pub bundle_status: BundleStatus,
}

impl OrderLine {
    /// 創建新的訂單明細
    pub fn new(order_id: impl Into<String>, sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: LineId::new(),
            order_id: OrderId::new(order_id),
            sku: sku.into(),
            quantity,
            product: None,
            status: String::new(),
            order_date: None,
            channel: None,
            store_name: None,
            order_kind: None,
            order_type: None,
            promo_price: None,
            buyer_note: None,
            courier: None,
            tracking_no: None,
            shipping_method: None,
            ship_before: None,
            batch_name: None,
            bundle_status: BundleStatus::Pending,
        }
    }

    /// 建構器模式：設置付款狀態
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// 建構器模式：設置商品
    pub fn with_product(mut self, product: ProductId) -> Self {
        self.product = Some(product);
        self
    }

    /// 建構器模式：設置建立日期
    pub fn with_order_date(mut self, date: NaiveDate) -> Self {
        self.order_date = Some(date);
        self
    }

    /// 建構器模式：設置店鋪
    pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
        self.store_name = Some(store_name.into());
        self
    }

    /// 建構器模式：設置訂單類型
    pub fn with_order_type(mut self, order_type: impl Into<String>) -> Self {
        self.order_type = Some(order_type.into());
        self
    }

    /// 建構器模式：設置物流商
    pub fn with_courier(mut self, courier: impl Into<String>) -> Self {
        self.courier = Some(courier.into());
        self
    }

    /// 建構器模式：設置最晚出貨時間
    pub fn with_ship_before(mut self, ship_before: impl Into<String>) -> Self {
        self.ship_before = Some(ship_before.into());
        self
    }

    /// 建構器模式：設置促銷價
    pub fn with_promo_price(mut self, price: Decimal) -> Self {
        self.promo_price = Some(price);
        self
    }

    /// 建構器模式：設置批次
    pub fn with_batch_name(mut self, batch_name: impl Into<String>) -> Self {
        self.batch_name = Some(batch_name.into());
        self
    }

    /// 建構器模式：設置展開狀態
    pub fn with_bundle_status(mut self, status: BundleStatus) -> Self {
        self.bundle_status = status;
        self
    }

    /// 是否為已付款狀態（不分大小寫）
    pub fn is_paid(&self, config: &PassConfig) -> bool {
        self.status.trim().eq_ignore_ascii_case(config.eligible_status.trim())
    }

    /// 是否已進批次
    pub fn is_batched(&self) -> bool {
        self.batch_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }

    /// 是否為已展開的組合父件
    pub fn is_exploded(&self) -> bool {
        self.bundle_status == BundleStatus::Exploded
    }

    /// 是否可進行組合展開（尚未展開且非子件）
    pub fn is_explodable(&self) -> bool {
        matches!(
            self.bundle_status,
            BundleStatus::Pending | BundleStatus::Failed
        )
    }

    /// 是否可參與庫存分配
    ///
    /// 已付款、尚未進批次，且不是已展開的父件（其需求由子件代表）
    pub fn is_allocatable(&self, config: &PassConfig) -> bool {
        self.is_paid(config) && !self.is_batched() && !self.is_exploded()
    }

    /// 由此明細衍生子件明細
    ///
    /// 子件繼承訂單編號、日期、通路與物流等描述欄位，
    /// 僅 SKU、數量與商品不同，並標記為 [`BundleStatus::Component`]。
    pub fn derive_component(
        &self,
        sku: impl Into<String>,
        quantity: i64,
        product: Option<ProductId>,
    ) -> OrderLine {
        OrderLine {
            id: LineId::new(),
            sku: sku.into(),
            quantity,
            product,
            bundle_status: BundleStatus::Component,
            ..self.clone()
        }
    }
}
