//! 組合商品（Bundle）定義

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::product::normalize_sku;

/// 子件數量解析失敗時的預設值
const DEFAULT_COMPONENT_QTY: i64 = 1;

/// 組合商品定義
///
/// `component_list` 為主檔中的原始文字，格式為 `SKU1:QTY1,SKU2:QTY2,...`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleDefinition {
    /// 組合 SKU
    pub bundling_sku: String,

    /// 子件清單原始文字
    pub component_list: String,
}

/// 組合子件（已解析）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleComponent {
    /// 子件 SKU（已正規化）
    pub sku: String,

    /// 每組數量（>= 1）
    pub quantity: i64,
}

impl BundleComponent {
    pub fn new(sku: impl Into<String>, quantity: i64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }
}

impl BundleDefinition {
    /// 創建新的組合定義
    pub fn new(bundling_sku: impl Into<String>, component_list: impl Into<String>) -> Self {
        Self {
            bundling_sku: bundling_sku.into(),
            component_list: component_list.into(),
        }
    }

    /// 檢查 SKU 是否為此組合（不分大小寫）
    pub fn matches(&self, sku: &str) -> bool {
        normalize_sku(&self.bundling_sku) == normalize_sku(sku)
    }

    /// 解析子件清單
    ///
    /// - 沒有 `:` 的項目直接略過
    /// - 子件 SKU 為空的項目略過
    /// - 數量無法解析或小於 1 時以 1 計
    pub fn components(&self) -> Vec<BundleComponent> {
        self.component_list
            .split(',')
            .filter_map(|pair| {
                let (sku, qty) = pair.split_once(':')?;
                let sku = normalize_sku(sku);
                if sku.is_empty() {
                    return None;
                }
                let quantity = qty
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .filter(|q| *q >= 1)
                    .unwrap_or(DEFAULT_COMPONENT_QTY);
                Some(BundleComponent { sku, quantity })
            })
            .collect()
    }

    /// 是否沒有任何可用子件
    pub fn is_empty(&self) -> bool {
        self.components().is_empty()
    }
}

/// 組合定義目錄（以正規化組合 SKU 索引）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleCatalog {
    bundles: HashMap<String, BundleDefinition>,
}

impl BundleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆蓋組合定義
    pub fn insert(&mut self, bundle: BundleDefinition) {
        self.bundles.insert(normalize_sku(&bundle.bundling_sku), bundle);
    }

    /// 以 SKU 查找組合定義（不分大小寫）
    pub fn find(&self, sku: &str) -> Option<&BundleDefinition> {
        self.bundles.get(&normalize_sku(sku))
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl FromIterator<BundleDefinition> for BundleCatalog {
    fn from_iter<I: IntoIterator<Item = BundleDefinition>>(iter: I) -> Self {
        let mut catalog = BundleCatalog::new();
        for bundle in iter {
            catalog.insert(bundle);
        }
        catalog
    }
}
