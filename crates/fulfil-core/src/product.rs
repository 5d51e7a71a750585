//! 商品主檔

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 商品ID（主檔主鍵）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 商品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 商品ID
    pub id: ProductId,

    /// SKU（唯一，比對時不分大小寫）
    pub sku: String,

    /// 商品名稱
    pub name: String,

    /// 品牌
    pub brand: Option<String>,
}

impl Product {
    /// 創建新的商品
    pub fn new(id: ProductId, sku: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            sku: sku.into(),
            name: name.into(),
            brand: None,
        }
    }

    /// 建構器模式：設置品牌
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }
}

/// SKU 正規化：去除空白並轉大寫
pub fn normalize_sku(sku: &str) -> String {
    sku.trim().to_uppercase()
}

/// 商品目錄（以正規化 SKU 索引，一次載入）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    products: HashMap<ProductId, Product>,
    by_sku: HashMap<String, ProductId>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆蓋商品
    pub fn insert(&mut self, product: Product) {
        if let Some(old) = self.products.get(&product.id) {
            self.by_sku.remove(&normalize_sku(&old.sku));
        }
        self.by_sku.insert(normalize_sku(&product.sku), product.id);
        self.products.insert(product.id, product);
    }

    /// 以 SKU 查找（不分大小寫）
    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        self.by_sku
            .get(&normalize_sku(sku))
            .and_then(|id| self.products.get(id))
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// 檢查 SKU 是否存在於主檔
    pub fn contains_sku(&self, sku: &str) -> bool {
        self.by_sku.contains_key(&normalize_sku(sku))
    }

    /// 商品品牌
    pub fn brand_of(&self, id: ProductId) -> Option<&str> {
        self.products.get(&id).and_then(|p| p.brand.as_deref())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl FromIterator<Product> for ProductCatalog {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        let mut catalog = ProductCatalog::new();
        for product in iter {
            catalog.insert(product);
        }
        catalog
    }
}
