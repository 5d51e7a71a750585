//! 組合商品展開

use fulfil_core::{
    BundleDefinition, BundleStatus, FulfilError, OrderLine, PassConfig, ProductCatalog,
};

use crate::PassWarning;

/// 單一父件的展開結果
#[derive(Debug, Clone, Default)]
pub struct Explosion {
    /// 新產生的子件明細（由呼叫端寫入）
    pub children: Vec<OrderLine>,

    /// 主檔找不到的子件 SKU
    pub missing_products: Vec<String>,

    pub warnings: Vec<PassWarning>,
}

impl Explosion {
    /// 是否未產生任何子件（父件已展開時）
    pub fn is_noop(&self) -> bool {
        self.children.is_empty()
    }
}

/// 組合展開器
///
/// 展開深度固定為一層：子件標記為 [`BundleStatus::Component`]，
/// 即使子件 SKU 也是組合也不會再展開。
pub struct BundleExploder<'a> {
    catalog: &'a ProductCatalog,
    config: &'a PassConfig,
}

impl<'a> BundleExploder<'a> {
    /// 創建展開器
    pub fn new(catalog: &'a ProductCatalog, config: &'a PassConfig) -> Self {
        Self { catalog, config }
    }

    /// 展開父件
    ///
    /// 父件已展開（或本身就是子件）時不做任何事並返回空結果。
    /// 成功時父件標記為 [`BundleStatus::Exploded`]；不會扣減庫存。
    ///
    /// # 錯誤
    /// * [`FulfilError::EmptyBundle`] - 組合沒有任何可用子件，父件保持不變
    /// * [`FulfilError::InvalidQuantity`] - 父件數量為負或相乘溢位
    pub fn explode(
        &self,
        parent: &mut OrderLine,
        bundle: &BundleDefinition,
    ) -> fulfil_core::Result<Explosion> {
        debug_assert!(bundle.matches(&parent.sku));

        if !parent.is_explodable() {
            tracing::debug!("明細 {} 已展開或為子件，跳過", parent.id);
            return Ok(Explosion::default());
        }

        if parent.quantity < 0 {
            return Err(FulfilError::InvalidQuantity {
                line_id: parent.id,
                quantity: parent.quantity,
            });
        }

        let components = bundle.components();
        if components.is_empty() {
            return Err(FulfilError::EmptyBundle(bundle.bundling_sku.clone()));
        }

        let mut explosion = Explosion::default();

        for component in components {
            let quantity = parent.quantity.checked_mul(component.quantity).ok_or(
                FulfilError::InvalidQuantity {
                    line_id: parent.id,
                    quantity: parent.quantity,
                },
            )?;

            let product = self.catalog.find_by_sku(&component.sku).map(|p| p.id);
            if product.is_none() {
                tracing::warn!(
                    "子件 SKU {} 在商品主檔中找不到（訂單 {}）",
                    component.sku,
                    parent.order_id
                );
                explosion.warnings.push(PassWarning::warning(
                    component.sku.clone(),
                    format!("子件商品不存在，訂單 {}", parent.order_id),
                ));
                explosion.missing_products.push(component.sku.clone());
            }

            let mut child = parent.derive_component(component.sku, quantity, product);
            if let Some(order_type) = &self.config.child_order_type {
                child.order_type = Some(order_type.clone());
            }

            tracing::debug!(
                "子件已建立：訂單 {} SKU {} 數量 {}",
                child.order_id,
                child.sku,
                child.quantity
            );
            explosion.children.push(child);
        }

        parent.bundle_status = BundleStatus::Exploded;
        if self.config.clear_parent_order_type {
            parent.order_type = None;
        }

        Ok(explosion)
    }
}
