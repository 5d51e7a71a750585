//! 組合展開批次處理（Extract SKU）

use fulfil_core::{
    normalize_sku, BundleCatalog, BundleStatus, FulfilError, OrderLine, PassConfig,
    ProductCatalog,
};
use serde::{Deserialize, Serialize};

use crate::explosion::BundleExploder;
use crate::PassWarning;

/// 展開批次結果（由呼叫端在同一個交易中寫回）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    /// 狀態或商品有變更的既有明細
    pub updated_lines: Vec<OrderLine>,

    /// 新產生的子件明細
    pub new_lines: Vec<OrderLine>,

    /// 直接對應到商品主檔的明細數
    pub resolved: usize,

    /// 展開的父件數
    pub exploded: usize,

    /// SKU 或訂單編號為空而略過的明細數
    pub skipped_blank: usize,

    /// 找不到商品也找不到組合（或組合清單為空）的 SKU，不重複
    pub failed_skus: Vec<String>,

    /// 子件在主檔中找不到的 SKU，不重複
    pub missing_products: Vec<String>,

    pub warnings: Vec<PassWarning>,
}

impl ExtractionOutcome {
    /// 新產生的子件數
    pub fn extracted_count(&self) -> usize {
        self.new_lines.len()
    }

    fn record_failed(&mut self, sku: String) {
        if !self.failed_skus.contains(&sku) {
            self.failed_skus.push(sku);
        }
    }

    fn record_missing(&mut self, skus: Vec<String>) {
        for sku in skus {
            if !self.missing_products.contains(&sku) {
                self.missing_products.push(sku);
            }
        }
    }
}

/// 組合展開批次
///
/// 對已付款且尚未展開的明細逐筆處理：
/// 1. SKU 對應到商品 → 連結商品，不展開
/// 2. SKU 對應到組合 → 展開為子件，父件標記已展開
/// 3. 兩者皆無 → 記入失敗清單並標記 [`BundleStatus::Failed`]
///
/// 失敗的明細在下一次批次中會重試，同一批次內不重試。
pub struct ExtractionPass<'a> {
    catalog: &'a ProductCatalog,
    bundles: &'a BundleCatalog,
    config: &'a PassConfig,
}

impl<'a> ExtractionPass<'a> {
    pub fn new(
        catalog: &'a ProductCatalog,
        bundles: &'a BundleCatalog,
        config: &'a PassConfig,
    ) -> Self {
        Self {
            catalog,
            bundles,
            config,
        }
    }

    /// 執行展開批次
    pub fn run(&self, lines: &[OrderLine]) -> fulfil_core::Result<ExtractionOutcome> {
        tracing::info!("開始組合展開：明細 {} 筆", lines.len());

        let exploder = BundleExploder::new(self.catalog, self.config);
        let mut outcome = ExtractionOutcome::default();

        for line in lines {
            if !line.is_paid(self.config) || !line.is_explodable() {
                continue;
            }

            // 已連結商品的一般明細不需處理
            if line.bundle_status == BundleStatus::Pending && line.product.is_some() {
                continue;
            }

            if line.sku.trim().is_empty() || line.order_id.is_blank() {
                tracing::warn!(
                    "略過：訂單編號或 SKU 為空（訂單 {:?}，SKU {:?}）",
                    line.order_id.as_str(),
                    line.sku
                );
                outcome.skipped_blank += 1;
                continue;
            }

            let sku = normalize_sku(&line.sku);

            if let Some(product) = self.catalog.find_by_sku(&sku) {
                let mut updated = line.clone();
                updated.product = Some(product.id);
                updated.bundle_status = BundleStatus::Pending;
                outcome.updated_lines.push(updated);
                outcome.resolved += 1;
                continue;
            }

            let Some(bundle) = self.bundles.find(&sku) else {
                tracing::warn!("找不到商品或組合定義：SKU {}", sku);
                self.mark_failed(line, sku, &mut outcome);
                continue;
            };

            let mut parent = line.clone();
            match exploder.explode(&mut parent, bundle) {
                Ok(explosion) => {
                    outcome.exploded += 1;
                    outcome.record_missing(explosion.missing_products);
                    outcome.warnings.extend(explosion.warnings);
                    outcome.new_lines.extend(explosion.children);
                    outcome.updated_lines.push(parent);
                }
                Err(FulfilError::EmptyBundle(_)) => {
                    tracing::warn!("組合 {} 沒有可用的子件清單", sku);
                    self.mark_failed(line, sku, &mut outcome);
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            "組合展開完成：展開 {} 筆，新增子件 {} 筆，對應商品 {} 筆，失敗 SKU {} 個，略過 {} 筆",
            outcome.exploded,
            outcome.extracted_count(),
            outcome.resolved,
            outcome.failed_skus.len(),
            outcome.skipped_blank
        );

        Ok(outcome)
    }

    fn mark_failed(&self, line: &OrderLine, sku: String, outcome: &mut ExtractionOutcome) {
        let mut failed = line.clone();
        failed.bundle_status = BundleStatus::Failed;
        outcome.updated_lines.push(failed);
        outcome.record_failed(sku);
    }
}
