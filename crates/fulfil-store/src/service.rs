//! 備貨流程服務
//!
//! 每個流程在單一交易內完成「讀取 → 計算 → 寫回」，
//! 任何錯誤都會讓整個流程的寫入失效，先前提交的結果保持不變。

use chrono::Utc;
use fulfil_calc::{
    sku_not_found, AllocationSummary, ExtractionPass, OrderGroups, PassWarning, StockAllocator,
};
use fulfil_core::{LineId, OrderFilter, OrderId, PassConfig, StockStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::ports::{StoreTx, Transactional};

/// 組合展開報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub extracted_count: usize,
    pub exploded: usize,
    pub resolved: usize,
    pub skipped_blank: usize,
    pub failed: Vec<String>,
    pub missing_products: Vec<String>,
    pub warnings: Vec<PassWarning>,
}

/// 庫存檢查報告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub summary: AllocationSummary,
    pub sufficient_ids: Vec<OrderId>,
    pub insufficient_ids: Vec<OrderId>,
    pub per_line: HashMap<LineId, StockStatus>,
    pub sku_not_found: Vec<String>,
    pub warnings: Vec<PassWarning>,
}

/// 備貨流程服務
pub struct FulfilmentService<S> {
    store: S,
    config: PassConfig,
}

impl<S: Transactional> FulfilmentService<S> {
    /// 創建服務
    pub fn new(store: S, config: PassConfig) -> fulfil_core::Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PassConfig {
        &self.config
    }

    /// 組合展開：子件寫入與父件狀態更新在同一交易中
    pub fn extract_bundles(&self) -> fulfil_core::Result<ExtractionReport> {
        self.store.transaction(|tx| {
            let lines = tx.eligible_lines(&self.config);
            let outcome =
                ExtractionPass::new(tx.catalog(), tx.bundles(), &self.config).run(&lines)?;

            let report = ExtractionReport {
                extracted_count: outcome.extracted_count(),
                exploded: outcome.exploded,
                resolved: outcome.resolved,
                skipped_blank: outcome.skipped_blank,
                failed: outcome.failed_skus,
                missing_products: outcome.missing_products,
                warnings: outcome.warnings,
            };

            tx.insert_lines(outcome.new_lines)?;
            tx.update_lines(outcome.updated_lines)?;

            Ok(report)
        })
    }

    /// 庫存檢查並以結果替換分類記錄
    pub fn check_stock(&self, filter: &OrderFilter) -> fulfil_core::Result<AllocationReport> {
        self.run_allocation(filter, true)
    }

    /// 庫存檢查預覽，不寫入分類記錄
    pub fn preview(&self, filter: &OrderFilter) -> fulfil_core::Result<AllocationReport> {
        self.run_allocation(filter, false)
    }

    fn run_allocation(
        &self,
        filter: &OrderFilter,
        persist: bool,
    ) -> fulfil_core::Result<AllocationReport> {
        self.store.transaction(|tx| {
            let lines = tx.lines();
            let missing = sku_not_found(&lines, tx.catalog(), &self.config);

            // 篩選只決定哪些訂單參與；被選中的訂單以全部可分配明細檢查
            let selected: HashSet<&OrderId> = lines
                .iter()
                .filter(|line| line.is_allocatable(&self.config))
                .filter(|line| filter.matches(line, tx.catalog(), &self.config))
                .map(|line| &line.order_id)
                .collect();

            // 訂單位置取第一筆有效明細（含已展開的父件），子件附加在尾端不影響順序
            let mut seen = HashSet::new();
            let order_ids: Vec<OrderId> = lines
                .iter()
                .filter(|line| line.is_paid(&self.config) && !line.is_batched())
                .map(|line| &line.order_id)
                .filter(|id| selected.contains(id) && seen.insert(*id))
                .cloned()
                .collect();

            let pool = tx
                .lines_for_orders(&order_ids)
                .into_iter()
                .filter(|line| line.is_allocatable(&self.config));
            let groups = OrderGroups::from_lines_in_order(&order_ids, pool)?;

            let snapshot = tx.stock_snapshot(&groups.product_ids());
            let result = StockAllocator::allocate(&groups, snapshot)?;

            if persist {
                tx.replace_classification(result.records(Utc::now()))?;
                tracing::info!("分類記錄已更新：{} 張訂單", groups.len());
            }

            Ok(AllocationReport {
                summary: result.summary(),
                sufficient_ids: result.sufficient_ids,
                insufficient_ids: result.insufficient_ids,
                per_line: result.per_line,
                sku_not_found: missing,
                warnings: result.warnings,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use fulfil_core::{BundleDefinition, OrderLine, Product, ProductId};

    fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_product(Product::new(ProductId(1), "A", "Item A")).unwrap();
        store.add_product(Product::new(ProductId(2), "B", "Item B")).unwrap();
        store.add_bundle(BundleDefinition::new("BOX", "A:1,B:2")).unwrap();
        store.set_stock(ProductId(1), 3).unwrap();
        store.set_stock(ProductId(2), 4).unwrap();
        store
    }

    #[test]
    fn test_extract_then_check() {
        let store = seeded_store();
        store
            .import_lines(vec![
                OrderLine::new("INV-1", "BOX", 2).with_status("Lunas"),
                OrderLine::new("INV-2", "A", 1).with_status("Lunas"),
                OrderLine::new("INV-3", "B", 1).with_status("Lunas"),
            ])
            .unwrap();
        let service = FulfilmentService::new(store, PassConfig::default()).unwrap();

        let extraction = service.extract_bundles().unwrap();
        assert_eq!(extraction.exploded, 1);
        assert_eq!(extraction.extracted_count, 2);
        assert_eq!(extraction.resolved, 2);

        // INV-1 依父件位置最先處理：A:2 B:4 用完 B，INV-3 不足
        let report = service.check_stock(&OrderFilter::new()).unwrap();
        assert_eq!(
            report.sufficient_ids,
            vec![OrderId::from("INV-1"), OrderId::from("INV-2")]
        );
        assert_eq!(report.insufficient_ids, vec![OrderId::from("INV-3")]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.per_line.len(), 4);

        let records = service.store().classification().unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_exploded_order_keeps_import_position() {
        let store = seeded_store();
        store
            .import_lines(vec![
                OrderLine::new("INV-1", "BOX", 1).with_status("Lunas"),
                OrderLine::new("INV-2", "A", 3).with_status("Lunas"),
            ])
            .unwrap();
        let service = FulfilmentService::new(store, PassConfig::default()).unwrap();
        service.extract_bundles().unwrap();

        // 子件寫在 INV-2 之後，但 INV-1 先匯入，先拿到 A
        let report = service.check_stock(&OrderFilter::new()).unwrap();
        assert_eq!(report.sufficient_ids, vec![OrderId::from("INV-1")]);
        assert_eq!(report.insufficient_ids, vec![OrderId::from("INV-2")]);
    }

    #[test]
    fn test_filter_selects_whole_orders() {
        let store = seeded_store();
        store.set_stock(ProductId(2), 0).unwrap();
        store
            .import_lines(vec![
                OrderLine::new("INV-1", "A", 1)
                    .with_status("Lunas")
                    .with_product(ProductId(1))
                    .with_courier("JNE"),
                OrderLine::new("INV-1", "B", 5)
                    .with_status("Lunas")
                    .with_product(ProductId(2))
                    .with_courier("SiCepat"),
                OrderLine::new("INV-2", "A", 1)
                    .with_status("Lunas")
                    .with_product(ProductId(1))
                    .with_courier("SiCepat"),
            ])
            .unwrap();
        let service = FulfilmentService::new(store, PassConfig::default()).unwrap();

        let filter = OrderFilter::new().with_couriers(vec!["JNE".to_string()]);
        let report = service.check_stock(&filter).unwrap();

        // 只有 INV-1 被選中，但它的 B 明細也要檢查
        assert!(report.sufficient_ids.is_empty());
        assert_eq!(report.insufficient_ids, vec![OrderId::from("INV-1")]);
        assert_eq!(report.per_line.len(), 2);
    }

    #[test]
    fn test_preview_does_not_persist() {
        let store = seeded_store();
        store
            .import_lines(vec![OrderLine::new("INV-1", "A", 1)
                .with_status("Lunas")
                .with_product(ProductId(1))])
            .unwrap();
        let service = FulfilmentService::new(store, PassConfig::default()).unwrap();

        let report = service.preview(&OrderFilter::new()).unwrap();
        assert_eq!(report.summary.sufficient, 1);
        assert!(service.store().classification().unwrap().is_empty());
    }

    #[test]
    fn test_failed_check_keeps_previous_classification() {
        let store = seeded_store();
        store
            .import_lines(vec![OrderLine::new("INV-1", "A", 1)
                .with_status("Lunas")
                .with_product(ProductId(1))])
            .unwrap();
        let service = FulfilmentService::new(store, PassConfig::default()).unwrap();
        service.check_stock(&OrderFilter::new()).unwrap();

        service
            .store()
            .import_lines(vec![OrderLine::new("INV-2", "A", -1)
                .with_status("Lunas")
                .with_product(ProductId(1))])
            .unwrap();

        assert!(service.check_stock(&OrderFilter::new()).is_err());
        let records = service.store().classification().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_id, OrderId::from("INV-1"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PassConfig::default().with_eligible_status("");
        assert!(FulfilmentService::new(MemoryStore::new(), config).is_err());
    }
}
