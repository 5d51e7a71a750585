//! 庫存分配（備貨前檢查）

use chrono::{DateTime, Utc};
use fulfil_core::{
    ClassificationRecord, FulfilError, LineId, OrderId, ProductId, StockLedger, StockStatus,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::demand::OrderDemand;
use crate::grouping::OrderGroups;
use crate::PassWarning;

/// 分配結果
#[derive(Debug, Clone, Default)]
pub struct AllocationResult {
    /// 庫存足夠的訂單（依處理順序）
    pub sufficient_ids: Vec<OrderId>,

    /// 庫存不足的訂單（依處理順序）
    pub insufficient_ids: Vec<OrderId>,

    /// 每筆明細的分類（供畫面逐列顯示）
    pub per_line: HashMap<LineId, StockStatus>,

    /// 分配後的庫存帳
    pub ledger: StockLedger,

    pub warnings: Vec<PassWarning>,
}

/// 分配結果統計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    #[serde(rename = "stock_cukup")]
    pub sufficient: usize,

    #[serde(rename = "stock_tidak_cukup")]
    pub insufficient: usize,

    pub total: usize,
}

impl AllocationSummary {
    /// 轉為 JSON
    pub fn to_json(&self) -> fulfil_core::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl AllocationResult {
    /// 訂單分類
    pub fn status_of(&self, order_id: &OrderId) -> Option<StockStatus> {
        if self.sufficient_ids.contains(order_id) {
            Some(StockStatus::Sufficient)
        } else if self.insufficient_ids.contains(order_id) {
            Some(StockStatus::Insufficient)
        } else {
            None
        }
    }

    /// 統計
    pub fn summary(&self) -> AllocationSummary {
        AllocationSummary {
            sufficient: self.sufficient_ids.len(),
            insufficient: self.insufficient_ids.len(),
            total: self.sufficient_ids.len() + self.insufficient_ids.len(),
        }
    }

    /// 各商品被足夠訂單消耗的數量
    pub fn consumed(&self) -> HashMap<ProductId, i64> {
        self.ledger.consumed()
    }

    /// 產生待持久化的分類記錄
    pub fn records(&self, created_at: DateTime<Utc>) -> Vec<ClassificationRecord> {
        self.sufficient_ids
            .iter()
            .map(|id| (id, StockStatus::Sufficient))
            .chain(
                self.insufficient_ids
                    .iter()
                    .map(|id| (id, StockStatus::Insufficient)),
            )
            .map(|(id, status)| ClassificationRecord::new(id.clone(), status, created_at))
            .collect()
    }

    /// 檢查分類完整且一致
    ///
    /// 每張訂單恰好屬於一個集合，每筆明細的分類與其訂單相同。
    /// 不成立表示分組有誤，屬於程式缺陷。
    fn verify(&self, groups: &OrderGroups) -> fulfil_core::Result<()> {
        let sufficient: HashSet<&OrderId> = self.sufficient_ids.iter().collect();
        let insufficient: HashSet<&OrderId> = self.insufficient_ids.iter().collect();

        if sufficient.len() + insufficient.len() != groups.len()
            || self.per_line.len() != groups.line_count()
        {
            return Err(FulfilError::ClassificationIncomplete(format!(
                "訂單 {} 張，分類 {} 張；明細 {} 筆，分類 {} 筆",
                groups.len(),
                sufficient.len() + insufficient.len(),
                groups.line_count(),
                self.per_line.len()
            )));
        }

        for group in groups.iter() {
            let status = match (
                sufficient.contains(&group.order_id),
                insufficient.contains(&group.order_id),
            ) {
                (true, false) => StockStatus::Sufficient,
                (false, true) => StockStatus::Insufficient,
                _ => {
                    return Err(FulfilError::ClassificationIncomplete(format!(
                        "訂單 {} 不屬於恰好一個分類",
                        group.order_id
                    )))
                }
            };

            if group
                .lines
                .iter()
                .any(|line| self.per_line.get(&line.id) != Some(&status))
            {
                return Err(FulfilError::ClassificationIncomplete(format!(
                    "訂單 {} 的明細分類不一致",
                    group.order_id
                )));
            }
        }

        Ok(())
    }
}

/// 庫存分配器
///
/// 依訂單傳入順序逐張檢查（先到先配，不求全域最佳）：
/// 整張訂單的每個商品都能由剩餘庫存滿足才算足夠，並立即扣減；
/// 否則整張訂單不足，不扣減任何庫存。
///
/// 本身不做持久化，可重複執行作為預覽。
pub struct StockAllocator;

impl StockAllocator {
    /// 執行分配
    ///
    /// # 參數
    /// * `groups` - 已展開的訂單分組，順序即處理順序
    /// * `snapshot` - 被引用商品的可用庫存，未列出的商品視為 0
    ///
    /// # 錯誤
    /// * [`FulfilError::InvalidQuantity`] - 明細數量為負
    /// * [`FulfilError::ClassificationIncomplete`] - 分類結果不一致
    pub fn allocate(
        groups: &OrderGroups,
        snapshot: HashMap<ProductId, i64>,
    ) -> fulfil_core::Result<AllocationResult> {
        tracing::info!(
            "開始庫存分配：訂單 {} 張，明細 {} 筆，商品 {} 種",
            groups.len(),
            groups.line_count(),
            snapshot.len()
        );

        let mut ledger = StockLedger::from_snapshot(snapshot);
        let mut result = AllocationResult::default();

        for group in groups.iter() {
            let demand = OrderDemand::from_lines(&group.lines)?;

            if demand.unresolved > 0 {
                result.warnings.push(PassWarning::warning(
                    group.order_id.to_string(),
                    format!("有 {} 件需求沒有對應商品", demand.unresolved),
                ));
            }

            let status = if demand.unresolved == 0 && ledger.commit(&demand.per_product) {
                result.sufficient_ids.push(group.order_id.clone());
                StockStatus::Sufficient
            } else {
                if let Some((product, needed, left)) = ledger.first_shortage(&demand.per_product) {
                    tracing::debug!(
                        "訂單 {} 庫存不足：商品 {} 需要 {}，剩餘 {}",
                        group.order_id,
                        product,
                        needed,
                        left
                    );
                }
                result.insufficient_ids.push(group.order_id.clone());
                StockStatus::Insufficient
            };

            for line in &group.lines {
                result.per_line.insert(line.id, status);
            }
        }

        result.ledger = ledger;
        result.verify(groups)?;

        let summary = result.summary();
        tracing::info!(
            "庫存分配完成：足夠 {} 張，不足 {} 張",
            summary.sufficient,
            summary.insufficient
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_core::OrderLine;
    use proptest::prelude::*;

    fn stock(items: &[(i64, i64)]) -> HashMap<ProductId, i64> {
        items.iter().map(|(id, qty)| (ProductId(*id), *qty)).collect()
    }

    fn line(order: &str, product: i64, qty: i64) -> OrderLine {
        OrderLine::new(order, format!("SKU-{}", product), qty).with_product(ProductId(product))
    }

    #[test]
    fn test_fifo_allocation() {
        let groups =
            OrderGroups::from_lines(vec![line("O1", 1, 5), line("O2", 1, 1)]).unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 5)])).unwrap();

        assert_eq!(result.sufficient_ids, vec![OrderId::from("O1")]);
        assert_eq!(result.insufficient_ids, vec![OrderId::from("O2")]);
        assert_eq!(result.ledger.remaining(ProductId(1)), 0);
    }

    #[test]
    fn test_reversed_order_flips_outcome() {
        let groups =
            OrderGroups::from_lines(vec![line("O2", 1, 1), line("O1", 1, 5)]).unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 5)])).unwrap();

        assert_eq!(result.sufficient_ids, vec![OrderId::from("O2")]);
        assert_eq!(result.insufficient_ids, vec![OrderId::from("O1")]);
        assert_eq!(result.ledger.remaining(ProductId(1)), 4);
    }

    #[test]
    fn test_insufficient_order_consumes_nothing() {
        // O1 的商品 1 足夠但商品 2 不足，整張不扣減
        let groups = OrderGroups::from_lines(vec![
            line("O1", 1, 3),
            line("O1", 2, 9),
            line("O2", 1, 10),
        ])
        .unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 10), (2, 2)])).unwrap();

        assert_eq!(result.status_of(&OrderId::from("O1")), Some(StockStatus::Insufficient));
        assert_eq!(result.status_of(&OrderId::from("O2")), Some(StockStatus::Sufficient));
        assert_eq!(result.ledger.remaining(ProductId(2)), 2);
        assert_eq!(result.consumed(), stock(&[(1, 10)]));
    }

    #[test]
    fn test_lines_of_same_product_are_summed() {
        let groups = OrderGroups::from_lines(vec![line("O1", 1, 3), line("O1", 1, 3)]).unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 5)])).unwrap();

        assert_eq!(result.insufficient_ids, vec![OrderId::from("O1")]);
    }

    #[test]
    fn test_missing_product_is_insufficient() {
        let groups = OrderGroups::from_lines(vec![
            line("O1", 1, 1),
            OrderLine::new("O1", "GHOST", 1),
            line("O2", 99, 1),
        ])
        .unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 100)])).unwrap();

        assert!(result.sufficient_ids.is_empty());
        assert_eq!(result.insufficient_ids.len(), 2);
        assert_eq!(result.ledger.remaining(ProductId(1)), 100);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].subject, "O1");
    }

    #[test]
    fn test_per_line_matches_order() {
        let lines = vec![line("O1", 1, 1), line("O1", 2, 1), line("O2", 2, 5)];
        let ids: Vec<_> = lines.iter().map(|l| l.id).collect();
        let groups = OrderGroups::from_lines(lines).unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 1), (2, 1)])).unwrap();

        assert_eq!(result.per_line[&ids[0]], StockStatus::Sufficient);
        assert_eq!(result.per_line[&ids[1]], StockStatus::Sufficient);
        assert_eq!(result.per_line[&ids[2]], StockStatus::Insufficient);
    }

    #[test]
    fn test_negative_quantity_fails_loudly() {
        let groups = OrderGroups::from_lines(vec![line("O1", 1, -2)]).unwrap();

        assert!(matches!(
            StockAllocator::allocate(&groups, stock(&[(1, 5)])),
            Err(FulfilError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_summary_and_records() {
        let groups = OrderGroups::from_lines(vec![
            line("O1", 1, 1),
            line("O2", 1, 1),
            line("O3", 1, 1),
        ])
        .unwrap();
        let result = StockAllocator::allocate(&groups, stock(&[(1, 2)])).unwrap();
        let summary = result.summary();

        assert_eq!(
            summary,
            AllocationSummary {
                sufficient: 2,
                insufficient: 1,
                total: 3
            }
        );
        assert_eq!(
            summary.to_json().unwrap(),
            r#"{"stock_cukup":2,"stock_tidak_cukup":1,"total":3}"#
        );

        let now = Utc::now();
        let records = result.records(now);
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].order_id, OrderId::from("O3"));
        assert_eq!(records[2].status, StockStatus::Insufficient);
        assert!(records.iter().all(|r| r.created_at == now));
    }

    #[test]
    fn test_empty_pool() {
        let result = StockAllocator::allocate(&OrderGroups::new(), HashMap::new()).unwrap();
        assert_eq!(result.summary().total, 0);
    }

    fn order_pool() -> impl Strategy<Value = (Vec<Vec<(Option<i64>, i64)>>, Vec<i64>)> {
        (
            prop::collection::vec(
                prop::collection::vec((prop::option::weighted(0.9, 0i64..4), 0i64..6), 1..4),
                0..12,
            ),
            prop::collection::vec(0i64..15, 4),
        )
    }

    proptest! {
        #[test]
        fn prop_stock_conserved_and_classification_complete((orders, levels) in order_pool()) {
            let mut lines = Vec::new();
            for (idx, order) in orders.iter().enumerate() {
                for (product, qty) in order {
                    let mut l = OrderLine::new(format!("O{}", idx), "SKU", *qty);
                    l.product = (*product).map(ProductId);
                    lines.push(l);
                }
            }
            let snapshot: HashMap<ProductId, i64> = levels
                .iter()
                .enumerate()
                .map(|(id, qty)| (ProductId(id as i64), *qty))
                .collect();

            let groups = OrderGroups::from_lines(lines).unwrap();
            let result = StockAllocator::allocate(&groups, snapshot.clone()).unwrap();

            // 分類完整且互斥
            let sufficient: HashSet<_> = result.sufficient_ids.iter().collect();
            let insufficient: HashSet<_> = result.insufficient_ids.iter().collect();
            let all: HashSet<_> = groups.order_ids().collect();
            prop_assert!(sufficient.is_disjoint(&insufficient));
            prop_assert_eq!(sufficient.union(&insufficient).cloned().collect::<HashSet<_>>(), all);

            // 消耗量等於足夠訂單的需求總和，且不超過快照
            let mut expected: HashMap<ProductId, i64> = HashMap::new();
            for id in &result.sufficient_ids {
                let demand = OrderDemand::from_lines(&groups.get(id).unwrap().lines).unwrap();
                prop_assert_eq!(demand.unresolved, 0);
                for (product, qty) in demand.per_product {
                    *expected.entry(product).or_insert(0) += qty;
                }
            }
            for (product, initial) in &snapshot {
                let used = expected.get(product).copied().unwrap_or(0);
                prop_assert!(used <= *initial);
                prop_assert_eq!(result.ledger.remaining(*product), initial - used);
            }
        }
    }
}
