//! 庫存帳（單次分配用）

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::product::ProductId;

/// 單次分配用的剩餘庫存帳
///
/// 由庫存快照建立，只在一次分配中被扣減，用完即丟棄，不回寫主檔。
/// 快照中沒有的商品視為可用數量 0。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockLedger {
    /// 快照初始數量
    initial: HashMap<ProductId, i64>,

    /// 剩餘可分配數量
    remaining: HashMap<ProductId, i64>,
}

impl StockLedger {
    /// 以庫存快照建立庫存帳
    pub fn from_snapshot(snapshot: HashMap<ProductId, i64>) -> Self {
        Self {
            remaining: snapshot.clone(),
            initial: snapshot,
        }
    }

    /// 剩餘可分配數量
    pub fn remaining(&self, product: ProductId) -> i64 {
        self.remaining.get(&product).copied().unwrap_or(0)
    }

    /// 快照初始數量
    pub fn initial(&self, product: ProductId) -> i64 {
        self.initial.get(&product).copied().unwrap_or(0)
    }

    /// 檢查剩餘庫存能否滿足整筆需求
    pub fn can_cover(&self, demand: &HashMap<ProductId, i64>) -> bool {
        demand
            .iter()
            .all(|(product, qty)| self.remaining(*product) >= *qty)
    }

    /// 第一個無法滿足的商品（用於日誌）
    pub fn first_shortage(&self, demand: &HashMap<ProductId, i64>) -> Option<(ProductId, i64, i64)> {
        let mut shortages: Vec<_> = demand
            .iter()
            .filter(|(product, qty)| self.remaining(**product) < **qty)
            .map(|(product, qty)| (*product, *qty, self.remaining(*product)))
            .collect();
        shortages.sort();
        shortages.into_iter().next()
    }

    /// 扣減整筆需求
    ///
    /// 只在 [`can_cover`](Self::can_cover) 為真時呼叫；
    /// 否則不做任何扣減並返回 false。
    pub fn commit(&mut self, demand: &HashMap<ProductId, i64>) -> bool {
        if !self.can_cover(demand) {
            return false;
        }
        for (product, qty) in demand {
            if *qty == 0 {
                continue;
            }
            *self.remaining.entry(*product).or_insert(0) -= qty;
        }
        true
    }

    /// 各商品已消耗數量（初始 - 剩餘），僅列出有消耗的商品
    pub fn consumed(&self) -> HashMap<ProductId, i64> {
        self.remaining
            .iter()
            .filter_map(|(product, left)| {
                let used = self.initial(*product) - left;
                (used != 0).then_some((*product, used))
            })
            .collect()
    }
}
