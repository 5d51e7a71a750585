//! 訂單需求彙總

use fulfil_core::{FulfilError, OrderLine, ProductId, StockLedger};
use std::collections::HashMap;

/// 一張訂單依商品彙總的需求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDemand {
    /// 各商品需求總量
    pub per_product: HashMap<ProductId, i64>,

    /// 沒有對應商品的需求數量（無法由任何庫存滿足）
    pub unresolved: i64,
}

impl OrderDemand {
    /// 彙總明細需求
    ///
    /// # 錯誤
    /// * [`FulfilError::InvalidQuantity`] - 明細數量為負（分組錯誤，不是業務狀況），或合計溢位
    pub fn from_lines<'a, I>(lines: I) -> fulfil_core::Result<Self>
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        let mut demand = OrderDemand::default();

        for line in lines {
            if line.quantity < 0 {
                return Err(FulfilError::InvalidQuantity {
                    line_id: line.id,
                    quantity: line.quantity,
                });
            }

            let total = match line.product {
                Some(product) => demand.per_product.entry(product).or_insert(0),
                None => &mut demand.unresolved,
            };
            *total = total
                .checked_add(line.quantity)
                .ok_or(FulfilError::InvalidQuantity {
                    line_id: line.id,
                    quantity: line.quantity,
                })?;
        }

        Ok(demand)
    }

    /// 檢查剩餘庫存能否滿足整張訂單
    pub fn is_covered_by(&self, ledger: &StockLedger) -> bool {
        self.unresolved == 0 && ledger.can_cover(&self.per_product)
    }
}
