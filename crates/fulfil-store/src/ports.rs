//! 存儲介面（Ports）

use fulfil_core::{
    BundleCatalog, ClassificationRecord, OrderId, OrderLine, PassConfig, ProductCatalog,
    ProductId,
};
use std::collections::{BTreeSet, HashMap};

/// 交易內可用的存儲操作
pub trait StoreTx {
    /// 全部明細（依匯入順序）
    fn lines(&self) -> Vec<OrderLine>;

    /// 批量新增明細
    fn insert_lines(&mut self, lines: Vec<OrderLine>) -> fulfil_core::Result<()>;

    /// 批量更新明細（以明細ID比對）
    fn update_lines(&mut self, lines: Vec<OrderLine>) -> fulfil_core::Result<()>;

    /// 商品主檔
    fn catalog(&self) -> &ProductCatalog;

    /// 組合定義
    fn bundles(&self) -> &BundleCatalog;

    /// 指定商品的可用庫存快照，沒有庫存記錄的商品不列出
    fn stock_snapshot(&self, products: &BTreeSet<ProductId>) -> HashMap<ProductId, i64>;

    /// 以新的分類記錄整批替換舊記錄
    fn replace_classification(&mut self, records: Vec<ClassificationRecord>)
        -> fulfil_core::Result<()>;

    /// 目前的分類記錄
    fn classification(&self) -> Vec<ClassificationRecord>;

    /// 指定訂單的全部明細
    fn lines_for_orders(&self, order_ids: &[OrderId]) -> Vec<OrderLine> {
        self.lines()
            .into_iter()
            .filter(|line| order_ids.contains(&line.order_id))
            .collect()
    }

    /// 已付款且尚未進批次的明細
    fn eligible_lines(&self, config: &PassConfig) -> Vec<OrderLine> {
        self.lines()
            .into_iter()
            .filter(|line| line.is_paid(config) && !line.is_batched())
            .collect()
    }
}

/// 交易邊界
///
/// 閉包返回 `Err` 時，交易內的所有變更都不生效。
/// 同一時間只有一個交易在執行。
pub trait Transactional {
    type Tx: StoreTx;

    fn transaction<T, F>(&self, f: F) -> fulfil_core::Result<T>
    where
        F: FnOnce(&mut Self::Tx) -> fulfil_core::Result<T>;
}
