//! 記憶體存儲

use fulfil_core::{
    BundleCatalog, BundleDefinition, ClassificationRecord, FulfilError, LineId, OrderLine,
    Product, ProductCatalog, ProductId,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::ports::{StoreTx, Transactional};

/// 記憶體存儲狀態（交易在其副本上操作）
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    lines: Vec<OrderLine>,
    catalog: ProductCatalog,
    bundles: BundleCatalog,
    stock: HashMap<ProductId, i64>,
    classification: Vec<ClassificationRecord>,
}

impl StoreTx for MemoryState {
    fn lines(&self) -> Vec<OrderLine> {
        self.lines.clone()
    }

    fn insert_lines(&mut self, lines: Vec<OrderLine>) -> fulfil_core::Result<()> {
        let mut known: HashSet<LineId> = self.lines.iter().map(|l| l.id).collect();
        for line in &lines {
            if !known.insert(line.id) {
                return Err(FulfilError::DuplicateLine(line.id));
            }
        }
        self.lines.extend(lines);
        Ok(())
    }

    fn update_lines(&mut self, lines: Vec<OrderLine>) -> fulfil_core::Result<()> {
        let index: HashMap<LineId, usize> = self
            .lines
            .iter()
            .enumerate()
            .map(|(idx, l)| (l.id, idx))
            .collect();

        for line in lines {
            let idx = index
                .get(&line.id)
                .copied()
                .ok_or_else(|| FulfilError::Store(format!("明細不存在: {}", line.id)))?;
            self.lines[idx] = line;
        }
        Ok(())
    }

    fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    fn bundles(&self) -> &BundleCatalog {
        &self.bundles
    }

    fn stock_snapshot(&self, products: &BTreeSet<ProductId>) -> HashMap<ProductId, i64> {
        products
            .iter()
            .filter_map(|id| self.stock.get(id).map(|qty| (*id, *qty)))
            .collect()
    }

    fn replace_classification(
        &mut self,
        records: Vec<ClassificationRecord>,
    ) -> fulfil_core::Result<()> {
        self.classification = records;
        Ok(())
    }

    fn classification(&self) -> Vec<ClassificationRecord> {
        self.classification.clone()
    }
}

/// 記憶體存儲
///
/// 以互斥鎖串行化所有交易；交易在狀態副本上執行，成功才整份替換，
/// 失敗時原狀態不受影響。
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> fulfil_core::Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| FulfilError::Store("存儲鎖已損壞".to_string()))
    }

    /// 新增商品
    pub fn add_product(&self, product: Product) -> fulfil_core::Result<()> {
        self.lock()?.catalog.insert(product);
        Ok(())
    }

    /// 新增組合定義
    pub fn add_bundle(&self, bundle: BundleDefinition) -> fulfil_core::Result<()> {
        self.lock()?.bundles.insert(bundle);
        Ok(())
    }

    /// 設置商品庫存
    pub fn set_stock(&self, product: ProductId, quantity: i64) -> fulfil_core::Result<()> {
        self.lock()?.stock.insert(product, quantity);
        Ok(())
    }

    /// 匯入訂單明細
    pub fn import_lines(&self, lines: Vec<OrderLine>) -> fulfil_core::Result<()> {
        self.transaction(|tx| tx.insert_lines(lines))
    }

    /// 目前全部明細
    pub fn lines(&self) -> fulfil_core::Result<Vec<OrderLine>> {
        Ok(self.lock()?.lines.clone())
    }

    /// 目前的分類記錄
    pub fn classification(&self) -> fulfil_core::Result<Vec<ClassificationRecord>> {
        Ok(self.lock()?.classification.clone())
    }
}

impl Transactional for MemoryStore {
    type Tx = MemoryState;

    fn transaction<T, F>(&self, f: F) -> fulfil_core::Result<T>
    where
        F: FnOnce(&mut Self::Tx) -> fulfil_core::Result<T>,
    {
        let mut guard = self.lock()?;
        let mut staged = guard.clone();
        let output = f(&mut staged)?;
        *guard = staged;
        Ok(output)
    }
}
