//! 依訂單編號分組

use fulfil_core::{FulfilError, LineId, OrderId, OrderLine, ProductId};
use std::collections::{BTreeSet, HashMap, HashSet};

/// 一張訂單的全部明細
#[derive(Debug, Clone)]
pub struct OrderGroup {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
}

/// 依首次出現順序排列的訂單分組
///
/// 分配時依此順序逐張處理（先到先配）。
#[derive(Debug, Clone, Default)]
pub struct OrderGroups {
    groups: Vec<OrderGroup>,
    index: HashMap<OrderId, usize>,
    line_ids: HashSet<LineId>,
}

impl OrderGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由明細建立分組，保留訂單首次出現的順序
    ///
    /// # 錯誤
    /// * [`FulfilError::DuplicateLine`] - 同一明細ID出現兩次
    pub fn from_lines<I>(lines: I) -> fulfil_core::Result<Self>
    where
        I: IntoIterator<Item = OrderLine>,
    {
        let mut groups = Self::new();
        for line in lines {
            groups.push(line)?;
        }
        Ok(groups)
    }

    /// 依給定的訂單順序建立分組
    ///
    /// `order_ids` 決定處理順序（例如依訂單第一筆明細在存儲中的位置，
    /// 已展開的父件也算）；不在其中的訂單依首次出現接在後面，
    /// 沒有任何明細的訂單不會出現在結果中。
    ///
    /// # 錯誤
    /// * [`FulfilError::DuplicateLine`] - 同一明細ID出現兩次
    pub fn from_lines_in_order<'a, O, I>(order_ids: O, lines: I) -> fulfil_core::Result<Self>
    where
        O: IntoIterator<Item = &'a OrderId>,
        I: IntoIterator<Item = OrderLine>,
    {
        let mut groups = Self::new();
        for order_id in order_ids {
            if !groups.index.contains_key(order_id) {
                groups.index.insert(order_id.clone(), groups.groups.len());
                groups.groups.push(OrderGroup {
                    order_id: order_id.clone(),
                    lines: Vec::new(),
                });
            }
        }

        for line in lines {
            groups.push(line)?;
        }

        groups.groups.retain(|g| !g.lines.is_empty());
        groups.index = groups
            .groups
            .iter()
            .enumerate()
            .map(|(idx, g)| (g.order_id.clone(), idx))
            .collect();
        Ok(groups)
    }

    /// 加入一筆明細到其訂單
    pub fn push(&mut self, line: OrderLine) -> fulfil_core::Result<()> {
        if !self.line_ids.insert(line.id) {
            return Err(FulfilError::DuplicateLine(line.id));
        }

        match self.index.get(&line.order_id) {
            Some(&idx) => self.groups[idx].lines.push(line),
            None => {
                self.index.insert(line.order_id.clone(), self.groups.len());
                self.groups.push(OrderGroup {
                    order_id: line.order_id.clone(),
                    lines: vec![line],
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderGroup> {
        self.groups.iter()
    }

    pub fn get(&self, order_id: &OrderId) -> Option<&OrderGroup> {
        self.index.get(order_id).map(|&idx| &self.groups[idx])
    }

    /// 訂單編號（依處理順序）
    pub fn order_ids(&self) -> impl Iterator<Item = &OrderId> {
        self.groups.iter().map(|g| &g.order_id)
    }

    /// 被引用到的商品（用於載入庫存快照）
    pub fn product_ids(&self) -> BTreeSet<ProductId> {
        self.groups
            .iter()
            .flat_map(|g| g.lines.iter())
            .filter_map(|l| l.product)
            .collect()
    }

    /// 訂單數
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// 明細總數
    pub fn line_count(&self) -> usize {
        self.line_ids.len()
    }
}
