//! 主檔缺漏報表

use fulfil_core::{normalize_sku, OrderLine, PassConfig, ProductCatalog};
use std::collections::BTreeSet;

/// 找不到商品主檔的 SKU（排序、不重複）
///
/// 只看可參與分配的明細；已展開的組合父件不列入。
pub fn sku_not_found(
    lines: &[OrderLine],
    catalog: &ProductCatalog,
    config: &PassConfig,
) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.is_allocatable(config))
        .map(|line| normalize_sku(&line.sku))
        .filter(|sku| !sku.is_empty() && !catalog.contains_sku(sku))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_core::{BundleStatus, Product, ProductId};

    #[test]
    fn test_sku_not_found() {
        let catalog: ProductCatalog = vec![Product::new(ProductId(1), "A", "Item A")]
            .into_iter()
            .collect();
        let config = PassConfig::default();

        let lines = vec![
            OrderLine::new("INV-1", "a", 1).with_status("Lunas"),
            OrderLine::new("INV-1", "zz-9", 1).with_status("Lunas"),
            OrderLine::new("INV-2", "ZZ-9", 1).with_status("Lunas"),
            OrderLine::new("INV-2", "GHOST", 1).with_status("Lunas"),
            OrderLine::new("INV-3", "BOX", 1)
                .with_status("Lunas")
                .with_bundle_status(BundleStatus::Exploded),
            OrderLine::new("INV-4", "OLD", 1)
                .with_status("Lunas")
                .with_batch_name("BATCH-1"),
            OrderLine::new("INV-5", "UNPAID", 1).with_status("Batal"),
        ];

        assert_eq!(
            sku_not_found(&lines, &catalog, &config),
            vec!["GHOST".to_string(), "ZZ-9".to_string()]
        );
    }
}
