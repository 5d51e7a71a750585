//! # Fulfil
//!
//! 出貨備貨引擎：組合商品展開與先到先配的庫存檢查
//!
//! - [`model`]：資料模型與錯誤類型
//! - [`calc`]：純計算（展開、分組、分配、報表）
//! - [`store`]：存儲介面、記憶體存儲與交易化流程服務

pub use fulfil_calc as calc;
pub use fulfil_core as model;
pub use fulfil_store as store;

pub use fulfil_calc::{AllocationResult, BundleExploder, ExtractionPass, OrderGroups, StockAllocator};
pub use fulfil_core::{FulfilError, OrderFilter, OrderLine, PassConfig, Result};
pub use fulfil_store::{FulfilmentService, MemoryStore};
