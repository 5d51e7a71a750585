//! # Fulfil Store
//!
//! 存儲介面與備貨流程服務
//!
//! 計算引擎只處理記憶體資料；讀取快照與寫回結果集中在此層，
//! 並以交易保證整個流程的原子性。

pub mod memory;
pub mod ports;
pub mod service;

// Re-export 主要類型
pub use memory::{MemoryState, MemoryStore};
pub use ports::{StoreTx, Transactional};
pub use service::{AllocationReport, ExtractionReport, FulfilmentService};
