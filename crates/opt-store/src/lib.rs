//! # Optimization Store
//!
//! 優化結果儲存閘道

pub mod memory;
pub mod record;

// Re-export 主要類型
pub use memory::InMemoryResultStore;
pub use record::{StoredId, StoredRecord, StoredResult};

use opt_core::Result;

/// 結果儲存閘道
///
/// 優化核心不直接存取儲存，由服務層在計算完成後呼叫。
pub trait ResultStore {
    /// 儲存結果，回傳新紀錄的ID
    fn save(&mut self, branch_id: &str, result: StoredResult) -> Result<StoredId>;

    /// 依儲存順序列出分店的所有結果
    fn find_all_by_branch(&self, branch_id: &str) -> Vec<StoredRecord>;

    /// 分店最近一次儲存的結果
    fn find_latest_by_branch(&self, branch_id: &str) -> Option<StoredRecord>;
}
