//! 記憶體內結果儲存

use std::collections::HashMap;

use opt_core::{OptError, Result};

use crate::{ResultStore, StoredId, StoredRecord, StoredResult};

/// 記憶體內結果儲存
pub struct InMemoryResultStore {
    records: Vec<StoredRecord>,

    /// 分店ID → 紀錄索引（依儲存順序）
    by_branch: HashMap<String, Vec<usize>>,
}

impl InMemoryResultStore {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            by_branch: HashMap::new(),
        }
    }

    /// 紀錄總數
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 依ID查詢
    pub fn get(&self, id: &StoredId) -> Option<&StoredRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    /// 清除所有紀錄
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_branch.clear();
    }
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&mut self, branch_id: &str, result: StoredResult) -> Result<StoredId> {
        if branch_id.trim().is_empty() {
            return Err(OptError::Storage("分店ID不可為空".to_string()));
        }

        let record = StoredRecord::new(branch_id, result);
        let id = record.id;
        self.by_branch
            .entry(branch_id.to_string())
            .or_default()
            .push(self.records.len());
        self.records.push(record);

        tracing::debug!("儲存分店 {} 的結果: {}", branch_id, id);
        Ok(id)
    }

    fn find_all_by_branch(&self, branch_id: &str) -> Vec<StoredRecord> {
        self.by_branch
            .get(branch_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| self.records[index].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn find_latest_by_branch(&self, branch_id: &str) -> Option<StoredRecord> {
        self.by_branch
            .get(branch_id)
            .and_then(|indices| indices.last())
            .map(|&index| self.records[index].clone())
    }
}
