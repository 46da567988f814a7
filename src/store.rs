//! 数据仓库抽象
//!
//! 调用方通过 `Store` trait 读写记录，测试与运行时都使用内存实现

use thiserror::Error;

/// 具有唯一 id 的记录
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("record '{0}' not found")]
    NotFound(String),
    #[error("record '{0}' already exists")]
    Duplicate(String),
    #[error("'{0}' is still referenced by {1} record(s)")]
    InUse(String, usize),
}

/// 记录仓库
pub trait Store<T: Entity> {
    /// 按插入顺序返回全部记录
    fn list(&self) -> &[T];

    fn get(&self, id: &str) -> Option<&T>;

    fn create(&mut self, item: T) -> Result<(), StoreError>;

    /// 以 id 定位并整体替换
    fn update(&mut self, item: T) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<T, StoreError>;

    /// 清空后整体替换（重新加载数据集）
    fn replace_all(&mut self, items: Vec<T>);
}

/// 内存仓库
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    items: Vec<T>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        Self { items }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Store<T> for MemoryStore<T> {
    fn list(&self) -> &[T] {
        &self.items
    }

    fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    fn create(&mut self, item: T) -> Result<(), StoreError> {
        if self.position(item.id()).is_some() {
            return Err(StoreError::Duplicate(item.id().to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    fn update(&mut self, item: T) -> Result<(), StoreError> {
        let index = self
            .position(item.id())
            .ok_or_else(|| StoreError::NotFound(item.id().to_string()))?;
        self.items[index] = item;
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<T, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: String,
        text: String,
    }

    impl Entity for Note {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_create_and_list_in_order() {
        let mut store = MemoryStore::new();
        store.create(note("1", "a")).unwrap();
        store.create(note("2", "b")).unwrap();
        let ids: Vec<&str> = store.list().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(store.get("2").map(|n| n.text.as_str()), Some("b"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = MemoryStore::with_items(vec![note("1", "a")]);
        assert_eq!(
            store.create(note("1", "z")),
            Err(StoreError::Duplicate("1".to_string()))
        );
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = MemoryStore::with_items(vec![note("1", "a"), note("2", "b")]);
        store.update(note("1", "changed")).unwrap();
        assert_eq!(store.list()[0].text, "changed");
        assert_eq!(
            store.update(note("9", "x")),
            Err(StoreError::NotFound("9".to_string()))
        );
    }

    #[test]
    fn test_delete_returns_record() {
        let mut store = MemoryStore::with_items(vec![note("1", "a"), note("2", "b")]);
        assert_eq!(store.delete("1").unwrap().text, "a");
        assert_eq!(store.list().len(), 1);
        assert!(store.delete("1").is_err());
    }

    #[test]
    fn test_store_behind_trait_object() {
        let mut store: Box<dyn Store<Note>> = Box::new(MemoryStore::new());
        store.create(note("1", "a")).unwrap();
        store.replace_all(vec![note("5", "e")]);
        assert_eq!(store.list().len(), 1);
        assert!(store.get("1").is_none());
    }
}
