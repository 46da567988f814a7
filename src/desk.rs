//! 应用数据：各类记录的仓库集合

use chrono::Local;

use crate::models::{Agent, Contract, Dataset, DatasetMeta, Message, Service, Vendor};
use crate::store::{MemoryStore, Store, StoreError};

pub struct Desk {
    pub agents: Box<dyn Store<Agent>>,
    pub vendors: Box<dyn Store<Vendor>>,
    pub services: Box<dyn Store<Service>>,
    pub contracts: Box<dyn Store<Contract>>,
    pub messages: Box<dyn Store<Message>>,
}

impl Desk {
    /// 使用内存仓库
    pub fn in_memory(data: Dataset) -> Self {
        Self {
            agents: Box::new(MemoryStore::with_items(data.agents)),
            vendors: Box::new(MemoryStore::with_items(data.vendors)),
            services: Box::new(MemoryStore::with_items(data.services)),
            contracts: Box::new(MemoryStore::with_items(data.contracts)),
            messages: Box::new(MemoryStore::with_items(data.messages)),
        }
    }

    /// 用数据集整体替换当前内容
    pub fn reload(&mut self, data: Dataset) {
        self.agents.replace_all(data.agents);
        self.vendors.replace_all(data.vendors);
        self.services.replace_all(data.services);
        self.contracts.replace_all(data.contracts);
        self.messages.replace_all(data.messages);
    }

    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            meta: DatasetMeta {
                version: "1.0".to_string(),
                generated_at: Local::now(),
            },
            agents: self.agents.list().to_vec(),
            vendors: self.vendors.list().to_vec(),
            services: self.services.list().to_vec(),
            contracts: self.contracts.list().to_vec(),
            messages: self.messages.list().to_vec(),
        }
    }

    pub fn agent_named(&self, name: &str) -> Option<&Agent> {
        self.agents.list().iter().find(|a| a.name == name)
    }

    pub fn vendor_named(&self, name: &str) -> Option<&Vendor> {
        self.vendors.list().iter().find(|v| v.name == name)
    }

    /// 代理人改名后同步合同与消息中的名称引用
    pub fn rename_agent(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if old == new {
            return Ok(());
        }
        let contracts: Vec<Contract> = self
            .contracts
            .list()
            .iter()
            .filter(|c| c.agent == old)
            .cloned()
            .collect();
        for mut contract in contracts {
            contract.agent = new.to_string();
            self.contracts.update(contract)?;
        }
        self.rename_correspondent(old, new)
    }

    /// 供应商改名后同步服务、合同与消息
    pub fn rename_vendor(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if old == new {
            return Ok(());
        }
        let services: Vec<Service> = self
            .services
            .list()
            .iter()
            .filter(|s| s.vendor == old)
            .cloned()
            .collect();
        for mut service in services {
            service.vendor = new.to_string();
            self.services.update(service)?;
        }
        let contracts: Vec<Contract> = self
            .contracts
            .list()
            .iter()
            .filter(|c| c.vendor == old)
            .cloned()
            .collect();
        for mut contract in contracts {
            contract.vendor = new.to_string();
            self.contracts.update(contract)?;
        }
        self.rename_correspondent(old, new)
    }

    fn rename_correspondent(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let messages: Vec<Message> = self
            .messages
            .list()
            .iter()
            .filter(|m| m.from == old || m.to == old)
            .cloned()
            .collect();
        for mut message in messages {
            if message.from == old {
                message.from = new.to_string();
            }
            if message.to == old {
                message.to = new.to_string();
            }
            self.messages.update(message)?;
        }
        Ok(())
    }

    /// 删除代理人；仍有合同时拒绝
    pub fn delete_agent(&mut self, id: &str) -> Result<(), StoreError> {
        let name = self
            .agents
            .get(id)
            .map(|a| a.name.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let count = self.contracts.list().iter().filter(|c| c.agent == name).count();
        if count > 0 {
            return Err(StoreError::InUse(name, count));
        }
        self.agents.delete(id).map(drop)
    }

    /// 删除供应商；仍有服务或合同时拒绝
    pub fn delete_vendor(&mut self, id: &str) -> Result<(), StoreError> {
        let name = self
            .vendors
            .get(id)
            .map(|v| v.name.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let count = self.services.list().iter().filter(|s| s.vendor == name).count()
            + self.contracts.list().iter().filter(|c| c.vendor == name).count();
        if count > 0 {
            return Err(StoreError::InUse(name, count));
        }
        self.vendors.delete(id).map(drop)
    }

    /// 消息收件人必须是已知身份
    pub fn is_known_identity(&self, name: &str) -> bool {
        name == crate::ui::state::ADMIN_NAME
            || self.agent_named(name).is_some()
            || self.vendor_named(name).is_some()
    }
}

impl Default for Desk {
    fn default() -> Self {
        Self::in_memory(Dataset::default())
    }
}
