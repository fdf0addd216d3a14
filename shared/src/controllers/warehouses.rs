use std::cell::RefCell;

use crate::Warehouse;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::protocol::{CreateWarehouseRequest, DeleteWarehouse, ListWarehouses, SetWarehouseBlocked};
use crate::transport::Transport;

/// 仓库列表缓存与当前选中的仓库
#[derive(Debug, Default)]
pub struct WarehouseController {
    list: RefCell<Vec<Warehouse>>,
    current: RefCell<Option<String>>,
}

impl WarehouseController {
    /// 拉取列表；尚未选中（或选中的仓库已不存在）时选中第一个
    pub async fn load<T: Transport>(&self, api: &ApiClient<T>) -> ApiResult<()> {
        let resp = api.call(&ListWarehouses).await?;
        self.replace(resp.warehouses);
        Ok(())
    }

    pub(crate) fn replace(&self, list: Vec<Warehouse>) {
        let mut current = self.current.borrow_mut();
        let still_there = current
            .as_deref()
            .is_some_and(|id| list.iter().any(|w| w.id == id));
        if !still_there {
            *current = list.first().map(|w| w.id.clone());
        }
        *self.list.borrow_mut() = list;
    }

    pub fn list(&self) -> Vec<Warehouse> {
        self.list.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.list.borrow().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Warehouse> {
        self.list.borrow().iter().find(|w| w.id == id).cloned()
    }

    pub fn current_id(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    pub fn current(&self) -> Option<Warehouse> {
        self.current_id().and_then(|id| self.get(&id))
    }

    pub fn select(&self, id: &str) {
        *self.current.borrow_mut() = Some(id.to_string());
    }

    /// 按名称子串过滤（不区分大小写）
    pub fn search(&self, query: &str) -> Vec<Warehouse> {
        let needle = query.trim().to_lowercase();
        self.list
            .borrow()
            .iter()
            .filter(|w| needle.is_empty() || w.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub async fn create<T: Transport>(
        &self,
        api: &ApiClient<T>,
        req: &CreateWarehouseRequest,
    ) -> ApiResult<()> {
        api.call(req).await?;
        Ok(())
    }

    pub async fn delete<T: Transport>(&self, api: &ApiClient<T>, id: &str) -> ApiResult<()> {
        api.call(&DeleteWarehouse {
            warehouse_id: id.to_string(),
        })
        .await?;
        Ok(())
    }

    pub async fn set_blocked<T: Transport>(
        &self,
        api: &ApiClient<T>,
        id: &str,
        blocked: bool,
    ) -> ApiResult<()> {
        api.call(&SetWarehouseBlocked {
            warehouse_id: id.to_string(),
            blocked,
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wh(id: &str, name: &str) -> Warehouse {
        Warehouse {
            id: id.into(),
            name: name.into(),
            camera_api_key: None,
            notification_emails: vec![],
            low_stock_default: None,
            blocked_at: None,
        }
    }

    #[test]
    fn test_first_warehouse_is_selected_once() {
        let c = WarehouseController::default();
        c.replace(vec![wh("a", "Главный"), wh("b", "Запасной")]);
        assert_eq!(c.current_id().as_deref(), Some("a"));

        c.select("b");
        c.replace(vec![wh("a", "Главный"), wh("b", "Запасной")]);
        assert_eq!(c.current_id().as_deref(), Some("b"));

        // 选中的仓库被删除后回到第一个
        c.replace(vec![wh("a", "Главный")]);
        assert_eq!(c.current_id().as_deref(), Some("a"));

        c.replace(vec![]);
        assert_eq!(c.current_id(), None);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let c = WarehouseController::default();
        c.replace(vec![wh("a", "Главный склад"), wh("b", "Запасной")]);
        let found = c.search("  главн ");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "a");
        assert_eq!(c.search("").len(), 2);
    }
}
