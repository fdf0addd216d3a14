use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::client::ApiClient;
use crate::config::WAREHOUSE_HISTORY_LIMIT;
use crate::error::ApiResult;
use crate::filter::ItemFilter;
use crate::poll::InFlight;
use crate::protocol::{
    CreateItemRequest, ItemHistory, ItemOpRequest, ListItems, LowStock, StockOp, WarehouseHistory,
};
use crate::transport::Transport;
use crate::{HistoryEntry, Item};

/// 商品缓存
///
/// 缓存归属于最近一次成功加载的仓库；`by_id` 供供货列表回填商品名。
#[derive(Debug, Default)]
pub struct ItemController {
    items: RefCell<Vec<Item>>,
    by_id: RefCell<HashMap<String, Item>>,
    loaded_for: RefCell<Option<String>>,
    categories: RefCell<Vec<String>>,
    in_flight: InFlight,
}

impl ItemController {
    pub async fn load<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
        filter: &ItemFilter,
    ) -> ApiResult<()> {
        let _guard = self.in_flight.enter();
        self.fetch(api, warehouse_id, filter).await
    }

    /// 静默刷新：已有加载进行中时直接跳过，错误只记录日志
    ///
    /// 返回是否真的发出了请求。
    pub async fn poll<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
        filter: &ItemFilter,
    ) -> bool {
        let Some(_guard) = self.in_flight.try_enter() else {
            log::debug!("items poll skipped: load in flight");
            return false;
        };
        if let Err(e) = self.fetch(api, warehouse_id, filter).await {
            log::debug!("items poll failed: {e}");
        }
        true
    }

    /// 缓存为空或属于其他仓库时加载（不带筛选），失败忽略
    pub async fn ensure_for<T: Transport>(&self, api: &ApiClient<T>, warehouse_id: &str) {
        if !self.items.borrow().is_empty() && self.is_loaded_for(warehouse_id) {
            return;
        }
        let _guard = self.in_flight.enter();
        if let Err(e) = self.fetch(api, warehouse_id, &ItemFilter::default()).await {
            log::debug!("items backfill failed: {e}");
        }
    }

    async fn fetch<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
        filter: &ItemFilter,
    ) -> ApiResult<()> {
        let resp = api
            .call(&ListItems {
                warehouse_id: warehouse_id.to_string(),
                filter: filter.clone(),
            })
            .await?;
        self.replace(warehouse_id, resp.items);
        Ok(())
    }

    pub(crate) fn replace(&self, warehouse_id: &str, items: Vec<Item>) {
        let categories: BTreeSet<String> = items.iter().map(|i| i.category().to_string()).collect();
        *self.categories.borrow_mut() = categories.into_iter().collect();
        *self.by_id.borrow_mut() = items.iter().map(|i| (i.id.clone(), i.clone())).collect();
        *self.items.borrow_mut() = items;
        *self.loaded_for.borrow_mut() = Some(warehouse_id.to_string());
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub fn is_loaded_for(&self, warehouse_id: &str) -> bool {
        self.loaded_for.borrow().as_deref() == Some(warehouse_id)
    }

    pub fn list(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    pub fn get(&self, id: &str) -> Option<Item> {
        self.by_id.borrow().get(id).cloned()
    }

    pub fn name_of(&self, id: &str) -> Option<String> {
        self.by_id.borrow().get(id).map(|i| i.name.clone())
    }

    /// 去重并排序的分类列表
    pub fn categories(&self) -> Vec<String> {
        self.categories.borrow().clone()
    }

    pub async fn create<T: Transport>(
        &self,
        api: &ApiClient<T>,
        req: &CreateItemRequest,
    ) -> ApiResult<()> {
        api.call(req).await?;
        Ok(())
    }

    pub async fn operate<T: Transport>(
        &self,
        api: &ApiClient<T>,
        op: StockOp,
        item_id: &str,
        amount: i64,
    ) -> ApiResult<()> {
        api.call(&ItemOpRequest {
            op,
            item_id: item_id.to_string(),
            amount,
        })
        .await?;
        Ok(())
    }

    pub async fn history<T: Transport>(
        &self,
        api: &ApiClient<T>,
        item_id: &str,
    ) -> ApiResult<Vec<HistoryEntry>> {
        let resp = api
            .call(&ItemHistory {
                item_id: item_id.to_string(),
            })
            .await?;
        Ok(resp.history)
    }

    pub async fn warehouse_history<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
    ) -> ApiResult<Vec<HistoryEntry>> {
        let resp = api
            .call(&WarehouseHistory {
                warehouse_id: warehouse_id.to_string(),
                limit: WAREHOUSE_HISTORY_LIMIT,
            })
            .await?;
        Ok(resp.history)
    }

    pub async fn low_stock<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
    ) -> ApiResult<Vec<Item>> {
        let resp = api
            .call(&LowStock {
                warehouse_id: warehouse_id.to_string(),
            })
            .await?;
        Ok(resp.items)
    }

    /// 供货表单用的商品列表，不影响缓存
    pub async fn fetch_for_form<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
    ) -> ApiResult<Vec<Item>> {
        let resp = api
            .call(&ListItems {
                warehouse_id: warehouse_id.to_string(),
                filter: ItemFilter::default(),
            })
            .await?;
        Ok(resp.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, category: Option<&str>) -> Item {
        Item {
            id: id.into(),
            warehouse_id: "w1".into(),
            name: format!("item {id}"),
            category: category.map(str::to_string),
            unit: None,
            count: 1,
            low_limit: None,
        }
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let c = ItemController::default();
        c.replace(
            "w1",
            vec![
                item("1", Some("напитки")),
                item("2", None),
                item("3", Some("молочка")),
                item("4", Some("напитки")),
            ],
        );
        assert_eq!(c.categories(), ["other", "молочка", "напитки"]);
        assert!(c.is_loaded_for("w1"));
        assert_eq!(c.name_of("3").as_deref(), Some("item 3"));
    }
}
