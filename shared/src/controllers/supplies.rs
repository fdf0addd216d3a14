use std::cell::RefCell;

use crate::client::ApiClient;
use crate::controllers::items::ItemController;
use crate::error::{ApiError, ApiResult};
use crate::filter::SupplyFilter;
use crate::protocol::{CreateSupplyRequest, ListSupplies, SupplyStatusRequest};
use crate::transport::Transport;
use crate::{Supply, SupplyStatus, Timestamp};

/// 供货表单的原始输入
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSupply {
    pub item_id: String,
    pub amount: i64,
    /// `datetime-local` 输入框的值
    pub expected_at: String,
    pub note: String,
}

impl NewSupply {
    pub fn into_request(self, warehouse_id: &str) -> ApiResult<CreateSupplyRequest> {
        if self.expected_at.trim().is_empty() {
            return Err(ApiError::validation("Укажи дату поставки"));
        }
        let expected_at = Timestamp::from_local_input(&self.expected_at)
            .ok_or_else(|| ApiError::validation("Некорректная дата поставки"))?;
        let note = self.note.trim();
        Ok(CreateSupplyRequest {
            warehouse_id: warehouse_id.to_string(),
            item_id: self.item_id,
            amount: self.amount,
            expected_at,
            note: (!note.is_empty()).then(|| note.to_string()),
        })
    }
}

#[derive(Debug, Default)]
pub struct SupplyController {
    list: RefCell<Vec<Supply>>,
}

impl SupplyController {
    /// 拉取供货列表
    ///
    /// 逾期标记在客户端补全；缺少商品名的条目从商品缓存回填
    /// （必要时先加载该仓库的商品，失败忽略）。`overdue_only` 只在本地过滤。
    pub async fn load<T: Transport>(
        &self,
        api: &ApiClient<T>,
        items: &ItemController,
        warehouse_id: &str,
        filter: &SupplyFilter,
        now: Timestamp,
    ) -> ApiResult<()> {
        let resp = api
            .call(&ListSupplies {
                warehouse_id: warehouse_id.to_string(),
                filter: filter.clone(),
            })
            .await?;

        let mut list: Vec<Supply> = resp
            .supplies
            .into_iter()
            .map(|mut s| {
                s.overdue = Some(s.compute_overdue(now));
                s
            })
            .collect();

        if list.iter().any(|s| !has_name(s)) {
            items.ensure_for(api, warehouse_id).await;
            backfill_names(&mut list, items);
        }

        if filter.overdue_only {
            list.retain(Supply::is_overdue);
        }

        *self.list.borrow_mut() = list;
        Ok(())
    }

    pub fn list(&self) -> Vec<Supply> {
        self.list.borrow().clone()
    }

    pub async fn create<T: Transport>(
        &self,
        api: &ApiClient<T>,
        warehouse_id: &str,
        form: NewSupply,
    ) -> ApiResult<()> {
        let req = form.into_request(warehouse_id)?;
        api.call(&req).await?;
        Ok(())
    }

    pub async fn set_status<T: Transport>(
        &self,
        api: &ApiClient<T>,
        supply_id: &str,
        status: SupplyStatus,
    ) -> ApiResult<()> {
        api.call(&SupplyStatusRequest {
            supply_id: supply_id.to_string(),
            status,
        })
        .await?;
        Ok(())
    }
}

fn has_name(s: &Supply) -> bool {
    s.item_name.as_deref().is_some_and(|n| !n.is_empty())
}

fn backfill_names(list: &mut [Supply], items: &ItemController) {
    for s in list.iter_mut().filter(|s| !has_name(s)) {
        s.item_name = items.name_of(&s.item_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_date_is_rejected_before_any_request() {
        let form = NewSupply {
            item_id: "i1".into(),
            amount: 3,
            ..Default::default()
        };
        let err = form.into_request("w1").unwrap_err();
        assert_eq!(err, ApiError::Validation("Укажи дату поставки".into()));
    }

    #[test]
    fn test_note_is_trimmed_to_none() {
        let form = NewSupply {
            item_id: "i1".into(),
            amount: 3,
            expected_at: "2030-01-02T10:30".into(),
            note: "   ".into(),
        };
        let req = form.into_request("w1").unwrap();
        assert_eq!(req.note, None);
        assert_eq!(req.warehouse_id, "w1");
    }
}
