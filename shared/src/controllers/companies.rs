use std::cell::RefCell;

use crate::Company;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::protocol::{DeleteCompany, ListCompanies, SetCompanyBlocked};
use crate::transport::Transport;

/// 公司列表（仅 root）
#[derive(Debug, Default)]
pub struct CompanyController {
    list: RefCell<Vec<Company>>,
}

impl CompanyController {
    pub async fn load<T: Transport>(&self, api: &ApiClient<T>) -> ApiResult<()> {
        let resp = api.call(&ListCompanies).await?;
        *self.list.borrow_mut() = resp.companies;
        Ok(())
    }

    pub fn list(&self) -> Vec<Company> {
        self.list.borrow().clone()
    }

    pub async fn set_blocked<T: Transport>(
        &self,
        api: &ApiClient<T>,
        id: &str,
        blocked: bool,
    ) -> ApiResult<()> {
        api.call(&SetCompanyBlocked {
            company_id: id.to_string(),
            blocked,
        })
        .await?;
        Ok(())
    }

    pub async fn delete<T: Transport>(&self, api: &ApiClient<T>, id: &str) -> ApiResult<()> {
        api.call(&DeleteCompany {
            company_id: id.to_string(),
        })
        .await?;
        Ok(())
    }
}
