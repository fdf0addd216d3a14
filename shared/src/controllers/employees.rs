use std::cell::RefCell;

use crate::Employee;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::protocol::{CreateEmployeeRequest, DeleteEmployee, ListEmployees, UpdateEmployeeRequest};
use crate::transport::Transport;

#[derive(Debug, Default)]
pub struct EmployeeController {
    list: RefCell<Vec<Employee>>,
}

impl EmployeeController {
    pub async fn load<T: Transport>(&self, api: &ApiClient<T>) -> ApiResult<()> {
        let resp = api.call(&ListEmployees).await?;
        *self.list.borrow_mut() = resp.users;
        Ok(())
    }

    pub fn list(&self) -> Vec<Employee> {
        self.list.borrow().clone()
    }

    pub async fn create<T: Transport>(
        &self,
        api: &ApiClient<T>,
        req: &CreateEmployeeRequest,
    ) -> ApiResult<()> {
        api.call(req).await?;
        Ok(())
    }

    pub async fn update<T: Transport>(
        &self,
        api: &ApiClient<T>,
        req: &UpdateEmployeeRequest,
    ) -> ApiResult<()> {
        api.call(req).await?;
        Ok(())
    }

    /// 切换封禁状态，返回新的状态
    pub async fn toggle_blocked<T: Transport>(
        &self,
        api: &ApiClient<T>,
        employee: &Employee,
    ) -> ApiResult<bool> {
        let blocked = !employee.is_blocked();
        self.update(
            api,
            &UpdateEmployeeRequest {
                user_id: employee.id.clone(),
                blocked: Some(blocked),
                ..Default::default()
            },
        )
        .await?;
        Ok(blocked)
    }

    pub async fn delete<T: Transport>(&self, api: &ApiClient<T>, id: &str) -> ApiResult<()> {
        api.call(&DeleteEmployee {
            user_id: id.to_string(),
        })
        .await?;
        Ok(())
    }
}
