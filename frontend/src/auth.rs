//! 认证模块
//!
//! 会话本身由共享层的 `Session` 持久化在 LocalStorage 中，
//! 这里只把当前身份镜像到一个信号上，供路由守卫和界面使用。

use leptos::prelude::*;
use sklad_shared::protocol::RegisterCeoRequest;
use sklad_shared::session::Identity;
use sklad_shared::{ApiResult, Role, View};

use crate::api::AppPanel;

/// 认证上下文
#[derive(Clone, Copy)]
pub struct AuthContext {
    identity: RwSignal<Identity>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self {
            identity: RwSignal::new(Identity::default()),
        }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let identity = self.identity;
        Signal::derive(move || identity.with(|i| i.is_authenticated()))
    }

    pub fn login_name(&self) -> Signal<String> {
        let identity = self.identity;
        Signal::derive(move || identity.with(|i| i.login.clone()))
    }

    pub fn role(&self) -> Signal<Option<Role>> {
        let identity = self.identity;
        Signal::derive(move || identity.with(|i| i.role()))
    }

    /// 从会话重新读取身份
    pub fn sync(&self, panel: &AppPanel) {
        self.identity.set(panel.session().identity());
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录；成功后身份信号更新，路由守卫负责跳转
pub async fn login(
    ctx: AuthContext,
    panel: &AppPanel,
    login: &str,
    password: &str,
) -> ApiResult<View> {
    let landing = panel.login(login, password).await?;
    ctx.sync(panel);
    Ok(landing)
}

pub async fn register_ceo(
    ctx: AuthContext,
    panel: &AppPanel,
    req: &RegisterCeoRequest,
) -> ApiResult<View> {
    let landing = panel.register_ceo(req).await?;
    ctx.sync(panel);
    Ok(landing)
}

/// 注销并清除状态
///
/// 不需要手动导航，路由服务会监听认证状态变化并自动重定向。
pub fn logout(ctx: AuthContext, panel: &AppPanel) -> View {
    let landing = panel.logout();
    ctx.sync(panel);
    landing
}
