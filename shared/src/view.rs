//! 视图定义 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM。定义面板的所有视图、标题表、
//! URL 映射以及鉴权守卫。

use crate::Role;
use std::fmt::Display;

/// 面板视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    /// 登录页 (默认视图)
    #[default]
    Auth,
    /// CEO 注册
    Register,
    Dashboard,
    Warehouses,
    Items,
    Supplies,
    Employees,
    RootCompanies,
    /// 开发者控制台，不要求登录
    DevConsole,
    NotFound,
}

impl View {
    /// 导航栏中的视图顺序
    pub const NAV: [View; 6] = [
        Self::Dashboard,
        Self::Warehouses,
        Self::Items,
        Self::Supplies,
        Self::Employees,
        Self::RootCompanies,
    ];

    /// 将 URL path 解析为视图
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" | "/auth" | "/login" => Self::Auth,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/warehouses" => Self::Warehouses,
            "/items" => Self::Items,
            "/supplies" => Self::Supplies,
            "/employees" => Self::Employees,
            "/root-companies" => Self::RootCompanies,
            "/dev" => Self::DevConsole,
            _ => Self::NotFound,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Auth => "/",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Warehouses => "/warehouses",
            Self::Items => "/items",
            Self::Supplies => "/supplies",
            Self::Employees => "/employees",
            Self::RootCompanies => "/root-companies",
            Self::DevConsole => "/dev",
            Self::NotFound => "/404",
        }
    }

    /// 视图名，即 `data-view` 属性值
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Register => "register",
            Self::Dashboard => "dashboard",
            Self::Warehouses => "warehouses",
            Self::Items => "items",
            Self::Supplies => "supplies",
            Self::Employees => "employees",
            Self::RootCompanies => "root-companies",
            Self::DevConsole => "dev",
            Self::NotFound => "not-found",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [
            Self::Auth,
            Self::Register,
            Self::DevConsole,
            Self::NotFound,
        ]
        .into_iter()
        .chain(Self::NAV)
        .find(|v| v.name() == name)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Auth => "Авторизация",
            Self::Register => "Регистрация CEO",
            Self::Dashboard => "Дашборд",
            Self::Warehouses => "Склады",
            Self::Items => "Товары",
            Self::Supplies => "Поставки",
            Self::Employees => "Сотрудники",
            Self::RootCompanies => "Компании",
            Self::DevConsole => "Dev-консоль",
            Self::NotFound => "Страница не найдена",
        }
    }

    /// 标题下方显示的 API 路径提示
    pub fn crumb(&self) -> &'static str {
        match self {
            Self::Auth => "/user/auth",
            Self::Register => "/user/register/ceo",
            Self::Dashboard => "/dashboard/summary",
            Self::Warehouses => "/warehouse/list",
            Self::Items => "/items/list/{warehouse_id}",
            Self::Supplies => "/supplies/list/{warehouse_id}",
            Self::Employees => "/company/users/*",
            Self::RootCompanies => "/root/companies/*",
            Self::DevConsole => "/meta",
            Self::NotFound => "",
        }
    }

    /// **核心守卫逻辑：定义该视图是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::Warehouses
                | Self::Items
                | Self::Supplies
                | Self::Employees
                | Self::RootCompanies
        )
    }

    /// 已认证用户是否应该离开此视图（登录/注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Auth | Self::Register)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Auth
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 根据登录状态得到实际展示的视图
    pub fn resolve(self, authenticated: bool) -> Self {
        if authenticated && self.should_redirect_when_authenticated() {
            Self::auth_success_redirect()
        } else if !authenticated && self.requires_auth() {
            Self::auth_failure_redirect()
        } else {
            self
        }
    }

    /// 只有商品视图可见时才轮询商品列表
    pub fn polls_items(&self) -> bool {
        matches!(self, Self::Items)
    }

    /// 该视图的导航入口是否对当前角色可见
    pub fn visible_for(&self, role: Option<Role>) -> bool {
        match self {
            Self::Employees => role.is_some_and(|r| r.can_manage_employees()),
            Self::RootCompanies => role.is_some_and(|r| r.is_root()),
            _ => true,
        }
    }
}

impl Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_round_trip_for_every_view() {
        for view in View::NAV
            .into_iter()
            .chain([View::Auth, View::Register, View::DevConsole])
        {
            assert_eq!(View::from_path(view.to_path()), view);
            assert_eq!(View::parse(view.name()), Some(view));
        }
        assert_eq!(View::from_path("/items/?x=1"), View::Items);
        assert_eq!(View::from_path("/nope"), View::NotFound);
    }

    #[test]
    fn authenticated_user_skips_login_screens() {
        assert_eq!(View::Auth.resolve(true), View::Dashboard);
        assert_eq!(View::Register.resolve(true), View::Dashboard);
        assert_eq!(View::Items.resolve(true), View::Items);
    }

    #[test]
    fn anonymous_user_is_sent_to_auth() {
        assert_eq!(View::Supplies.resolve(false), View::Auth);
        assert_eq!(View::Register.resolve(false), View::Register);
        assert_eq!(View::DevConsole.resolve(false), View::DevConsole);
    }

    #[test]
    fn title_table() {
        assert_eq!(View::Dashboard.title(), "Дашборд");
        assert_eq!(View::Items.crumb(), "/items/list/{warehouse_id}");
        assert_eq!(View::RootCompanies.title(), "Компании");
    }

    #[test]
    fn nav_visibility_by_role() {
        assert!(!View::Employees.visible_for(Some(Role::Employee)));
        assert!(View::Employees.visible_for(Some(Role::Ceo)));
        assert!(!View::RootCompanies.visible_for(Some(Role::Ceo)));
        assert!(View::RootCompanies.visible_for(Some(Role::Root)));
        assert!(View::Warehouses.visible_for(None));
    }
}
