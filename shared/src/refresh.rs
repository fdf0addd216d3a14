//! 变更后的联动刷新表
//!
//! 每种变更操作对应需要重新加载的区块集合。

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Warehouses,
    Items,
    Supplies,
    Employees,
    Companies,
    Dashboard,
    Notifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    WarehouseCreated,
    WarehouseDeleted,
    WarehouseBlockToggled,
    ItemCreated,
    StockOperation,
    SupplyCreated,
    SupplyStatusChanged,
    EmployeeChanged,
    CompanyChanged,
    NotificationRead,
}

impl Action {
    pub fn dependents(&self) -> &'static [Section] {
        use Section::*;
        match self {
            Self::WarehouseCreated | Self::WarehouseDeleted | Self::WarehouseBlockToggled => {
                &[Warehouses, Dashboard]
            }
            Self::ItemCreated | Self::StockOperation => &[Items, Dashboard, Notifications],
            Self::SupplyCreated => &[Supplies, Dashboard, Notifications],
            Self::SupplyStatusChanged => &[Supplies, Items, Dashboard, Notifications],
            Self::EmployeeChanged => &[Employees],
            Self::CompanyChanged => &[Companies],
            Self::NotificationRead => &[Notifications],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_status_change_fans_out() {
        let deps = Action::SupplyStatusChanged.dependents();
        for s in [
            Section::Supplies,
            Section::Items,
            Section::Dashboard,
            Section::Notifications,
        ] {
            assert!(deps.contains(&s));
        }
        assert!(!deps.contains(&Section::Warehouses));
    }

    #[test]
    fn warehouse_mutations_refresh_dashboard() {
        assert_eq!(
            Action::WarehouseDeleted.dependents(),
            &[Section::Warehouses, Section::Dashboard]
        );
    }
}
