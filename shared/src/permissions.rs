//! 员工权限目录

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub group: &'static str,
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const fn perm(
    group: &'static str,
    key: &'static str,
    title: &'static str,
    description: &'static str,
) -> Permission {
    Permission {
        group,
        key,
        title,
        description,
    }
}

pub const CATALOG: &[Permission] = &[
    perm(
        "Компания",
        "company.update",
        "Управление компанией",
        "Менять название, ИНН и общие данные компании.",
    ),
    perm(
        "Сотрудники",
        "users.create",
        "Создание сотрудников",
        "Добавлять новых работников своей компании.",
    ),
    perm(
        "Сотрудники",
        "users.update",
        "Управление сотрудниками",
        "Менять должности, права, блокировать/разблокировать.",
    ),
    perm(
        "Склады",
        "warehouses.create",
        "Создание складов",
        "Создавать новые склады компании.",
    ),
    perm(
        "Склады",
        "warehouses.update",
        "Редактирование складов",
        "Переименовать склад, менять пороги, email-уведомления.",
    ),
    perm(
        "Склады",
        "warehouses.delete",
        "Удаление складов",
        "Удалять (мягко) склады компании.",
    ),
    perm(
        "Склады",
        "camera.create_key",
        "Ключ камеры склада",
        "Смотреть/перегенерировать API-ключ камеры.",
    ),
    perm(
        "Товары",
        "items.create",
        "Добавление товаров",
        "Создавать новые позиции товаров на складе.",
    ),
    perm(
        "Товары",
        "items.update",
        "Редактирование товаров",
        "Менять название, категорию, единицы, пороги low-stock.",
    ),
    perm(
        "Товары",
        "items.delete",
        "Удаление товаров",
        "Удалять товары (мягко) со склада.",
    ),
    perm(
        "Товары",
        "items.op",
        "Операции приход/расход",
        "Увеличивать/уменьшать остаток товара.",
    ),
    perm(
        "Поставки",
        "supplies.create",
        "Создание поставок",
        "Планировать будущие поставки.",
    ),
    perm(
        "Поставки",
        "supplies.update",
        "Управление поставками",
        "Менять статус поставки (waiting/done/canceled).",
    ),
    perm(
        "Поставки",
        "supplies.delete",
        "Удаление поставок",
        "Удалять поставки.",
    ),
];

/// 按分组聚合，保持目录中的先后顺序
pub fn groups() -> Vec<(&'static str, Vec<&'static Permission>)> {
    let mut out: Vec<(&'static str, Vec<&'static Permission>)> = Vec::new();
    for p in CATALOG {
        match out.iter_mut().find(|(g, _)| *g == p.group) {
            Some((_, list)) => list.push(p),
            None => out.push((p.group, vec![p])),
        }
    }
    out
}

pub fn is_known(key: &str) -> bool {
    CATALOG.iter().any(|p| p.key == key)
}

/// 切换勾选状态
///
/// 只改动 `key` 本身：目录内的键按目录顺序排列，目录外的键（如 `*`）原样保留在末尾。
pub fn toggle(selected: &[String], key: &str) -> Vec<String> {
    let has = selected.iter().any(|k| k == key);
    let keep = |k: &str| if k == key { !has } else { selected.iter().any(|s| s == k) };

    let mut out: Vec<String> = CATALOG
        .iter()
        .map(|p| p.key)
        .filter(|k| keep(k))
        .map(str::to_string)
        .collect();
    for k in selected {
        if !is_known(k) && k != key && !out.contains(k) {
            out.push(k.clone());
        }
    }
    if !has && !is_known(key) {
        out.push(key.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_fourteen_unique_keys() {
        assert_eq!(CATALOG.len(), 14);
        for (i, p) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|q| q.key != p.key));
        }
    }

    #[test]
    fn groups_keep_catalog_order() {
        let names: Vec<_> = groups().iter().map(|(g, _)| *g).collect();
        assert_eq!(
            names,
            ["Компания", "Сотрудники", "Склады", "Товары", "Поставки"]
        );
        assert_eq!(groups()[2].1.len(), 4);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let selected = toggle(&[], "items.op");
        assert_eq!(selected, ["items.op"]);
        let selected = toggle(&selected, "users.create");
        assert_eq!(selected, ["users.create", "items.op"]);
        assert_eq!(toggle(&selected, "items.op"), ["users.create"]);
        assert!(is_known("camera.create_key"));
        assert!(!is_known("camera.delete"));
    }

    #[test]
    fn toggle_keeps_keys_outside_catalog() {
        let selected = vec!["*".to_string(), "items.op".to_string()];
        let selected = toggle(&selected, "items.create");
        assert_eq!(selected, ["items.create", "items.op", "*"]);
        assert_eq!(toggle(&selected, "items.op"), ["items.create", "*"]);
        assert_eq!(toggle(&selected, "*"), ["items.create", "items.op"]);
    }
}
