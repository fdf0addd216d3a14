use super::*;
use crate::refresh::Action;
use crate::session::{MemoryStore, STORAGE_LOGIN_KEY, STORAGE_ROLE_KEY, STORAGE_TOKEN_KEY};
use crate::transport::{HttpMethod, MockTransport};
use crate::{HEADER_AUTHORIZATION, SupplyStatus};
use serde_json::json;
use std::rc::Rc;

// =========================================================
// 辅助函数
// =========================================================

fn create_panel(store: MemoryStore) -> Panel<MockTransport> {
    let session = Rc::new(Session::new(store));
    Panel::new(ApiClient::new("", MockTransport::new(), session))
}

fn mock(panel: &Panel<MockTransport>) -> &MockTransport {
    panel.api().transport()
}

fn now() -> Timestamp {
    Timestamp::parse("2024-06-01T12:00:00Z").unwrap()
}

fn mock_warehouses(panel: &Panel<MockTransport>) {
    mock(panel).mock_json(
        HttpMethod::Get,
        "/warehouse/list",
        200,
        json!({"ok": true, "warehouses": [
            {"id": "w1", "name": "Главный", "low_stock_default": 2},
            {"id": "w2", "name": "Запасной"}
        ]}),
    );
}

fn mock_items(panel: &Panel<MockTransport>) {
    mock(panel).mock_json(
        HttpMethod::Get,
        "/items/list/w1",
        200,
        json!({"items": [
            {"id": "i1", "warehouse_id": "w1", "name": "Молоко", "count": 2},
            {"id": "i2", "warehouse_id": "w1", "name": "Хлеб", "category": "выпечка", "count": 9}
        ]}),
    );
}

// =========================================================
// 会话
// =========================================================

#[tokio::test]
async fn test_login_persists_identity_and_routes_to_dashboard() {
    let store = MemoryStore::default();
    let panel = create_panel(store.clone());
    mock(&panel).mock_json(
        HttpMethod::Post,
        "/user/auth",
        200,
        json!({"ok": true, "token": "tok", "role": "ceo"}),
    );

    let view = panel.login(" boss ", "secret").await.unwrap();

    assert_eq!(view, View::Dashboard);
    assert_eq!(panel.session().token(), "tok");
    assert_eq!(panel.session().login(), "boss");
    assert_eq!(panel.role(), Some(Role::Ceo));
    assert!(store.contains(STORAGE_ROLE_KEY));
}

#[tokio::test]
async fn test_login_without_token_leaves_session_untouched() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(HttpMethod::Post, "/user/auth", 200, json!({"ok": true}));

    let err = panel.login("boss", "secret").await.unwrap_err();

    assert_eq!(err, ApiError::Auth("Auth failed".into()));
    assert!(!panel.session().is_authenticated());
}

#[tokio::test]
async fn test_login_error_message_comes_from_body() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Post,
        "/user/auth",
        401,
        json!({"error": "bad login"}),
    );

    let err = panel.login("boss", "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "bad login");
}

#[tokio::test]
async fn test_register_ceo_persists_ceo_role() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Post,
        "/user/register/ceo",
        200,
        json!({"ok": true, "token": "fresh"}),
    );

    let req = RegisterCeoRequest {
        company_name: "ООО Ромашка".into(),
        company_inn: None,
        login: "ceo1".into(),
        password: "secret".into(),
        email: "ceo@example.com".into(),
    };
    assert_eq!(panel.register_ceo(&req).await.unwrap(), View::Dashboard);
    assert_eq!(panel.session().role(), "ceo");
    let body: serde_json::Value =
        serde_json::from_str(mock(&panel).last().unwrap().body.as_deref().unwrap()).unwrap();
    assert_eq!(body["company_inn"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_logout_clears_identity_and_routes_to_auth() {
    let store = MemoryStore::default();
    let panel = create_panel(store.clone());
    panel.session().set_auth("tok", "root", "admin");

    assert_eq!(panel.logout(), View::Auth);
    for key in [STORAGE_TOKEN_KEY, STORAGE_ROLE_KEY, STORAGE_LOGIN_KEY] {
        assert!(!store.contains(key));
    }
    assert_eq!(panel.notifications.unread_count(), 0);
}

#[tokio::test]
async fn test_unauthorized_response_expires_session() {
    let store = MemoryStore::default();
    let panel = create_panel(store.clone());
    panel.session().set_auth("stale", "ceo", "boss");
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/warehouse/list",
        401,
        json!({"detail": "token expired"}),
    );

    let err = panel.warehouses.load(panel.api()).await.unwrap_err();
    assert_eq!(panel.expire_on(&err), Some(View::Auth));
    assert!(!panel.session().is_authenticated());
    assert!(!store.contains(STORAGE_TOKEN_KEY));

    // 未登录时的 401（如登录失败）不触发
    assert_eq!(panel.expire_on(&err), None);
    let other = ApiError::validation("x");
    panel.session().set_auth("tok", "ceo", "boss");
    assert_eq!(panel.expire_on(&other), None);
    assert!(panel.session().is_authenticated());
}

#[tokio::test]
async fn test_boot_reads_dev_flag() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(HttpMethod::Get, "/meta", 200, json!({"dev": false}));
    assert_eq!(panel.boot().await, View::Auth);
    assert!(!panel.is_dev());

    panel.session().set_auth("tok", "ceo", "boss");
    assert_eq!(panel.boot().await, View::Dashboard);
}

#[tokio::test]
async fn test_boot_assumes_dev_when_meta_fails() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).fail("/meta");
    panel.boot().await;
    assert!(panel.is_dev());
}

// =========================================================
// 商品
// =========================================================

#[tokio::test]
async fn test_load_items_fetches_warehouses_first() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock_items(&panel);

    panel.load_items(&ItemFilter::default()).await.unwrap();

    assert_eq!(panel.warehouses.current_id().as_deref(), Some("w1"));
    assert_eq!(panel.items.list().len(), 2);
    assert_eq!(panel.items.categories(), ["other", "выпечка"]);
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/warehouse/list"), 1);
}

#[tokio::test]
async fn test_load_items_without_warehouses_is_noop() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/warehouse/list",
        200,
        json!({"warehouses": []}),
    );

    panel.load_items(&ItemFilter::default()).await.unwrap();

    assert_eq!(mock(&panel).requests.borrow().len(), 1);
    assert!(panel.items.list().is_empty());
}

#[tokio::test]
async fn test_concurrent_polls_issue_one_request() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock_items(&panel);
    panel.warehouses.load(panel.api()).await.unwrap();
    mock(&panel).yield_before_reply(true);

    let filter = ItemFilter::default();
    let (first, second) = futures::join!(
        panel.poll_items(true, true, &filter),
        panel.poll_items(true, true, &filter)
    );

    assert!(first);
    assert!(!second);
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/items/list/w1"), 1);
    assert!(!panel.items.is_loading());
}

#[tokio::test]
async fn test_poll_respects_visibility_and_foreground() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock_items(&panel);
    panel.warehouses.load(panel.api()).await.unwrap();

    let filter = ItemFilter::default();
    assert!(!panel.poll_items(false, true, &filter).await);
    assert!(!panel.poll_items(true, false, &filter).await);
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/items/list/w1"), 0);
}

#[tokio::test]
async fn test_poll_swallows_errors() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    panel.warehouses.load(panel.api()).await.unwrap();
    mock(&panel).fail("/items/list/w1");

    assert!(panel.poll_items(true, true, &ItemFilter::default()).await);
    assert!(!panel.items.is_loading());
}

#[tokio::test]
async fn test_item_filter_reaches_the_query_string() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/items/list/w1?category=other&low_only=true",
        200,
        json!({"items": []}),
    );

    let filter = ItemFilter {
        category: "other".into(),
        low_only: true,
        ..Default::default()
    };
    panel.load_items(&filter).await.unwrap();
    assert_eq!(
        mock(&panel).count(
            HttpMethod::Get,
            "/items/list/w1?category=other&low_only=true"
        ),
        1
    );
}

#[tokio::test]
async fn test_stock_operation_posts_to_op_path() {
    let panel = create_panel(MemoryStore::default());
    panel.session().set_auth("tok", "employee", "kladovshik");
    mock(&panel).mock_json(HttpMethod::Post, "/items/income", 200, json!({"ok": true}));

    panel
        .items
        .operate(panel.api(), crate::protocol::StockOp::Income, "i1", 4)
        .await
        .unwrap();

    let sent = mock(&panel).last().unwrap();
    assert_eq!(sent.header(HEADER_AUTHORIZATION), Some("Bearer tok"));
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"item_id": "i1", "amount": 4}));
}

#[tokio::test]
async fn test_warehouse_history_uses_limit() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/items/history/warehouse/w1?limit=200",
        200,
        json!({"history": [
            {"type": "income", "amount": 5, "ts": "2024-05-01T10:00:00Z", "item_name": "Молоко"}
        ]}),
    );

    let history = panel.items.warehouse_history(panel.api(), "w1").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, "income");
}

// =========================================================
// 供货
// =========================================================

#[tokio::test]
async fn test_supply_names_are_backfilled_from_items() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock_items(&panel);
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/supplies/list/w1",
        200,
        json!({"supplies": [
            {"id": "s1", "item_id": "i1", "amount": 10, "status": "waiting",
             "expected_at": "2020-01-01T00:00:00Z"},
            {"id": "s2", "item_id": "i2", "item_name": "Батон", "amount": 1, "status": "done",
             "expected_at": "2020-01-01T00:00:00Z"},
            {"id": "s3", "item_id": "zzz", "amount": 1, "status": "waiting",
             "expected_at": "2099-01-01T00:00:00Z"}
        ]}),
    );

    panel
        .load_supplies(&SupplyFilter::default(), now())
        .await
        .unwrap();

    let list = panel.supplies.list();
    assert_eq!(list[0].item_name.as_deref(), Some("Молоко"));
    assert_eq!(list[1].item_name.as_deref(), Some("Батон"));
    assert_eq!(list[2].item_name, None);
    assert_eq!(list[2].title(), "zzz");
    assert!(list[0].is_overdue());
    assert!(!list[1].is_overdue());
    assert!(!list[2].is_overdue());
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/items/list/w1"), 1);
}

#[tokio::test]
async fn test_backfill_failure_is_ignored() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock(&panel).fail("/items/list/w1");
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/supplies/list/w1",
        200,
        json!({"supplies": [{"id": "s1", "item_id": "i1", "status": "waiting"}]}),
    );

    panel
        .load_supplies(&SupplyFilter::default(), now())
        .await
        .unwrap();
    assert_eq!(panel.supplies.list().len(), 1);
}

#[tokio::test]
async fn test_overdue_only_filters_locally() {
    let panel = create_panel(MemoryStore::default());
    mock_warehouses(&panel);
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/supplies/list/w1?status=waiting",
        200,
        json!({"supplies": [
            {"id": "s1", "item_id": "i1", "item_name": "a", "status": "waiting",
             "expected_at": "2020-01-01T00:00:00Z"},
            {"id": "s2", "item_id": "i2", "item_name": "b", "status": "waiting",
             "expected_at": "2099-01-01T00:00:00Z"}
        ]}),
    );

    let filter = SupplyFilter {
        status: Some(SupplyStatus::Waiting),
        overdue_only: true,
        ..Default::default()
    };
    panel.load_supplies(&filter, now()).await.unwrap();

    let list = panel.supplies.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, "s1");
}

#[tokio::test]
async fn test_supply_without_date_sends_nothing() {
    let panel = create_panel(MemoryStore::default());
    let form = supplies::NewSupply {
        item_id: "i1".into(),
        amount: 1,
        ..Default::default()
    };

    let err = panel
        .supplies
        .create(panel.api(), "w1", form)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Укажи дату поставки");
    assert!(mock(&panel).requests.borrow().is_empty());
}

// =========================================================
// 联动刷新 / 通知
// =========================================================

#[tokio::test]
async fn test_status_change_cascade_refreshes_all_dependents() {
    let panel = create_panel(MemoryStore::default());
    panel.session().set_auth("tok", "ceo", "boss");
    mock_warehouses(&panel);
    mock_items(&panel);
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/supplies/list/w1",
        200,
        json!({"supplies": []}),
    );
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/dashboard/summary",
        200,
        json!({"summary": {"warehouses": 2, "low_items": 1, "supplies": {"waiting": 3}}}),
    );
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/notifications/list?unread_only=true&limit=200",
        200,
        json!({"notifications": [{"id": "n1", "title": "Низкий остаток"}]}),
    );

    let report = panel
        .refresh(
            Action::SupplyStatusChanged.dependents(),
            &Filters::default(),
            now(),
            false,
        )
        .await;

    assert!(report.errors.is_empty());
    assert_eq!(report.new_notifications, None);
    assert_eq!(panel.dashboard.summary().supplies.waiting, 3);
    assert_eq!(panel.notifications.unread_count(), 1);
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/supplies/list/w1"), 1);
    assert_eq!(mock(&panel).count(HttpMethod::Get, "/dashboard/summary"), 1);
}

#[tokio::test]
async fn test_refresh_collects_errors_per_section() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/dashboard/summary",
        500,
        json!({"detail": "boom"}),
    );
    mock_warehouses(&panel);

    let report = panel
        .refresh(
            Action::WarehouseCreated.dependents(),
            &Filters::default(),
            now(),
            false,
        )
        .await;

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].0, Section::Dashboard);
    assert_eq!(report.errors[0].1.to_string(), "boom");
    assert_eq!(panel.warehouses.list().len(), 2);
}

#[tokio::test]
async fn test_notification_poll_reports_positive_delta_only() {
    let panel = create_panel(MemoryStore::default());
    panel.session().set_auth("tok", "ceo", "boss");
    let url = "/notifications/list?unread_only=true&limit=200";

    mock(&panel).mock_json(HttpMethod::Get, url, 200, json!({"notifications": [{"id": "a"}]}));
    assert_eq!(panel.notifications.refresh(panel.api(), true).await, Some(1));

    mock(&panel).mock_json(
        HttpMethod::Get,
        url,
        200,
        json!({"notifications": [{"id": "a"}, {"id": "b"}, {"id": "c"}]}),
    );
    assert_eq!(panel.notifications.refresh(panel.api(), true).await, Some(2));

    mock(&panel).mock_json(HttpMethod::Get, url, 200, json!({"notifications": [{"id": "c"}]}));
    assert_eq!(panel.notifications.refresh(panel.api(), true).await, None);
    assert_eq!(panel.notifications.unread_count(), 1);
}

#[tokio::test]
async fn test_notification_failure_resets_count() {
    let panel = create_panel(MemoryStore::default());
    panel.session().set_auth("tok", "ceo", "boss");
    let url = "/notifications/list?unread_only=true&limit=200";
    mock(&panel).mock_json(HttpMethod::Get, url, 200, json!({"notifications": [{"id": "a"}]}));
    panel.notifications.refresh(panel.api(), false).await;
    assert_eq!(panel.notifications.unread_count(), 1);

    mock(&panel).fail(url);
    assert_eq!(panel.notifications.refresh(panel.api(), true).await, None);
    assert_eq!(panel.notifications.unread_count(), 0);
}

#[tokio::test]
async fn test_notifications_skip_without_token() {
    let panel = create_panel(MemoryStore::default());
    assert_eq!(panel.notifications.refresh(panel.api(), true).await, None);
    assert!(mock(&panel).requests.borrow().is_empty());
}

#[tokio::test]
async fn test_employee_block_toggle_sends_partial_update() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Get,
        "/company/users/list",
        200,
        json!({"users": [{"id": "u1", "login": "petrov", "permissions": null}]}),
    );
    mock(&panel).mock_json(
        HttpMethod::Post,
        "/company/users/update",
        200,
        json!({"ok": true}),
    );
    panel.employees.load(panel.api()).await.unwrap();
    let employee = panel.employees.list().remove(0);

    let blocked = panel
        .employees
        .toggle_blocked(panel.api(), &employee)
        .await
        .unwrap();

    assert!(blocked);
    let sent = mock(&panel).last().unwrap();
    let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"user_id": "u1", "blocked": true}));
}

#[tokio::test]
async fn test_company_actions_use_id_paths() {
    let panel = create_panel(MemoryStore::default());
    mock(&panel).mock_json(
        HttpMethod::Post,
        "/root/companies/unblock/c1",
        200,
        json!({"ok": true}),
    );
    mock(&panel).mock_json(
        HttpMethod::Delete,
        "/root/companies/delete/c1",
        200,
        json!({"ok": true}),
    );

    panel
        .companies
        .set_blocked(panel.api(), "c1", false)
        .await
        .unwrap();
    panel.companies.delete(panel.api(), "c1").await.unwrap();

    assert_eq!(mock(&panel).requests.borrow().len(), 2);
}
