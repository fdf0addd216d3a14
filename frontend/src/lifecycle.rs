//! 应用生命周期
//!
//! - 启动：读取 `/meta`，有 token 时建立未读通知基线
//! - 视图切换：加载视图数据，标题同步，商品轮询随商品视图启停
//! - 通知轮询：30 秒一次，与视图无关

use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::config::{ITEMS_POLL_INTERVAL, NOTIFICATIONS_POLL_INTERVAL};
use sklad_shared::refresh::Section;

use crate::context::PanelContext;
use crate::web::router::use_router;
use crate::web::{Interval, is_foreground, set_title};

pub fn boot(ctx: PanelContext) {
    spawn_local(async move {
        let panel = ctx.panel();
        let landing = panel.boot().await;
        ctx.dev.set(panel.is_dev());
        log::info!("boot: dev={} landing={landing}", panel.is_dev());

        if panel.session().is_authenticated() {
            ctx.reload(&[Section::Notifications]).await;
        }
    });

    // 没有 token 时轮询本身不发请求
    let notifications = Interval::new(NOTIFICATIONS_POLL_INTERVAL, move || {
        spawn_local(poll_notifications(ctx));
    });
    if notifications.is_none() {
        log::warn!("notifications poll could not be scheduled");
    }
    // 与 App 同生命周期
    StoredValue::new_local(notifications);
}

async fn poll_notifications(ctx: PanelContext) {
    let panel = ctx.panel();
    if let Some(delta) = panel.notifications.refresh(panel.api(), true).await {
        ctx.ok(format!("Новых уведомлений: {delta}"));
    }
    ctx.revisions.bump(Section::Notifications);
}

async fn poll_items(ctx: PanelContext, visible: bool) {
    let panel = ctx.panel();
    let filter = ctx.item_filter.get_untracked();
    if panel.poll_items(visible, is_foreground(), &filter).await {
        ctx.revisions.bump(Section::Items);
    } else {
        log::debug!("items poll skipped");
    }
}

/// 监听当前视图：加载数据、更新标题、启停商品轮询
#[component]
pub fn ViewLifecycle() -> impl IntoView {
    let ctx = crate::context::use_panel();
    let router = use_router();
    let current = router.current_view();
    let items_poll = StoredValue::new_local(None::<Interval>);

    Effect::new(move |_| {
        let view = current.get();
        set_title(&format!("{} · Sklad", view.title()));
        ctx.load_view(view);

        // 替换时旧定时器被 drop 并清除
        let poller = view.polls_items().then(|| {
            Interval::new(ITEMS_POLL_INTERVAL, move || {
                let visible = current.get_untracked().polls_items();
                spawn_local(poll_items(ctx, visible));
            })
        });
        items_poll.set_value(poller.flatten());
    });
}
