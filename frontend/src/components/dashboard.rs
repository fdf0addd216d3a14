use leptos::prelude::*;
use sklad_shared::refresh::Section;

use crate::context::use_panel;

#[component]
fn Stat(title: &'static str, #[prop(into)] value: Signal<String>, #[prop(optional)] accent: &'static str) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {accent}")>{value}</div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_panel();

    let summary = Memo::new(move |_| {
        ctx.revisions.track(Section::Dashboard);
        ctx.panel().dashboard.summary()
    });

    let count = move |f: fn(&sklad_shared::DashboardSummary) -> String| {
        Signal::derive(move || summary.with(f))
    };

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <Stat title="Склады" value=count(|s| s.warehouses.to_string()) accent="text-primary" />
            <Stat title="Товары" value=count(|s| s.total_items.to_string()) />
            <Stat title="Мало на складе" value=count(|s| s.low_items.to_string()) accent="text-error" />
            <Stat title="Всего единиц" value=count(|s| s.total_stock.to_string()) />
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <Stat title="Ожидают" value=count(|s| s.supplies.waiting.to_string()) accent="text-info" />
            <Stat title="Выполнены" value=count(|s| s.supplies.done.to_string()) accent="text-success" />
            <Stat title="Отменены" value=count(|s| s.supplies.canceled.to_string()) />
            <Stat title="Просрочены" value=count(|s| s.supplies.overdue.to_string()) accent="text-error" />
        </div>

        <div class="grid md:grid-cols-2 gap-4">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Категории"</h3>
                    <Show
                        when=move || summary.with(|s| !s.categories.is_empty())
                        fallback=|| view! { <p class="text-base-content/50">"Нет данных"</p> }
                    >
                        <ul class="space-y-1">
                            {move || summary.with(|s| {
                                s.categories
                                    .iter()
                                    .map(|(name, n)| view! {
                                        <li class="flex justify-between">
                                            <span>{name.clone()}</span>
                                            <span class="badge badge-neutral">{*n}</span>
                                        </li>
                                    })
                                    .collect_view()
                            })}
                        </ul>
                    </Show>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"Ближайшие поставки"</h3>
                    <Show
                        when=move || summary.with(|s| !s.upcoming_supplies.is_empty())
                        fallback=|| view! { <p class="text-base-content/50">"Поставок нет"</p> }
                    >
                        <table class="table table-zebra table-sm">
                            <tbody>
                                {move || summary.with(|s| {
                                    s.upcoming_supplies
                                        .iter()
                                        .map(|u| {
                                            let amount = format!(
                                                "{} {}",
                                                u.amount,
                                                u.unit.clone().unwrap_or_else(|| sklad_shared::DEFAULT_UNIT.to_string())
                                            );
                                            let when = u.expected_at.map(|t| t.to_display()).unwrap_or_default();
                                            view! {
                                                <tr>
                                                    <td>{u.item_name.clone().unwrap_or_else(|| "-".to_string())}</td>
                                                    <td>{amount}</td>
                                                    <td class="text-xs opacity-70">{when}</td>
                                                    <td>
                                                        {u.overdue.then(|| view! { <span class="badge badge-error">"просрочена"</span> })}
                                                    </td>
                                                </tr>
                                            }
                                        })
                                        .collect_view()
                                })}
                            </tbody>
                        </table>
                    </Show>
                </div>
            </div>
        </div>
    }
}
