//! 员工管理：列表、创建/编辑表单与权限选择器
use leptos::prelude::*;
use sklad_shared::permissions::{self, Permission};
use sklad_shared::protocol::{CreateEmployeeRequest, UpdateEmployeeRequest};
use sklad_shared::refresh::{Action, Section};
use sklad_shared::Employee;

use crate::auth::use_auth;
use crate::context::{Modal, PanelContext, use_panel};
use crate::web::confirm;

fn toggle_blocked(ctx: PanelContext, employee: Employee) {
    ctx.run(Action::EmployeeChanged, move |panel| async move {
        let blocked = panel.employees.toggle_blocked(panel.api(), &employee).await?;
        Ok(if blocked { "Сотрудник заблокирован" } else { "Сотрудник разблокирован" }.to_string())
    });
}

fn delete(ctx: PanelContext, employee: Employee) {
    if !confirm(&format!("Удалить сотрудника \"{}\"?", employee.login)) {
        return;
    }
    ctx.run(Action::EmployeeChanged, move |panel| async move {
        panel.employees.delete(panel.api(), &employee.id).await?;
        Ok("Сотрудник удалён".to_string())
    });
}

#[component]
pub fn EmployeesPage() -> impl IntoView {
    let ctx = use_panel();
    let auth = use_auth();
    let can_manage = move || auth.role().get().is_some_and(|r| r.can_manage_employees());

    let cards = move || {
        ctx.revisions.track(Section::Employees);
        ctx.panel().employees.list()
    };

    view! {
        <div class="flex justify-end">
            <Show when=can_manage>
                <button
                    class="btn btn-primary btn-sm"
                    on:click=move |_| ctx.open_modal("Создать сотрудника", Modal::CreateEmployee)
                >
                    "+ Сотрудник"
                </button>
            </Show>
        </div>

        <Show when=move || cards().is_empty()>
            <p class="text-center py-8 text-base-content/50">"Сотрудников нет."</p>
        </Show>

        <div class="grid md:grid-cols-2 xl:grid-cols-3 gap-4">
            <For
                each=cards
                key=|u| (u.id.clone(), u.blocked_at, u.post.clone(), u.permissions.clone())
                children=move |u| {
                    let blocked = u.is_blocked();
                    let perms = if u.permissions.is_empty() { "-".to_string() } else { u.permissions.join(", ") };
                    let (edit, block, del) = (u.clone(), u.clone(), u.clone());
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-4 gap-2">
                                <div class="flex justify-between">
                                    <span class="font-bold">{u.login.clone()}</span>
                                    <span class={if blocked { "badge badge-error" } else { "badge badge-success" }}>
                                        {if blocked { "blocked" } else { "active" }}
                                    </span>
                                </div>
                                <div class="text-sm">"Должность: " {u.post.clone().unwrap_or_else(|| "-".to_string())}</div>
                                <div class="text-xs font-mono opacity-70 break-words">{perms}</div>
                                <div class="card-actions">
                                    <button
                                        class="btn btn-ghost btn-xs"
                                        on:click=move |_| ctx.open_modal(
                                            format!("Редактировать {}", edit.login),
                                            Modal::EditEmployee(edit.clone()),
                                        )
                                    >
                                        "Редактировать"
                                    </button>
                                    <Show when=can_manage>
                                        {
                                            let (block, del) = (block.clone(), del.clone());
                                            view! {
                                                <button class="btn btn-ghost btn-xs" on:click=move |_| toggle_blocked(ctx, block.clone())>
                                                    {if blocked { "Разблок" } else { "Блок" }}
                                                </button>
                                                <button class="btn btn-error btn-xs" on:click=move |_| delete(ctx, del.clone())>
                                                    "Удалить"
                                                </button>
                                            }
                                        }
                                    </Show>
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

/// 按分组展示权限目录的复选框
#[component]
pub fn PermissionPicker(selected: RwSignal<Vec<String>>) -> impl IntoView {
    let item = move |p: &'static Permission| {
        let key = p.key;
        view! {
            <label class="flex gap-3 items-start py-1 cursor-pointer">
                <input
                    type="checkbox"
                    class="checkbox checkbox-sm mt-1"
                    prop:checked=move || selected.with(|s| s.iter().any(|k| k == key))
                    on:change=move |_| selected.update(|s| *s = permissions::toggle(s, key))
                />
                <div>
                    <div class="font-semibold text-sm">{p.title}</div>
                    <div class="text-xs opacity-70">{p.description}</div>
                    <div class="text-xs font-mono opacity-50">{p.key}</div>
                </div>
            </label>
        }
    };

    view! {
        <div class="max-h-72 overflow-y-auto border border-base-300 rounded-box p-3">
            {permissions::groups()
                .into_iter()
                .map(|(group, perms)| view! {
                    <div class="font-bold text-sm mt-2">{group}</div>
                    {perms.into_iter().map(item).collect_view()}
                })
                .collect_view()}
        </div>
    }
}

/// `employee` 为空时创建，否则编辑
#[component]
pub fn EmployeeForm(employee: Option<Employee>) -> impl IntoView {
    let ctx = use_panel();
    let editing = employee.clone();

    let login = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let post = RwSignal::new(employee.as_ref().and_then(|e| e.post.clone()).unwrap_or_default());
    let selected = RwSignal::new(
        employee
            .as_ref()
            .map(|e| e.permissions.clone())
            .unwrap_or_default(),
    );
    let blocked = RwSignal::new(employee.as_ref().is_some_and(Employee::is_blocked));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        match editing.clone() {
            None => {
                let req = CreateEmployeeRequest {
                    login: login.get_untracked().trim().to_string(),
                    password: password.get_untracked(),
                    email: email.get_untracked().trim().to_string(),
                    post: post.get_untracked().trim().to_string(),
                    permissions: selected.get_untracked(),
                };
                ctx.submit(Action::EmployeeChanged, move |panel| async move {
                    panel.employees.create(panel.api(), &req).await?;
                    Ok("Сотрудник создан".to_string())
                });
            }
            Some(employee) => {
                let req = UpdateEmployeeRequest {
                    user_id: employee.id,
                    post: Some(post.get_untracked().trim().to_string()),
                    permissions: Some(selected.get_untracked()),
                    blocked: Some(blocked.get_untracked()),
                };
                ctx.submit(Action::EmployeeChanged, move |panel| async move {
                    panel.employees.update(panel.api(), &req).await?;
                    Ok("Сохранено".to_string())
                });
            }
        }
    };

    let is_new = employee.is_none();

    view! {
        <form class="space-y-2" on:submit=on_submit>
            <Show when=move || is_new>
                <label class="label"><span class="label-text">"Логин"</span></label>
                <input required class="input input-bordered w-full"
                    on:input=move |ev| login.set(event_target_value(&ev)) prop:value=login />
                <label class="label"><span class="label-text">"Пароль"</span></label>
                <input required type="password" class="input input-bordered w-full"
                    on:input=move |ev| password.set(event_target_value(&ev)) prop:value=password />
                <label class="label"><span class="label-text">"Email"</span></label>
                <input type="email" class="input input-bordered w-full"
                    on:input=move |ev| email.set(event_target_value(&ev)) prop:value=email />
            </Show>

            <label class="label"><span class="label-text">"Должность"</span></label>
            <input class="input input-bordered w-full" placeholder="кладовщик"
                on:input=move |ev| post.set(event_target_value(&ev)) prop:value=post />

            <label class="label"><span class="label-text">"Права сотрудника"</span></label>
            <PermissionPicker selected=selected />

            <Show when=move || !is_new>
                <label class="label"><span class="label-text">"Блокировка"</span></label>
                <select class="select select-bordered w-full"
                    on:change=move |ev| blocked.set(event_target_value(&ev) == "true")
                    prop:value=move || if blocked.get() { "true" } else { "false" }>
                    <option value="false">"active"</option>
                    <option value="true">"blocked"</option>
                </select>
            </Show>

            <div class="modal-action">
                <button type="button" class="btn btn-ghost" on:click=move |_| ctx.close_modal()>"Отмена"</button>
                <button type="submit" class="btn btn-primary">
                    {if is_new { "Создать" } else { "Сохранить" }}
                </button>
            </div>
        </form>
    }
}
