//! 开发者控制台页面
use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::View;
use sklad_shared::config::api_base;
use sklad_shared::devconsole::{
    self, DEFAULT_ENDPOINT, DevEndpoint, DevField, DevResponse, ENDPOINTS, FieldKind,
};

use crate::context::use_panel;
use crate::web::router::Link;
use crate::web::{FetchTransport, now_ms};

fn endpoint(id: &str) -> &'static DevEndpoint {
    devconsole::find(id).unwrap_or(&ENDPOINTS[0])
}

#[component]
fn FieldInput(field: &'static DevField, values: RwSignal<Vec<(String, String)>>) -> impl IntoView {
    let name = field.name;
    let value = move || {
        values.with(|v| {
            v.iter()
                .find(|(k, _)| k == name)
                .map(|(_, val)| val.clone())
                .unwrap_or_default()
        })
    };
    let set = move |ev| {
        let input = event_target_value(&ev);
        values.update(|v| match v.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = input,
            None => v.push((name.to_string(), input)),
        });
    };

    let control = if field.kind == FieldKind::Json {
        view! {
            <textarea class="textarea textarea-bordered font-mono w-full" rows="3"
                placeholder=field.placeholder on:input=set prop:value=value></textarea>
        }
        .into_any()
    } else {
        view! {
            <input class="input input-bordered w-full" type=field.kind.input_type()
                placeholder=field.placeholder on:input=set prop:value=value />
        }
        .into_any()
    };

    view! {
        <label class="label"><span class="label-text">{field.label}</span></label>
        {control}
    }
}

#[component]
pub fn DevConsolePage() -> impl IntoView {
    let ctx = use_panel();
    let selected = RwSignal::new(DEFAULT_ENDPOINT.to_string());
    let values = RwSignal::new(Vec::<(String, String)>::new());
    let response = RwSignal::new(None::<DevResponse>);
    let failure = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let current = move || endpoint(&selected.get());

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let ep = endpoint(&selected.get_untracked());
        let token = ctx.panel().session().token();
        let built = devconsole::build_request(&api_base(), ep, &values.get_untracked(), &token);
        let req = match built {
            Ok(req) => req,
            Err(e) => {
                failure.set(Some(e.to_string()));
                return;
            }
        };
        log::debug!("dev console -> {} {}", ep.method.as_str(), ep.path);
        pending.set(true);
        failure.set(None);
        spawn_local(async move {
            match devconsole::execute(&FetchTransport, req, now_ms).await {
                Ok(resp) => response.set(Some(resp)),
                Err(e) => {
                    response.set(None);
                    failure.set(Some(e.to_string()));
                }
            }
            pending.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4">
            <div class="max-w-3xl mx-auto space-y-4">
                <div class="flex items-center justify-between">
                    <h1 class="text-2xl font-bold">"Dev-консоль"</h1>
                    <Link to=View::Auth class="btn btn-ghost btn-sm">"← Вход"</Link>
                </div>

                <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                    <div class="card-body gap-2">
                        <select
                            class="select select-bordered w-full"
                            on:change=move |ev| {
                                selected.set(event_target_value(&ev));
                                values.set(Vec::new());
                                response.set(None);
                                failure.set(None);
                            }
                            prop:value=selected
                        >
                            {ENDPOINTS
                                .iter()
                                .map(|ep| view! {
                                    <option value=ep.id>{format!("{} {}", ep.method.as_str(), ep.path)}</option>
                                })
                                .collect_view()}
                        </select>
                        <p class="text-sm opacity-70">{move || current().description}</p>

                        {move || {
                            current()
                                .fields
                                .iter()
                                .map(|field| view! { <FieldInput field=field values=values /> })
                                .collect_view()
                        }}

                        <div class="card-actions justify-end mt-2">
                            <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                                {move || if pending.get() { "Отправка…" } else { "Отправить" }}
                            </button>
                        </div>
                    </div>
                </form>

                {move || failure.get().map(|msg| view! {
                    <div role="alert" class="alert alert-error"><span>{msg}</span></div>
                })}

                {move || response.get().map(|resp| {
                    let badge = if resp.ok { "badge badge-success" } else { "badge badge-error" };
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body gap-2">
                                <span class=badge>{resp.meta_line()}</span>
                                <pre class="bg-base-200 rounded-box p-3 text-xs overflow-x-auto">{resp.body}</pre>
                            </div>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
