//! 登录与 CEO 注册页
use leptos::prelude::*;
use leptos::task::spawn_local;
use sklad_shared::View;
use sklad_shared::protocol::RegisterCeoRequest;
use sklad_shared::refresh::Section;

use crate::auth::{login, register_ceo, use_auth};
use crate::context::use_panel;
use crate::web::router::Link;

#[component]
fn AuthCard(title: &'static str, subtitle: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">{title}</h1>
                    <p class="text-base-content/70">{subtitle}</p>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">{children()}</div>
            </div>
        </div>
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(default = true)] required: bool,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                placeholder=placeholder
                required=required
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class="input input-bordered"
            />
        </div>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_panel();
    let auth = use_auth();

    let login_value = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);

        spawn_local(async move {
            let panel = ctx.panel();
            let result = login(auth, &panel, &login_value.get_untracked(), &password.get_untracked()).await;
            match result {
                Ok(landing) => {
                    log::debug!("login: landing {landing}");
                    ctx.ok("Успешный вход");
                    ctx.reload(&[Section::Notifications]).await;
                }
                Err(e) => ctx.error(&e),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthCard title="Авторизация" subtitle="Войди, чтобы управлять складами">
            <form class="card-body" on:submit=on_submit>
                <TextField id="login" label="Логин" placeholder="login" value=login_value />
                <TextField id="password" label="Пароль" kind="password" placeholder="••••••••" value=password />
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Вход..." }.into_any()
                        } else {
                            "Войти".into_any()
                        }}
                    </button>
                </div>
                <div class="flex justify-between text-sm mt-2">
                    <Link to=View::Register class="link link-primary">"Регистрация CEO"</Link>
                    <Link to=View::DevConsole class="link opacity-60">"Dev-консоль"</Link>
                </div>
            </form>
        </AuthCard>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_panel();
    let auth = use_auth();

    let company_name = RwSignal::new(String::new());
    let company_inn = RwSignal::new(String::new());
    let login_value = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_is_submitting.set(true);

        let inn = company_inn.get_untracked().trim().to_string();
        let req = RegisterCeoRequest {
            company_name: company_name.get_untracked().trim().to_string(),
            company_inn: (!inn.is_empty()).then_some(inn),
            login: login_value.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            email: email.get_untracked().trim().to_string(),
        };

        spawn_local(async move {
            let panel = ctx.panel();
            match register_ceo(auth, &panel, &req).await {
                Ok(_) => ctx.ok("CEO зарегистрирован и вошёл"),
                Err(e) => ctx.error(&e),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthCard title="Регистрация CEO" subtitle="Новая компания и её руководитель">
            <form class="card-body" on:submit=on_submit>
                <TextField id="company_name" label="Компания" placeholder="ООО Ромашка" value=company_name />
                <TextField id="company_inn" label="ИНН" required=false placeholder="необязательно" value=company_inn />
                <TextField id="reg_login" label="Логин" value=login_value />
                <TextField id="reg_password" label="Пароль" kind="password" value=password />
                <TextField id="reg_email" label="Email" kind="email" placeholder="ceo@example.com" value=email />
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        "Зарегистрировать"
                    </button>
                </div>
                <Link to=View::Auth class="link text-sm mt-2">"Уже есть аккаунт? Войти"</Link>
            </form>
        </AuthCard>
    }
}
