//! 定时器封装模块
//!
//! - `Interval`: 原生 `setInterval`，drop 时自动清除
//! - `Debouncer`: 基于 `gloo-timers` 的防抖，新的触发会作废之前的等待

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::sleep;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;

/// 周期性定时器
///
/// 封装 `setInterval` API。当 `Interval` 被 drop 时，自动清除定时器。
pub struct Interval {
    handle: i32,
    #[allow(dead_code)]
    closure: Closure<dyn Fn()>,
}

impl Interval {
    /// 创建新的周期性定时器
    ///
    /// 无法获取 window 或设置定时器失败时返回 `None`。
    pub fn new<F>(period: Duration, callback: F) -> Option<Self>
    where
        F: Fn() + 'static,
    {
        let closure = Closure::<dyn Fn()>::new(callback);
        let window = web_sys::window()?;

        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period.as_millis() as i32,
            )
            .ok()?;

        Some(Self { handle, closure })
    }

    /// 取消定时器
    ///
    /// 通常不需要手动调用，因为 drop 时会自动清除。
    pub fn cancel(&self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 防抖器
///
/// 克隆后共享同一个代数计数。每次 `call` 都会递增代数，
/// 等待结束时代数未变才执行回调。
#[derive(Clone, Default)]
pub struct Debouncer {
    generation: Rc<Cell<u64>>,
    delay: Duration,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: Rc::new(Cell::new(0)),
            delay,
        }
    }

    pub fn call<F>(&self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);
        let generation = self.generation.clone();
        let delay = self.delay;
        spawn_local(async move {
            sleep(delay).await;
            if generation.get() == ticket {
                callback();
            }
        });
    }
}

/// 在当前任务中等待一段时间
pub async fn wait(duration: Duration) {
    sleep(duration).await;
}
