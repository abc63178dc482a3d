//! # 日志初始化
//!
//! 插件以 DLL 形式被宿主加载，没有 `main`，因此在首个导出函数调用时惰性初始化 `env_logger`。
//! 过滤级别取自 `RUST_LOG`，未设置时插件默认 `warn`、命令行工具默认 `info`。
//! 重复初始化（例如宿主进程里已有其他 logger）会被忽略。

use once_cell::sync::Lazy;

/// 插件默认日志级别。
pub const PLUGIN_DEFAULT_FILTER: &str = "warn";

static PLUGIN_LOGGER: Lazy<()> = Lazy::new(|| init_with_default(PLUGIN_DEFAULT_FILTER));

/// 以给定默认级别初始化日志。
pub fn init_with_default(default_filter: &str) {
    let result = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .try_init();

    if let Err(err) = result {
        log::debug!("日志已由宿主初始化，跳过：{err}");
    }
}

/// 插件入口使用的一次性初始化。
pub fn init_plugin() {
    Lazy::force(&PLUGIN_LOGGER);
}
