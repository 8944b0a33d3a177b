// ==========================================
// 合同汇总报表 - 界面文案
// ==========================================
// 文案文件: locales/en.yml（默认兼兜底）、locales/zh-CN.yml
// i18n! 宏在 lib.rs 初始化；日志与错误 Display 不经过这里
// ==========================================

use tracing::warn;

/// 已提供的语言
pub const AVAILABLE_LOCALES: &[&str] = &["en", "zh-CN"];

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "zh-CN"）；未提供的语言回退到 "en"
pub fn set_locale(locale: &str) {
    if AVAILABLE_LOCALES.contains(&locale) {
        rust_i18n::set_locale(locale);
    } else {
        warn!(locale = locale, "不支持的语言，回退到 en");
        rust_i18n::set_locale("en");
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use contract_report::i18n::t;
/// let msg = t("report.create_table");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// 参数占位符为 `%{name}`；未提供的占位符原样保留
///
/// # 示例
/// ```no_run
/// use contract_report::i18n::t_with_args;
/// let msg = t_with_args("report.load_failed", &[("error", "timeout")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{name}}}"), value)
    })
}
