// ==========================================
// 学校考勤管理系统 - 国际化
// ==========================================
// rust-i18n, 文案位于 locales/{en,id}.yml
// 占位符格式: %{name}
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置进程级语言
///
/// # 参数
/// - locale: 语言代码（"en" 或 "id"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 按当前语言翻译
///
/// # 示例
/// ```no_run
/// use absenta::i18n::t;
/// let msg = t("validation.admin_not_found");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 按指定语言翻译（不修改进程级语言）
pub fn t_in(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 按当前语言翻译并替换占位符
///
/// # 示例
/// ```no_run
/// use absenta::i18n::t_with_args;
/// let msg = t_with_args("validation.success", &[("status", "validated")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    fill(t(key), args)
}

/// 按指定语言翻译并替换占位符
pub fn t_in_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    fill(t_in(locale, key), args)
}

fn fill(template: String, args: &[(&str, &str)]) -> String {
    args.iter().fold(template, |acc, (name, value)| {
        acc.replace(&format!("%{{{}}}", name), value)
    })
}
