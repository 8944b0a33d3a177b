// ==========================================
// 合同汇总报表 - 展示层接口与会话驱动
// ==========================================
// PresentationShell: 外部交互协作者（选择框/文本框/按钮/表格/消息）
// run_session: 标题 → 口令 → 加载 → 级联选择 → 生成报表，循环直到退出
// ==========================================

use crate::api::{ApiError, ApiResult, ReportSession};
use crate::app::access_gate::AccessGate;
use crate::domain::{FormattedTable, SelectionLevel, SelectionOption};
use crate::i18n::{t, t_with_args};
use tracing::{error, info, warn};

/// 展示层接口
///
/// 返回 None 表示用户退出会话
pub trait PresentationShell {
    fn title(&mut self, title: &str);

    /// 单选；default 为默认选中的下标
    fn select_one(&mut self, label: &str, options: &[String], default: usize) -> Option<usize>;

    fn text_input(&mut self, label: &str) -> Option<String>;

    /// 按钮；Some(true) 触发，Some(false) 返回重新选择
    fn action(&mut self, label: &str) -> Option<bool>;

    fn show_table(&mut self, table: &FormattedTable);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);

    fn fatal(&mut self, message: &str);
}

/// 错误 → 用户可见文案
pub fn user_message(err: &ApiError) -> String {
    match err {
        ApiError::Import(e) => t_with_args("report.load_failed", &[("error", &e.to_string())]),
        ApiError::EmptySelection => t("report.incomplete_selection"),
        ApiError::EmptyResult => t("report.no_data"),
        ApiError::InvalidSelection { level, value } => t_with_args(
            "report.invalid_option",
            &[("value", value), ("level", &level_name(*level))],
        ),
        ApiError::NotLoaded => t("report.not_loaded"),
        ApiError::AccessDenied => t("report.access_denied"),
    }
}

fn level_name(level: SelectionLevel) -> String {
    match level {
        SelectionLevel::Community => t("report.level.community"),
        SelectionLevel::Series => t("report.level.series"),
        SelectionLevel::ScarDate => t("report.level.scar_date"),
    }
}

fn level_prompt(level: SelectionLevel) -> String {
    match level {
        SelectionLevel::Community => t("report.select_community"),
        SelectionLevel::Series => t("report.select_series"),
        SelectionLevel::ScarDate => t("report.select_scar_date"),
    }
}

fn no_options_message(level: SelectionLevel) -> String {
    match level {
        SelectionLevel::ScarDate => t("report.no_scar_dates"),
        _ => t_with_args("report.no_options", &[("level", &level_name(level))]),
    }
}

/// 单层提示的结果
enum Prompt {
    Chosen,
    Skipped,
    Quit,
}

/// 驱动一次交互会话
///
/// # 返回
/// - Ok(()): 用户退出
/// - Err(AccessDenied): 口令不匹配，核心流程未执行
/// - Err(Import): 加载失败（已通过 fatal 展示）
pub async fn run_session<S>(session: &mut ReportSession, shell: &mut S) -> ApiResult<()>
where
    S: PresentationShell + ?Sized,
{
    shell.title(&session.config().title);

    // ===== 口令 =====
    if let Some(gate) = AccessGate::from_secret(session.config().access_secret.as_deref()) {
        let granted = shell
            .text_input(&t("report.password"))
            .map(|input| gate.check(&input))
            .unwrap_or(false);
        if !granted {
            shell.error(&user_message(&ApiError::AccessDenied));
            return Err(ApiError::AccessDenied);
        }
    }

    // ===== 加载 =====
    if let Err(e) = session.load().await {
        error!(error = %e, "数据加载失败，会话终止");
        shell.fatal(&user_message(&e));
        return Err(e);
    }

    // ===== 交互循环 =====
    loop {
        for level in [
            SelectionLevel::Community,
            SelectionLevel::Series,
            SelectionLevel::ScarDate,
        ] {
            match prompt_level(session, shell, level)? {
                Prompt::Chosen | Prompt::Skipped => {}
                Prompt::Quit => return Ok(()),
            }
        }

        match shell.action(&t("report.create_table")) {
            None => return Ok(()),
            Some(false) => continue,
            Some(true) => {}
        }

        match session.create_table().await {
            Ok(result) => shell.show_table(&result.to_table()),
            Err(e) if e.is_fatal() => {
                error!(error = %e, "重新加载失败，会话终止");
                shell.fatal(&user_message(&e));
                return Err(e);
            }
            Err(e) => shell.warning(&user_message(&e)),
        }
    }
}

/// 单层选择：可选文本过滤 → 单选
fn prompt_level<S>(
    session: &mut ReportSession,
    shell: &mut S,
    level: SelectionLevel,
) -> ApiResult<Prompt>
where
    S: PresentationShell + ?Sized,
{
    let mut options = session.options(level)?;
    if options.is_empty() {
        warn!(level = %level, "无可选项");
        shell.warning(&no_options_message(level));
        return Ok(Prompt::Skipped);
    }

    if session.config().enable_search {
        let Some(query) = shell.text_input(&t_with_args(
            "report.search",
            &[("level", &level_name(level))],
        )) else {
            return Ok(Prompt::Quit);
        };

        let query = query.trim();
        if !query.is_empty() {
            let narrowed = session.narrow(level, query)?;
            if narrowed.auto_selected.is_some() {
                return Ok(Prompt::Chosen);
            }
            if narrowed.matches.is_empty() {
                shell.warning(&t_with_args("report.no_matches", &[("query", query)]));
            } else {
                options = narrowed.matches;
            }
        }
    }

    let labels: Vec<String> = options.iter().map(SelectionOption::label).collect();
    let default = current_index(session, level, &options).unwrap_or(0);

    let Some(index) = shell.select_one(&level_prompt(level), &labels, default) else {
        return Ok(Prompt::Quit);
    };

    match options.get(index) {
        Some(option) => {
            session.select(level, option)?;
            info!(level = %level, value = %option, "已选择");
            Ok(Prompt::Chosen)
        }
        None => {
            shell.warning(&t("report.out_of_range"));
            Ok(Prompt::Skipped)
        }
    }
}

/// 当前已选值在选项中的下标
fn current_index(
    session: &ReportSession,
    level: SelectionLevel,
    options: &[SelectionOption],
) -> Option<usize> {
    let selection = session.selection();
    let current = match level {
        SelectionLevel::Community => selection
            .community()
            .map(|v| SelectionOption::Text(v.to_string())),
        SelectionLevel::Series => selection
            .series()
            .map(|v| SelectionOption::Text(v.to_string())),
        SelectionLevel::ScarDate => selection.scar_date().map(SelectionOption::Date),
    }?;
    options.iter().position(|o| *o == current)
}
