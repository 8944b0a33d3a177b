// ==========================================
// 合同汇总报表 - 控制台主入口
// ==========================================
// 配置: CONTRACT_REPORT_<KEY> 环境变量
// 日志: RUST_LOG（输出到 stderr）
// ==========================================

use anyhow::Context;
use contract_report::app::{run_session, ConsoleShell};
use contract_report::config::{ConfigManager, ReportConfigReader};
use contract_report::{i18n, logging, ReportSession};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} {}", contract_report::APP_NAME, contract_report::VERSION);
    tracing::info!("==================================================");

    let manager = ConfigManager::from_env();
    match manager.get_config_snapshot() {
        Ok(snapshot) => tracing::debug!(config = %snapshot, "配置快照"),
        Err(e) => tracing::warn!(error = %e, "配置快照生成失败"),
    }

    let config = manager.report_config();
    i18n::set_locale(&config.locale);

    let mut session = ReportSession::from_config(config).context("无法创建报表会话")?;
    let mut shell = ConsoleShell::stdio();

    match run_session(&mut session, &mut shell).await {
        Ok(()) => {
            tracing::info!("会话结束");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // 错误已由展示层输出
            tracing::error!(error = %e, "会话异常终止");
            Ok(ExitCode::FAILURE)
        }
    }
}
