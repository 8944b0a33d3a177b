// ==========================================
// 合同汇总报表 - 应用层
// ==========================================
// 职责: 展示层接口、控制台实现、访问口令
// ==========================================

pub mod access_gate;
pub mod console;
pub mod shell;

// 重导出
pub use access_gate::AccessGate;
pub use console::ConsoleShell;
pub use shell::{run_session, user_message, PresentationShell};
