// ==========================================
// 合同汇总报表 - 访问口令
// ==========================================
// 单一共享口令，忽略大小写比较
// 未配置口令时不拦截
// ==========================================

use tracing::warn;

#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: String,
}

impl AccessGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// 按配置构建；空口令视为未启用
    pub fn from_secret(secret: Option<&str>) -> Option<Self> {
        secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::new)
    }

    pub fn check(&self, input: &str) -> bool {
        let granted = input.trim().to_lowercase() == self.secret.trim().to_lowercase();
        if !granted {
            warn!("访问口令不匹配");
        }
        granted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_match() {
        let gate = AccessGate::new("Pulte2024");
        assert!(gate.check("pulte2024"));
        assert!(gate.check("PULTE2024"));
        assert!(gate.check("  Pulte2024 "));
        assert!(!gate.check("pulte"));
        assert!(!gate.check(""));
    }

    #[test]
    fn test_blank_secret_disables_gate() {
        assert!(AccessGate::from_secret(None).is_none());
        assert!(AccessGate::from_secret(Some("   ")).is_none());
        assert!(AccessGate::from_secret(Some("x")).is_some());
    }
}
