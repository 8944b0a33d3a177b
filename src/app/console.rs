// ==========================================
// 合同汇总报表 - 控制台展示层
// ==========================================
// 编号选择（空行 = 默认，q = 退出）
// 表格按列宽对齐，金额列右对齐
// ==========================================

use crate::app::shell::PresentationShell;
use crate::domain::FormattedTable;
use crate::i18n::{t, t_with_args};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

const QUIT: &str = "q";

pub struct ConsoleShell<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl ConsoleShell<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleShell<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// 读一行；EOF 或读失败 → None
    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    fn prompt(&mut self, text: &str) {
        // 控制台写失败不影响会话
        let _ = write!(self.writer, "{} ", text);
        let _ = self.writer.flush();
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.writer, "{}", text);
    }
}

impl<R: BufRead, W: Write> PresentationShell for ConsoleShell<R, W> {
    fn title(&mut self, title: &str) {
        self.line(title);
        self.line(&"=".repeat(title.chars().count()));
    }

    fn select_one(&mut self, label: &str, options: &[String], default: usize) -> Option<usize> {
        if options.is_empty() {
            return None;
        }
        let default = default.min(options.len() - 1);

        self.line(label);
        for (idx, option) in options.iter().enumerate() {
            let marker = if idx == default { '*' } else { ' ' };
            self.line(&format!("{} {:>3}) {}", marker, idx + 1, option));
        }

        loop {
            self.prompt(&t_with_args(
                "console.choice",
                &[("default", &(default + 1).to_string())],
            ));
            let input = self.read_line()?;
            let input = input.trim();

            if input.is_empty() {
                return Some(default);
            }
            if input.eq_ignore_ascii_case(QUIT) {
                return None;
            }
            match input.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Some(n - 1),
                _ => self.line(&t_with_args("console.invalid_choice", &[("input", input)])),
            }
        }
    }

    fn text_input(&mut self, label: &str) -> Option<String> {
        self.prompt(&format!("{}:", label));
        self.read_line().map(|s| s.trim().to_string())
    }

    fn action(&mut self, label: &str) -> Option<bool> {
        loop {
            self.prompt(&t_with_args("console.action", &[("label", label)]));
            let input = self.read_line()?;
            match input.trim().to_lowercase().as_str() {
                "" | "y" => return Some(true),
                "r" | "n" => return Some(false),
                QUIT => return None,
                other => {
                    let message = t_with_args("console.invalid_choice", &[("input", other)]);
                    self.line(&message);
                }
            }
        }
    }

    fn show_table(&mut self, table: &FormattedTable) {
        let rendered = table.rendered_rows();
        let columns = table.header.len();

        let mut widths: Vec<usize> = table.header.iter().map(|h| h.chars().count()).collect();
        for row in &rendered {
            for (idx, cell) in row.iter().enumerate().take(columns) {
                widths[idx] = widths[idx].max(cell.chars().count());
            }
        }

        let header: Vec<String> = table
            .header
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h, w = *w))
            .collect();
        self.line(header.join("  ").trim_end());
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        self.line(&rule.join("  "));

        for (row, rendered_row) in table.rows.iter().zip(&rendered) {
            let cells: Vec<String> = row
                .iter()
                .zip(rendered_row)
                .zip(&widths)
                .map(|((cell, text), w)| {
                    if cell.is_numeric() {
                        format!("{:>w$}", text, w = *w)
                    } else {
                        format!("{:<w$}", text, w = *w)
                    }
                })
                .collect();
            self.line(cells.join("  ").trim_end());
        }
        self.line("");
    }

    fn warning(&mut self, message: &str) {
        self.line(&format!("{} {}", t("console.warning"), message));
    }

    fn error(&mut self, message: &str) {
        self.line(&format!("{} {}", t("console.error"), message));
    }

    fn fatal(&mut self, message: &str) {
        self.line(&format!("{} {}", t("console.fatal"), message));
    }
}
