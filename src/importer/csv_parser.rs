// ==========================================
// 工资档案管理 - CSV 文本解析器
// ==========================================
// 输入: 逗号分隔、双引号包裹的文本（上传内容，非文件）
// 输出: 按文件顺序的行映射（表头名 → 单元格值）
// 约束:
// - 解析器本身不报错；格式问题交给行校验
// - 空行跳过但仍占用行号，行号与源文本行位置一致（表头为第 1 行）
// ==========================================

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;

// ==========================================
// CsvRow - 一行数据
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 源文本中的行号（表头为 1）
    pub row_number: usize,
    /// 表头名 → 原始单元格值（未 trim）
    pub fields: HashMap<String, String>,
}

impl CsvRow {
    /// 读取单元格，缺失时返回空串
    pub fn get(&self, header: &str) -> &str {
        self.fields.get(header).map(String::as_str).unwrap_or("")
    }
}

/// 按 CSV 规则拆分单行（支持引号内逗号与 "" 转义）
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .buffer_capacity(line.len().max(1))
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(|field| field.to_string()).collect(),
        Ok(false) => Vec::new(),
        Err(e) => {
            tracing::debug!("CSV 行拆分失败，按空行处理: {}", e);
            Vec::new()
        }
    }
}

// ==========================================
// CsvParser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 拆出源文本的各行（整体 trim 后按 \n 切分）
    fn lines(content: &str) -> impl Iterator<Item = &str> {
        content.trim().split('\n').map(str::trim)
    }

    /// 解析表头（首个非空行）
    ///
    /// 表头名按原样保留，不做单元格级 trim
    pub fn parse_headers(&self, content: &str) -> Vec<String> {
        match Self::lines(content).next() {
            Some(line) if !line.is_empty() => split_csv_line(line),
            _ => Vec::new(),
        }
    }

    /// 解析数据行
    ///
    /// # 返回
    /// - 仅有表头或内容为空时返回空列表
    /// - 缺少的尾部单元格映射为空串，多余单元格丢弃
    pub fn parse_rows(&self, content: &str) -> Vec<CsvRow> {
        let mut lines = Self::lines(content);

        let headers = match lines.next() {
            Some(line) if !line.is_empty() => split_csv_line(line),
            _ => return Vec::new(),
        };

        let mut rows = Vec::new();
        for (idx, line) in lines.enumerate() {
            // 表头为第 1 行，第一条数据行为第 2 行
            let row_number = idx + 2;

            if line.is_empty() {
                continue;
            }

            let mut cells = split_csv_line(line).into_iter();
            let fields = headers
                .iter()
                .map(|header| (header.clone(), cells.next().unwrap_or_default()))
                .collect();

            rows.push(CsvRow { row_number, fields });
        }

        rows
    }
}
