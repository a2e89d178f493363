// ==========================================
// 加热炉周期核验系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv，UTF-8 或 CP949)
// 规则: 可指定表头行，表头之前的行（报表标题等）全部丢弃
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawTable};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use encoding_rs::{EUC_KR, UTF_8};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path, header_row: usize) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = lower_extension(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let bytes = fs::read(path)?;
        let text = decode_csv_bytes(&bytes)?;

        // 表头位置不固定，按无表头读取
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        }

        build_table(rows, header_row)
    }
}

/// CSV 字节解码：优先 UTF-8（去除 BOM），失败时按 CP949 (EUC-KR) 解码
pub fn decode_csv_bytes(bytes: &[u8]) -> ImportResult<String> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| ImportError::EncodingError("既不是 UTF-8 也不是 CP949".to_string()))
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path, header_row: usize) -> ImportResult<RawTable> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 检查扩展名
        let ext = lower_extension(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开 Excel 文件（自动识别 xls/xlsx）
        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();

        build_table(rows, header_row)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P, header_row: usize) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let ext = lower_extension(path);

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_table(path, header_row),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(path, header_row),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

fn lower_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 以 header_row 行作为表头构建原始表
///
/// 空表头单元格命名为 column_{列号}；全空数据行跳过
pub fn build_table(rows: Vec<Vec<String>>, header_row: usize) -> ImportResult<RawTable> {
    if header_row >= rows.len() {
        return Err(ImportError::HeaderRowOutOfRange {
            header_row,
            rows: rows.len(),
        });
    }

    let mut rows = rows.into_iter().skip(header_row);
    let headers: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, h)| {
            let trimmed = h.trim();
            if trimmed.is_empty() {
                format!("column_{}", idx)
            } else {
                trimmed.to_string()
            }
        })
        .collect();

    if headers.is_empty() {
        return Err(ImportError::EmptyTable(format!("表头行 {} 为空", header_row)));
    }

    let mut records = Vec::new();
    for data_row in rows {
        let mut row_map = HashMap::new();

        for (col_idx, value) in data_row.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        records.push(row_map);
    }

    Ok(RawTable { headers, records })
}
