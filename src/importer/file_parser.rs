// ==========================================
// 库存批次分配引擎 - 库存快照文件解析
// ==========================================
// 支持: CSV (.csv) / JSON (.json，StockBatch 数组)
// ==========================================

use crate::domain::stock::StockBatch;
use crate::importer::error::{ImportResult, StockImportError};
use crate::importer::field_mapper::FieldMapper;
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// 解析为原始行（列名 → 值）
    pub fn parse_to_raw_records(&self, path: &Path) -> ImportResult<Vec<HashMap<String, String>>> {
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row_map: HashMap<String, String> = headers
                .iter()
                .cloned()
                .zip(record.iter().map(|v| v.trim().to_string()))
                .collect();

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// StockSnapshotLoader - 根据扩展名选择解析方式
// ==========================================
pub struct StockSnapshotLoader;

impl StockSnapshotLoader {
    /// 加载库存快照，保持文件中的批次顺序
    pub fn load<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<StockBatch>> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(StockImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let stocks = match ext.as_str() {
            "csv" => {
                let rows = CsvParser.parse_to_raw_records(path)?;
                debug!(rows = rows.len(), "csv rows parsed");
                rows.iter()
                    .enumerate()
                    .map(|(idx, row)| FieldMapper.map_to_stock_batch(row, idx + 1))
                    .collect::<ImportResult<Vec<_>>>()?
            }
            "json" => {
                let file = File::open(path)?;
                serde_json::from_reader::<_, Vec<StockBatch>>(file)?
            }
            _ => return Err(StockImportError::UnsupportedFormat(ext)),
        };

        check_unique_ids(&stocks)?;
        info!(path = %path.display(), batches = stocks.len(), "库存快照加载完成");
        Ok(stocks)
    }
}

fn check_unique_ids(stocks: &[StockBatch]) -> ImportResult<()> {
    let mut seen = HashSet::with_capacity(stocks.len());
    for (idx, stock) in stocks.iter().enumerate() {
        if !seen.insert(stock.id.as_str()) {
            return Err(StockImportError::DuplicateBatch {
                row: idx + 1,
                id: stock.id.clone(),
            });
        }
    }
    Ok(())
}
