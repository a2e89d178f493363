// ==========================================
// 加热炉周期核验系统 - 导入层
// ==========================================
// 职责: 外部表格数据导入，生成传感器数据源与装炉记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod telemetry_importer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{
    FieldMapper, ProductionColumnHints, ProductionColumns, SensorColumnHints, SensorColumns,
};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use telemetry_importer::{ImportOptions, TelemetryImporterImpl};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, ProductionLoad, RawTable, SensorLoad, TelemetryImporter};
