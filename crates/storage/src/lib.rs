pub mod memory;
pub mod template;

pub use memory::MemoryTemplate;
pub use template::{output_file_name, StorageError, TemplateStore, XlsxTemplate};

/// Default template workbook file name.
pub const DEFAULT_TEMPLATE: &str = "Automação_Gransoft.xlsx";
/// Default sheet holding the column header and receiving the output rows.
pub const DEFAULT_SHEET: &str = "Banco";
