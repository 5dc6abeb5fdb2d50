pub mod config;
pub mod handler;

pub use config::CsvConfig;
pub use handler::CsvHandler;

use thiserror::Error;

/// The CSV schemas the tool understands. Detection picks the schema whose
/// configured field names match the most header columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvType {
    Irap,
    EcsSurveys,
    EcsMinorSections,
    EcsPoints,
}

impl CsvType {
    pub const ALL: [CsvType; 4] = [
        CsvType::Irap,
        CsvType::EcsSurveys,
        CsvType::EcsMinorSections,
        CsvType::EcsPoints,
    ];

    pub fn file_id(&self) -> u8 {
        match self {
            CsvType::Irap => 1,
            CsvType::EcsSurveys => 2,
            CsvType::EcsMinorSections => 3,
            CsvType::EcsPoints => 4,
        }
    }

    pub fn from_file_id(id: u8) -> Option<CsvType> {
        CsvType::ALL.iter().copied().find(|t| t.file_id() == id)
    }
}

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("invalid field configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0} does not match any known CSV schema")]
    UnknownSchema(String),

    #[error("{0} has no header row")]
    MissingHeader(String),
}
