pub type DocumentId = i64;
