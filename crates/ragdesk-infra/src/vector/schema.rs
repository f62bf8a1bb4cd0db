//! Arrow schemas for corpus tables.
//!
//! Every table carries the record's own columns followed by the embedding
//! model name and a fixed-size float32 `vector` column. Arrow versions must
//! match lancedb's transitive dependency (57.3 for lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

use super::codec::ArrowRecord;

pub const VECTOR_COLUMN: &str = "vector";
pub const MODEL_COLUMN: &str = "embedding_model";

/// The `vector` column type for `dimension`-length embeddings.
pub fn vector_type(dimension: i32) -> DataType {
    DataType::FixedSizeList(
        Arc::new(Field::new("item", DataType::Float32, true)),
        dimension,
    )
}

/// Full table schema for records of type `R`.
pub fn table_schema<R: ArrowRecord>(dimension: i32) -> Schema {
    let mut fields = R::fields();
    fields.push(Field::new(MODEL_COLUMN, DataType::Utf8, false));
    fields.push(Field::new(VECTOR_COLUMN, vector_type(dimension), false));
    Schema::new(fields)
}

/// Vector length of an existing table, if it has a well-formed `vector` column.
pub fn vector_dimension(schema: &Schema) -> Option<i32> {
    match schema.field_with_name(VECTOR_COLUMN).ok()?.data_type() {
        DataType::FixedSizeList(_, size) => Some(*size),
        _ => None,
    }
}
