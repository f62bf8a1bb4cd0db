//! Conversion between records and Arrow record batches.

use std::sync::Arc;

use arrow_array::{
    Array, ArrayRef, FixedSizeListArray, Float32Array, Float64Array, RecordBatch, StringArray,
};
use arrow_schema::{DataType, Field};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ragdesk_types::error::RepositoryError;
use ragdesk_types::record::{Faq, Product, Record, StoredEmbedding};

use super::schema::{MODEL_COLUMN, VECTOR_COLUMN, table_schema};

/// A record type with a columnar representation.
pub trait ArrowRecord: Record {
    /// The record's own columns, in order. `id` must come first.
    fn fields() -> Vec<Field>;

    /// One single-row array per field of [`ArrowRecord::fields`].
    fn columns(&self) -> Vec<ArrayRef>;

    /// Rebuild the record at `row`.
    fn from_row(batch: &RecordBatch, row: usize) -> Result<Self, RepositoryError>;
}

impl ArrowRecord for Product {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
            Field::new("quantity", DataType::Float64, false),
            Field::new("created_at", DataType::Utf8, false),
            Field::new("updated_at", DataType::Utf8, false),
        ]
    }

    fn columns(&self) -> Vec<ArrayRef> {
        vec![
            Arc::new(StringArray::from(vec![self.id.to_string()])),
            Arc::new(StringArray::from(vec![self.name.clone()])),
            Arc::new(Float64Array::from(vec![self.price])),
            Arc::new(Float64Array::from(vec![self.quantity])),
            Arc::new(StringArray::from(vec![self.created_at.to_rfc3339()])),
            Arc::new(StringArray::from(vec![self.updated_at.to_rfc3339()])),
        ]
    }

    fn from_row(batch: &RecordBatch, row: usize) -> Result<Self, RepositoryError> {
        Ok(Product {
            id: uuid_at(batch, row)?,
            name: column::<StringArray>(batch, "name")?.value(row).to_string(),
            price: column::<Float64Array>(batch, "price")?.value(row),
            quantity: column::<Float64Array>(batch, "quantity")?.value(row),
            created_at: timestamp_at(batch, "created_at", row)?,
            updated_at: timestamp_at(batch, "updated_at", row)?,
        })
    }
}

impl ArrowRecord for Faq {
    fn fields() -> Vec<Field> {
        vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("question", DataType::Utf8, false),
            Field::new("answer", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
            Field::new("updated_at", DataType::Utf8, false),
        ]
    }

    fn columns(&self) -> Vec<ArrayRef> {
        vec![
            Arc::new(StringArray::from(vec![self.id.to_string()])),
            Arc::new(StringArray::from(vec![self.question.clone()])),
            Arc::new(StringArray::from(vec![self.answer.clone()])),
            Arc::new(StringArray::from(vec![self.created_at.to_rfc3339()])),
            Arc::new(StringArray::from(vec![self.updated_at.to_rfc3339()])),
        ]
    }

    fn from_row(batch: &RecordBatch, row: usize) -> Result<Self, RepositoryError> {
        Ok(Faq {
            id: uuid_at(batch, row)?,
            question: column::<StringArray>(batch, "question")?
                .value(row)
                .to_string(),
            answer: column::<StringArray>(batch, "answer")?
                .value(row)
                .to_string(),
            created_at: timestamp_at(batch, "created_at", row)?,
            updated_at: timestamp_at(batch, "updated_at", row)?,
        })
    }
}

/// Single-row batch holding `record`, its embedding and the model name.
pub fn to_batch<R: ArrowRecord>(
    record: &R,
    embedding: &[f32],
    embedding_model: &str,
) -> Result<RecordBatch, RepositoryError> {
    let dimension = i32::try_from(embedding.len())
        .map_err(|_| RepositoryError::Query("embedding too long".to_string()))?;
    let schema = Arc::new(table_schema::<R>(dimension));

    let values = Float32Array::from(embedding.to_vec());
    let item = Arc::new(Field::new("item", DataType::Float32, true));
    let vectors = FixedSizeListArray::try_new(item, dimension, Arc::new(values), None)
        .map_err(|e| RepositoryError::Query(format!("failed to build vector column: {e}")))?;

    let mut columns = record.columns();
    columns.push(Arc::new(StringArray::from(vec![embedding_model.to_string()])));
    columns.push(Arc::new(vectors));

    RecordBatch::try_new(schema, columns)
        .map_err(|e| RepositoryError::Query(format!("failed to build record batch: {e}")))
}

/// Every record in `batch`.
pub fn records_from_batch<R: ArrowRecord>(batch: &RecordBatch) -> Result<Vec<R>, RepositoryError> {
    (0..batch.num_rows())
        .map(|row| R::from_row(batch, row))
        .collect()
}

/// The stored embedding at `row`.
pub fn embedding_from_row(
    batch: &RecordBatch,
    row: usize,
) -> Result<StoredEmbedding, RepositoryError> {
    let vectors = column::<FixedSizeListArray>(batch, VECTOR_COLUMN)?;
    let values = vectors.value(row);
    let floats = values
        .as_any()
        .downcast_ref::<Float32Array>()
        .ok_or_else(|| RepositoryError::Query("vector items are not float32".to_string()))?;

    Ok(StoredEmbedding {
        record_id: uuid_at(batch, row)?,
        vector: floats.values().to_vec(),
        embedding_model: column::<StringArray>(batch, MODEL_COLUMN)?
            .value(row)
            .to_string(),
    })
}

fn column<'a, A: Array + 'static>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a A, RepositoryError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<A>())
        .ok_or_else(|| RepositoryError::Query(format!("missing or mistyped column '{name}'")))
}

fn uuid_at(batch: &RecordBatch, row: usize) -> Result<Uuid, RepositoryError> {
    let raw = column::<StringArray>(batch, "id")?.value(row);
    Uuid::parse_str(raw).map_err(|e| RepositoryError::Query(format!("invalid id '{raw}': {e}")))
}

fn timestamp_at(
    batch: &RecordBatch,
    name: &str,
    row: usize,
) -> Result<DateTime<Utc>, RepositoryError> {
    let raw = column::<StringArray>(batch, name)?.value(row);
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid {name} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_batch_decodes_to_same_record() {
        let product = Product::new("Trail Mix", 3.8, 40.0);
        let batch = to_batch(&product, &[0.1, 0.2, 0.3], "test-model").unwrap();
        assert_eq!(batch.num_rows(), 1);

        let decoded: Vec<Product> = records_from_batch(&batch).unwrap();
        assert_eq!(decoded, vec![product.clone()]);

        let embedding = embedding_from_row(&batch, 0).unwrap();
        assert_eq!(embedding.record_id, product.id);
        assert_eq!(embedding.vector, vec![0.1, 0.2, 0.3]);
        assert_eq!(embedding.embedding_model, "test-model");
    }

    #[test]
    fn test_faq_batch_keeps_text() {
        let faq = Faq::new("Do you ship internationally?", "Yes, to many countries.");
        let batch = to_batch(&faq, &[1.0, 0.0], "m").unwrap();
        let decoded: Vec<Faq> = records_from_batch(&batch).unwrap();
        assert_eq!(decoded[0].question, "Do you ship internationally?");
        assert_eq!(decoded[0].answer, "Yes, to many countries.");
    }

    #[test]
    fn test_corrupt_timestamp_is_an_error() {
        let product = Product::new("Pepsi", 1.4, 80.0);
        let mut columns = product.columns();
        columns[4] = Arc::new(StringArray::from(vec!["yesterday".to_string()]));
        let schema = Arc::new(arrow_schema::Schema::new(Product::fields()));
        let batch = RecordBatch::try_new(schema, columns).unwrap();
        let err = Product::from_row(&batch, 0).unwrap_err();
        assert!(err.to_string().contains("created_at"));
    }
}
