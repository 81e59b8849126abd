use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;

use super::filter::HeightHistogram;
use super::model::Appearance;

// ---------------------------------------------------------------------------
// CountTable – (category, count) result of every aggregation
// ---------------------------------------------------------------------------

/// A two-column `(key, count)` result. Row order is the query's order.
#[derive(Debug, Clone, PartialEq)]
pub struct CountTable<K> {
    pub key_column: &'static str,
    pub count_column: &'static str,
    pub rows: Vec<(K, usize)>,
}

impl<K> CountTable<K> {
    pub fn new(key_column: &'static str, count_column: &'static str, rows: Vec<(K, usize)>) -> Self {
        CountTable {
            key_column,
            count_column,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Zero rows is a valid result, not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.rows.iter().map(|(k, _)| k)
    }

    pub fn count_of(&self, key: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, c)| *c)
    }

    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, c)| c).sum()
    }
}

// ---------------------------------------------------------------------------
// Arrow conversion
// ---------------------------------------------------------------------------

/// Key types that can become an Arrow column.
pub trait KeyColumn: Sized {
    const DATA_TYPE: DataType;
    fn to_array(keys: &[&Self]) -> ArrayRef;
}

impl KeyColumn for String {
    const DATA_TYPE: DataType = DataType::Utf8;
    fn to_array(keys: &[&Self]) -> ArrayRef {
        Arc::new(StringArray::from_iter_values(keys.iter().map(|s| s.as_str())))
    }
}

impl KeyColumn for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
    fn to_array(keys: &[&Self]) -> ArrayRef {
        Arc::new(Int32Array::from_iter_values(keys.iter().map(|k| **k)))
    }
}

impl KeyColumn for u32 {
    const DATA_TYPE: DataType = DataType::UInt32;
    fn to_array(keys: &[&Self]) -> ArrayRef {
        Arc::new(UInt32Array::from_iter_values(keys.iter().map(|k| **k)))
    }
}

impl KeyColumn for usize {
    const DATA_TYPE: DataType = DataType::UInt64;
    fn to_array(keys: &[&Self]) -> ArrayRef {
        Arc::new(UInt64Array::from_iter_values(keys.iter().map(|k| **k as u64)))
    }
}

impl<K: KeyColumn> CountTable<K> {
    pub fn to_record_batch(&self) -> Result<RecordBatch, ArrowError> {
        let schema = Arc::new(Schema::new(vec![
            Field::new(self.key_column, K::DATA_TYPE, false),
            Field::new(self.count_column, DataType::UInt64, false),
        ]));
        let keys: Vec<&K> = self.keys().collect();
        let counts = UInt64Array::from_iter_values(self.rows.iter().map(|(_, c)| *c as u64));
        RecordBatch::try_new(schema, vec![K::to_array(&keys), Arc::new(counts)])
    }
}

/// Actor rows as a table of the columns a viewer cares about.
pub fn appearances_batch(rows: &[&Appearance]) -> Result<RecordBatch, ArrowError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("movie_id", DataType::UInt64, false),
        Field::new("actor_name", DataType::Utf8, true),
        Field::new("character_name", DataType::Utf8, true),
        Field::new("gender", DataType::Utf8, false),
        Field::new("height", DataType::Float64, true),
    ]));
    let movie_ids = UInt64Array::from_iter_values(rows.iter().map(|r| r.movie_id));
    let actors: StringArray = rows.iter().map(|r| r.actor_name.as_deref()).collect();
    let characters: StringArray = rows.iter().map(|r| r.character_name.as_deref()).collect();
    let genders = StringArray::from_iter_values(rows.iter().map(|r| r.gender_label()));
    let heights: Float64Array = rows.iter().map(|r| r.height).collect();

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(movie_ids),
            Arc::new(actors),
            Arc::new(characters),
            Arc::new(genders),
            Arc::new(heights),
        ],
    )
}

pub fn histogram_batch(hist: &HeightHistogram) -> Result<RecordBatch, ArrowError> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("lower_m", DataType::Float64, false),
        Field::new("upper_m", DataType::Float64, false),
        Field::new("Frequency", DataType::UInt64, false),
    ]));
    let lower = Float64Array::from_iter_values(hist.bins.iter().map(|b| b.lower));
    let upper = Float64Array::from_iter_values(hist.bins.iter().map(|b| b.upper));
    let counts = UInt64Array::from_iter_values(hist.bins.iter().map(|b| b.count as u64));
    RecordBatch::try_new(schema, vec![Arc::new(lower), Arc::new(upper), Arc::new(counts)])
}
