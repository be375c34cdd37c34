// frbhost-core/src/domain/photometry/table.rs

use crate::domain::error::DomainError;

/// Values of a single column. `None` marks a masked entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column. Integers are widened, text has no view.
    pub fn as_floats(&self) -> Option<Vec<Option<f64>>> {
        match self {
            Self::Float(v) => Some(v.clone()),
            Self::Int(v) => Some(v.iter().map(|x| x.map(|i| i as f64)).collect()),
            Self::Text(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn floats(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }
}

/// In-memory table with ordered, named columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotometryTable {
    columns: Vec<Column>,
}

impl PhotometryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<Column>) -> Result<Self, DomainError> {
        let mut table = Self::new();
        for col in columns {
            table.push_column(col)?;
        }
        Ok(table)
    }

    pub fn push_column(&mut self, column: Column) -> Result<(), DomainError> {
        if let Some(first) = self.columns.first()
            && first.data.len() != column.data.len()
        {
            return Err(DomainError::RowCountMismatch {
                name: column.name,
                expected: first.data.len(),
                actual: column.data.len(),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn column_mut(&mut self, name: &str) -> Result<&mut Column, DomainError> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DomainError::MissingColumn(name.to_string()))
    }

    pub fn rename_column(&mut self, old: &str, new: &str) -> Result<(), DomainError> {
        if old == new {
            return Ok(());
        }
        self.column_mut(old)?.name = new.to_string();
        Ok(())
    }

    /// Numeric values of a column, integers widened to floats.
    pub fn floats(&self, name: &str) -> Result<Vec<Option<f64>>, DomainError> {
        let col = self
            .column(name)
            .ok_or_else(|| DomainError::MissingColumn(name.to_string()))?;
        col.data
            .as_floats()
            .ok_or_else(|| DomainError::NotNumeric(name.to_string()))
    }

    pub fn set_floats(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<(), DomainError> {
        let expected = self.row_count();
        if values.len() != expected {
            return Err(DomainError::RowCountMismatch {
                name: name.to_string(),
                expected,
                actual: values.len(),
            });
        }
        self.column_mut(name)?.data = ColumnData::Float(values);
        Ok(())
    }

    /// Replace masked entries of a numeric column with `value`.
    pub fn fill_masked(&mut self, name: &str, value: f64) -> Result<(), DomainError> {
        let filled = self
            .floats(name)?
            .into_iter()
            .map(|v| Some(v.unwrap_or(value)))
            .collect();
        self.set_floats(name, filled)
    }

    /// New table holding only `names`, in that order.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, DomainError> {
        let columns = names
            .iter()
            .map(|n| {
                self.column(n.as_ref())
                    .cloned()
                    .ok_or_else(|| DomainError::MissingColumn(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { columns })
    }
}
